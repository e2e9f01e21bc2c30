//! Capital raid season summary.

use serde::{Deserialize, Serialize};

use super::time::normalize_opt;
use crate::models::{RaidSeason, RaidState};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidLifetime {
    pub seasons: usize,
    pub total_attacks: u64,
    pub enemy_districts_destroyed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidSummary {
    /// The ongoing season, members ranked by capital gold looted.
    pub raid: Option<RaidSeason>,
    pub capital_total_loot_lifetime: u64,
    pub lifetime: RaidLifetime,
}

pub fn summarize_raids(seasons: &[RaidSeason]) -> RaidSummary {
    let raid = seasons
        .iter()
        .find(|s| s.state == RaidState::Ongoing)
        .map(|s| {
            let mut season = s.clone();
            season.start_time = normalize_opt(s.start_time.as_deref());
            season.end_time = normalize_opt(s.end_time.as_deref());
            // Stable sort keeps upstream order among equal loot.
            season
                .members
                .sort_by(|a, b| b.capital_resources_looted.cmp(&a.capital_resources_looted));
            season
        });

    RaidSummary {
        raid,
        capital_total_loot_lifetime: seasons.iter().map(|s| s.capital_total_loot).sum(),
        lifetime: RaidLifetime {
            seasons: seasons.len(),
            total_attacks: seasons.iter().map(|s| u64::from(s.total_attacks)).sum(),
            enemy_districts_destroyed: seasons
                .iter()
                .map(|s| u64::from(s.enemy_districts_destroyed))
                .sum(),
        },
    }
}
