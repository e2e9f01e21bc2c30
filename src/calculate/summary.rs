//! Clan portal summary: profile, roster, recent war log and current war.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time::{format_utc, normalize_opt};
use crate::models::{ClanMember, ClanProfile, ClanRole, CurrentWar, WarLogEntry};

const MISSING_LABEL: &str = "—";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMember {
    pub name: String,
    pub tag: String,
    pub role: ClanRole,
    pub level: u32,
    pub town_hall: u32,
    pub trophies: u32,
    pub donations: u32,
}

impl From<&ClanMember> for SummaryMember {
    fn from(m: &ClanMember) -> Self {
        Self {
            name: m.name.clone(),
            tag: m.tag.clone(),
            role: m.role.display(),
            level: m.exp_level,
            town_hall: m.town_hall_level.unwrap_or(0),
            trophies: m.trophies,
            donations: m.donations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryClan {
    pub name: String,
    pub tag: String,
    pub description: String,
    #[serde(rename = "type")]
    pub clan_type: Option<String>,
    pub location: String,
    pub war_league: String,
    pub clan_level: u32,
    pub clan_points: u32,
    pub members: Vec<SummaryMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarLogSummary {
    pub opponent: String,
    pub result: String,
    pub stars_for: u32,
    pub stars_against: u32,
    pub destruction_for: f64,
    pub destruction_against: f64,
    pub ended_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalSummary {
    pub clan: SummaryClan,
    pub wars: Vec<WarLogSummary>,
    pub current_war_ends_at: Option<String>,
    pub current_war_opponent: Option<String>,
    pub warlog_private: bool,
}

/// Assemble the portal summary.
///
/// `current` is `None` when the current war is private or absent. War log
/// entries whose end time cannot be parsed are stamped with `now`.
pub fn build_summary(
    clan: &ClanProfile,
    warlog: &[WarLogEntry],
    warlog_private: bool,
    current: Option<&CurrentWar>,
    now: DateTime<Utc>,
) -> PortalSummary {
    let summary_clan = SummaryClan {
        name: clan.name.clone(),
        tag: clan.tag.clone(),
        description: clan.description.clone().unwrap_or_default(),
        clan_type: clan.clan_type.clone(),
        location: label(clan.location.as_ref().map(|l| l.name.as_str())),
        war_league: label(clan.war_league.as_ref().map(|l| l.name.as_str())),
        clan_level: clan.clan_level,
        clan_points: clan.clan_points,
        members: clan.member_list.iter().map(SummaryMember::from).collect(),
    };

    let wars = warlog.iter().map(|w| summarize_war(w, now)).collect();

    PortalSummary {
        clan: summary_clan,
        wars,
        current_war_ends_at: current.and_then(|w| normalize_opt(w.end_time.as_deref())),
        current_war_opponent: current
            .and_then(|w| w.opponent.as_ref())
            .map(|o| o.name.clone())
            .filter(|n| !n.is_empty()),
        warlog_private,
    }
}

fn summarize_war(entry: &WarLogEntry, now: DateTime<Utc>) -> WarLogSummary {
    WarLogSummary {
        opponent: entry.opponent.name.clone().unwrap_or_default(),
        // League wars come without a result and are shown as ties.
        result: entry.result.map(|r| r.letter()).unwrap_or("T").to_string(),
        stars_for: entry.clan.stars,
        stars_against: entry.opponent.stars,
        destruction_for: entry.clan.destruction_percentage,
        destruction_against: entry.opponent.destruction_percentage,
        ended_at: normalize_opt(entry.end_time.as_deref()).unwrap_or_else(|| format_utc(now)),
    }
}

fn label(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING_LABEL)
        .to_string()
}
