//! Capital raid seasons from `GET /clans/{tag}/capitalraidseasons`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaidState {
    Ongoing,
    #[default]
    #[serde(other)]
    Ended,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RaidMember {
    #[serde(deserialize_with = "super::null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub attacks: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub attack_limit: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub bonus_attack_limit: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub capital_resources_looted: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RaidSeason {
    #[serde(deserialize_with = "super::null_as_default")]
    pub state: RaidState,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub capital_total_loot: u64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub raids_completed: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total_attacks: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub enemy_districts_destroyed: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub offensive_reward: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub defensive_reward: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub members: Vec<RaidMember>,
}
