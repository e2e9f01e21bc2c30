//! Current-war document as returned by `GET /clans/{tag}/currentwar`.
//!
//! Every field is optional on the wire. Missing or `null` values degrade
//! to `None`, zero or an empty list so a partial document still deserializes.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarState {
    #[default]
    NotInWar,
    Preparation,
    InWar,
    WarEnded,
    /// The war is private or absent upstream (403/404). Never sent by upstream.
    Unavailable,
    /// Any state string this service does not recognise.
    #[serde(other)]
    Unknown,
}

impl WarState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarState::NotInWar => "notInWar",
            WarState::Preparation => "preparation",
            WarState::InWar => "inWar",
            WarState::WarEnded => "warEnded",
            WarState::Unavailable => "unavailable",
            WarState::Unknown => "unknown",
        }
    }

    /// Whether rosters and attacks are meaningful for this state.
    pub fn has_rosters(&self) -> bool {
        matches!(
            self,
            WarState::Preparation | WarState::InWar | WarState::WarEnded
        )
    }
}

/// A single attack performed by a war member.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attack {
    #[serde(deserialize_with = "super::null_as_default")]
    pub attacker_tag: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub defender_tag: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub stars: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub destruction_percentage: f64,
    /// Global sequence number of the attack within the war.
    #[serde(deserialize_with = "super::null_as_default")]
    pub order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// One roster slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarMember {
    #[serde(deserialize_with = "super::null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    pub townhall_level: Option<u32>,
    /// 1-based roster slot, the alignment key between both sides.
    pub map_position: Option<u32>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub attacks: Vec<Attack>,
    pub opponent_attacks: Option<u32>,
    pub best_opponent_attack: Option<Attack>,
}

/// One side of the war with its optional pre-aggregated totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarClan {
    #[serde(deserialize_with = "super::null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    pub clan_level: Option<u32>,
    pub attacks: Option<u32>,
    pub stars: Option<u32>,
    pub destruction_percentage: Option<f64>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub members: Vec<WarMember>,
}

impl WarClan {
    /// All attacks recorded by this side, in roster order.
    pub fn all_attacks(&self) -> Vec<Attack> {
        self.members
            .iter()
            .flat_map(|m| m.attacks.iter().cloned())
            .collect()
    }
}

/// The raw current-war document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentWar {
    #[serde(deserialize_with = "super::null_as_default")]
    pub state: WarState,
    pub team_size: Option<u32>,
    pub attacks_per_member: Option<u32>,
    pub battle_modifier: Option<String>,
    pub preparation_start_time: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub clan: Option<WarClan>,
    pub opponent: Option<WarClan>,
}

impl CurrentWar {
    /// Placeholder document for a war hidden by upstream (403/404).
    pub fn unavailable() -> Self {
        Self {
            state: WarState::Unavailable,
            ..Default::default()
        }
    }
}
