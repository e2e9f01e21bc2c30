//! Mirror view: each of our members next to the opponent on the same slot,
//! with the first attack our member made.

use serde::{Deserialize, Serialize};

use super::time::normalize_opt;
use crate::models::{CurrentWar, WarMember, WarState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorAttack {
    pub stars: u32,
    pub destruction: f64,
    pub defender_tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorMember {
    pub name: String,
    pub tag: String,
    pub th: u32,
    pub attack: Option<MirrorAttack>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorOpponent {
    pub name: String,
    pub tag: String,
    pub th: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorPair {
    pub position: Option<u32>,
    pub me: MirrorMember,
    pub opp: Option<MirrorOpponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorReport {
    pub state: WarState,
    pub end_time: Option<String>,
    pub opponent: Option<String>,
    pub pairs: Vec<MirrorPair>,
}

pub fn build_mirror(war: &CurrentWar) -> MirrorReport {
    if !war.state.has_rosters() {
        return MirrorReport {
            state: match war.state {
                WarState::Unavailable => WarState::Unavailable,
                _ => WarState::NotInWar,
            },
            end_time: None,
            opponent: None,
            pairs: Vec::new(),
        };
    }

    let ours = sorted_by_position(war.clan.as_ref().map(|c| c.members.as_slice()));
    let theirs = war
        .opponent
        .as_ref()
        .map(|c| c.members.as_slice())
        .unwrap_or(&[]);

    let pairs = ours
        .into_iter()
        .map(|member| {
            let opp = member.map_position.and_then(|pos| {
                theirs
                    .iter()
                    .find(|t| t.map_position == Some(pos))
                    .map(|t| MirrorOpponent {
                        name: t.name.clone(),
                        tag: t.tag.clone(),
                        th: t.townhall_level.unwrap_or(0),
                    })
            });

            MirrorPair {
                position: member.map_position,
                me: MirrorMember {
                    name: member.name.clone(),
                    tag: member.tag.clone(),
                    th: member.townhall_level.unwrap_or(0),
                    attack: member.attacks.first().map(|a| MirrorAttack {
                        stars: a.stars,
                        destruction: a.destruction_percentage,
                        defender_tag: a.defender_tag.clone(),
                    }),
                },
                opp,
            }
        })
        .collect();

    MirrorReport {
        state: war.state,
        end_time: normalize_opt(war.end_time.as_deref()),
        opponent: war
            .opponent
            .as_ref()
            .map(|o| o.name.clone())
            .filter(|name| !name.is_empty()),
        pairs,
    }
}

/// Members ordered by map position; members without one go last.
pub(crate) fn sorted_by_position(members: Option<&[WarMember]>) -> Vec<&WarMember> {
    let mut sorted: Vec<&WarMember> = members.unwrap_or(&[]).iter().collect();
    sorted.sort_by_key(|m| m.map_position.unwrap_or(u32::MAX));
    sorted
}
