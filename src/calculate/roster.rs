//! Plain roster view of the current war, aligned by sorted index.

use serde::{Deserialize, Serialize};

use super::mirror::sorted_by_position;
use super::time::normalize_opt;
use crate::models::{CurrentWar, WarClan, WarMember, WarState};

const MISSING_NAME: &str = "—";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterMember {
    pub name: String,
    pub tag: String,
    pub th: Option<u32>,
    pub map_position: Option<u32>,
}

impl From<&WarMember> for RosterMember {
    fn from(m: &WarMember) -> Self {
        Self {
            name: m.name.clone(),
            tag: m.tag.clone(),
            th: m.townhall_level,
            map_position: m.map_position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPair {
    pub pos: u32,
    pub you: Option<RosterMember>,
    pub opp: Option<RosterMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterView {
    pub state: WarState,
    pub team_size: u32,
    pub ends_at: Option<String>,
    pub clan_name: String,
    pub opponent_name: String,
    pub pairs: Vec<RosterPair>,
}

/// Both rosters sorted by map position and zipped slot by slot.
///
/// Unlike the pairing engine this view aligns by index after sorting, so a
/// gap in one roster shifts the members after it.
pub fn build_roster_view(war: &CurrentWar) -> RosterView {
    let you = sorted_by_position(war.clan.as_ref().map(|c| c.members.as_slice()));
    let them = sorted_by_position(war.opponent.as_ref().map(|c| c.members.as_slice()));

    let team_size = war
        .team_size
        .filter(|&n| n > 0)
        .unwrap_or_else(|| you.len().max(them.len()) as u32);

    let pairs = (0..team_size as usize)
        .map(|i| RosterPair {
            pos: i as u32 + 1,
            you: you.get(i).map(|m| RosterMember::from(*m)),
            opp: them.get(i).map(|m| RosterMember::from(*m)),
        })
        .collect();

    RosterView {
        state: war.state,
        team_size,
        ends_at: normalize_opt(war.end_time.as_deref()),
        clan_name: display_name(war.clan.as_ref()),
        opponent_name: display_name(war.opponent.as_ref()),
        pairs,
    }
}

fn display_name(side: Option<&WarClan>) -> String {
    side.map(|c| c.name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(MISSING_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(tag: &str, pos: u32) -> WarMember {
        WarMember {
            tag: tag.to_string(),
            name: tag.to_string(),
            map_position: Some(pos),
            ..Default::default()
        }
    }

    #[test]
    fn test_roster_view_pads_to_team_size() {
        let war = CurrentWar {
            state: WarState::Preparation,
            team_size: Some(3),
            end_time: Some("20250615T210000.000Z".to_string()),
            clan: Some(WarClan {
                name: "Ours".to_string(),
                members: vec![member("#A2", 2), member("#A1", 1), member("#A3", 3)],
                ..Default::default()
            }),
            opponent: Some(WarClan {
                members: vec![member("#B1", 1)],
                ..Default::default()
            }),
            ..Default::default()
        };
        let view = build_roster_view(&war);

        assert_eq!(view.team_size, 3);
        assert_eq!(view.pairs.len(), 3);
        assert_eq!(view.pairs[0].you.as_ref().unwrap().tag, "#A1");
        assert_eq!(view.pairs[1].you.as_ref().unwrap().tag, "#A2");
        assert!(view.pairs[1].opp.is_none());
        assert_eq!(view.clan_name, "Ours");
        assert_eq!(view.opponent_name, "—");
        assert_eq!(view.ends_at.as_deref(), Some("2025-06-15T21:00:00.000Z"));
    }

    #[test]
    fn test_roster_view_team_size_from_rosters() {
        let war = CurrentWar {
            state: WarState::InWar,
            clan: Some(WarClan {
                members: vec![member("#A1", 1)],
                ..Default::default()
            }),
            opponent: Some(WarClan {
                members: vec![member("#B1", 1), member("#B2", 2)],
                ..Default::default()
            }),
            ..Default::default()
        };
        let view = build_roster_view(&war);
        assert_eq!(view.team_size, 2);
        assert!(view.pairs[1].you.is_none());
    }

    #[test]
    fn test_roster_view_unavailable() {
        let view = build_roster_view(&CurrentWar::unavailable());
        assert_eq!(view.state, WarState::Unavailable);
        assert_eq!(view.team_size, 0);
        assert!(view.pairs.is_empty());
        assert_eq!(view.clan_name, "—");
    }
}
