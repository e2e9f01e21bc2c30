//! War pairing and summarization.
//!
//! Aligns both rosters by map position, picks the best attack landed on
//! each slot from either side, and totals stars, destruction and attacks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::round_percentage;
use super::time::normalize_opt;
use crate::models::{Attack, CurrentWar, WarClan, WarMember, WarState};

/// Attacks per member when upstream does not say.
pub const DEFAULT_ATTACKS_PER_MEMBER: u32 = 2;

/// Largest roster the game allows; bigger `teamSize` values are clamped.
pub const MAX_TEAM_SIZE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub name: String,
    pub tag: String,
    pub th: Option<u32>,
}

impl From<&WarMember> for MemberSummary {
    fn from(m: &WarMember) -> Self {
        Self {
            name: m.name.clone(),
            tag: m.tag.clone(),
            th: m.townhall_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackSummary {
    pub stars: u32,
    pub destruction: f64,
    pub order: u32,
    pub duration: Option<u32>,
}

impl From<&Attack> for AttackSummary {
    fn from(a: &Attack) -> Self {
        Self {
            stars: a.stars,
            destruction: a.destruction_percentage,
            order: a.order,
            duration: a.duration,
        }
    }
}

/// One map position with both occupants and the best attack each side
/// landed on the other's occupant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pairing {
    pub pos: u32,
    pub ours: Option<MemberSummary>,
    pub opp: Option<MemberSummary>,
    pub our_attack: Option<AttackSummary>,
    pub opp_attack: Option<AttackSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideTotals {
    pub stars: u32,
    pub destruction: f64,
    pub attacks: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub our: SideTotals,
    pub opp: SideTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClanRef {
    pub name: String,
    pub tag: String,
    pub level: Option<u32>,
}

impl From<Option<&WarClan>> for ClanRef {
    fn from(side: Option<&WarClan>) -> Self {
        Self {
            name: side.map(|c| c.name.clone()).unwrap_or_default(),
            tag: side.map(|c| c.tag.clone()).unwrap_or_default(),
            level: side.and_then(|c| c.clan_level),
        }
    }
}

/// Roster bookkeeping shipped alongside the pairings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCounts {
    pub our_members_count: usize,
    pub opp_members_count: usize,
    pub max_attacks_possible: u32,
}

/// The analysis-ready war document served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingResult {
    pub state: WarState,
    pub team_size: u32,
    pub attacks_per_member: u32,
    pub battle_modifier: Option<String>,
    pub clan: Option<ClanRef>,
    pub opponent: Option<ClanRef>,
    pub preparation_start_time: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub pairs: Vec<Pairing>,
    pub totals: Totals,
    pub raw: RawCounts,
}

impl PairingResult {
    /// Empty document for a war that has no rosters to compare.
    pub fn empty(state: WarState) -> Self {
        Self {
            state,
            team_size: 0,
            attacks_per_member: 0,
            battle_modifier: None,
            clan: None,
            opponent: None,
            preparation_start_time: None,
            start_time: None,
            end_time: None,
            pairs: Vec::new(),
            totals: Totals::default(),
            raw: RawCounts::default(),
        }
    }
}

/// Build the position-aligned comparison for a war.
///
/// Wars without rosters (`notInWar`, unrecognised states, or an
/// unavailable war) short-circuit to an empty document.
pub fn build_pairings(war: &CurrentWar) -> PairingResult {
    if !war.state.has_rosters() {
        let state = match war.state {
            WarState::Unavailable => WarState::Unavailable,
            _ => WarState::NotInWar,
        };
        return PairingResult::empty(state);
    }

    let our_members = war.clan.as_ref().map(|c| c.members.as_slice()).unwrap_or(&[]);
    let opp_members = war
        .opponent
        .as_ref()
        .map(|c| c.members.as_slice())
        .unwrap_or(&[]);

    let ours_by_pos = index_by_position(our_members);
    let opp_by_pos = index_by_position(opp_members);

    let team_size = war
        .team_size
        .filter(|&n| n > 0)
        .unwrap_or_else(|| ours_by_pos.len().max(opp_by_pos.len()) as u32)
        .min(MAX_TEAM_SIZE);
    let attacks_per_member = war
        .attacks_per_member
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_ATTACKS_PER_MEMBER);

    let our_attacks: Vec<Attack> = war.clan.as_ref().map(WarClan::all_attacks).unwrap_or_default();
    let opp_attacks: Vec<Attack> = war
        .opponent
        .as_ref()
        .map(WarClan::all_attacks)
        .unwrap_or_default();

    let pairs = (1..=team_size)
        .map(|pos| {
            let ours = ours_by_pos.get(&pos).copied();
            let opp = opp_by_pos.get(&pos).copied();

            let (our_attack, opp_attack) = match (ours, opp) {
                (Some(o), Some(t)) => (
                    select_best(&our_attacks, &t.tag),
                    select_best(&opp_attacks, &o.tag),
                ),
                _ => (None, None),
            };

            Pairing {
                pos,
                ours: ours.map(MemberSummary::from),
                opp: opp.map(MemberSummary::from),
                our_attack: our_attack.map(AttackSummary::from),
                opp_attack: opp_attack.map(AttackSummary::from),
            }
        })
        .collect();

    PairingResult {
        state: war.state,
        team_size,
        attacks_per_member,
        battle_modifier: war.battle_modifier.clone(),
        clan: Some(ClanRef::from(war.clan.as_ref())),
        opponent: Some(ClanRef::from(war.opponent.as_ref())),
        preparation_start_time: normalize_opt(war.preparation_start_time.as_deref()),
        start_time: normalize_opt(war.start_time.as_deref()),
        end_time: normalize_opt(war.end_time.as_deref()),
        pairs,
        totals: compute_totals(war.clan.as_ref(), war.opponent.as_ref()),
        raw: RawCounts {
            our_members_count: our_members.len(),
            opp_members_count: opp_members.len(),
            max_attacks_possible: team_size
                .saturating_mul(attacks_per_member)
                .saturating_mul(2),
        },
    }
}

/// Map position -> member. Later duplicates overwrite earlier ones;
/// members without a position are not indexed.
fn index_by_position(members: &[WarMember]) -> HashMap<u32, &WarMember> {
    let mut by_pos = HashMap::with_capacity(members.len());
    for member in members {
        if let Some(pos) = member.map_position {
            by_pos.insert(pos, member);
        }
    }
    by_pos
}

/// Best attack against `target` among `attacks`.
///
/// Ordering: more stars wins; equal stars go to higher destruction;
/// a full tie keeps the attack seen first. An empty target never matches.
pub fn select_best<'a>(attacks: &'a [Attack], target: &str) -> Option<&'a Attack> {
    if target.is_empty() {
        return None;
    }

    attacks
        .iter()
        .filter(|a| a.defender_tag == target)
        .fold(None, |best, candidate| match best {
            Some(current) if !outranks(candidate, current) => Some(current),
            _ => Some(candidate),
        })
}

fn outranks(candidate: &Attack, current: &Attack) -> bool {
    candidate.stars > current.stars
        || (candidate.stars == current.stars
            && candidate.destruction_percentage > current.destruction_percentage)
}

/// Totals for both sides.
pub fn compute_totals(clan: Option<&WarClan>, opponent: Option<&WarClan>) -> Totals {
    Totals {
        our: side_totals(clan),
        opp: side_totals(opponent),
    }
}

/// Declared totals win when present and non-zero; stars and attack counts
/// otherwise fall back to the side's raw attack list. Destruction is never
/// recomputed and falls back to zero.
fn side_totals(side: Option<&WarClan>) -> SideTotals {
    let Some(side) = side else {
        return SideTotals::default();
    };

    let recorded = || side.members.iter().flat_map(|m| m.attacks.iter());

    SideTotals {
        stars: side
            .stars
            .filter(|&s| s > 0)
            .unwrap_or_else(|| recorded().map(|a| a.stars).sum()),
        destruction: side
            .destruction_percentage
            .map(round_percentage)
            .unwrap_or(0.0),
        attacks: side
            .attacks
            .filter(|&n| n > 0)
            .unwrap_or_else(|| recorded().count() as u32),
    }
}
