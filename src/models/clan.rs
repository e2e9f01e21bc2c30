//! Clan profile and war log documents.

use serde::{Deserialize, Serialize};

/// Paged list wrapper used by upstream list endpoints (`{"items": [...]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ItemList<T> {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub items: Vec<T>,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
}

/// Role of a member inside the clan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClanRole {
    Leader,
    CoLeader,
    /// Shown as "elder" in game.
    Admin,
    Elder,
    #[default]
    #[serde(other)]
    Member,
}

impl ClanRole {
    /// Upstream calls elders `admin`; the dashboard uses the in-game name.
    pub fn display(self) -> ClanRole {
        match self {
            ClanRole::Admin => ClanRole::Elder,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClanMember {
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub role: ClanRole,
    #[serde(deserialize_with = "super::null_as_default")]
    pub exp_level: u32,
    pub town_hall_level: Option<u32>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub trophies: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub donations: u32,
    pub donations_received: Option<u32>,
    pub league: Option<NamedRef>,
}

/// `GET /clans/{tag}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClanProfile {
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub tag: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub clan_type: Option<String>,
    pub location: Option<NamedRef>,
    pub war_league: Option<NamedRef>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub clan_level: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub clan_points: u32,
    /// Member count. The roster itself is `member_list`.
    #[serde(deserialize_with = "super::null_as_default")]
    pub members: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub member_list: Vec<ClanMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarResult {
    Win,
    Lose,
    Tie,
}

impl WarResult {
    pub fn letter(self) -> &'static str {
        match self {
            WarResult::Win => "W",
            WarResult::Lose => "L",
            WarResult::Tie => "T",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarLogSide {
    pub name: Option<String>,
    pub tag: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub stars: u32,
    #[serde(deserialize_with = "super::null_as_default")]
    pub destruction_percentage: f64,
}

/// One finished war from `GET /clans/{tag}/warlog`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarLogEntry {
    /// Absent for league wars, which are logged without a result.
    pub result: Option<WarResult>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub team_size: u32,
    pub end_time: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub clan: WarLogSide,
    #[serde(deserialize_with = "super::null_as_default")]
    pub opponent: WarLogSide,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display_maps_admin_to_elder() {
        assert_eq!(ClanRole::Admin.display(), ClanRole::Elder);
        assert_eq!(ClanRole::CoLeader.display(), ClanRole::CoLeader);
        assert_eq!(
            serde_json::to_string(&ClanRole::Admin.display()).unwrap(),
            "\"elder\""
        );
    }

    #[test]
    fn test_clan_profile_deserializes() {
        let clan: ClanProfile = serde_json::from_value(serde_json::json!({
            "name": "Os Brabos",
            "tag": "#2QLLU89LP",
            "type": "inviteOnly",
            "clanLevel": 12,
            "members": 1,
            "memberList": [{
                "name": "Ana",
                "tag": "#P1",
                "role": "coLeader",
                "expLevel": 200,
                "townHallLevel": 15,
                "trophies": 5000,
                "donations": 300
            }]
        }))
        .unwrap();

        assert_eq!(clan.clan_type.as_deref(), Some("inviteOnly"));
        assert_eq!(clan.members, 1);
        assert_eq!(clan.member_list[0].role, ClanRole::CoLeader);
        assert_eq!(clan.member_list[0].town_hall_level, Some(15));
        assert!(clan.location.is_none());
    }

    #[test]
    fn test_war_log_entry_without_result() {
        let entry: WarLogEntry = serde_json::from_value(serde_json::json!({
            "teamSize": 15,
            "endTime": "20250101T123456.000Z",
            "clan": { "stars": 30, "destructionPercentage": 80.5 },
            "opponent": { "name": "Rivals", "stars": 28 }
        }))
        .unwrap();

        assert!(entry.result.is_none());
        assert_eq!(entry.opponent.name.as_deref(), Some("Rivals"));
        assert_eq!(entry.opponent.destruction_percentage, 0.0);
    }

    #[test]
    fn test_item_list_missing_items() {
        let list: ItemList<WarLogEntry> = serde_json::from_str("{}").unwrap();
        assert!(list.items.is_empty());

        let list: ItemList<WarLogEntry> = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_null_fields_degrade() {
        let clan: ClanProfile = serde_json::from_value(serde_json::json!({
            "name": "Os Brabos",
            "clanLevel": null,
            "location": { "name": null },
            "memberList": [{ "name": "Ana", "role": null, "trophies": null }]
        }))
        .unwrap();
        assert_eq!(clan.clan_level, 0);
        assert_eq!(clan.location.unwrap().name, "");
        assert_eq!(clan.member_list[0].role, ClanRole::Member);
        assert_eq!(clan.member_list[0].trophies, 0);

        let entry: WarLogEntry = serde_json::from_value(serde_json::json!({
            "result": "win",
            "teamSize": null,
            "clan": null,
            "opponent": { "name": "Rivals", "stars": null, "destructionPercentage": null }
        }))
        .unwrap();
        assert_eq!(entry.team_size, 0);
        assert_eq!(entry.clan, WarLogSide::default());
        assert_eq!(entry.opponent.stars, 0);
    }
}
