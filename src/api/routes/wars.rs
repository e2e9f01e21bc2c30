use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use tracing::info;

use crate::api::state::AppState;
use crate::api::{resolve_tag, ApiError, TagParams};
use crate::calculate::time::format_utc;
use crate::calculate::{build_mirror, build_pairings, MirrorReport};
use crate::fetch::current_war_or_unavailable;

/// Position-aligned pairings with best attacks and totals.
pub async fn war_attacks(
    State(state): State<AppState>,
    Query(params): Query<TagParams>,
) -> Result<Response, ApiError> {
    let tag = resolve_tag(params.tag.as_deref(), state.config.server.default_tag())?;
    let war = current_war_or_unavailable(state.clash.as_ref(), &tag).await?;
    info!("War state for {}: {}", tag, war.state.as_str());

    let result = build_pairings(&war);
    let headers = [
        ("x-war-state", result.state.as_str().to_string()),
        ("x-last-updated", format_utc(Utc::now())),
    ];

    Ok((headers, Json(result)).into_response())
}

/// Each of our members next to their mirror opponent.
pub async fn war_mirror(
    State(state): State<AppState>,
    Query(params): Query<TagParams>,
) -> Result<Json<MirrorReport>, ApiError> {
    let tag = resolve_tag(params.tag.as_deref(), state.config.server.default_tag())?;
    let war = current_war_or_unavailable(state.clash.as_ref(), &tag).await?;

    Ok(Json(build_mirror(&war)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::build_router;
    use crate::api::test_support::{get_json, state_with};
    use crate::fetch::{MockClashApi, MockReply};

    fn in_war() -> serde_json::Value {
        json!({
            "state": "inWar",
            "teamSize": 2,
            "endTime": "20250615T210000.000Z",
            "clan": {
                "tag": "#A", "name": "Ours",
                "members": [
                    { "tag": "#A1", "name": "a1", "mapPosition": 1,
                      "attacks": [{ "attackerTag": "#A1", "defenderTag": "#B1", "stars": 2,
                                    "destructionPercentage": 55.0, "order": 1 }] },
                    { "tag": "#A2", "name": "a2", "mapPosition": 2 }
                ]
            },
            "opponent": {
                "tag": "#B", "name": "Theirs",
                "members": [
                    { "tag": "#B1", "name": "b1", "mapPosition": 1 },
                    { "tag": "#B2", "name": "b2", "mapPosition": 2 }
                ]
            }
        })
    }

    fn api(reply: MockReply) -> MockClashApi {
        MockClashApi {
            current_war: reply,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_attacks_endpoint() {
        let app = build_router(state_with(api(MockReply::Json(in_war()))));
        let (status, headers, json) = get_json(app, "/api/wars/attacks?tag=%23ABC").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["x-war-state"], "inWar");
        assert!(headers.contains_key("x-last-updated"));
        assert_eq!(json["teamSize"], 2);
        assert_eq!(json["pairs"][0]["ourAttack"]["stars"], 2);
        assert_eq!(json["pairs"][0]["ourAttack"]["destruction"], 55.0);
        assert!(json["pairs"][0]["oppAttack"].is_null());
        assert_eq!(json["totals"]["our"]["stars"], 2);
        assert_eq!(json["endTime"], "2025-06-15T21:00:00.000Z");
    }

    #[tokio::test]
    async fn test_attacks_tolerates_null_subfields() {
        let mut war = in_war();
        war["clan"]["members"][0]["attacks"][0]["stars"] = serde_json::Value::Null;
        war["clan"]["members"][1]["attacks"] = serde_json::Value::Null;
        war["opponent"]["members"][0]["name"] = serde_json::Value::Null;

        let app = build_router(state_with(api(MockReply::Json(war))));
        let (status, _, json) = get_json(app, "/api/wars/attacks?tag=%23ABC").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["pairs"][0]["ourAttack"]["stars"], 0);
        assert_eq!(json["pairs"][0]["ourAttack"]["destruction"], 55.0);
        assert_eq!(json["pairs"][0]["opp"]["name"], "");
        assert_eq!(json["totals"]["our"]["attacks"], 1);
    }

    #[tokio::test]
    async fn test_attacks_private_war_is_not_an_error() {
        let app = build_router(state_with(api(MockReply::Status(403))));
        let (status, headers, json) = get_json(app, "/api/wars/attacks?tag=%23ABC").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["x-war-state"], "unavailable");
        assert_eq!(json["state"], "unavailable");
        assert_eq!(json["teamSize"], 0);
        assert_eq!(json["pairs"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_attacks_not_in_war() {
        let app = build_router(state_with(api(MockReply::Json(json!({ "state": "notInWar" })))));
        let (status, _, json) = get_json(app, "/api/wars/attacks?tag=%23ABC").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["state"], "notInWar");
        assert!(json["clan"].is_null());
        assert_eq!(json["totals"]["opp"]["attacks"], 0);
    }

    #[tokio::test]
    async fn test_attacks_upstream_failure_propagates_status() {
        let app = build_router(state_with(api(MockReply::Status(500))));
        let (status, headers, json) = get_json(app, "/api/wars/attacks?tag=%23ABC").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");
        assert_eq!(json["error"]["status"], 500);
        assert!(json["timestamp"].is_string());
        assert_eq!(headers["pragma"], "no-cache");
    }

    #[tokio::test]
    async fn test_attacks_rejects_bad_tag() {
        let app = build_router(state_with(api(MockReply::Json(in_war()))));
        let (status, _, json) = get_json(app.clone(), "/api/wars/attacks?tag=ABC").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        let (status, _, _) = get_json(app, "/api/wars/attacks").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_mirror_endpoint() {
        let app = build_router(state_with(api(MockReply::Json(in_war()))));
        let (status, _, json) = get_json(app, "/api/wars/mirror?tag=%23ABC").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["opponent"], "Theirs");
        assert_eq!(json["pairs"][0]["me"]["attack"]["defenderTag"], "#B1");
        assert_eq!(json["pairs"][1]["opp"]["tag"], "#B2");
    }

    #[tokio::test]
    async fn test_mirror_missing_war() {
        let app = build_router(state_with(api(MockReply::Status(404))));
        let (status, _, json) = get_json(app, "/api/wars/mirror?tag=%23ABC").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["state"], "unavailable");
        assert!(json["opponent"].is_null());
    }
}
