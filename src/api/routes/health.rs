use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub upstream_token_configured: bool,
    pub default_clan_tag: Option<String>,
}

/// Liveness plus a view of the configuration that leaks no secrets.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        upstream_token_configured: state.config.upstream.has_token(),
        default_clan_tag: state.config.server.default_tag().map(|t| t.to_string()),
    })
}
