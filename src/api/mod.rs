//! REST API endpoints.
//!
//! Axum-based HTTP API serving reshaped Clash of Clans data to the
//! dashboard: current war pairings, mirror and roster views, clan portal
//! summary and capital raids.

pub mod routes;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::calculate::time::format_utc;
use crate::fetch::{UpstreamError, UpstreamErrorKind};
use crate::models::ClanTag;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Upstream(e) if e.kind() == UpstreamErrorKind::Configuration => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            ApiError::Upstream(e) => {
                let status = e
                    .status()
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, "UPSTREAM_ERROR")
            }
        }
    }
}

/// Operator hint for well-known upstream statuses.
pub fn hint_for_status(status: u16) -> Option<&'static str> {
    match status {
        401 => Some("Token invalid or expired; generate a new one in the developer portal."),
        403 => Some("IP not allow-listed for this token, or the war log is private."),
        429 => Some("Rate limited; wait a moment or poll less often."),
        _ => None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let hint = match &self {
            ApiError::Upstream(e) => e.status().and_then(hint_for_status).map(str::to_string),
            _ => None,
        };

        if status.is_server_error() {
            warn!("Request failed with {}: {}", status, self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                status: status.as_u16(),
                hint,
            },
            timestamp: format_utc(Utc::now()),
        };

        (status, Json(body)).into_response()
    }
}

/// `?tag=` query parameter shared by every clan endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct TagParams {
    pub tag: Option<String>,
}

/// Resolve the clan tag for a request.
///
/// An explicit tag must start with `#` (sent as `%23`). Without one, the
/// configured default clan is used.
pub fn resolve_tag(param: Option<&str>, fallback: Option<ClanTag>) -> Result<ClanTag, ApiError> {
    match param.map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => ClanTag::parse_strict(raw)
            .ok_or_else(|| ApiError::BadRequest("Invalid tag. Use ?tag=#CLAN_TAG".to_string())),
        None => fallback.ok_or_else(|| {
            ApiError::BadRequest("Missing tag. Use ?tag=#CLAN_TAG".to_string())
        }),
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([Method::GET]);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(AllowOrigin::exact(value)),
        Err(_) => {
            warn!("Invalid cors_origin {:?}, allowing any origin", origin);
            layer.allow_origin(Any)
        }
    }
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/wars/attacks", get(routes::wars::war_attacks))
        .route("/api/wars/mirror", get(routes::wars::war_mirror))
        .route("/api/portal/currentwar", get(routes::portal::current_war))
        .route("/api/portal/summary", get(routes::portal::summary))
        .route("/api/portal/raids", get(routes::portal::raids))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
