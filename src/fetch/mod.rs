//! Clash of Clans API client.
//!
//! Authenticated GETs against the upstream REST API. Configuration is
//! injected through [`UpstreamConfig`]; faults come back as a tagged
//! [`UpstreamError`] so callers can tell a private war log from a
//! transport failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::UpstreamConfig;
use crate::models::{ClanProfile, ClanTag, CurrentWar, ItemList, RaidSeason, WarLogEntry};

/// Broad classes of upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// Network failure, bad payload or any non-2xx other than 403/404.
    TransportFault,
    /// 403: private war log, or the token's IP allow-list rejected us.
    PrivacyFault,
    /// 404: unknown clan, or no war to report.
    NotFound,
    /// The service itself is misconfigured (no token, bad base URL).
    Configuration,
}

/// Errors from the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream token is not configured (set COC_TOKEN)")]
    MissingToken,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("CoC API {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl UpstreamError {
    /// Build an error from a non-2xx status and its body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown");
        let message = if body.trim().is_empty() {
            reason.to_string()
        } else {
            format!("{} - {}", reason, body.trim())
        };
        UpstreamError::Status { status, message }
    }

    pub fn kind(&self) -> UpstreamErrorKind {
        match self {
            UpstreamError::MissingToken | UpstreamError::InvalidUrl(_) => {
                UpstreamErrorKind::Configuration
            }
            UpstreamError::Status { status: 403, .. } => UpstreamErrorKind::PrivacyFault,
            UpstreamError::Status { status: 404, .. } => UpstreamErrorKind::NotFound,
            UpstreamError::Status { .. }
            | UpstreamError::Transport { .. }
            | UpstreamError::Decode(_) => UpstreamErrorKind::TransportFault,
        }
    }

    /// Upstream HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// 403 and 404 mean "nothing to show", not a failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.kind(),
            UpstreamErrorKind::PrivacyFault | UpstreamErrorKind::NotFound
        )
    }
}

/// The upstream endpoints the dashboard reads.
#[async_trait]
pub trait ClashApi: Send + Sync {
    /// `GET /clans/{tag}/currentwar`
    async fn current_war(&self, tag: &ClanTag) -> Result<CurrentWar, UpstreamError>;

    /// `GET /clans/{tag}`
    async fn clan(&self, tag: &ClanTag) -> Result<ClanProfile, UpstreamError>;

    /// `GET /clans/{tag}/warlog?limit=N`
    async fn war_log(&self, tag: &ClanTag, limit: u32) -> Result<Vec<WarLogEntry>, UpstreamError>;

    /// `GET /clans/{tag}/capitalraidseasons?limit=N`
    async fn capital_raid_seasons(
        &self,
        tag: &ClanTag,
        limit: u32,
    ) -> Result<Vec<RaidSeason>, UpstreamError>;
}

/// Fetch the current war, turning 403/404 into an unavailable war.
pub async fn current_war_or_unavailable(
    api: &dyn ClashApi,
    tag: &ClanTag,
) -> Result<CurrentWar, UpstreamError> {
    match api.current_war(tag).await {
        Ok(war) => Ok(war),
        Err(e) if e.is_unavailable() => {
            warn!("Current war for {} unavailable: {}", tag, e);
            Ok(CurrentWar::unavailable())
        }
        Err(e) => Err(e),
    }
}

/// HTTP client for the Clash of Clans API.
pub struct ClashClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ClashClient {
    /// Create a client from explicit upstream configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        Url::parse(&config.base_url).map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("clan-dashboard")),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config
                .token
                .as_ref()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        })
    }

    /// Absolute URL for an API path such as `/clans/%23ABC`.
    fn url_for(&self, path: &str) -> Result<Url, UpstreamError> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| UpstreamError::InvalidUrl(e.to_string()))
    }

    /// GET a JSON document. Non-2xx responses become [`UpstreamError::Status`].
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let token = self.token.as_deref().ok_or(UpstreamError::MissingToken)?;
        let url = self.url_for(path)?;

        info!("GET {}", url);
        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("Upstream {} body: {}", status, body);
            return Err(UpstreamError::from_status(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ClashApi for ClashClient {
    async fn current_war(&self, tag: &ClanTag) -> Result<CurrentWar, UpstreamError> {
        self.get_json(&format!("/clans/{}/currentwar", tag.path_segment()), &[])
            .await
    }

    async fn clan(&self, tag: &ClanTag) -> Result<ClanProfile, UpstreamError> {
        self.get_json(&format!("/clans/{}", tag.path_segment()), &[])
            .await
    }

    async fn war_log(&self, tag: &ClanTag, limit: u32) -> Result<Vec<WarLogEntry>, UpstreamError> {
        let list: ItemList<WarLogEntry> = self
            .get_json(
                &format!("/clans/{}/warlog", tag.path_segment()),
                &[("limit", limit.to_string())],
            )
            .await?;
        Ok(list.items)
    }

    async fn capital_raid_seasons(
        &self,
        tag: &ClanTag,
        limit: u32,
    ) -> Result<Vec<RaidSeason>, UpstreamError> {
        let list: ItemList<RaidSeason> = self
            .get_json(
                &format!("/clans/{}/capitalraidseasons", tag.path_segment()),
                &[("limit", limit.to_string())],
            )
            .await?;
        Ok(list.items)
    }
}

/// Canned upstream reply for tests.
#[cfg(test)]
#[derive(Debug, Clone)]
pub enum MockReply {
    Json(serde_json::Value),
    Status(u16),
}

#[cfg(test)]
impl MockReply {
    fn decode<T: DeserializeOwned>(&self) -> Result<T, UpstreamError> {
        match self {
            MockReply::Json(value) => Ok(serde_json::from_value(value.clone())?),
            MockReply::Status(status) => Err(UpstreamError::from_status(*status, "")),
        }
    }
}

/// In-memory [`ClashApi`] returning canned replies.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MockClashApi {
    pub current_war: MockReply,
    pub clan: MockReply,
    pub war_log: MockReply,
    pub raids: MockReply,
}

#[cfg(test)]
impl Default for MockClashApi {
    fn default() -> Self {
        Self {
            current_war: MockReply::Status(404),
            clan: MockReply::Status(404),
            war_log: MockReply::Status(404),
            raids: MockReply::Status(404),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl ClashApi for MockClashApi {
    async fn current_war(&self, _tag: &ClanTag) -> Result<CurrentWar, UpstreamError> {
        self.current_war.decode()
    }

    async fn clan(&self, _tag: &ClanTag) -> Result<ClanProfile, UpstreamError> {
        self.clan.decode()
    }

    async fn war_log(&self, _tag: &ClanTag, _limit: u32) -> Result<Vec<WarLogEntry>, UpstreamError> {
        self.war_log.decode::<ItemList<WarLogEntry>>().map(|l| l.items)
    }

    async fn capital_raid_seasons(
        &self,
        _tag: &ClanTag,
        _limit: u32,
    ) -> Result<Vec<RaidSeason>, UpstreamError> {
        self.raids.decode::<ItemList<RaidSeason>>().map(|l| l.items)
    }
}
