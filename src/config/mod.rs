//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::models::ClanTag;

/// Environment variable holding the upstream bearer token.
pub const TOKEN_ENV: &str = "COC_TOKEN";
/// Environment variable overriding the upstream base URL.
pub const API_BASE_ENV: &str = "COC_API_BASE";
/// Environment variable holding the fallback clan tag.
pub const CLAN_TAG_ENV: &str = "CLAN_TAG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Upstream Clash of Clans API configuration.
///
/// Passed explicitly to the client; nothing reads the token from the
/// process environment after start-up.
#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token. Never written back out.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// How many war log entries the summary asks for
    #[serde(default = "default_list_limit")]
    pub warlog_limit: u32,

    /// How many capital raid seasons the raid summary asks for
    #[serde(default = "default_list_limit")]
    pub raid_season_limit: u32,
}

fn default_base_url() -> String {
    "https://api.clashofclans.com/v1".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("clan-dashboard/{}", env!("CARGO_PKG_VERSION"))
}

fn default_list_limit() -> u32 {
    10
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            warlog_limit: default_list_limit(),
            raid_season_limit: default_list_limit(),
        }
    }
}

impl UpstreamConfig {
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .field("warlog_limit", &self.warlog_limit)
            .field("raid_season_limit", &self.raid_season_limit)
            .finish()
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Clan used when a request carries no `tag` parameter
    #[serde(default)]
    pub default_clan_tag: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            default_clan_tag: None,
        }
    }
}

impl ServerConfig {
    pub fn default_tag(&self) -> Option<ClanTag> {
        self.default_clan_tag.as_deref().and_then(ClanTag::normalize)
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            upstream: UpstreamConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists (defaults otherwise), then apply the
    /// process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from an environment lookup. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(TOKEN_ENV) {
            self.upstream.token = Some(token.trim().to_string());
        }
        if let Some(base) = get(API_BASE_ENV) {
            self.upstream.base_url = base;
        }
        if let Some(tag) = get(CLAN_TAG_ENV) {
            self.server.default_clan_tag = Some(tag);
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Upstream timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Url::parse(&self.upstream.base_url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid upstream base_url {:?}: {}",
                self.upstream.base_url, e
            ))
        })?;

        if let Some(ref tag) = self.server.default_clan_tag {
            if ClanTag::normalize(tag).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid default_clan_tag {:?}",
                    tag
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.upstream.base_url, "https://api.clashofclans.com/v1");
        assert_eq!(config.upstream.warlog_limit, 10);
        assert_eq!(config.server.port, 8080);
        assert!(!config.upstream.has_token());
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.upstream.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_base_url() {
        let mut config = AppConfig::default();
        config.upstream.base_url = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            (TOKEN_ENV, " secret-token \n"),
            (CLAN_TAG_ENV, "2qllu89lp"),
            (API_BASE_ENV, ""),
        ]));

        assert_eq!(config.upstream.token.as_deref(), Some("secret-token"));
        assert_eq!(config.upstream.base_url, "https://api.clashofclans.com/v1");
        assert_eq!(
            config.server.default_tag().unwrap().as_str(),
            "#2QLLU89LP"
        );
    }

    #[test]
    fn test_token_not_serialized_or_debugged() {
        let mut config = AppConfig::default();
        config.upstream.token = Some("secret-token".to_string());

        let toml_str = toml::to_string(&config).unwrap();
        assert!(!toml_str.contains("secret-token"));
        assert!(!format!("{:?}", config).contains("secret-token"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
log_level = "debug"

[upstream]
timeout_seconds = 5

[server]
port = 9000
default_clan_tag = "#ABC"
"##
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.upstream.timeout_seconds, 5);
        assert_eq!(config.upstream.raid_season_limit, 10);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.default_clan_tag.as_deref(), Some("#ABC"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.upstream.base_url, parsed.upstream.base_url);
    }
}
