use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Environment variables consulted when builder parameters are absent.
const ENV_API_URL: &str = "PROMPTLANE_API_URL";
const ENV_API_KEY: &str = "PROMPTLANE_API_KEY";
const ENV_DB_CONNECTION: &str = "PROMPTLANE_DB_CONNECTION";

const DEFAULT_API_VERSION: &str = "v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Strategy determining which backend serves each call
///
/// The mode is fixed for the lifetime of a [`Client`](crate::Client);
/// switching modes means constructing a new client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Every operation goes through the HTTP API
    #[default]
    Api,
    /// Every operation goes directly to the database
    Database,
    /// Reads go to the database, writes go through the API
    ///
    /// Bulk reads bypass the API's overhead while writes still pass its
    /// validation and business logic. The two backends are kept consistent
    /// by the platform, not the SDK: a write acknowledged by the API may not
    /// be visible to an immediately following database read if the replica
    /// has not caught up yet.
    Mixed,
}

impl ConnectionMode {
    /// Whether this mode needs an API connection
    pub fn uses_api(self) -> bool {
        matches!(self, ConnectionMode::Api | ConnectionMode::Mixed)
    }

    /// Whether this mode needs a database connection
    pub fn uses_database(self) -> bool {
        matches!(self, ConnectionMode::Database | ConnectionMode::Mixed)
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionMode::Api => "api",
            ConnectionMode::Database => "database",
            ConnectionMode::Mixed => "mixed",
        };
        f.write_str(s)
    }
}

impl FromStr for ConnectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "api" => Ok(ConnectionMode::Api),
            "database" => Ok(ConnectionMode::Database),
            "mixed" => Ok(ConnectionMode::Mixed),
            other => Err(Error::config(format!(
                "unknown connection mode '{other}' (expected api, database, or mixed)"
            ))),
        }
    }
}

/// Configuration options for the PromptLane client
///
/// Holds the connection mode and the parameters each mode requires.
/// Configuration is immutable once a client is constructed from it.
///
/// # Examples
///
/// ```rust
/// use promptlane_sdk_rs::core::{Config, ConnectionMode};
///
/// let config = Config::builder()
///     .connection_mode(ConnectionMode::Mixed)
///     .base_url("https://api.promptlane.example")
///     .api_key("pl-key")
///     .db_connection_string("sqlite:promptlane.db")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Which backend(s) serve calls
    #[serde(default)]
    pub connection_mode: ConnectionMode,

    /// Base URL of the PromptLane API (required for `api` and `mixed`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// API key sent as a bearer credential (required for `api` and `mixed`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Database connection string (required for `database` and `mixed`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_connection_string: Option<String>,

    /// API version segment used when building request paths
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Timeout in seconds applied to each HTTP request (default: 30s)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection_mode: ConnectionMode::default(),
            base_url: None,
            api_key: None,
            db_connection_string: None,
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Validate the configuration against its connection mode
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a parameter the mode requires is missing
    /// or malformed:
    /// - `api`/`mixed` need a well-formed absolute `base_url` and a
    ///   non-empty `api_key`
    /// - `database`/`mixed` need a `db_connection_string` carrying a scheme
    pub fn validate(&self) -> Result<()> {
        if self.connection_mode.uses_api() {
            let base_url = self.base_url.as_deref().ok_or_else(|| {
                Error::config(format!(
                    "base_url is required for {} mode (or set {ENV_API_URL})",
                    self.connection_mode
                ))
            })?;
            url::Url::parse(base_url).map_err(|e| {
                Error::config(format!("base_url '{base_url}' is not a valid URL: {e}"))
            })?;

            match self.api_key.as_deref() {
                Some(key) if !key.is_empty() => {}
                _ => {
                    return Err(Error::config(format!(
                        "api_key is required for {} mode (or set {ENV_API_KEY})",
                        self.connection_mode
                    )))
                }
            }
        }

        if self.connection_mode.uses_database() {
            let conn = self.db_connection_string.as_deref().ok_or_else(|| {
                Error::config(format!(
                    "db_connection_string is required for {} mode (or set {ENV_DB_CONNECTION})",
                    self.connection_mode
                ))
            })?;
            // Connection strings look like "sqlite:promptlane.db"; anything
            // without a scheme cannot reach a database.
            if conn.is_empty() || !conn.contains(':') {
                return Err(Error::config(format!(
                    "db_connection_string '{conn}' is malformed (expected scheme:target)"
                )));
            }
        }

        if self.api_version.is_empty() {
            return Err(Error::config("api_version cannot be empty"));
        }

        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than 0"));
        }

        Ok(())
    }
}

/// Builder for creating [`Config`] instances with fluent configuration
///
/// Parameters not set explicitly are read from the environment at
/// [`build`](ConfigBuilder::build) time: `PROMPTLANE_API_URL`,
/// `PROMPTLANE_API_KEY`, and `PROMPTLANE_DB_CONNECTION`.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default settings
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the connection mode
    #[must_use]
    pub fn connection_mode(mut self, mode: ConnectionMode) -> Self {
        self.config.connection_mode = mode;
        self
    }

    /// Set the API base URL
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the API key
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    /// Set the database connection string
    #[must_use]
    pub fn db_connection_string(mut self, conn: impl Into<String>) -> Self {
        self.config.db_connection_string = Some(conn.into());
        self
    }

    /// Set the API version path segment (default: `v1`)
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Set the per-request HTTP timeout in seconds
    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Fill unset parameters from the environment, validate, and return the
    /// configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a parameter required by the connection
    /// mode is missing from both the builder and the environment, or is
    /// malformed.
    pub fn build(mut self) -> Result<Config> {
        if self.config.base_url.is_none() {
            self.config.base_url = std::env::var(ENV_API_URL).ok();
        }
        if self.config.api_key.is_none() {
            self.config.api_key = std::env::var(ENV_API_KEY).ok();
        }
        if self.config.db_connection_string.is_none() {
            self.config.db_connection_string = std::env::var(ENV_DB_CONNECTION).ok();
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_builder() -> ConfigBuilder {
        Config::builder()
            .connection_mode(ConnectionMode::Api)
            .base_url("http://localhost:8000")
            .api_key("pl-test-key")
    }

    #[test]
    fn test_api_mode_complete() {
        let config = api_builder().build().unwrap();
        assert_eq!(config.connection_mode, ConnectionMode::Api);
        assert_eq!(config.api_version, "v1");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_api_mode_missing_key() {
        // Validate a literal config so the test is independent of any
        // PROMPTLANE_* variables in the environment.
        let config = Config {
            connection_mode: ConnectionMode::Api,
            base_url: Some("http://localhost:8000".to_string()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn test_api_mode_bad_url() {
        let err = api_builder().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("not a valid URL"));
    }

    #[test]
    fn test_database_mode() {
        let config = Config::builder()
            .connection_mode(ConnectionMode::Database)
            .db_connection_string("sqlite::memory:")
            .build()
            .unwrap();
        assert!(config.connection_mode.uses_database());
        assert!(!config.connection_mode.uses_api());
    }

    #[test]
    fn test_database_mode_missing_connection() {
        let config = Config {
            connection_mode: ConnectionMode::Database,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("db_connection_string"));
    }

    #[test]
    fn test_database_mode_malformed_connection() {
        let err = Config::builder()
            .connection_mode(ConnectionMode::Database)
            .db_connection_string("promptlane")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_mixed_mode_requires_both() {
        let config = Config {
            connection_mode: ConnectionMode::Mixed,
            base_url: Some("http://localhost:8000".to_string()),
            api_key: Some("pl-test-key".to_string()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("db_connection_string"));

        let config = Config {
            connection_mode: ConnectionMode::Mixed,
            db_connection_string: Some("sqlite::memory:".to_string()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));

        let config = Config::builder()
            .connection_mode(ConnectionMode::Mixed)
            .base_url("http://localhost:8000")
            .api_key("pl-test-key")
            .db_connection_string("sqlite::memory:")
            .build()
            .unwrap();
        assert!(config.connection_mode.uses_api());
        assert!(config.connection_mode.uses_database());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            "API".parse::<ConnectionMode>().unwrap(),
            ConnectionMode::Api
        );
        assert_eq!(
            "mixed".parse::<ConnectionMode>().unwrap(),
            ConnectionMode::Mixed
        );
        assert!("hybrid".parse::<ConnectionMode>().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = api_builder().timeout_secs(0).build().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }
}
