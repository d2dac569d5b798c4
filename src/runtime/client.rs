//! Client construction and backend wiring.

use crate::core::config::{Config, ConfigBuilder, ConnectionMode};
use crate::core::error::{Error, Result};
use crate::runtime::api::ApiBackend;
use crate::runtime::database::DatabaseBackend;
use crate::runtime::resources::{Activities, Projects, Prompts, Teams, Users};
use std::sync::Arc;
use tracing::info;

/// High-level client for the PromptLane platform
///
/// A client is constructed once from an immutable [`Config`], builds the
/// backend adapter(s) its connection mode needs, and hands every resource
/// accessor a fixed reader and writer. Switching connection modes means
/// constructing a new client.
///
/// The client is cheap to clone and safe to share across tasks; concurrency
/// is bounded only by the underlying HTTP client and database pool.
///
/// # Examples
///
/// ```rust,no_run
/// use promptlane_sdk_rs::{Client, ConnectionMode, ListQuery};
///
/// # #[tokio::main]
/// # async fn main() -> promptlane_sdk_rs::Result<()> {
/// let client = Client::builder()
///     .connection_mode(ConnectionMode::Api)
///     .base_url("https://api.promptlane.example")
///     .api_key("pl-key")
///     .connect()
///     .await?;
///
/// let projects = client.projects().list(ListQuery::new()).await?;
/// println!("{} projects", projects.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    config: Arc<Config>,
    database: Option<Arc<DatabaseBackend>>,
    projects: Projects,
    prompts: Prompts,
    teams: Teams,
    users: Users,
    activities: Activities,
}

impl Client {
    /// Create a client builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Validate the configuration, connect the backend(s) its mode needs,
    /// and wire the resource accessors
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an incomplete parameter set and
    /// [`Error::Transport`] when the database pool cannot connect.
    pub async fn connect(config: Config) -> Result<Self> {
        config.validate()?;

        let api = if config.connection_mode.uses_api() {
            let base_url = config
                .base_url
                .as_deref()
                .ok_or_else(|| Error::config("base_url missing after validation"))?;
            let api_key = config
                .api_key
                .as_deref()
                .ok_or_else(|| Error::config("api_key missing after validation"))?;
            Some(Arc::new(ApiBackend::new(
                base_url,
                api_key,
                &config.api_version,
                config.timeout_secs,
            )?))
        } else {
            None
        };

        let database = if config.connection_mode.uses_database() {
            let conn = config
                .db_connection_string
                .as_deref()
                .ok_or_else(|| Error::config("db_connection_string missing after validation"))?;
            Some(Arc::new(DatabaseBackend::connect(conn).await?))
        } else {
            None
        };

        info!(mode = %config.connection_mode, "promptlane client connected");

        let client = match (config.connection_mode, api, database) {
            (ConnectionMode::Api, Some(api), _) => Self::wire_api(config, api),
            (ConnectionMode::Database, _, Some(db)) => Self::wire_database(config, db),
            (ConnectionMode::Mixed, Some(api), Some(db)) => Self::wire_mixed(config, api, db),
            // validate() guarantees the required backends exist.
            _ => return Err(Error::config("connection mode missing its backend")),
        };
        Ok(client)
    }

    fn wire_api(config: Config, api: Arc<ApiBackend>) -> Self {
        Self {
            config: Arc::new(config),
            database: None,
            projects: Projects::new(api.clone(), api.clone()),
            prompts: Prompts::new(api.clone(), api.clone()),
            teams: Teams::new(api.clone(), Some(api.clone())),
            users: Users::new(api.clone(), Some(api.clone())),
            activities: Activities::new(api.clone(), api),
        }
    }

    fn wire_database(config: Config, db: Arc<DatabaseBackend>) -> Self {
        Self {
            config: Arc::new(config),
            database: Some(db.clone()),
            projects: Projects::new(db.clone(), db.clone()),
            prompts: Prompts::new(db.clone(), db.clone()),
            // No API connection: team and user writes are unavailable.
            teams: Teams::new(db.clone(), None),
            users: Users::new(db.clone(), None),
            activities: Activities::new(db.clone(), db),
        }
    }

    fn wire_mixed(config: Config, api: Arc<ApiBackend>, db: Arc<DatabaseBackend>) -> Self {
        Self {
            config: Arc::new(config),
            database: Some(db.clone()),
            projects: Projects::new(db.clone(), api.clone()),
            prompts: Prompts::new(db.clone(), api.clone()),
            teams: Teams::new(db.clone(), Some(api.clone())),
            users: Users::new(db.clone(), Some(api.clone())),
            activities: Activities::new(db, api),
        }
    }

    /// The configuration this client was constructed with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the `projects` namespace
    pub fn projects(&self) -> &Projects {
        &self.projects
    }

    /// Accessor for the `prompts` namespace
    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    /// Accessor for the `teams` namespace
    pub fn teams(&self) -> &Teams {
        &self.teams
    }

    /// Accessor for the `users` namespace
    pub fn users(&self) -> &Users {
        &self.users
    }

    /// Accessor for the `activities` namespace
    pub fn activities(&self) -> &Activities {
        &self.activities
    }

    /// Release backend resources
    ///
    /// Closes the database pool when one exists. The HTTP client needs no
    /// explicit shutdown; dropping the client is always safe, `close` just
    /// makes the release deterministic.
    pub async fn close(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
    }
}

/// Builder for constructing a [`Client`] with fluent configuration
///
/// A thin wrapper over [`ConfigBuilder`] that finishes with
/// [`connect`](ClientBuilder::connect).
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ConfigBuilder,
}

impl ClientBuilder {
    /// Create a new client builder
    pub fn new() -> Self {
        Self {
            config: ConfigBuilder::new(),
        }
    }

    /// Set the connection mode
    #[must_use]
    pub fn connection_mode(mut self, mode: ConnectionMode) -> Self {
        self.config = self.config.connection_mode(mode);
        self
    }

    /// Set the API base URL
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.base_url(base_url);
        self
    }

    /// Set the API key
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config = self.config.api_key(api_key);
        self
    }

    /// Set the database connection string
    #[must_use]
    pub fn db_connection_string(mut self, conn: impl Into<String>) -> Self {
        self.config = self.config.db_connection_string(conn);
        self
    }

    /// Set the API version path segment
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config = self.config.api_version(version);
        self
    }

    /// Set the per-request HTTP timeout in seconds
    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config = self.config.timeout_secs(secs);
        self
    }

    /// Build the configuration and connect the client
    pub async fn connect(self) -> Result<Client> {
        Client::connect(self.config.build()?).await
    }
}
