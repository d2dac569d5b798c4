//! # promptlane-sdk-rs - Rust SDK for PromptLane
//!
//! A type-safe, async-first client library for the PromptLane prompt
//! management platform, exposing its projects, prompts, teams, users, and
//! activities over three connection strategies.
//!
//! ## Connection modes
//!
//! - **`api`** — every operation goes through the authenticated HTTP API.
//! - **`database`** — every operation goes directly to the platform
//!   database, which is the fast path for bulk and analytical reads.
//! - **`mixed`** — reads go to the database, writes go through the API so
//!   the platform's validation and business logic still apply.
//!
//! The mode is chosen once, at client construction; every resource accessor
//! is handed its reader and writer there and never branches per call. Both
//! backends produce structurally identical records, so calling code does not
//! change when the connection mode does.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use promptlane_sdk_rs::{Client, ConnectionMode, ListQuery};
//!
//! #[tokio::main]
//! async fn main() -> promptlane_sdk_rs::Result<()> {
//!     let client = Client::builder()
//!         .connection_mode(ConnectionMode::Api)
//!         .base_url("https://api.promptlane.example")
//!         .api_key("pl-key")
//!         .connect()
//!         .await?;
//!
//!     for project in client.projects().list(ListQuery::new()).await? {
//!         println!("{} ({})", project.name, project.key);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Mixed mode reads from the database and writes through the API:
//!
//! ```rust,no_run
//! use promptlane_sdk_rs::{Client, ConnectionMode, ListQuery, ProjectUpdate};
//!
//! # #[tokio::main]
//! # async fn main() -> promptlane_sdk_rs::Result<()> {
//! let client = Client::builder()
//!     .connection_mode(ConnectionMode::Mixed)
//!     .base_url("https://api.promptlane.example")
//!     .api_key("pl-key")
//!     .db_connection_string("sqlite:promptlane.db")
//!     .connect()
//!     .await?;
//!
//! // Served by the database.
//! let projects = client.projects().list(ListQuery::new()).await?;
//!
//! if let Some(project) = projects.first() {
//!     // Goes through the API.
//!     let update = ProjectUpdate {
//!         description: Some("refreshed".to_string()),
//!         ..Default::default()
//!     };
//!     client.projects().update(&project.id.to_string(), &update).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Unset connection parameters fall back to the environment:
//! `PROMPTLANE_API_URL`, `PROMPTLANE_API_KEY`, and
//! `PROMPTLANE_DB_CONNECTION`.
//!
//! ## Consistency caveat for mixed mode
//!
//! The two backends are kept consistent by the platform, not by this SDK. A
//! write acknowledged by the API may not be visible to an immediately
//! following database read if the replica has not caught up; callers that
//! need read-your-writes should use a pure mode. The SDK performs no
//! reconciliation, caching, or retry — every call is independent and every
//! failure surfaces as an [`Error`].
//!
//! ## Error handling
//!
//! All fallible calls return [`Result`] with the [`Error`] taxonomy:
//! configuration problems at construction, `NotFound`/`Validation`/
//! `Authentication` surfaced from whichever backend served the call, and
//! `Transport` wrapping connectivity failures. [`Error::is_recoverable`]
//! classifies what is worth retrying — the SDK itself never retries.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

/// Core types, configuration, and error handling
pub mod core;
/// Backend adapters, accessors, and the client
pub mod runtime;

// Re-export the surface most callers need.
pub use crate::core::{
    Activity, ActivityCreate, ActivityUpdate, Config, ConfigBuilder, ConnectionMode, Error,
    ErrorCode, PasswordChange, Project, ProjectCreate, ProjectUpdate, Prompt, PromptCreate,
    PromptUpdate, Result, Team, TeamCreate, TeamMember, TeamUpdate, User, UserCreate, UserInvite,
    UserStatus, UserUpdate,
};
pub use crate::runtime::{Client, ClientBuilder, FilterValue, ListQuery};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Client, Config, ConnectionMode, Error, ListQuery, Result};
}
