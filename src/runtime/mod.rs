//! Backend adapters, resource accessors, and the client that wires them.

/// HTTP API backend adapter
pub mod api;
/// Backend capability traits and list queries
pub mod backend;
/// Client construction and wiring
pub mod client;
/// Direct database backend adapter
pub mod database;
/// Per-resource accessors
pub mod resources;

pub use api::ApiBackend;
pub use backend::{
    FilterValue, ListQuery, ProjectReader, PromptReader, PromptWriter, Record, ResourceReader,
    ResourceWriter, TeamReader, TeamWriter, UserReader, UserWriter,
};
pub use client::{Client, ClientBuilder};
pub use database::DatabaseBackend;
pub use resources::{Activities, Projects, Prompts, Teams, Users};
