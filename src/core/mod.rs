//! Core types, configuration, and error handling for the PromptLane SDK.

/// Configuration types and builders for the PromptLane client
pub mod config;
/// Error types and result helpers for the PromptLane SDK
pub mod error;
/// Entity records and write payloads
pub mod types;

pub use config::{Config, ConfigBuilder, ConnectionMode};
pub use error::{Error, ErrorCode, Result};
pub use types::{
    Activity, ActivityCreate, ActivityUpdate, PasswordChange, Project, ProjectCreate,
    ProjectUpdate, Prompt, PromptCreate, PromptUpdate, Team, TeamCreate, TeamMember, TeamUpdate,
    User, UserCreate, UserInvite, UserStatus, UserUpdate,
};
