//! Entity records and write payloads for the PromptLane platform.
//!
//! These are plain records mirroring the remote schema; the SDK only
//! marshals them. A record returned by any call was obtained fresh from the
//! backend that served it, and both backends produce the same shapes.

use crate::core::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project grouping prompts under a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Human-readable key, unique across projects
    pub key: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning team
    pub team_id: Uuid,
    /// Creation timestamp, if the backend recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last-update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// User who created the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    /// User who last updated the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Uuid>,
}

/// Fields for creating a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectCreate {
    /// Display name
    pub name: String,
    /// Human-readable key, unique across projects
    pub key: String,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning team
    pub team_id: Uuid,
}

impl ProjectCreate {
    /// Reject payloads the platform's own validation would refuse
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("project name is required"));
        }
        if self.key.trim().is_empty() {
            return Err(Error::validation("project key is required"));
        }
        Ok(())
    }
}

/// Fields for updating a project; absent fields keep their stored values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New owning team
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
}

/// A versioned prompt belonging to a project
///
/// `user_prompt` may contain `{{placeholder}}` tokens; the SDK carries them
/// verbatim and never interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Human-readable key, unique within the project
    pub key: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// System prompt text
    pub system_prompt: String,
    /// User prompt template text
    pub user_prompt: String,
    /// Whether this version is active
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Version number within the prompt's family
    #[serde(default = "default_version")]
    pub version: i64,
    /// Owning project
    pub project_id: Uuid,
    /// Root prompt of the version family, if this is a later version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last-update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// User who created the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    /// User who last updated the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Uuid>,
}

fn default_true() -> bool {
    true
}

fn default_version() -> i64 {
    1
}

/// Fields for creating a prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptCreate {
    /// Display name
    pub name: String,
    /// Human-readable key, unique within the project
    pub key: String,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// System prompt text
    pub system_prompt: String,
    /// User prompt template text
    pub user_prompt: String,
    /// Whether the prompt starts active (default: true)
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Owning project
    pub project_id: Uuid,
}

impl PromptCreate {
    /// Reject payloads the platform's own validation would refuse
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("prompt name is required"));
        }
        if self.key.trim().is_empty() {
            return Err(Error::validation("prompt key is required"));
        }
        if self.system_prompt.is_empty() {
            return Err(Error::validation("system_prompt is required"));
        }
        Ok(())
    }
}

/// Fields for updating a prompt; absent fields keep their stored values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptUpdate {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New system prompt text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// New user prompt template text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
    /// Activate or deactivate this version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// A team of platform users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last-update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// User who created the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    /// User who last updated the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Uuid>,
}

/// Fields for creating a team
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamCreate {
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields for updating a team; absent fields keep their stored values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamUpdate {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Lifecycle status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account is active
    #[default]
    Active,
    /// Invitation sent, not yet accepted
    Invited,
    /// Account disabled by an administrator
    Disabled,
}

/// A platform user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Optional login name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Email address, unique across users
    pub email: String,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Whether the account can sign in
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Whether the account has admin rights
    #[serde(default)]
    pub is_admin: bool,
    /// Lifecycle status
    #[serde(default)]
    pub status: UserStatus,
    /// Pending invitation token, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_token: Option<String>,
    /// Pending invitation expiry, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_expiry: Option<String>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last-update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// User who created the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    /// User who last updated the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Uuid>,
}

/// Fields for creating a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserCreate {
    /// Optional login name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Email address
    pub email: String,
    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Initial password; the platform hashes it, never the SDK
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Whether the account starts active (default: true)
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Whether the account has admin rights
    #[serde(default)]
    pub is_admin: bool,
}

/// Fields for updating a user; absent fields keep their stored values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New login name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Enable or disable sign-in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Grant or revoke admin rights
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    /// New lifecycle status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

/// Invitation payload for [`Users::invite`](crate::runtime::Users::invite)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInvite {
    /// Email address to invite
    pub email: String,
    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Password change payload for
/// [`Users::change_password`](crate::runtime::Users::change_password)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PasswordChange {
    /// Current password, verified by the platform
    pub current_password: String,
    /// New password
    pub new_password: String,
}

/// An audit-log entry recording a user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique identifier
    pub id: Uuid,
    /// User who performed the action
    pub user_id: Uuid,
    /// Action kind, e.g. `prompt.updated`
    pub activity_type: String,
    /// When the action happened
    pub timestamp: DateTime<Utc>,
    /// Free-form structured context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Fields for recording an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCreate {
    /// User who performed the action
    pub user_id: Uuid,
    /// Action kind
    pub activity_type: String,
    /// Free-form structured context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ActivityCreate {
    /// Reject payloads the platform's own validation would refuse
    pub fn validate(&self) -> Result<()> {
        if self.activity_type.trim().is_empty() {
            return Err(Error::validation("activity_type is required"));
        }
        Ok(())
    }
}

/// Fields for amending an activity; absent fields keep their stored values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityUpdate {
    /// New action kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    /// New structured context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// A team membership record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique identifier of the membership row
    pub id: Uuid,
    /// The team
    pub team_id: Uuid,
    /// The member
    pub user_id: Uuid,
    /// Role within the team, e.g. `admin` or `member`
    pub role: String,
    /// Membership status
    #[serde(default = "default_member_status")]
    pub status: String,
}

fn default_member_status() -> String {
    "active".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_deserializes_with_defaults() {
        let prompt: Prompt = serde_json::from_str(
            r#"{
                "id": "7b41c9a4-9d4b-4d21-a6b8-2f0a5f1f3c55",
                "name": "Welcome email",
                "key": "welcome-email",
                "system_prompt": "You are a helpful assistant.",
                "user_prompt": "Write a welcome email for {{name}}.",
                "project_id": "b7a2e1da-08a5-4b3f-9f54-0d4f9cf8a111"
            }"#,
        )
        .unwrap();
        assert!(prompt.is_active);
        assert_eq!(prompt.version, 1);
        assert_eq!(prompt.parent_id, None);
        assert!(prompt.user_prompt.contains("{{name}}"));
    }

    #[test]
    fn test_user_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&UserStatus::Invited).unwrap(),
            "\"invited\""
        );
        let status: UserStatus = serde_json::from_str("\"disabled\"").unwrap();
        assert_eq!(status, UserStatus::Disabled);
    }

    #[test]
    fn test_update_payload_excludes_unset_fields() {
        let update = ProjectUpdate {
            description: Some("new description".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_create_payload_validation() {
        let create = ProjectCreate {
            name: "  ".to_string(),
            key: "demo".to_string(),
            description: None,
            team_id: Uuid::new_v4(),
        };
        assert!(create.validate().is_err());

        let create = PromptCreate {
            name: "Welcome".to_string(),
            key: String::new(),
            description: None,
            system_prompt: "You are a helpful assistant.".to_string(),
            user_prompt: String::new(),
            is_active: true,
            project_id: Uuid::new_v4(),
        };
        assert!(create.validate().unwrap_err().to_string().contains("key"));
    }
}
