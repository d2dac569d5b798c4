//! Backend capability traits shared by the API and database adapters.
//!
//! Reads and writes are separate traits so that the read/write routing
//! split is decided once, at client construction, by which trait object an
//! accessor is handed — never by branching at call time. Write-through
//! resources (teams, users) get their write traits implemented only by the
//! API adapter, which makes the policy a compile-time fact.

use crate::core::error::Result;
use crate::core::types::{
    Activity, ActivityCreate, ActivityUpdate, PasswordChange, Project, ProjectCreate,
    ProjectUpdate, Prompt, PromptCreate, PromptUpdate, Team, TeamCreate, TeamMember, TeamUpdate,
    User, UserCreate, UserInvite, UserUpdate,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// A resource entity both adapters can marshal
///
/// `RESOURCE` doubles as the API path segment and the database table name;
/// `COLUMNS` is the whitelist of filterable columns.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    /// Payload accepted by `create`
    type Create: Serialize + Send + Sync + 'static;
    /// Payload accepted by `update`
    type Update: Serialize + Send + Sync + 'static;

    /// Resource path segment / table name
    const RESOURCE: &'static str;
    /// Columns that may appear in [`ListQuery`] filters
    const COLUMNS: &'static [&'static str];
}

impl Record for Project {
    type Create = ProjectCreate;
    type Update = ProjectUpdate;

    const RESOURCE: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "key",
        "description",
        "team_id",
        "created_by",
        "updated_by",
    ];
}

impl Record for Prompt {
    type Create = PromptCreate;
    type Update = PromptUpdate;

    const RESOURCE: &'static str = "prompts";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "key",
        "description",
        "is_active",
        "version",
        "project_id",
        "parent_id",
        "created_by",
        "updated_by",
    ];
}

impl Record for Team {
    type Create = TeamCreate;
    type Update = TeamUpdate;

    const RESOURCE: &'static str = "teams";
    const COLUMNS: &'static [&'static str] = &["id", "name", "created_by", "updated_by"];
}

impl Record for User {
    type Create = UserCreate;
    type Update = UserUpdate;

    const RESOURCE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "id", "username", "email", "full_name", "is_active", "is_admin", "status",
    ];
}

impl Record for Activity {
    type Create = ActivityCreate;
    type Update = ActivityUpdate;

    const RESOURCE: &'static str = "activities";
    const COLUMNS: &'static [&'static str] = &["id", "user_id", "activity_type"];
}

/// A single equality filter value
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Text comparison (also used for ids and keys)
    Text(String),
    /// Integer comparison
    Int(i64),
    /// Boolean comparison
    Bool(bool),
}

impl FilterValue {
    /// Render the value as an HTTP query parameter
    pub fn as_param(&self) -> String {
        match self {
            FilterValue::Text(s) => s.clone(),
            FilterValue::Int(i) => i.to_string(),
            FilterValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

/// Equality filters and an optional limit for `list` calls
///
/// The API adapter sends filters as query parameters; the database adapter
/// turns them into parameterized `WHERE` clauses. Filter keys not present
/// in the record's column whitelist are skipped.
///
/// # Examples
///
/// ```rust
/// use promptlane_sdk_rs::runtime::ListQuery;
///
/// let query = ListQuery::new().filter("is_active", true).limit(50);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub(crate) filters: Vec<(String, FilterValue)>,
    pub(crate) limit: Option<u32>,
}

impl ListQuery {
    /// Create an empty query matching every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Cap the number of returned records
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether the query has no filters and no limit
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.limit.is_none()
    }
}

/// Read half of a resource backend
#[async_trait]
pub trait ResourceReader<R: Record>: Send + Sync {
    /// List records, optionally filtered
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>>;

    /// Fetch a single record by id or alternate key
    async fn get(&self, id_or_key: &str) -> Result<R>;
}

/// Write half of a resource backend
#[async_trait]
pub trait ResourceWriter<R: Record>: Send + Sync {
    /// Create a record
    async fn create(&self, data: &R::Create) -> Result<R>;

    /// Update a record; absent payload fields keep their stored values
    async fn update(&self, id_or_key: &str, data: &R::Update) -> Result<R>;

    /// Delete a record
    async fn delete(&self, id_or_key: &str) -> Result<()>;
}

/// Project reads plus the prompts-of-project query
#[async_trait]
pub trait ProjectReader: ResourceReader<Project> {
    /// List the prompts belonging to a project
    async fn prompts_of(&self, project_id: &str) -> Result<Vec<Prompt>>;
}

/// Prompt reads plus version-family queries
#[async_trait]
pub trait PromptReader: ResourceReader<Prompt> {
    /// List every version in a prompt's family, oldest first
    async fn versions(&self, id_or_key: &str) -> Result<Vec<Prompt>>;
}

/// Prompt writes plus version creation
#[async_trait]
pub trait PromptWriter: ResourceWriter<Prompt> {
    /// Create a new version of an existing prompt
    async fn create_version(&self, id_or_key: &str, data: &PromptCreate) -> Result<Prompt>;
}

/// Team reads plus the membership query
#[async_trait]
pub trait TeamReader: ResourceReader<Team> {
    /// List the users belonging to a team
    async fn members(&self, team_id: &str) -> Result<Vec<User>>;
}

/// Team writes plus membership management
///
/// Only the API adapter implements this: team writes carry business rules
/// the platform enforces server-side.
#[async_trait]
pub trait TeamWriter: ResourceWriter<Team> {
    /// Add a user to a team with the given role
    async fn add_member(&self, team_id: &str, user_id: &str, role: &str) -> Result<TeamMember>;

    /// Remove a user from a team
    async fn remove_member(&self, team_id: &str, user_id: &str) -> Result<()>;

    /// Change a team member's role
    async fn update_member_role(
        &self,
        team_id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<TeamMember>;
}

/// User reads plus the teams-of-user query
#[async_trait]
pub trait UserReader: ResourceReader<User> {
    /// List the teams a user belongs to
    async fn teams_of(&self, user_id: &str) -> Result<Vec<Team>>;
}

/// User writes plus account lifecycle operations
///
/// Only the API adapter implements this, for the same reason as
/// [`TeamWriter`].
#[async_trait]
pub trait UserWriter: ResourceWriter<User> {
    /// Invite a new user; the created account starts in the invited state
    async fn invite(&self, invite: &UserInvite) -> Result<User>;

    /// Activate a user account
    async fn activate(&self, id_or_key: &str) -> Result<User>;

    /// Deactivate a user account
    async fn deactivate(&self, id_or_key: &str) -> Result<User>;

    /// Change a user's password
    async fn change_password(&self, id_or_key: &str, change: &PasswordChange) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_builder() {
        let query = ListQuery::new()
            .filter("project_id", Uuid::nil())
            .filter("is_active", true)
            .limit(10);
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.limit, Some(10));
        assert!(!query.is_empty());
        assert!(ListQuery::new().is_empty());
    }

    #[test]
    fn test_filter_value_params() {
        assert_eq!(FilterValue::from("abc").as_param(), "abc");
        assert_eq!(FilterValue::from(42i64).as_param(), "42");
        assert_eq!(FilterValue::from(true).as_param(), "true");
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(Project::RESOURCE, "projects");
        assert_eq!(Prompt::RESOURCE, "prompts");
        assert_eq!(Team::RESOURCE, "teams");
        assert_eq!(User::RESOURCE, "users");
        assert_eq!(Activity::RESOURCE, "activities");
    }
}
