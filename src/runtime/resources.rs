//! Per-resource accessors.
//!
//! Each accessor holds the reader and writer chosen when the client was
//! constructed: the same adapter twice in pure modes, the database adapter
//! and the API adapter in mixed mode. Calls never branch on the connection
//! mode — the wiring already decided.

use crate::core::error::{Error, Result};
use crate::core::types::{
    Activity, ActivityCreate, ActivityUpdate, PasswordChange, Project, ProjectCreate,
    ProjectUpdate, Prompt, PromptCreate, PromptUpdate, Team, TeamCreate, TeamMember, TeamUpdate,
    User, UserCreate, UserInvite, UserUpdate,
};
use crate::runtime::backend::{
    ListQuery, ProjectReader, PromptReader, PromptWriter, ResourceReader, ResourceWriter,
    TeamReader, TeamWriter, UserReader, UserWriter,
};
use std::sync::Arc;

fn api_required(resource: &str) -> Error {
    Error::config(format!(
        "{resource} writes require an API connection; use api or mixed mode"
    ))
}

/// Accessor for the `projects` namespace
#[derive(Clone)]
pub struct Projects {
    reader: Arc<dyn ProjectReader>,
    writer: Arc<dyn ResourceWriter<Project>>,
}

impl Projects {
    pub(crate) fn new(
        reader: Arc<dyn ProjectReader>,
        writer: Arc<dyn ResourceWriter<Project>>,
    ) -> Self {
        Self { reader, writer }
    }

    /// List projects, optionally filtered
    pub async fn list(&self, query: ListQuery) -> Result<Vec<Project>> {
        self.reader.list(&query).await
    }

    /// Fetch a project by id or key
    pub async fn get(&self, id_or_key: &str) -> Result<Project> {
        self.reader.get(id_or_key).await
    }

    /// Create a project
    pub async fn create(&self, data: &ProjectCreate) -> Result<Project> {
        self.writer.create(data).await
    }

    /// Update a project
    pub async fn update(&self, id_or_key: &str, data: &ProjectUpdate) -> Result<Project> {
        self.writer.update(id_or_key, data).await
    }

    /// Delete a project
    pub async fn delete(&self, id_or_key: &str) -> Result<()> {
        self.writer.delete(id_or_key).await
    }

    /// List the prompts belonging to a project
    pub async fn prompts(&self, project_id: &str) -> Result<Vec<Prompt>> {
        self.reader.prompts_of(project_id).await
    }
}

/// Accessor for the `prompts` namespace
#[derive(Clone)]
pub struct Prompts {
    reader: Arc<dyn PromptReader>,
    writer: Arc<dyn PromptWriter>,
}

impl Prompts {
    pub(crate) fn new(reader: Arc<dyn PromptReader>, writer: Arc<dyn PromptWriter>) -> Self {
        Self { reader, writer }
    }

    /// List prompts, optionally filtered
    pub async fn list(&self, query: ListQuery) -> Result<Vec<Prompt>> {
        self.reader.list(&query).await
    }

    /// Fetch a prompt by id or key
    pub async fn get(&self, id_or_key: &str) -> Result<Prompt> {
        self.reader.get(id_or_key).await
    }

    /// Create a prompt
    pub async fn create(&self, data: &PromptCreate) -> Result<Prompt> {
        self.writer.create(data).await
    }

    /// Update a prompt
    pub async fn update(&self, id_or_key: &str, data: &PromptUpdate) -> Result<Prompt> {
        self.writer.update(id_or_key, data).await
    }

    /// Delete a prompt
    pub async fn delete(&self, id_or_key: &str) -> Result<()> {
        self.writer.delete(id_or_key).await
    }

    /// List every version in a prompt's family, oldest first
    pub async fn versions(&self, id_or_key: &str) -> Result<Vec<Prompt>> {
        self.reader.versions(id_or_key).await
    }

    /// Create a new version of an existing prompt
    pub async fn create_version(&self, id_or_key: &str, data: &PromptCreate) -> Result<Prompt> {
        self.writer.create_version(id_or_key, data).await
    }
}

/// Accessor for the `teams` namespace
///
/// Team writes always go through the API so the platform's validation and
/// business rules apply; in pure database mode they fail with
/// [`Error::Config`].
#[derive(Clone)]
pub struct Teams {
    reader: Arc<dyn TeamReader>,
    writer: Option<Arc<dyn TeamWriter>>,
}

impl Teams {
    pub(crate) fn new(reader: Arc<dyn TeamReader>, writer: Option<Arc<dyn TeamWriter>>) -> Self {
        Self { reader, writer }
    }

    fn writer(&self) -> Result<&Arc<dyn TeamWriter>> {
        self.writer.as_ref().ok_or_else(|| api_required("team"))
    }

    /// List teams, optionally filtered
    pub async fn list(&self, query: ListQuery) -> Result<Vec<Team>> {
        self.reader.list(&query).await
    }

    /// Fetch a team by id
    pub async fn get(&self, id: &str) -> Result<Team> {
        self.reader.get(id).await
    }

    /// Create a team
    pub async fn create(&self, data: &TeamCreate) -> Result<Team> {
        self.writer()?.create(data).await
    }

    /// Update a team
    pub async fn update(&self, id: &str, data: &TeamUpdate) -> Result<Team> {
        self.writer()?.update(id, data).await
    }

    /// Delete a team
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.writer()?.delete(id).await
    }

    /// List the users belonging to a team
    pub async fn members(&self, team_id: &str) -> Result<Vec<User>> {
        self.reader.members(team_id).await
    }

    /// Add a user to a team with the given role
    pub async fn add_member(
        &self,
        team_id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<TeamMember> {
        self.writer()?.add_member(team_id, user_id, role).await
    }

    /// Remove a user from a team
    pub async fn remove_member(&self, team_id: &str, user_id: &str) -> Result<()> {
        self.writer()?.remove_member(team_id, user_id).await
    }

    /// Change a team member's role
    pub async fn update_member_role(
        &self,
        team_id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<TeamMember> {
        self.writer()?
            .update_member_role(team_id, user_id, role)
            .await
    }
}

/// Accessor for the `users` namespace
///
/// User writes always go through the API, same rule as [`Teams`].
#[derive(Clone)]
pub struct Users {
    reader: Arc<dyn UserReader>,
    writer: Option<Arc<dyn UserWriter>>,
}

impl Users {
    pub(crate) fn new(reader: Arc<dyn UserReader>, writer: Option<Arc<dyn UserWriter>>) -> Self {
        Self { reader, writer }
    }

    fn writer(&self) -> Result<&Arc<dyn UserWriter>> {
        self.writer.as_ref().ok_or_else(|| api_required("user"))
    }

    /// List users, optionally filtered
    pub async fn list(&self, query: ListQuery) -> Result<Vec<User>> {
        self.reader.list(&query).await
    }

    /// Fetch a user by id or email
    pub async fn get(&self, id_or_email: &str) -> Result<User> {
        self.reader.get(id_or_email).await
    }

    /// Create a user
    pub async fn create(&self, data: &UserCreate) -> Result<User> {
        self.writer()?.create(data).await
    }

    /// Update a user
    pub async fn update(&self, id_or_email: &str, data: &UserUpdate) -> Result<User> {
        self.writer()?.update(id_or_email, data).await
    }

    /// Delete a user
    pub async fn delete(&self, id_or_email: &str) -> Result<()> {
        self.writer()?.delete(id_or_email).await
    }

    /// List the teams a user belongs to
    pub async fn teams(&self, user_id: &str) -> Result<Vec<Team>> {
        self.reader.teams_of(user_id).await
    }

    /// Invite a new user; the account starts in the invited state
    pub async fn invite(&self, invite: &UserInvite) -> Result<User> {
        self.writer()?.invite(invite).await
    }

    /// Activate a user account
    pub async fn activate(&self, id_or_email: &str) -> Result<User> {
        self.writer()?.activate(id_or_email).await
    }

    /// Deactivate a user account
    pub async fn deactivate(&self, id_or_email: &str) -> Result<User> {
        self.writer()?.deactivate(id_or_email).await
    }

    /// Change a user's password
    pub async fn change_password(&self, id_or_email: &str, change: &PasswordChange) -> Result<()> {
        self.writer()?.change_password(id_or_email, change).await
    }
}

/// Accessor for the `activities` namespace
#[derive(Clone)]
pub struct Activities {
    reader: Arc<dyn ResourceReader<Activity>>,
    writer: Arc<dyn ResourceWriter<Activity>>,
}

impl Activities {
    pub(crate) fn new(
        reader: Arc<dyn ResourceReader<Activity>>,
        writer: Arc<dyn ResourceWriter<Activity>>,
    ) -> Self {
        Self { reader, writer }
    }

    /// List activities, optionally filtered
    pub async fn list(&self, query: ListQuery) -> Result<Vec<Activity>> {
        self.reader.list(&query).await
    }

    /// List the activities recorded for a user
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Activity>> {
        self.reader
            .list(&ListQuery::new().filter("user_id", user_id))
            .await
    }

    /// Fetch an activity by id
    pub async fn get(&self, id: &str) -> Result<Activity> {
        self.reader.get(id).await
    }

    /// Record an activity
    pub async fn create(&self, data: &ActivityCreate) -> Result<Activity> {
        self.writer.create(data).await
    }

    /// Amend an activity
    pub async fn update(&self, id: &str, data: &ActivityUpdate) -> Result<Activity> {
        self.writer.update(id, data).await
    }

    /// Delete an activity
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.writer.delete(id).await
    }
}
