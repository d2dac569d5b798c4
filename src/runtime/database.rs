//! Direct database adapter.
//!
//! Issues parameterized SQL against the platform's schema and maps rows
//! into the same records the API adapter produces. The schema is owned by
//! the platform; this adapter never runs DDL. Connection pooling is
//! delegated to sqlx.

use crate::core::error::{Error, Result};
use crate::core::types::{
    Activity, ActivityCreate, ActivityUpdate, Project, ProjectCreate, ProjectUpdate, Prompt,
    PromptCreate, PromptUpdate, Team, User, UserStatus,
};
use crate::runtime::backend::{
    FilterValue, ListQuery, ProjectReader, PromptReader, PromptWriter, Record, ResourceReader,
    ResourceWriter, TeamReader, UserReader,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, warn};
use uuid::Uuid;

const MAX_CONNECTIONS: u32 = 5;

/// Backend adapter reading and writing the platform database directly
#[derive(Debug, Clone)]
pub struct DatabaseBackend {
    pool: SqlitePool,
}

impl DatabaseBackend {
    /// Connect a pool to the configured connection string
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(connection_string)
            .await
            .map_err(|e| Error::transport(format!("failed to connect to database: {e}")))?;
        Ok(Self { pool })
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_one(
        &self,
        table: &'static str,
        alt_key: Option<&'static str>,
        id_or_key: &str,
    ) -> Result<SqliteRow> {
        let Some(column) = match_column(id_or_key, alt_key) else {
            return Err(Error::not_found(table, id_or_key));
        };
        let sql = format!("SELECT * FROM {table} WHERE {column} = ?1");
        let row = sqlx::query(&sql)
            .bind(id_or_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx(table, id_or_key, e))?;
        row.ok_or_else(|| Error::not_found(table, id_or_key))
    }

    async fn list_rows(
        &self,
        table: &'static str,
        columns: &[&str],
        query: &ListQuery,
    ) -> Result<Vec<SqliteRow>> {
        let mut sql = format!("SELECT * FROM {table}");
        let mut clauses: Vec<String> = Vec::new();
        let mut binds: Vec<&FilterValue> = Vec::new();
        for (key, value) in &query.filters {
            if columns.contains(&key.as_str()) {
                clauses.push(format!("{key} = ?{}", binds.len() + 1));
                binds.push(value);
            } else {
                warn!(table, column = %key, "ignoring filter on unknown column");
            }
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        debug!(table, %sql, "db list");
        let mut q = sqlx::query(&sql);
        for value in binds {
            q = match value {
                FilterValue::Text(s) => q.bind(s.clone()),
                FilterValue::Int(i) => q.bind(*i),
                FilterValue::Bool(b) => q.bind(*b),
            };
        }
        q.fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx(table, "-", e))
    }

    async fn delete_row(
        &self,
        table: &'static str,
        alt_key: Option<&'static str>,
        id_or_key: &str,
    ) -> Result<()> {
        let Some(column) = match_column(id_or_key, alt_key) else {
            return Err(Error::not_found(table, id_or_key));
        };
        let sql = format!("DELETE FROM {table} WHERE {column} = ?1");
        let result = sqlx::query(&sql)
            .bind(id_or_key)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx(table, id_or_key, e))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(table, id_or_key));
        }
        Ok(())
    }

    async fn insert_prompt(
        &self,
        data: &PromptCreate,
        version: i64,
        parent_id: Option<Uuid>,
    ) -> Result<Prompt> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r"
            INSERT INTO prompts
                (id, name, key, description, system_prompt, user_prompt,
                 is_active, version, project_id, parent_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ",
        )
        .bind(id.to_string())
        .bind(&data.name)
        .bind(&data.key)
        .bind(&data.description)
        .bind(&data.system_prompt)
        .bind(&data.user_prompt)
        .bind(data.is_active)
        .bind(version)
        .bind(data.project_id.to_string())
        .bind(parent_id.map(|p| p.to_string()))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx("prompts", &data.key, e))?;

        ResourceReader::<Prompt>::get(self, &id.to_string()).await
    }
}

/// Pick the column an identifier should match: a parseable UUID matches
/// `id`, anything else the entity's alternate key (if it has one)
fn match_column(id_or_key: &str, alt_key: Option<&'static str>) -> Option<&'static str> {
    if Uuid::parse_str(id_or_key).is_ok() {
        Some("id")
    } else {
        alt_key
    }
}

fn map_sqlx(resource: &str, id: &str, err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::RowNotFound => Error::not_found(resource, id),
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => Error::validation(db.to_string()),
            _ => Error::transport(db.to_string()),
        },
        other => Error::transport(other.to_string()),
    }
}

/// A stored value that cannot be mapped into its record field
fn decode_err(table: &str, column: &str, err: impl std::fmt::Display) -> Error {
    Error::Serialization(serde_json::Error::io(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("{table}.{column}: {err}"),
    )))
}

fn get_text(row: &SqliteRow, table: &str, column: &str) -> Result<String> {
    row.try_get(column).map_err(|e| decode_err(table, column, e))
}

fn get_opt_text(row: &SqliteRow, table: &str, column: &str) -> Result<Option<String>> {
    row.try_get(column).map_err(|e| decode_err(table, column, e))
}

fn get_bool(row: &SqliteRow, table: &str, column: &str) -> Result<bool> {
    row.try_get(column).map_err(|e| decode_err(table, column, e))
}

fn get_i64(row: &SqliteRow, table: &str, column: &str) -> Result<i64> {
    row.try_get(column).map_err(|e| decode_err(table, column, e))
}

fn get_uuid(row: &SqliteRow, table: &str, column: &str) -> Result<Uuid> {
    let raw = get_text(row, table, column)?;
    Uuid::parse_str(&raw).map_err(|e| decode_err(table, column, e))
}

fn get_opt_uuid(row: &SqliteRow, table: &str, column: &str) -> Result<Option<Uuid>> {
    match get_opt_text(row, table, column)? {
        Some(raw) => Uuid::parse_str(&raw)
            .map(Some)
            .map_err(|e| decode_err(table, column, e)),
        None => Ok(None),
    }
}

fn parse_rfc3339(table: &str, column: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| decode_err(table, column, e))
}

fn get_timestamp(row: &SqliteRow, table: &str, column: &str) -> Result<DateTime<Utc>> {
    let raw = get_text(row, table, column)?;
    parse_rfc3339(table, column, &raw)
}

fn get_opt_timestamp(row: &SqliteRow, table: &str, column: &str) -> Result<Option<DateTime<Utc>>> {
    match get_opt_text(row, table, column)? {
        Some(raw) => parse_rfc3339(table, column, &raw).map(Some),
        None => Ok(None),
    }
}

fn project_from_row(row: &SqliteRow) -> Result<Project> {
    Ok(Project {
        id: get_uuid(row, "projects", "id")?,
        name: get_text(row, "projects", "name")?,
        key: get_text(row, "projects", "key")?,
        description: get_opt_text(row, "projects", "description")?,
        team_id: get_uuid(row, "projects", "team_id")?,
        created_at: get_opt_timestamp(row, "projects", "created_at")?,
        updated_at: get_opt_timestamp(row, "projects", "updated_at")?,
        created_by: get_opt_uuid(row, "projects", "created_by")?,
        updated_by: get_opt_uuid(row, "projects", "updated_by")?,
    })
}

fn prompt_from_row(row: &SqliteRow) -> Result<Prompt> {
    Ok(Prompt {
        id: get_uuid(row, "prompts", "id")?,
        name: get_text(row, "prompts", "name")?,
        key: get_text(row, "prompts", "key")?,
        description: get_opt_text(row, "prompts", "description")?,
        system_prompt: get_text(row, "prompts", "system_prompt")?,
        user_prompt: get_text(row, "prompts", "user_prompt")?,
        is_active: get_bool(row, "prompts", "is_active")?,
        version: get_i64(row, "prompts", "version")?,
        project_id: get_uuid(row, "prompts", "project_id")?,
        parent_id: get_opt_uuid(row, "prompts", "parent_id")?,
        created_at: get_opt_timestamp(row, "prompts", "created_at")?,
        updated_at: get_opt_timestamp(row, "prompts", "updated_at")?,
        created_by: get_opt_uuid(row, "prompts", "created_by")?,
        updated_by: get_opt_uuid(row, "prompts", "updated_by")?,
    })
}

fn team_from_row(row: &SqliteRow) -> Result<Team> {
    Ok(Team {
        id: get_uuid(row, "teams", "id")?,
        name: get_text(row, "teams", "name")?,
        description: get_opt_text(row, "teams", "description")?,
        created_at: get_opt_timestamp(row, "teams", "created_at")?,
        updated_at: get_opt_timestamp(row, "teams", "updated_at")?,
        created_by: get_opt_uuid(row, "teams", "created_by")?,
        updated_by: get_opt_uuid(row, "teams", "updated_by")?,
    })
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    let status_raw = get_text(row, "users", "status")?;
    let status: UserStatus = serde_json::from_value(serde_json::Value::String(status_raw))?;
    Ok(User {
        id: get_uuid(row, "users", "id")?,
        username: get_opt_text(row, "users", "username")?,
        email: get_text(row, "users", "email")?,
        full_name: get_opt_text(row, "users", "full_name")?,
        is_active: get_bool(row, "users", "is_active")?,
        is_admin: get_bool(row, "users", "is_admin")?,
        status,
        invitation_token: get_opt_text(row, "users", "invitation_token")?,
        invitation_expiry: get_opt_text(row, "users", "invitation_expiry")?,
        created_at: get_opt_timestamp(row, "users", "created_at")?,
        updated_at: get_opt_timestamp(row, "users", "updated_at")?,
        created_by: get_opt_uuid(row, "users", "created_by")?,
        updated_by: get_opt_uuid(row, "users", "updated_by")?,
    })
}

fn activity_from_row(row: &SqliteRow) -> Result<Activity> {
    let details = match get_opt_text(row, "activities", "details")? {
        Some(raw) => Some(serde_json::from_str(&raw)?),
        None => None,
    };
    Ok(Activity {
        id: get_uuid(row, "activities", "id")?,
        user_id: get_uuid(row, "activities", "user_id")?,
        activity_type: get_text(row, "activities", "activity_type")?,
        timestamp: get_timestamp(row, "activities", "timestamp")?,
        details,
    })
}

#[async_trait]
impl ResourceReader<Project> for DatabaseBackend {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Project>> {
        let rows = self.list_rows("projects", Project::COLUMNS, query).await?;
        rows.iter().map(project_from_row).collect()
    }

    async fn get(&self, id_or_key: &str) -> Result<Project> {
        let row = self.fetch_one("projects", Some("key"), id_or_key).await?;
        project_from_row(&row)
    }
}

#[async_trait]
impl ResourceWriter<Project> for DatabaseBackend {
    async fn create(&self, data: &ProjectCreate) -> Result<Project> {
        data.validate()?;
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r"
            INSERT INTO projects (id, name, key, description, team_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(id.to_string())
        .bind(&data.name)
        .bind(&data.key)
        .bind(&data.description)
        .bind(data.team_id.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx("projects", &data.key, e))?;

        ResourceReader::<Project>::get(self, &id.to_string()).await
    }

    async fn update(&self, id_or_key: &str, data: &ProjectUpdate) -> Result<Project> {
        let Some(column) = match_column(id_or_key, Some("key")) else {
            return Err(Error::not_found("projects", id_or_key));
        };
        let sql = format!(
            r"
            UPDATE projects SET
                name = COALESCE(?1, name),
                description = COALESCE(?2, description),
                team_id = COALESCE(?3, team_id),
                updated_at = ?4
            WHERE {column} = ?5
            "
        );
        let result = sqlx::query(&sql)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.team_id.map(|t| t.to_string()))
            .bind(Utc::now().to_rfc3339())
            .bind(id_or_key)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx("projects", id_or_key, e))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found("projects", id_or_key));
        }

        ResourceReader::<Project>::get(self, id_or_key).await
    }

    async fn delete(&self, id_or_key: &str) -> Result<()> {
        self.delete_row("projects", Some("key"), id_or_key).await
    }
}

#[async_trait]
impl ProjectReader for DatabaseBackend {
    async fn prompts_of(&self, project_id: &str) -> Result<Vec<Prompt>> {
        let row = self.fetch_one("projects", Some("key"), project_id).await?;
        let id = get_text(&row, "projects", "id")?;
        let rows = sqlx::query("SELECT * FROM prompts WHERE project_id = ?1")
            .bind(&id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx("prompts", project_id, e))?;
        rows.iter().map(prompt_from_row).collect()
    }
}

#[async_trait]
impl ResourceReader<Prompt> for DatabaseBackend {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Prompt>> {
        let rows = self.list_rows("prompts", Prompt::COLUMNS, query).await?;
        rows.iter().map(prompt_from_row).collect()
    }

    async fn get(&self, id_or_key: &str) -> Result<Prompt> {
        let row = self.fetch_one("prompts", Some("key"), id_or_key).await?;
        prompt_from_row(&row)
    }
}

#[async_trait]
impl ResourceWriter<Prompt> for DatabaseBackend {
    async fn create(&self, data: &PromptCreate) -> Result<Prompt> {
        data.validate()?;
        self.insert_prompt(data, 1, None).await
    }

    async fn update(&self, id_or_key: &str, data: &PromptUpdate) -> Result<Prompt> {
        let Some(column) = match_column(id_or_key, Some("key")) else {
            return Err(Error::not_found("prompts", id_or_key));
        };
        let sql = format!(
            r"
            UPDATE prompts SET
                name = COALESCE(?1, name),
                description = COALESCE(?2, description),
                system_prompt = COALESCE(?3, system_prompt),
                user_prompt = COALESCE(?4, user_prompt),
                is_active = COALESCE(?5, is_active),
                updated_at = ?6
            WHERE {column} = ?7
            "
        );
        let result = sqlx::query(&sql)
            .bind(&data.name)
            .bind(&data.description)
            .bind(&data.system_prompt)
            .bind(&data.user_prompt)
            .bind(data.is_active)
            .bind(Utc::now().to_rfc3339())
            .bind(id_or_key)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx("prompts", id_or_key, e))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found("prompts", id_or_key));
        }

        ResourceReader::<Prompt>::get(self, id_or_key).await
    }

    async fn delete(&self, id_or_key: &str) -> Result<()> {
        self.delete_row("prompts", Some("key"), id_or_key).await
    }
}

#[async_trait]
impl PromptReader for DatabaseBackend {
    async fn versions(&self, id_or_key: &str) -> Result<Vec<Prompt>> {
        let row = self.fetch_one("prompts", Some("key"), id_or_key).await?;
        let prompt = prompt_from_row(&row)?;
        let root = prompt.parent_id.unwrap_or(prompt.id);
        let rows =
            sqlx::query("SELECT * FROM prompts WHERE id = ?1 OR parent_id = ?1 ORDER BY version")
                .bind(root.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx("prompts", id_or_key, e))?;
        rows.iter().map(prompt_from_row).collect()
    }
}

#[async_trait]
impl PromptWriter for DatabaseBackend {
    async fn create_version(&self, id_or_key: &str, data: &PromptCreate) -> Result<Prompt> {
        data.validate()?;
        let row = self.fetch_one("prompts", Some("key"), id_or_key).await?;
        let parent = prompt_from_row(&row)?;
        let root = parent.parent_id.unwrap_or(parent.id);
        let next: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(version), 0) + 1 FROM prompts WHERE id = ?1 OR parent_id = ?1",
        )
        .bind(root.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx("prompts", id_or_key, e))?;

        self.insert_prompt(data, next, Some(root)).await
    }
}

#[async_trait]
impl ResourceReader<Team> for DatabaseBackend {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Team>> {
        let rows = self.list_rows("teams", Team::COLUMNS, query).await?;
        rows.iter().map(team_from_row).collect()
    }

    async fn get(&self, id_or_key: &str) -> Result<Team> {
        let row = self.fetch_one("teams", None, id_or_key).await?;
        team_from_row(&row)
    }
}

#[async_trait]
impl TeamReader for DatabaseBackend {
    async fn members(&self, team_id: &str) -> Result<Vec<User>> {
        let row = self.fetch_one("teams", None, team_id).await?;
        let id = get_text(&row, "teams", "id")?;
        let rows = sqlx::query(
            r"
            SELECT u.*
            FROM users u
            JOIN team_members tm ON u.id = tm.user_id
            WHERE tm.team_id = ?1
            ",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx("team members", team_id, e))?;
        rows.iter().map(user_from_row).collect()
    }
}

#[async_trait]
impl ResourceReader<User> for DatabaseBackend {
    async fn list(&self, query: &ListQuery) -> Result<Vec<User>> {
        let rows = self.list_rows("users", User::COLUMNS, query).await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn get(&self, id_or_key: &str) -> Result<User> {
        let row = self.fetch_one("users", Some("email"), id_or_key).await?;
        user_from_row(&row)
    }
}

#[async_trait]
impl UserReader for DatabaseBackend {
    async fn teams_of(&self, user_id: &str) -> Result<Vec<Team>> {
        let row = self.fetch_one("users", Some("email"), user_id).await?;
        let id = get_text(&row, "users", "id")?;
        let rows = sqlx::query(
            r"
            SELECT t.*
            FROM teams t
            JOIN team_members tm ON t.id = tm.team_id
            WHERE tm.user_id = ?1
            ",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx("teams", user_id, e))?;
        rows.iter().map(team_from_row).collect()
    }
}

#[async_trait]
impl ResourceReader<Activity> for DatabaseBackend {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Activity>> {
        let rows = self.list_rows("activities", Activity::COLUMNS, query).await?;
        rows.iter().map(activity_from_row).collect()
    }

    async fn get(&self, id_or_key: &str) -> Result<Activity> {
        let row = self.fetch_one("activities", None, id_or_key).await?;
        activity_from_row(&row)
    }
}

#[async_trait]
impl ResourceWriter<Activity> for DatabaseBackend {
    async fn create(&self, data: &ActivityCreate) -> Result<Activity> {
        data.validate()?;
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        let details = data.details.as_ref().map(serde_json::Value::to_string);
        sqlx::query(
            r"
            INSERT INTO activities (id, user_id, activity_type, timestamp, details)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(id.to_string())
        .bind(data.user_id.to_string())
        .bind(&data.activity_type)
        .bind(&now)
        .bind(details)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx("activities", &data.activity_type, e))?;

        ResourceReader::<Activity>::get(self, &id.to_string()).await
    }

    async fn update(&self, id_or_key: &str, data: &ActivityUpdate) -> Result<Activity> {
        if match_column(id_or_key, None).is_none() {
            return Err(Error::not_found("activities", id_or_key));
        }
        let details = data.details.as_ref().map(serde_json::Value::to_string);
        let result = sqlx::query(
            r"
            UPDATE activities SET
                activity_type = COALESCE(?1, activity_type),
                details = COALESCE(?2, details)
            WHERE id = ?3
            ",
        )
        .bind(&data.activity_type)
        .bind(details)
        .bind(id_or_key)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx("activities", id_or_key, e))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found("activities", id_or_key));
        }

        ResourceReader::<Activity>::get(self, id_or_key).await
    }

    async fn delete(&self, id_or_key: &str) -> Result<()> {
        self.delete_row("activities", None, id_or_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_column() {
        let id = Uuid::new_v4().to_string();
        assert_eq!(match_column(&id, Some("key")), Some("id"));
        assert_eq!(match_column("welcome-email", Some("key")), Some("key"));
        assert_eq!(match_column("welcome-email", None), None);
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = map_sqlx("projects", "p1", sqlx::Error::RowNotFound);
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
