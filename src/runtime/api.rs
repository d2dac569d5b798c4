//! HTTP API adapter.
//!
//! Translates resource operations into authenticated requests against the
//! configured base URL and maps response statuses onto the SDK error
//! taxonomy. Retries, pooling, and keep-alive are left to the underlying
//! `reqwest` client.

use crate::core::error::{Error, Result};
use crate::core::types::{
    PasswordChange, Project, Prompt, PromptCreate, Team, TeamMember, User, UserInvite,
};
use crate::runtime::backend::{
    ListQuery, ProjectReader, PromptReader, PromptWriter, Record, ResourceReader, ResourceWriter,
    TeamReader, TeamWriter, UserReader, UserWriter,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Backend adapter speaking to the PromptLane HTTP API
#[derive(Debug, Clone)]
pub struct ApiBackend {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
}

impl ApiBackend {
    /// Build an adapter for the given endpoint and credential
    ///
    /// The API key rides on every request as a bearer credential via the
    /// client's default headers.
    pub fn new(base_url: &str, api_key: &str, api_version: &str, timeout_secs: u64) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| Error::config("api_key contains characters not allowed in a header"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
        })
    }

    /// Build a full URL, prefixing the API version unless the path already
    /// carries it
    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.starts_with(&format!("{}/", self.api_version)) {
            format!("{}/{}", self.base_url, path)
        } else {
            format!("{}/{}/{}", self.base_url, self.api_version, path)
        }
    }

    fn query_params(query: &ListQuery) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = query
            .filters
            .iter()
            .map(|(key, value)| (key.clone(), value.as_param()))
            .collect();
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
        resource: &str,
        id: &str,
    ) -> Result<T> {
        debug!(resource, path, "api list/get");
        let response = self
            .client
            .get(self.url(path))
            .query(params)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        Self::decode(response, resource, id).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        resource: &str,
        id: &str,
    ) -> Result<T> {
        debug!(resource, path, "api create");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        Self::decode(response, resource, id).await
    }

    async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        resource: &str,
        id: &str,
    ) -> Result<T> {
        debug!(resource, path, "api update");
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        Self::decode(response, resource, id).await
    }

    async fn delete_path(&self, path: &str, resource: &str, id: &str) -> Result<()> {
        debug!(resource, path, "api delete");
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        Self::expect_success(response, resource, id).await
    }

    /// Parse a successful response body, or map the failure status
    async fn decode<T: DeserializeOwned>(response: Response, resource: &str, id: &str) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::fail(response, resource, id).await);
        }
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(Error::from)
    }

    async fn expect_success(response: Response, resource: &str, id: &str) -> Result<()> {
        if !response.status().is_success() {
            return Err(Self::fail(response, resource, id).await);
        }
        Ok(())
    }

    async fn fail(response: Response, resource: &str, id: &str) -> Error {
        let status = response.status();
        let detail = match response.text().await {
            Ok(body) => extract_detail(&body),
            Err(e) => e.to_string(),
        };
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authentication(detail),
            StatusCode::NOT_FOUND => Error::not_found(resource, id),
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimited,
            s if s.is_client_error() => Error::Validation(detail),
            s => Error::transport(format!("{resource} request returned {s}: {detail}")),
        }
    }
}

/// Pull a human-readable message out of an API error body
///
/// The platform reports errors as `{"detail": ...}` (or `{"message": ...}`
/// from older deployments); anything else is passed through verbatim.
fn extract_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            let detail = value.get("detail").or_else(|| value.get("message"))?;
            Some(match detail.as_str() {
                Some(s) => s.to_string(),
                None => detail.to_string(),
            })
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl<R: Record> ResourceReader<R> for ApiBackend {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>> {
        let params = Self::query_params(query);
        self.get_json(R::RESOURCE, &params, R::RESOURCE, "-").await
    }

    async fn get(&self, id_or_key: &str) -> Result<R> {
        let path = format!("{}/{}", R::RESOURCE, id_or_key);
        self.get_json(&path, &[], R::RESOURCE, id_or_key).await
    }
}

#[async_trait]
impl<R: Record> ResourceWriter<R> for ApiBackend {
    async fn create(&self, data: &R::Create) -> Result<R> {
        self.post_json(R::RESOURCE, data, R::RESOURCE, "-").await
    }

    async fn update(&self, id_or_key: &str, data: &R::Update) -> Result<R> {
        let path = format!("{}/{}", R::RESOURCE, id_or_key);
        self.put_json(&path, data, R::RESOURCE, id_or_key).await
    }

    async fn delete(&self, id_or_key: &str) -> Result<()> {
        let path = format!("{}/{}", R::RESOURCE, id_or_key);
        self.delete_path(&path, R::RESOURCE, id_or_key).await
    }
}

#[async_trait]
impl ProjectReader for ApiBackend {
    async fn prompts_of(&self, project_id: &str) -> Result<Vec<Prompt>> {
        let path = format!("projects/{project_id}/prompts");
        self.get_json(&path, &[], "projects", project_id).await
    }
}

#[async_trait]
impl PromptReader for ApiBackend {
    async fn versions(&self, id_or_key: &str) -> Result<Vec<Prompt>> {
        let path = format!("prompts/{id_or_key}/versions");
        self.get_json(&path, &[], "prompts", id_or_key).await
    }
}

#[async_trait]
impl PromptWriter for ApiBackend {
    async fn create_version(&self, id_or_key: &str, data: &PromptCreate) -> Result<Prompt> {
        let path = format!("prompts/{id_or_key}/versions");
        self.post_json(&path, data, "prompts", id_or_key).await
    }
}

#[async_trait]
impl TeamReader for ApiBackend {
    async fn members(&self, team_id: &str) -> Result<Vec<User>> {
        let path = format!("teams/{team_id}/members");
        self.get_json(&path, &[], "teams", team_id).await
    }
}

#[async_trait]
impl TeamWriter for ApiBackend {
    async fn add_member(&self, team_id: &str, user_id: &str, role: &str) -> Result<TeamMember> {
        let path = format!("teams/{team_id}/members");
        let body = serde_json::json!({ "user_id": user_id, "role": role });
        self.post_json(&path, &body, "teams", team_id).await
    }

    async fn remove_member(&self, team_id: &str, user_id: &str) -> Result<()> {
        let path = format!("teams/{team_id}/members/{user_id}");
        self.delete_path(&path, "team members", user_id).await
    }

    async fn update_member_role(
        &self,
        team_id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<TeamMember> {
        let path = format!("teams/{team_id}/members/{user_id}");
        let body = serde_json::json!({ "role": role });
        self.put_json(&path, &body, "team members", user_id).await
    }
}

#[async_trait]
impl UserReader for ApiBackend {
    async fn teams_of(&self, user_id: &str) -> Result<Vec<Team>> {
        let path = format!("users/{user_id}/teams");
        self.get_json(&path, &[], "users", user_id).await
    }
}

#[async_trait]
impl UserWriter for ApiBackend {
    async fn invite(&self, invite: &UserInvite) -> Result<User> {
        self.post_json("users/invite", invite, "users", &invite.email)
            .await
    }

    async fn activate(&self, id_or_key: &str) -> Result<User> {
        let path = format!("users/{id_or_key}/activate");
        self.post_json(&path, &serde_json::json!({}), "users", id_or_key)
            .await
    }

    async fn deactivate(&self, id_or_key: &str) -> Result<User> {
        let path = format!("users/{id_or_key}/deactivate");
        self.post_json(&path, &serde_json::json!({}), "users", id_or_key)
            .await
    }

    async fn change_password(&self, id_or_key: &str, change: &PasswordChange) -> Result<()> {
        let path = format!("users/{id_or_key}/change-password");
        let _: serde_json::Value = self.post_json(&path, change, "users", id_or_key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> ApiBackend {
        ApiBackend::new(base, "pl-test-key", "v1", 30).unwrap()
    }

    #[test]
    fn test_url_building() {
        let api = backend("http://localhost:8000/");
        assert_eq!(api.url("projects"), "http://localhost:8000/v1/projects");
        assert_eq!(api.url("/projects/p1"), "http://localhost:8000/v1/projects/p1");
        // An explicit version prefix is not duplicated.
        assert_eq!(api.url("v1/teams"), "http://localhost:8000/v1/teams");
    }

    #[test]
    fn test_extract_detail() {
        assert_eq!(extract_detail(r#"{"detail": "name is required"}"#), "name is required");
        assert_eq!(extract_detail(r#"{"message": "nope"}"#), "nope");
        assert_eq!(extract_detail("gateway exploded"), "gateway exploded");
    }

    #[test]
    fn test_rejects_unprintable_api_key() {
        assert!(ApiBackend::new("http://localhost:8000", "bad\nkey", "v1", 30).is_err());
    }
}
