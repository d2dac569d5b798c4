//! Integration tests for the HTTP API connection mode.

use promptlane_sdk_rs::{
    Client, ConnectionMode, Error, ListQuery, ProjectCreate, ProjectUpdate, UserInvite,
};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEAM_ID: &str = "0a4f9cf8-9d4b-4d21-a6b8-2f0a5f1f3c55";
const PROJECT_ID: &str = "b7a2e1da-08a5-4b3f-9f54-0d4f9cf8a111";

fn project_json(id: &str, key: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Demo",
        "key": key,
        "team_id": TEAM_ID
    })
}

async fn api_client(server: &MockServer) -> Client {
    Client::builder()
        .connection_mode(ConnectionMode::Api)
        .base_url(server.uri())
        .api_key("pl-test-key")
        .connect()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_list_projects_sends_bearer_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .and(header("Authorization", "Bearer pl-test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([project_json(PROJECT_ID, "demo")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&server).await;
    let projects = client.projects().list(ListQuery::new()).await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].key, "demo");
    assert_eq!(projects[0].team_id, Uuid::parse_str(TEAM_ID).unwrap());
}

#[tokio::test]
async fn test_list_filters_become_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/prompts"))
        .and(query_param("project_id", PROJECT_ID))
        .and(query_param("is_active", "true"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&server).await;
    let query = ListQuery::new()
        .filter("project_id", PROJECT_ID)
        .filter("is_active", true)
        .limit(10);
    let prompts = client.prompts().list(query).await.unwrap();
    assert!(prompts.is_empty());
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let server = MockServer::start().await;
    let team_id = Uuid::parse_str(TEAM_ID).unwrap();
    let created = project_json(PROJECT_ID, "demo");

    Mock::given(method("POST"))
        .and(path("/v1/projects"))
        .and(body_json(json!({
            "name": "Demo",
            "key": "demo",
            "team_id": TEAM_ID
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/projects/{PROJECT_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(created))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&server).await;
    let create = ProjectCreate {
        name: "Demo".to_string(),
        key: "demo".to_string(),
        description: None,
        team_id,
    };
    let project = client.projects().create(&create).await.unwrap();
    let fetched = client
        .projects()
        .get(&project.id.to_string())
        .await
        .unwrap();
    assert_eq!(project, fetched);
}

#[tokio::test]
async fn test_get_missing_project_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/ghost"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "project not found"})),
        )
        .mount(&server)
        .await;

    let client = api_client(&server).await;
    let err = client.projects().get("ghost").await.unwrap_err();
    match err {
        Error::NotFound { resource, id } => {
            assert_eq!(resource, "projects");
            assert_eq!(id, "ghost");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validation_rejection_surfaces_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": "key already exists"})),
        )
        .mount(&server)
        .await;

    let client = api_client(&server).await;
    let create = ProjectCreate {
        name: "Demo".to_string(),
        key: "demo".to_string(),
        description: None,
        team_id: Uuid::parse_str(TEAM_ID).unwrap(),
    };
    let err = client.projects().create(&create).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(err.to_string().contains("key already exists"));
}

#[tokio::test]
async fn test_status_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/unauthorized"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "bad key"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/throttled"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("gateway exploded"))
        .mount(&server)
        .await;

    let client = api_client(&server).await;
    assert!(matches!(
        client.projects().get("unauthorized").await.unwrap_err(),
        Error::Authentication(_)
    ));
    assert!(matches!(
        client.projects().get("throttled").await.unwrap_err(),
        Error::RateLimited
    ));
    let err = client.projects().get("broken").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_update_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/v1/projects/{PROJECT_ID}")))
        .and(body_json(json!({"description": "fresh"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(PROJECT_ID, "demo")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v1/projects/{PROJECT_ID}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&server).await;
    let update = ProjectUpdate {
        description: Some("fresh".to_string()),
        ..Default::default()
    };
    client.projects().update(PROJECT_ID, &update).await.unwrap();
    client.projects().delete(PROJECT_ID).await.unwrap();
}

#[tokio::test]
async fn test_nested_reads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/projects/{PROJECT_ID}/prompts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/prompts/welcome-email/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/teams/{TEAM_ID}/members")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&server).await;
    client.projects().prompts(PROJECT_ID).await.unwrap();
    client.prompts().versions("welcome-email").await.unwrap();
    client.teams().members(TEAM_ID).await.unwrap();
}

#[tokio::test]
async fn test_member_management_routes() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();
    let member = json!({
        "id": Uuid::new_v4(),
        "team_id": TEAM_ID,
        "user_id": user_id,
        "role": "admin",
        "status": "active"
    });

    Mock::given(method("POST"))
        .and(path(format!("/v1/teams/{TEAM_ID}/members")))
        .and(body_json(json!({"user_id": user_id, "role": "admin"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(member.clone()))
        .expect(1)
        .mount(&server)
        .await;
    let demoted = json!({
        "id": Uuid::new_v4(),
        "team_id": TEAM_ID,
        "user_id": user_id,
        "role": "member",
        "status": "active"
    });
    Mock::given(method("PUT"))
        .and(path(format!("/v1/teams/{TEAM_ID}/members/{user_id}")))
        .and(body_json(json!({"role": "member"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(demoted))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v1/teams/{TEAM_ID}/members/{user_id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&server).await;
    let added = client
        .teams()
        .add_member(TEAM_ID, &user_id.to_string(), "admin")
        .await
        .unwrap();
    assert_eq!(added.role, "admin");
    let changed = client
        .teams()
        .update_member_role(TEAM_ID, &user_id.to_string(), "member")
        .await
        .unwrap();
    assert_eq!(changed.role, "member");
    client
        .teams()
        .remove_member(TEAM_ID, &user_id.to_string())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_user_invite_starts_invited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/users/invite"))
        .and(body_json(json!({"email": "new@promptlane.ai"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": Uuid::new_v4(),
            "email": "new@promptlane.ai",
            "is_active": false,
            "status": "invited",
            "invitation_token": "tok-123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&server).await;
    let invite = UserInvite {
        email: "new@promptlane.ai".to_string(),
        full_name: None,
    };
    let user = client.users().invite(&invite).await.unwrap();
    assert_eq!(user.status, promptlane_sdk_rs::UserStatus::Invited);
    assert!(!user.is_active);
}

#[tokio::test]
async fn test_user_lifecycle_routes() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();
    let active_user = json!({
        "id": user_id,
        "email": "ada@promptlane.ai",
        "is_active": true,
        "status": "active"
    });

    Mock::given(method("POST"))
        .and(path(format!("/v1/users/{user_id}/activate")))
        .respond_with(ResponseTemplate::new(200).set_body_json(active_user))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/users/{user_id}/change-password")))
        .and(body_json(json!({
            "current_password": "old-secret",
            "new_password": "new-secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&server).await;
    let user = client.users().activate(&user_id.to_string()).await.unwrap();
    assert!(user.is_active);

    let change = promptlane_sdk_rs::PasswordChange {
        current_password: "old-secret".to_string(),
        new_password: "new-secret".to_string(),
    };
    client
        .users()
        .change_password(&user_id.to_string(), &change)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_connection_refused_is_transport() {
    // Nothing is listening on this port.
    let client = Client::builder()
        .connection_mode(ConnectionMode::Api)
        .base_url("http://127.0.0.1:9")
        .api_key("pl-test-key")
        .timeout_secs(2)
        .connect()
        .await
        .unwrap();

    let err = client.projects().list(ListQuery::new()).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
