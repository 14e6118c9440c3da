//! HTTP operation client and executor against a mock backend.

use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use taskdesk::types::{DeleteTaskRequest, ListTasksRequest};
use taskdesk::{
    ClientConfig, CredentialPair, CredentialStore, Executor, FailureKind, HttpTaskApi,
    InMemoryCredentialStore, InMemoryProjectStore, LoginRequest, SessionEvent, SessionState,
    TaskApi,
};

fn api_for(server: &Server) -> HttpTaskApi {
    let config = ClientConfig::new(&server.url())
        .unwrap()
        .with_timeout(5_000)
        .with_header("X-Client", "taskdesk-tests");
    HttpTaskApi::new(config).unwrap()
}

fn list_request() -> ListTasksRequest {
    ListTasksRequest {
        role: "member".to_string(),
        project_id: "p1".to_string(),
    }
}

#[tokio::test]
async fn login_sends_credentials_without_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/login")
        .match_header("authorization", Matcher::Missing)
        .match_header("x-client", "taskdesk-tests")
        .match_body(Matcher::Json(json!({
            "email": "ada@example.com",
            "password": "hunter2"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "accessToken": "acc",
                "refreshToken": "ref",
                "user": {"id": "u1", "name": "Ada", "email": "ada@example.com", "role": "admin"},
                "defaultProjectId": "p1",
                "projects": {"Launch": "p1"}
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let response = api_for(&server)
        .login(&LoginRequest::new("ada@example.com", "hunter2"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.access_token, "acc");
    assert_eq!(response.refresh_token, "ref");
    assert_eq!(response.user.role, "admin");
    assert_eq!(response.default_project_id.as_deref(), Some("p1"));
    assert_eq!(response.projects.get("Launch").map(String::as_str), Some("p1"));
}

#[tokio::test]
async fn list_tasks_attaches_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/tasks/list")
        .match_header("authorization", "Bearer acc")
        .match_body(Matcher::Json(json!({"role": "member", "projectId": "p1"})))
        .with_status(200)
        .with_body(
            json!({
                "message": "ok",
                "tasks": [
                    {"id": "t1", "name": "Ship", "status": "Completed"},
                    {"id": "t2", "name": "Docs", "status": "Open", "dueDate": "2026-11-01"}
                ],
                "statuses": "Open,Completed"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let response = api_for(&server)
        .list_tasks("acc", &list_request())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.tasks.len(), 2);
    assert_eq!(response.tasks[1].due_date, "2026-11-01");
    assert_eq!(response.counts().completed, 1);
    assert_eq!(response.status_vocabulary(), vec!["Open", "Completed"]);
}

#[tokio::test]
async fn delete_uses_delete_method() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/tasks/delete")
        .match_header("authorization", "Bearer acc")
        .match_body(Matcher::Json(json!({"taskId": "t1"})))
        .with_status(200)
        .with_body(r#"{"message":"Task deleted"}"#)
        .create_async()
        .await;

    let response = api_for(&server)
        .delete_task(
            "acc",
            &DeleteTaskRequest {
                task_id: "t1".to_string(),
            },
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.message, "Task deleted");
}

#[tokio::test]
async fn unauthorized_status_is_auth_expired() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/tasks/list")
        .with_status(401)
        .with_body(r#"{"message":"Unauthorized"}"#)
        .create_async()
        .await;

    let failure = api_for(&server)
        .list_tasks("acc", &list_request())
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::AuthExpired);
    assert_eq!(failure.message, "Unauthorized");
}

#[tokio::test]
async fn expiry_phrase_in_body_is_auth_expired() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/tasks/list")
        .with_status(400)
        .with_body(r#"{"message":"Token is not valid anymore"}"#)
        .create_async()
        .await;

    let failure = api_for(&server)
        .list_tasks("acc", &list_request())
        .await
        .unwrap_err();

    assert!(failure.is_auth_expired());
}

#[tokio::test]
async fn other_errors_keep_backend_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/tasks/list")
        .with_status(500)
        .with_body(r#"{"error":"Database unavailable"}"#)
        .create_async()
        .await;
    server
        .mock("DELETE", "/tasks/delete")
        .with_status(403)
        .with_body("")
        .create_async()
        .await;

    let api = api_for(&server);
    let failure = api.list_tasks("acc", &list_request()).await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Other);
    assert_eq!(failure.message, "Database unavailable");

    let failure = api
        .delete_task(
            "acc",
            &DeleteTaskRequest {
                task_id: "t1".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(failure.kind, FailureKind::Other);
    assert_eq!(failure.message, "HTTP 403: Forbidden");
}

#[tokio::test]
async fn malformed_success_body_is_other() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/tasks/list")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let failure = api_for(&server)
        .list_tasks("acc", &list_request())
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Other);
    assert!(failure.message.starts_with("Malformed response"));
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let api = HttpTaskApi::new(ClientConfig::new("http://127.0.0.1:1").unwrap()).unwrap();

    let failure = api.list_tasks("acc", &list_request()).await.unwrap_err();

    assert_eq!(failure.kind, FailureKind::Other);
    assert!(failure.message.starts_with("Network error"));
}

#[tokio::test]
async fn refresh_sends_refresh_token_as_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/refresh")
        .match_header("authorization", "Bearer ref")
        .with_status(200)
        .with_body(r#"{"accessToken":"acc2","refreshToken":"ref2"}"#)
        .expect(1)
        .create_async()
        .await;

    let response = api_for(&server).refresh("ref").await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.access_token, "acc2");
    assert_eq!(response.refresh_token, "ref2");
}

#[tokio::test]
async fn base_path_is_preserved() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/auth/signup")
        .with_status(422)
        .with_body(r#"{"msg":"Email already registered"}"#)
        .create_async()
        .await;

    let api = HttpTaskApi::new(ClientConfig::new(&format!("{}/api/v1", server.url())).unwrap())
        .unwrap();
    let failure = api
        .signup(&LoginRequest::new("ada@example.com", "hunter2"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(failure.message, "Email already registered");
}

// ─── Executor over HTTP ─────────────────────────────────────────────────────

fn executor_for(server: &Server, store: Arc<InMemoryCredentialStore>) -> Executor {
    Executor::new(
        Arc::new(api_for(server)),
        SessionState::new(store),
        Arc::new(InMemoryProjectStore::with_current("p1")),
    )
}

#[tokio::test]
async fn expired_token_is_refreshed_and_retried_over_http() {
    let mut server = Server::new_async().await;
    let stale = server
        .mock("POST", "/tasks/list")
        .match_header("authorization", "Bearer old-access")
        .with_status(401)
        .with_body(r#"{"message":"Token has expired"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .match_header("authorization", "Bearer old-refresh")
        .with_status(200)
        .with_body(r#"{"accessToken":"new-access","refreshToken":"new-refresh"}"#)
        .expect(1)
        .create_async()
        .await;
    let fresh = server
        .mock("POST", "/tasks/list")
        .match_header("authorization", "Bearer new-access")
        .with_status(200)
        .with_body(r#"{"message":"ok","tasks":[{"id":"t1","status":"Open"}],"statuses":"Open"}"#)
        .expect(1)
        .create_async()
        .await;

    let store = Arc::new(InMemoryCredentialStore::with_credentials(
        CredentialPair::new("old-access", "old-refresh"),
    ));
    let executor = executor_for(&server, store.clone());

    executor.list_tasks("member").await;

    stale.assert_async().await;
    refresh.assert_async().await;
    fresh.assert_async().await;

    let state = executor.states().list_tasks.snapshot();
    assert!(state.has_succeeded);
    assert_eq!(state.error, None);
    assert_eq!(state.last_response.map(|r| r.tasks.len()), Some(1));
    assert_eq!(store.access_token().as_deref(), Some("new-access"));
    assert_eq!(store.refresh_token().as_deref(), Some("new-refresh"));
}

#[tokio::test]
async fn rejected_refresh_logs_out_over_http() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/tasks/create")
        .with_status(401)
        .with_body(r#"{"message":"Token has expired"}"#)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/auth/refresh")
        .with_status(401)
        .with_body(r#"{"message":"Refresh token revoked"}"#)
        .expect(1)
        .create_async()
        .await;

    let store = Arc::new(InMemoryCredentialStore::with_credentials(
        CredentialPair::new("old-access", "old-refresh"),
    ));
    let executor = executor_for(&server, store.clone());
    let mut events = executor.session().subscribe_events();

    executor.create_task(taskdesk::TaskDraft::default()).await;

    assert_eq!(
        executor.states().create_task.error().as_deref(),
        Some("Refresh token revoked")
    );
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::ForcedLogout {
            reason: "Refresh token revoked".to_string()
        }
    );
    assert!(events.try_recv().is_err());
    assert!(!executor.session().is_authenticated());
    assert!(store.load().is_none());
}

#[tokio::test]
async fn empty_success_body_is_not_an_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/tasks/delete")
        .match_header("authorization", "Bearer acc")
        .with_status(204)
        .create_async()
        .await;

    let response = api_for(&server)
        .delete_task(
            "acc",
            &DeleteTaskRequest {
                task_id: "t1".to_string(),
            },
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.message, "");
}
