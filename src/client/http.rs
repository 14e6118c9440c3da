//! [`TaskApi`] over HTTP with `reqwest`.
//!
//! Each call is one request. Responses are classified as follows:
//!
//! - 2xx: the body is decoded into the success type; an empty body decodes
//!   as `{}` and an undecodable body is an `Other` failure
//!   ("Malformed response: ...").
//! - 401: `AuthExpired`.
//! - any other status: the error payload's `message` (or `error`/`msg`) is
//!   extracted and classified; the expiry phrases make it `AuthExpired`.
//! - transport errors (connect, DNS, TLS, timeout): `Other`.

use super::api::TaskApi;
use super::bearer::BearerToken;
use super::config::ClientConfig;
use super::operation::{Method, OperationKind};
use crate::error::{Error, OperationFailure, OperationResult, Result};
use crate::types::{
    AuthResponse, ChangePasswordRequest, CreateTaskRequest, DeleteTaskRequest, EditTaskRequest,
    ListTasksRequest, ListTasksResponse, LoginRequest, MessageResponse, RefreshResponse,
    SignupRequest,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Error payload returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error", alias = "msg")]
    message: Option<String>,
}

/// Extract a user-facing message from an error response body.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        if !message.is_empty() {
            return message;
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() <= 200 && !trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    match status.canonical_reason() {
        Some(reason) => format!("HTTP {}: {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

fn transport_failure(err: &reqwest::Error) -> OperationFailure {
    if err.is_timeout() {
        OperationFailure::other("Network error: timeout")
    } else if err.is_connect() {
        OperationFailure::other(format!("Network error: could not connect ({})", err))
    } else {
        OperationFailure::other(format!("Network error: {}", err))
    }
}

/// HTTP implementation of [`TaskApi`].
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpTaskApi {
    /// Build a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("invalid value for header {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send<B, T>(
        &self,
        kind: OperationKind,
        bearer: Option<BearerToken>,
        body: &B,
    ) -> OperationResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .config
            .endpoint(kind.path())
            .map_err(|e| OperationFailure::other(e.to_string()))?;

        let method = match kind.method() {
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut request = self.http.request(method, url.clone()).json(body);
        if let Some(token) = &bearer {
            tracing::trace!(
                operation = %kind,
                authorization = %token.redacted(),
                "attaching credential"
            );
            request = request.header(reqwest::header::AUTHORIZATION, token.to_header_value());
        }

        tracing::debug!(operation = %kind, method = %kind.method(), %url, "sending request");
        let response = request.send().await.map_err(|e| {
            let failure = transport_failure(&e);
            tracing::debug!(operation = %kind, error = %failure, "transport failure");
            failure
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| transport_failure(&e))?;

        if status.is_success() {
            // 204 and other empty successes decode like an empty object
            let body = if text.trim().is_empty() { "{}" } else { text.as_str() };
            return serde_json::from_str(body).map_err(|e| {
                tracing::warn!(operation = %kind, "undecodable response body: {}", e);
                OperationFailure::other(format!("Malformed response: {}", e))
            });
        }

        let message = error_message(status, &text);
        let failure = OperationFailure::classified(Some(status.as_u16()), message);
        tracing::debug!(
            operation = %kind,
            status = status.as_u16(),
            kind = ?failure.kind,
            "request failed"
        );
        Err(failure)
    }

    fn bearer(access_token: &str) -> Option<BearerToken> {
        BearerToken::from_stored(Some(access_token))
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn login(&self, request: &LoginRequest) -> OperationResult<AuthResponse> {
        self.send(OperationKind::Login, None, request).await
    }

    async fn signup(&self, request: &SignupRequest) -> OperationResult<AuthResponse> {
        self.send(OperationKind::Signup, None, request).await
    }

    async fn refresh(&self, refresh_token: &str) -> OperationResult<RefreshResponse> {
        let body = serde_json::json!({});
        self.send(OperationKind::Refresh, Self::bearer(refresh_token), &body)
            .await
    }

    async fn list_tasks(
        &self,
        access_token: &str,
        request: &ListTasksRequest,
    ) -> OperationResult<ListTasksResponse> {
        self.send(OperationKind::ListTasks, Self::bearer(access_token), request)
            .await
    }

    async fn create_task(
        &self,
        access_token: &str,
        request: &CreateTaskRequest,
    ) -> OperationResult<MessageResponse> {
        self.send(OperationKind::CreateTask, Self::bearer(access_token), request)
            .await
    }

    async fn edit_task(
        &self,
        access_token: &str,
        request: &EditTaskRequest,
    ) -> OperationResult<MessageResponse> {
        self.send(OperationKind::EditTask, Self::bearer(access_token), request)
            .await
    }

    async fn delete_task(
        &self,
        access_token: &str,
        request: &DeleteTaskRequest,
    ) -> OperationResult<MessageResponse> {
        self.send(OperationKind::DeleteTask, Self::bearer(access_token), request)
            .await
    }

    async fn change_password(
        &self,
        access_token: &str,
        request: &ChangePasswordRequest,
    ) -> OperationResult<MessageResponse> {
        self.send(
            OperationKind::ChangePassword,
            Self::bearer(access_token),
            request,
        )
        .await
    }
}
