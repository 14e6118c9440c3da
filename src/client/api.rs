//! The operation client interface.
//!
//! [`TaskApi`] issues exactly one remote call per method and reports every
//! failure as a classified [`OperationFailure`](crate::OperationFailure). It
//! never retries and never touches credential storage; both are the
//! executor's job.

use crate::error::OperationResult;
use crate::types::{
    AuthResponse, ChangePasswordRequest, CreateTaskRequest, DeleteTaskRequest, EditTaskRequest,
    ListTasksRequest, ListTasksResponse, LoginRequest, MessageResponse, RefreshResponse,
    SignupRequest,
};
use async_trait::async_trait;

/// One remote call per operation kind.
///
/// Authenticated methods take the access token to attach as a bearer
/// credential; an empty token is sent without an `Authorization` header.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Log in with email and password.
    async fn login(&self, request: &LoginRequest) -> OperationResult<AuthResponse>;

    /// Create an account.
    async fn signup(&self, request: &SignupRequest) -> OperationResult<AuthResponse>;

    /// Exchange the refresh token for a new credential pair.
    async fn refresh(&self, refresh_token: &str) -> OperationResult<RefreshResponse>;

    /// List tasks of a project.
    async fn list_tasks(
        &self,
        access_token: &str,
        request: &ListTasksRequest,
    ) -> OperationResult<ListTasksResponse>;

    /// Create a task.
    async fn create_task(
        &self,
        access_token: &str,
        request: &CreateTaskRequest,
    ) -> OperationResult<MessageResponse>;

    /// Edit a task.
    async fn edit_task(
        &self,
        access_token: &str,
        request: &EditTaskRequest,
    ) -> OperationResult<MessageResponse>;

    /// Delete a task.
    async fn delete_task(
        &self,
        access_token: &str,
        request: &DeleteTaskRequest,
    ) -> OperationResult<MessageResponse>;

    /// Change the account password.
    async fn change_password(
        &self,
        access_token: &str,
        request: &ChangePasswordRequest,
    ) -> OperationResult<MessageResponse>;
}
