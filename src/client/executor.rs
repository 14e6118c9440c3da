//! The authenticated operation executor.
//!
//! [`Executor`] runs remote operations on behalf of screens. Results are not
//! returned; they settle into the per-kind [`StateCell`]s exposed by
//! [`Executor::states`].
//!
//! # Refresh and retry
//!
//! Every authenticated operation walks the same state machine:
//!
//! ```text
//! Attempting ──AuthExpired──> RefreshingAfterExpiry ──ok──> Retrying ──> Settled
//!     │                              │
//!     └──success / Other──> Settled  └──refresh failed──> Settled + forced logout
//! ```
//!
//! `Retrying` is only reachable from `RefreshingAfterExpiry`, which is only
//! reachable from `Attempting`, so one execution makes at most two calls to
//! the operation client and at most one refresh. An `AuthExpired` on the
//! retry is terminal.
//!
//! Executions of different kinds run independently. Executions of the same
//! kind are not coalesced; the last one to settle wins.

use super::api::TaskApi;
use super::config::ClientConfig;
use super::credentials::{CredentialPair, CredentialStore, FileCredentialStore};
use super::http::HttpTaskApi;
use super::operation::{Operation, OperationKind};
use super::project::{InMemoryProjectStore, ProjectStore};
use super::session::SessionState;
use super::state::StateCell;
use crate::error::{OperationFailure, OperationResult, Result};
use crate::types::{
    AuthResponse, ChangePasswordRequest, CreateTaskRequest, DeleteTaskRequest, EditTaskRequest,
    ListTasksRequest, ListTasksResponse, LoginRequest, MessageResponse, SignupRequest, TaskDraft,
    TaskUpdate,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// One state cell per operation kind.
#[derive(Debug, Default)]
pub struct OperationStates {
    /// Login.
    pub login: StateCell<AuthResponse>,
    /// Signup.
    pub signup: StateCell<AuthResponse>,
    /// Credential refresh.
    pub refresh: StateCell<CredentialPair>,
    /// Task listing.
    pub list_tasks: StateCell<ListTasksResponse>,
    /// Task edit.
    pub edit_task: StateCell<MessageResponse>,
    /// Task creation.
    pub create_task: StateCell<MessageResponse>,
    /// Task deletion.
    pub delete_task: StateCell<MessageResponse>,
    /// Password change.
    pub change_password: StateCell<MessageResponse>,
}

/// A prepared request that can be sent with an access token.
#[async_trait]
trait AuthenticatedCall: Send + Sync {
    type Output: Send + Sync + 'static;

    async fn invoke(
        &self,
        api: &dyn TaskApi,
        access_token: &str,
    ) -> OperationResult<Self::Output>;
}

#[async_trait]
impl AuthenticatedCall for ListTasksRequest {
    type Output = ListTasksResponse;

    async fn invoke(&self, api: &dyn TaskApi, access_token: &str) -> OperationResult<Self::Output> {
        api.list_tasks(access_token, self).await
    }
}

#[async_trait]
impl AuthenticatedCall for CreateTaskRequest {
    type Output = MessageResponse;

    async fn invoke(&self, api: &dyn TaskApi, access_token: &str) -> OperationResult<Self::Output> {
        api.create_task(access_token, self).await
    }
}

#[async_trait]
impl AuthenticatedCall for EditTaskRequest {
    type Output = MessageResponse;

    async fn invoke(&self, api: &dyn TaskApi, access_token: &str) -> OperationResult<Self::Output> {
        api.edit_task(access_token, self).await
    }
}

#[async_trait]
impl AuthenticatedCall for DeleteTaskRequest {
    type Output = MessageResponse;

    async fn invoke(&self, api: &dyn TaskApi, access_token: &str) -> OperationResult<Self::Output> {
        api.delete_task(access_token, self).await
    }
}

#[async_trait]
impl AuthenticatedCall for ChangePasswordRequest {
    type Output = MessageResponse;

    async fn invoke(&self, api: &dyn TaskApi, access_token: &str) -> OperationResult<Self::Output> {
        api.change_password(access_token, self).await
    }
}

/// Where one execution stands.
enum Phase<T> {
    Attempting,
    RefreshingAfterExpiry,
    Retrying,
    Settled(std::result::Result<T, String>),
}

impl<T> Phase<T> {
    fn name(&self) -> &'static str {
        match self {
            Self::Attempting => "attempting",
            Self::RefreshingAfterExpiry => "refreshing_after_expiry",
            Self::Retrying => "retrying",
            Self::Settled(_) => "settled",
        }
    }
}

/// Message reported when the retried call is rejected again.
fn retry_rejected_message(failure: &OperationFailure) -> String {
    format!(
        "Authentication failed again after refreshing credentials: {}",
        failure.message
    )
}

/// Runs operations with credential attachment and refresh-and-retry.
///
/// Cloning yields another handle to the same executor, states and session.
#[derive(Clone)]
pub struct Executor {
    api: Arc<dyn TaskApi>,
    session: SessionState,
    projects: Arc<dyn ProjectStore>,
    states: Arc<OperationStates>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("session", &self.session)
            .field("current_project", &self.projects.current_project())
            .finish()
    }
}

impl Executor {
    /// Create an executor. Credentials are read from and written to the
    /// session's credential store.
    pub fn new(
        api: Arc<dyn TaskApi>,
        session: SessionState,
        projects: Arc<dyn ProjectStore>,
    ) -> Self {
        Self {
            api,
            session,
            projects,
            states: Arc::new(OperationStates::default()),
        }
    }

    /// Assemble an executor over HTTP with file-backed credentials and an
    /// in-memory project selection.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let store: Arc<dyn CredentialStore> = match &config.credentials_path {
            Some(path) => Arc::new(FileCredentialStore::new(path)),
            None => Arc::new(FileCredentialStore::default_location()?),
        };
        let api = HttpTaskApi::new(config)?;
        Ok(Self::new(
            Arc::new(api),
            SessionState::new(store),
            Arc::new(InMemoryProjectStore::new()),
        ))
    }

    /// Per-kind operation state.
    pub fn states(&self) -> &OperationStates {
        &self.states
    }

    /// The session this executor authenticates.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The project selection used to parameterize task calls.
    pub fn projects(&self) -> &Arc<dyn ProjectStore> {
        &self.projects
    }

    fn store(&self) -> &Arc<dyn CredentialStore> {
        self.session.store()
    }

    fn access_token(&self) -> String {
        self.store().access_token().unwrap_or_default()
    }

    /// Log in, persist the credential pair and project selection, and mark
    /// the session authenticated. Never refreshes or retries.
    pub async fn login(&self, request: LoginRequest) {
        self.authenticate(OperationKind::Login, &self.states.login, request)
            .await;
    }

    /// Create an account; behaves like [`login`](Self::login) on success.
    pub async fn signup(&self, request: SignupRequest) {
        self.authenticate(OperationKind::Signup, &self.states.signup, request)
            .await;
    }

    async fn authenticate(
        &self,
        kind: OperationKind,
        cell: &StateCell<AuthResponse>,
        request: LoginRequest,
    ) {
        cell.start();
        let result = match kind {
            OperationKind::Signup => self.api.signup(&request).await,
            _ => self.api.login(&request).await,
        };

        let response = match result {
            Ok(response) => response,
            Err(failure) => {
                tracing::info!(operation = %kind, "authentication rejected: {}", failure);
                cell.fail(failure.message);
                return;
            },
        };

        let Some(pair) = CredentialPair::from_parts(
            Some(response.access_token.clone()),
            Some(response.refresh_token.clone()),
        ) else {
            tracing::warn!(operation = %kind, "backend returned incomplete credentials");
            cell.fail("Backend returned incomplete credentials");
            return;
        };
        if let Err(e) = self.store().save(&pair) {
            tracing::error!(operation = %kind, "failed to store credentials: {}", e);
            cell.fail(format!("Could not store credentials: {}", e));
            return;
        }
        self.projects
            .set_projects(response.default_project_id.clone(), response.projects.clone());
        self.session.set_logged_in();
        tracing::info!(operation = %kind, user = %response.user.id, "authenticated");
        cell.succeed(response);
    }

    /// Clear credentials and end the session.
    pub fn logout(&self) {
        self.session.set_logged_out();
    }

    /// Exchange the stored refresh token for a new credential pair.
    ///
    /// On success the new pair is saved before this returns. On failure the
    /// store is left untouched and the session is not changed; ending the
    /// session is the caller's decision.
    pub async fn refresh(&self) -> OperationResult<CredentialPair> {
        let cell = &self.states.refresh;
        cell.start();
        let result = self.refresh_credentials().await;
        match &result {
            Ok(pair) => cell.succeed(pair.clone()),
            Err(failure) => cell.fail(failure.message.clone()),
        }
        result
    }

    async fn refresh_credentials(&self) -> OperationResult<CredentialPair> {
        let refresh_token = self
            .store()
            .refresh_token()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| OperationFailure::other("No refresh token stored; please log in again"))?;

        let response = self.api.refresh(&refresh_token).await?;
        let pair = CredentialPair::new(response.access_token, response.refresh_token);
        self.store().save(&pair).map_err(|e| {
            tracing::error!("failed to store refreshed credentials: {}", e);
            OperationFailure::other(format!("Could not store refreshed credentials: {}", e))
        })?;
        tracing::debug!("credentials refreshed");
        Ok(pair)
    }

    /// Run one authenticated operation to completion.
    pub async fn execute(&self, operation: Operation) {
        let kind = operation.kind();
        match operation {
            Operation::ListTasks { role } => {
                let cell = &self.states.list_tasks;
                if let Some(project_id) = self.require_project(cell) {
                    let request = ListTasksRequest { role, project_id };
                    self.run(kind, cell, &request).await;
                }
            },
            Operation::CreateTask(draft) => {
                let cell = &self.states.create_task;
                if let Some(project_id) = self.require_project(cell) {
                    let request = CreateTaskRequest::from_draft(draft, project_id);
                    self.run(kind, cell, &request).await;
                }
            },
            Operation::EditTask(update) => {
                let cell = &self.states.edit_task;
                if let Some(project_id) = self.require_project(cell) {
                    let request = EditTaskRequest::from_update(update, project_id);
                    self.run(kind, cell, &request).await;
                }
            },
            Operation::DeleteTask { task_id } => {
                let request = DeleteTaskRequest { task_id };
                self.run(kind, &self.states.delete_task, &request).await;
            },
            Operation::ChangePassword(request) => {
                self.run(kind, &self.states.change_password, &request)
                    .await;
            },
        }
    }

    /// Run an operation as an independent task.
    pub fn spawn(&self, operation: Operation) -> JoinHandle<()> {
        let executor = self.clone();
        tokio::spawn(async move { executor.execute(operation).await })
    }

    /// List tasks of the current project.
    pub async fn list_tasks(&self, role: impl Into<String>) {
        self.execute(Operation::ListTasks { role: role.into() })
            .await;
    }

    /// Create a task in the current project.
    pub async fn create_task(&self, draft: TaskDraft) {
        self.execute(Operation::CreateTask(draft)).await;
    }

    /// Edit a task in the current project.
    pub async fn edit_task(&self, update: TaskUpdate) {
        self.execute(Operation::EditTask(update)).await;
    }

    /// Delete a task.
    pub async fn delete_task(&self, task_id: impl Into<String>) {
        self.execute(Operation::DeleteTask {
            task_id: task_id.into(),
        })
        .await;
    }

    /// Change the account password.
    pub async fn change_password(&self, request: ChangePasswordRequest) {
        self.execute(Operation::ChangePassword(request)).await;
    }

    fn require_project<T>(&self, cell: &StateCell<T>) -> Option<String> {
        let project = self.projects.current_project();
        if project.is_none() {
            cell.start();
            cell.fail("No project selected");
        }
        project
    }

    async fn run<R: AuthenticatedCall>(
        &self,
        kind: OperationKind,
        cell: &StateCell<R::Output>,
        request: &R,
    ) {
        debug_assert!(kind.is_authenticated(), "{} does not carry a credential", kind);
        cell.start();

        let mut forced_logout = None;
        let mut phase = Phase::Attempting;
        let outcome = loop {
            tracing::debug!(operation = %kind, phase = phase.name(), "executing");
            phase = match phase {
                Phase::Attempting => match request.invoke(&*self.api, &self.access_token()).await {
                    Err(failure) if failure.is_auth_expired() => {
                        tracing::debug!(operation = %kind, "credential expired: {}", failure);
                        Phase::RefreshingAfterExpiry
                    },
                    result => Phase::Settled(result.map_err(|f| f.message)),
                },
                Phase::RefreshingAfterExpiry => match self.refresh().await {
                    Ok(_) => Phase::Retrying,
                    Err(failure) => {
                        tracing::warn!(operation = %kind, "refresh failed: {}", failure);
                        forced_logout = Some(failure.message.clone());
                        Phase::Settled(Err(failure.message))
                    },
                },
                Phase::Retrying => match request.invoke(&*self.api, &self.access_token()).await {
                    Err(failure) if failure.is_auth_expired() => {
                        tracing::warn!(operation = %kind, "retry rejected after refresh: {}", failure);
                        Phase::Settled(Err(retry_rejected_message(&failure)))
                    },
                    result => Phase::Settled(result.map_err(|f| f.message)),
                },
                Phase::Settled(outcome) => break outcome,
            };
        };

        match outcome {
            Ok(value) => cell.succeed(value),
            Err(message) => cell.fail(message),
        }

        // the cell settles before listeners hear about the logout
        if let Some(reason) = forced_logout {
            self.session.force_logout(reason);
        }
    }
}
