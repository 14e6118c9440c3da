//! # taskdesk
//!
//! Client core for the Taskdesk task-tracking backend.
//!
//! The crate's job is to run remote operations with a bearer credential
//! attached, recover from an expired credential by refreshing it and
//! retrying exactly once, and publish every outcome into an observable
//! per-operation state that screens render from.
//!
//! ```rust,no_run
//! use taskdesk::{ClientConfig, Executor, LoginRequest};
//!
//! # async fn example() -> taskdesk::Result<()> {
//! let config = ClientConfig::new("https://tasks.example.com/api/")?
//!     .with_credentials_path("/data/taskdesk/credentials.toml");
//! let executor = Executor::from_config(config)?;
//!
//! let mut logged_in = executor.session().subscribe();
//! executor.login(LoginRequest::new("ada@example.com", "hunter2")).await;
//! if executor.states().login.consume_success() {
//!     executor.list_tasks("member").await;
//! }
//! # let _ = logged_in.changed().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod client;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod types;

pub use client::{
    ClientConfig, CredentialPair, CredentialStore, Executor, FileCredentialStore, HttpTaskApi,
    InMemoryCredentialStore, InMemoryProjectStore, Operation, OperationKind, OperationState,
    OperationStates, ProjectStore, SessionEvent, SessionState, StateCell, TaskApi,
};
pub use error::{
    Error, FailureKind, OperationFailure, OperationResult, Result, AUTH_EXPIRED_PHRASES,
};
pub use types::{
    count_by_status, AuthResponse, ChangePasswordRequest, ListTasksResponse, LoginRequest,
    MessageResponse, SignupRequest, Task, TaskCounts, TaskDraft, TaskUpdate,
};
