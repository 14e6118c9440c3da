//! Client side of the task backend.
//!
//! - [`credentials`]: where tokens live
//! - [`session`]: the observable "is authenticated" flag
//! - [`api`] / [`http`]: one remote call per operation kind
//! - [`executor`]: credential attachment, refresh-and-retry, state settling
//! - [`state`]: per-operation UI state cells

pub mod api;
pub mod bearer;
pub mod config;
pub mod credentials;
pub mod executor;
pub mod http;
pub mod operation;
pub mod project;
pub mod session;
pub mod state;

pub use api::TaskApi;
pub use config::ClientConfig;
pub use credentials::{CredentialPair, CredentialStore, FileCredentialStore, InMemoryCredentialStore};
pub use executor::{Executor, OperationStates};
pub use http::HttpTaskApi;
pub use operation::{Operation, OperationKind};
pub use project::{InMemoryProjectStore, ProjectStore};
pub use session::{SessionEvent, SessionState};
pub use state::{OperationState, StateCell};
