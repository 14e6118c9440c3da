//! Backend request and response types.
//!
//! These mirror the JSON shapes of the task-tracking backend. Only the
//! fields the client reads or sends are modeled.

pub mod auth;
pub mod task;

pub use auth::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RefreshResponse, SignupRequest,
    UserProfile,
};
pub use task::{
    count_by_status, CreateTaskRequest, DeleteTaskRequest, EditTaskRequest, ListTasksRequest,
    ListTasksResponse, MessageResponse, Task, TaskCounts, TaskDraft, TaskUpdate,
    COMPLETED_STATUS,
};
