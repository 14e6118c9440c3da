//! Operation kinds and their parameters.

use crate::types::{ChangePasswordRequest, TaskDraft, TaskUpdate};
use std::fmt;

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// The fixed set of named remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Email/password login.
    Login,
    /// Account creation.
    Signup,
    /// Mint a new credential pair from the refresh token.
    Refresh,
    /// List the tasks of the current project.
    ListTasks,
    /// Edit an existing task.
    EditTask,
    /// Create a task in the current project.
    CreateTask,
    /// Delete a task.
    DeleteTask,
    /// Change the account password.
    ChangePassword,
}

impl OperationKind {
    /// Path relative to the configured base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "auth/login",
            Self::Signup => "auth/signup",
            Self::Refresh => "auth/refresh",
            Self::ListTasks => "tasks/list",
            Self::EditTask => "tasks/edit",
            Self::CreateTask => "tasks/create",
            Self::DeleteTask => "tasks/delete",
            Self::ChangePassword => "auth/change-password",
        }
    }

    /// HTTP method used for this kind.
    pub fn method(&self) -> Method {
        match self {
            Self::EditTask => Method::Put,
            Self::DeleteTask => Method::Delete,
            _ => Method::Post,
        }
    }

    /// Whether the request carries the access token and goes through the
    /// refresh-and-retry path. Login, signup and refresh never do.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Login | Self::Signup | Self::Refresh)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Refresh => "refresh",
            Self::ListTasks => "list_tasks",
            Self::EditTask => "edit_task",
            Self::CreateTask => "create_task",
            Self::DeleteTask => "delete_task",
            Self::ChangePassword => "change_password",
        };
        f.write_str(name)
    }
}

/// An authenticated operation together with its parameters.
///
/// Project ids are not part of the parameters; the executor reads them from
/// its [`ProjectStore`](crate::client::project::ProjectStore) at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// List tasks visible to `role` in the current project.
    ListTasks {
        /// Role of the signed-in user.
        role: String,
    },
    /// Create a task in the current project.
    CreateTask(TaskDraft),
    /// Edit a task in the current project.
    EditTask(TaskUpdate),
    /// Delete a task.
    DeleteTask {
        /// Task to delete.
        task_id: String,
    },
    /// Change the account password.
    ChangePassword(ChangePasswordRequest),
}

impl Operation {
    /// The kind of this operation.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::ListTasks { .. } => OperationKind::ListTasks,
            Self::CreateTask(_) => OperationKind::CreateTask,
            Self::EditTask(_) => OperationKind::EditTask,
            Self::DeleteTask { .. } => OperationKind::DeleteTask,
            Self::ChangePassword(_) => OperationKind::ChangePassword,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_session_kinds_skip_auth() {
        let all = [
            OperationKind::Login,
            OperationKind::Signup,
            OperationKind::Refresh,
            OperationKind::ListTasks,
            OperationKind::EditTask,
            OperationKind::CreateTask,
            OperationKind::DeleteTask,
            OperationKind::ChangePassword,
        ];
        let unauthenticated: Vec<_> = all
            .iter()
            .filter(|k| !k.is_authenticated())
            .copied()
            .collect();
        assert_eq!(
            unauthenticated,
            vec![
                OperationKind::Login,
                OperationKind::Signup,
                OperationKind::Refresh
            ]
        );
    }

    #[test]
    fn operation_kinds() {
        assert_eq!(
            Operation::ListTasks {
                role: "admin".into()
            }
            .kind(),
            OperationKind::ListTasks
        );
        assert_eq!(
            Operation::DeleteTask {
                task_id: "t1".into()
            }
            .kind(),
            OperationKind::DeleteTask
        );
        assert_eq!(
            Operation::ChangePassword(ChangePasswordRequest::new("a", "b")).kind(),
            OperationKind::ChangePassword
        );
    }

    #[test]
    fn routes() {
        assert_eq!(OperationKind::EditTask.method(), Method::Put);
        assert_eq!(OperationKind::DeleteTask.method(), Method::Delete);
        assert_eq!(OperationKind::Login.method().to_string(), "POST");
        assert_eq!(OperationKind::Refresh.path(), "auth/refresh");
        assert_eq!(OperationKind::ListTasks.to_string(), "list_tasks");
    }
}
