//! Task wire types and derived task statistics.

use serde::{Deserialize, Serialize};

/// Status value the backend uses for finished tasks.
pub const COMPLETED_STATUS: &str = "Completed";

/// A task as returned by the list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Backend task identifier.
    #[serde(default)]
    pub id: String,
    /// Short title.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Due date as sent by the backend.
    #[serde(default)]
    pub due_date: String,
    /// Status string; see [`COMPLETED_STATUS`].
    #[serde(default)]
    pub status: String,
    /// Assignee identifier or email.
    #[serde(default)]
    pub assignee: String,
}

impl Task {
    /// Returns `true` if the task's status is exactly [`COMPLETED_STATUS`].
    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED_STATUS
    }
}

/// Open/completed tally over a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    /// Tasks with any status other than [`COMPLETED_STATUS`].
    pub open: usize,
    /// Tasks with status [`COMPLETED_STATUS`].
    pub completed: usize,
    /// `open + completed`.
    pub total: usize,
}

/// Count tasks by status.
///
/// Unknown and empty statuses count as open.
///
/// # Examples
///
/// ```
/// use taskdesk::types::{count_by_status, Task, TaskCounts};
///
/// let tasks = vec![
///     Task { status: "Completed".into(), ..Default::default() },
///     Task { status: "Open".into(), ..Default::default() },
///     Task { status: "".into(), ..Default::default() },
/// ];
/// assert_eq!(count_by_status(&tasks), TaskCounts { open: 2, completed: 1, total: 3 });
/// ```
pub fn count_by_status(tasks: &[Task]) -> TaskCounts {
    let completed = tasks.iter().filter(|t| t.is_completed()).count();
    let open = tasks.len() - completed;
    TaskCounts {
        open,
        completed,
        total: open + completed,
    }
}

/// Request for the task list of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksRequest {
    /// Role of the signed-in user.
    pub role: String,
    /// Project to list.
    pub project_id: String,
}

/// Task list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksResponse {
    /// Backend message.
    #[serde(default)]
    pub message: String,
    /// Tasks in the project.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Comma-separated status vocabulary.
    #[serde(default)]
    pub statuses: String,
}

impl ListTasksResponse {
    /// Split the comma-separated status vocabulary, trimming whitespace and
    /// dropping empty entries.
    pub fn status_vocabulary(&self) -> Vec<String> {
        self.statuses
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Count the listed tasks by status.
    pub fn counts(&self) -> TaskCounts {
        count_by_status(&self.tasks)
    }
}

/// Fields of a new task, before a project is attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Short title.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Due date.
    pub due_date: String,
    /// Initial status.
    pub status: String,
    /// Assignee.
    pub assignee: String,
}

/// Create-task request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Short title.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Due date.
    pub due_date: String,
    /// Initial status.
    pub status: String,
    /// Owning project.
    pub project_id: String,
    /// Assignee.
    pub assignee: String,
}

impl CreateTaskRequest {
    /// Attach a project to a draft.
    pub fn from_draft(draft: TaskDraft, project_id: impl Into<String>) -> Self {
        Self {
            name: draft.name,
            description: draft.description,
            due_date: draft.due_date,
            status: draft.status,
            project_id: project_id.into(),
            assignee: draft.assignee,
        }
    }
}

/// Editable fields of an existing task, before a project is attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    /// Task to edit.
    pub task_id: String,
    /// New due date.
    pub due_date: String,
    /// New status.
    pub status: String,
    /// New assignee.
    pub assignee: String,
}

/// Edit-task request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTaskRequest {
    /// Task to edit.
    pub task_id: String,
    /// New due date.
    pub due_date: String,
    /// New status.
    pub status: String,
    /// Owning project.
    pub project_id: String,
    /// New assignee.
    pub assignee: String,
}

impl EditTaskRequest {
    /// Attach a project to an update.
    pub fn from_update(update: TaskUpdate, project_id: impl Into<String>) -> Self {
        Self {
            task_id: update.task_id,
            due_date: update.due_date,
            status: update.status,
            project_id: project_id.into(),
            assignee: update.assignee,
        }
    }
}

/// Delete-task request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskRequest {
    /// Task to delete.
    pub task_id: String,
}

/// Response carrying only a backend message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Backend message.
    #[serde(default)]
    pub message: String,
}
