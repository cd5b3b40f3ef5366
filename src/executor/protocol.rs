//! Task API Contracts
//!
//! Response bodies for the task endpoints.

use super::types::{Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};

/// Returned when a task is accepted into the queue.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitTaskResponse {
    pub task_id: TaskId,
    pub message: String,
}

/// Current state of a queued task.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub task_id: TaskId,
    pub task: Task,
    pub status: TaskStatus,
    pub attempts: u32,
    pub last_error: Option<String>,
}
