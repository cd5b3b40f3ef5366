use super::protocol::*;
use super::queue::TaskQueue;
use super::types::*;

use axum::{Extension, Json, extract::Path, http::StatusCode};
use std::sync::Arc;

pub async fn handle_get_task_status(
    Extension(queue): Extension<Arc<TaskQueue>>,
    Path(task_id_str): Path<String>,
) -> (StatusCode, Json<Option<TaskStatusResponse>>) {
    let task_id = TaskId(task_id_str);

    match queue.get_task(&task_id) {
        Some(entry) => (
            StatusCode::OK,
            Json(Some(TaskStatusResponse {
                task_id,
                task: entry.task,
                status: entry.status,
                attempts: entry.attempts,
                last_error: entry.last_error,
            })),
        ),
        None => {
            tracing::debug!("Task {} not found", task_id.0);
            (StatusCode::NOT_FOUND, Json(None))
        }
    }
}
