use crate::executor::protocol::SubmitTaskResponse;
use crate::executor::queue::TaskQueue;
use crate::executor::types::Task;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

/// Queues a full reindex and returns without waiting for it.
pub async fn handle_index_all(Extension(queue): Extension<Arc<TaskQueue>>) -> Response {
    match queue.submit(Task::ReindexAll) {
        Ok(task_id) => {
            tracing::info!("Reindex scheduled as task {}", task_id.0);
            (
                StatusCode::ACCEPTED,
                Json(SubmitTaskResponse {
                    task_id,
                    message: "Indexing all documents".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to schedule reindex: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}
