use super::repository::IndexStore;

use axum::{Extension, http::StatusCode};
use std::sync::Arc;

pub async fn handle_init(
    Extension(store): Extension<Arc<dyn IndexStore>>,
) -> (StatusCode, String) {
    match store.init_schema() {
        Ok(_) => {
            tracing::info!("Storage schema initialized");
            (StatusCode::OK, "App successfully initialized".to_string())
        }
        Err(e) => {
            tracing::error!("Failed to initialize schema: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
    }
}
