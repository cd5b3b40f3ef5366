use axum::{Extension, Router, routing::get};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wordindex::config::NodeConfig;
use wordindex::executor::executor::TaskExecutor;
use wordindex::executor::handlers::handle_get_task_status;
use wordindex::executor::queue::TaskQueue;
use wordindex::executor::registry::TaskHandlerRegistry;
use wordindex::executor::types::TaskKind;
use wordindex::ingestion::coordinator::reindex_all;
use wordindex::ingestion::handlers::handle_index_all;
use wordindex::ingestion::source::{DocumentSource, HttpDocumentSource};
use wordindex::search::handlers::{
    handle_exact, handle_exact_json, handle_index_document, handle_index_document_json,
    handle_search, handle_search_json,
};
use wordindex::storage::handlers::handle_init;
use wordindex::storage::memory::InMemoryStore;
use wordindex::storage::repository::IndexStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = NodeConfig::from_args(&args)?;

    tracing::info!("Document source: {}", config.source_url);

    // 1. Collaborators:
    let store: Arc<dyn IndexStore> = Arc::new(InMemoryStore::new());
    let source: Arc<dyn DocumentSource> =
        Arc::new(HttpDocumentSource::new(config.source_url.clone()));

    // 2. Background reindex:
    let queue = Arc::new(TaskQueue::new(config.queue_capacity));
    let registry = TaskHandlerRegistry::new();

    let task_store = store.clone();
    let task_source = source.clone();
    registry.register(TaskKind::ReindexAll, move |_task| {
        let store = task_store.clone();
        let source = task_source.clone();
        async move {
            reindex_all(source.as_ref(), store.as_ref()).await?;
            Ok(())
        }
    });

    let executor = TaskExecutor::new(
        queue.clone(),
        registry,
        config.worker_count,
        config.retry_policy(),
    );
    executor.start().await;

    // 3. HTTP Router:
    let app = Router::new()
        .route("/init", get(handle_init).post(handle_init))
        .route("/index", get(handle_index_all).post(handle_index_all))
        .route(
            "/documents/index",
            get(handle_index_document).post(handle_index_document_json),
        )
        .route("/search", get(handle_search).post(handle_search_json))
        .route("/exact", get(handle_exact).post(handle_exact_json))
        .route("/task/status/:id", get(handle_get_task_status))
        .layer(Extension(store))
        .layer(Extension(queue));

    // 4. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind_addr);
    tracing::info!("Call /init before indexing or searching");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
