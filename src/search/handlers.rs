use super::engine::{exact, search};
use super::indexer::index_document;
use super::types::{ExactParams, IndexDocumentRequest, IndexDocumentResponse, SearchParams};
use crate::error::{IndexError, MISSING_PHRASE_MESSAGE};
use crate::storage::repository::IndexStore;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

pub async fn handle_search(
    Extension(store): Extension<Arc<dyn IndexStore>>,
    Query(params): Query<SearchParams>,
) -> Response {
    run_search(store.as_ref(), params)
}

pub async fn handle_search_json(
    Extension(store): Extension<Arc<dyn IndexStore>>,
    Json(params): Json<SearchParams>,
) -> Response {
    run_search(store.as_ref(), params)
}

pub async fn handle_exact(
    Extension(store): Extension<Arc<dyn IndexStore>>,
    Query(params): Query<ExactParams>,
) -> Response {
    run_exact(store.as_ref(), params)
}

pub async fn handle_exact_json(
    Extension(store): Extension<Arc<dyn IndexStore>>,
    Json(params): Json<ExactParams>,
) -> Response {
    run_exact(store.as_ref(), params)
}

pub async fn handle_index_document(
    Extension(store): Extension<Arc<dyn IndexStore>>,
    Query(req): Query<IndexDocumentRequest>,
) -> Response {
    run_index_document(store.as_ref(), req)
}

pub async fn handle_index_document_json(
    Extension(store): Extension<Arc<dyn IndexStore>>,
    Json(req): Json<IndexDocumentRequest>,
) -> Response {
    run_index_document(store.as_ref(), req)
}

fn run_search(store: &dyn IndexStore, params: SearchParams) -> Response {
    let case_sensitive = params.case_sensitive();
    let Some(phrase) = non_empty(params.phrase) else {
        return missing_phrase();
    };

    match search(store, &phrase, case_sensitive) {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(e) => failure_response("search", e),
    }
}

fn run_exact(store: &dyn IndexStore, params: ExactParams) -> Response {
    let Some(phrase) = non_empty(params.phrase) else {
        return missing_phrase();
    };

    match exact(store, &phrase) {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(e) => failure_response("exact", e),
    }
}

fn run_index_document(store: &dyn IndexStore, req: IndexDocumentRequest) -> Response {
    match index_document(store, &req.title, &req.author, &req.content) {
        Ok(document_id) => {
            tracing::info!("Indexed document {} ({}, {})", document_id, req.title, req.author);
            (
                StatusCode::OK,
                Json(IndexDocumentResponse {
                    document_id,
                    message: "Document successfully indexed".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => failure_response("index_document", e),
    }
}

fn non_empty(phrase: Option<String>) -> Option<String> {
    phrase.filter(|p| !p.trim().is_empty())
}

fn missing_phrase() -> Response {
    (StatusCode::OK, MISSING_PHRASE_MESSAGE).into_response()
}

fn failure_response(operation: &str, err: IndexError) -> Response {
    match err {
        IndexError::MissingParameter(_) => (StatusCode::OK, err.to_string()).into_response(),
        IndexError::StorageUnavailable(_) => {
            tracing::error!("{} failed: {}", operation, err);
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string()).into_response()
        }
    }
}
