//! Ingestion Data Types
//!
//! Wire format of the external document source and the summary of a bulk
//! reindex run.

use serde::{Deserialize, Serialize};

/// One document as served by the document source. Content is consumed by the
/// indexer and not stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceDocument {
    pub title: String,
    pub author: String,
    pub content: String,
}

/// Response body of the document source endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentBatch {
    pub documents: Vec<SourceDocument>,
}

/// Outcome of one `reindex_all` run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReindexSummary {
    /// Documents returned by the source.
    pub fetched: usize,
    /// Documents passed to the indexer.
    pub indexed: usize,
    /// Documents skipped because their `(title, author)` was already seen in the batch.
    pub skipped_duplicates: usize,
}
