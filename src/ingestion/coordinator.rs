use super::source::DocumentSource;
use super::types::ReindexSummary;
use crate::search::indexer::index_document;
use crate::storage::repository::IndexStore;

use anyhow::{Context, Result};
use std::collections::HashSet;

/// Fetches the full document list and indexes it.
///
/// A document whose `(title, author)` pair already appeared earlier in the
/// same batch is skipped. The first indexing failure aborts the run; documents
/// indexed before it stay indexed, so a retried run creates them again.
pub async fn reindex_all(source: &dyn DocumentSource, store: &dyn IndexStore) -> Result<ReindexSummary> {
    let documents = source.fetch_all_documents().await?;

    let mut summary = ReindexSummary {
        fetched: documents.len(),
        ..ReindexSummary::default()
    };
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for doc in documents {
        if !seen.insert((doc.title.clone(), doc.author.clone())) {
            tracing::debug!("Skipping duplicate ({}, {})", doc.title, doc.author);
            summary.skipped_duplicates += 1;
            continue;
        }

        index_document(store, &doc.title, &doc.author, &doc.content)
            .with_context(|| format!("Failed to index ({}, {})", doc.title, doc.author))?;
        summary.indexed += 1;
    }

    tracing::info!(
        "Reindex finished: {} fetched, {} indexed, {} duplicates skipped",
        summary.fetched,
        summary.indexed,
        summary.skipped_duplicates
    );

    Ok(summary)
}
