//! Document Indexer
//!
//! Persists a document and merges its positional postings into both posting
//! tables.

use super::tokenizer::{Token, tokenize};
use crate::error::Result;
use crate::storage::repository::IndexStore;
use crate::storage::types::{DocumentId, Ordinal, PostingTable};

use std::collections::{BTreeMap, BTreeSet};

/// Stores `(title, author)` and indexes `content` under the new document id.
///
/// The document is created first and every token is then merged as an
/// independent store call. There is no rollback: if a merge fails the error is
/// returned and the document stays stored with whatever postings already landed.
pub fn index_document(
    store: &dyn IndexStore,
    title: &str,
    author: &str,
    content: &str,
) -> Result<DocumentId> {
    let document_id = store.create_document(title, author)?;
    let positions = group_by_token(tokenize(content));

    tracing::debug!(
        "Indexing document {} ({}, {}) with {} distinct tokens",
        document_id,
        title,
        author,
        positions.len()
    );

    for (token, ordinals) in positions.iter() {
        store.merge_postings(PostingTable::Exact, token, document_id, ordinals)?;
        store.merge_postings(PostingTable::Lower, &token.to_lowercase(), document_id, ordinals)?;
    }

    Ok(document_id)
}

/// Collects the ordinals of each distinct token.
pub fn group_by_token(tokens: Vec<Token>) -> BTreeMap<String, BTreeSet<Ordinal>> {
    let mut positions: BTreeMap<String, BTreeSet<Ordinal>> = BTreeMap::new();
    for token in tokens {
        positions.entry(token.text).or_default().insert(token.ordinal);
    }
    positions
}
