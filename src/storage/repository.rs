//! Storage Collaborator Interface
//!
//! The contract the indexer and both search paths consume. Implementations own
//! their consistency; callers hold no locks of their own.

use super::types::{Document, DocumentId, Ordinal, PostingRow, PostingTable};
use crate::error::Result;

use std::collections::{BTreeSet, HashSet};

/// Persistent inverted index plus document store.
pub trait IndexStore: Send + Sync {
    /// Creates the document store and both posting tables. Idempotent.
    fn init_schema(&self) -> Result<()>;

    /// Persists a new document under a fresh id.
    fn create_document(&self, title: &str, author: &str) -> Result<DocumentId>;

    /// Returns the documents that exist for `ids`, in no particular order.
    fn get_documents_by_ids(&self, ids: &HashSet<DocumentId>) -> Result<Vec<Document>>;

    /// Unions `ordinals` into the `(token, document_id)` posting, creating the row if absent.
    fn merge_postings(
        &self,
        table: PostingTable,
        token: &str,
        document_id: DocumentId,
        ordinals: &BTreeSet<Ordinal>,
    ) -> Result<()>;

    /// Returns one row per distinct token that has postings, in first-occurrence order of `tokens`.
    fn get_postings(&self, table: PostingTable, tokens: &[String]) -> Result<Vec<PostingRow>>;
}
