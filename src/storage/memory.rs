use super::repository::IndexStore;
use super::types::{Document, DocumentId, DocumentPostings, Ordinal, PostingRow, PostingTable};
use crate::error::{IndexError, Result};

use dashmap::DashMap;
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

/// In-process `IndexStore` backed by sharded concurrent maps.
///
/// Every table is a `DashMap`, so merges into different tokens never contend
/// and a merge into one token is applied under that entry's shard lock.
pub struct InMemoryStore {
    initialized: AtomicBool,
    documents: DashMap<DocumentId, Document>,
    words: DashMap<String, DocumentPostings>,
    lower_words: DashMap<String, DocumentPostings>,
}

impl InMemoryStore {
    /// Creates a store without a schema. Call `init_schema` before use.
    pub fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            documents: DashMap::new(),
            words: DashMap::new(),
            lower_words: DashMap::new(),
        }
    }

    /// Creates a store whose schema is already initialized.
    pub fn initialized() -> Self {
        let store = Self::new();
        store.initialized.store(true, Ordering::SeqCst);
        store
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn token_count(&self, table: PostingTable) -> usize {
        self.table(table).len()
    }

    fn table(&self, table: PostingTable) -> &DashMap<String, DocumentPostings> {
        match table {
            PostingTable::Exact => &self.words,
            PostingTable::Lower => &self.lower_words,
        }
    }

    fn ensure_schema(&self) -> Result<()> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(IndexError::StorageUnavailable(
                "schema not initialized, call /init first".to_string(),
            ))
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexStore for InMemoryStore {
    fn init_schema(&self) -> Result<()> {
        if !self.initialized.swap(true, Ordering::SeqCst) {
            tracing::info!(
                "Created tables: documents, {}, {}",
                PostingTable::Exact.as_str(),
                PostingTable::Lower.as_str()
            );
        } else {
            tracing::debug!("Schema already initialized");
        }
        Ok(())
    }

    fn create_document(&self, title: &str, author: &str) -> Result<DocumentId> {
        self.ensure_schema()?;

        let id = DocumentId::new();
        self.documents.insert(
            id,
            Document {
                id,
                title: title.to_string(),
                author: author.to_string(),
            },
        );

        tracing::debug!("Stored document {} ({}, {})", id, title, author);
        Ok(id)
    }

    fn get_documents_by_ids(&self, ids: &HashSet<DocumentId>) -> Result<Vec<Document>> {
        self.ensure_schema()?;

        Ok(ids
            .iter()
            .filter_map(|id| self.documents.get(id).map(|doc| doc.value().clone()))
            .collect())
    }

    fn merge_postings(
        &self,
        table: PostingTable,
        token: &str,
        document_id: DocumentId,
        ordinals: &BTreeSet<Ordinal>,
    ) -> Result<()> {
        self.ensure_schema()?;

        self.table(table)
            .entry(token.to_string())
            .or_default()
            .entry(document_id)
            .or_default()
            .extend(ordinals.iter().copied());

        tracing::trace!(
            "Merged {} ordinals into {}[{}] for {}",
            ordinals.len(),
            table.as_str(),
            token,
            document_id
        );
        Ok(())
    }

    fn get_postings(&self, table: PostingTable, tokens: &[String]) -> Result<Vec<PostingRow>> {
        self.ensure_schema()?;

        let map = self.table(table);
        let mut seen: HashSet<&str> = HashSet::new();
        let mut rows = Vec::new();

        for token in tokens {
            if !seen.insert(token.as_str()) {
                continue;
            }
            if let Some(postings) = map.get(token) {
                rows.push(PostingRow {
                    token: token.clone(),
                    postings: postings.value().clone(),
                });
            }
        }

        Ok(rows)
    }
}
