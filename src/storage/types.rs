//! Storage Data Types
//!
//! Records persisted by the storage layer: documents and the rows of the two
//! posting tables.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Zero-based index of a whitespace-delimited chunk in a document's content.
pub type Ordinal = u32;

/// Document id -> ordinals of one token inside that document.
pub type DocumentPostings = BTreeMap<DocumentId, BTreeSet<Ordinal>>;

/// Globally unique document identifier, assigned on creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub uuid::Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored document. Content is not retained once indexed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub author: String,
}

/// The two disjoint posting tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PostingTable {
    /// Keyed by the token exactly as it appeared.
    Exact,
    /// Keyed by the lowercased token.
    Lower,
}

impl PostingTable {
    /// Picks the table a relevance query reads from.
    pub fn for_case(case_sensitive: bool) -> Self {
        if case_sensitive {
            PostingTable::Exact
        } else {
            PostingTable::Lower
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostingTable::Exact => "words",
            PostingTable::Lower => "lower_words",
        }
    }
}

/// One row of a posting table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostingRow {
    pub token: String,
    pub postings: DocumentPostings,
}
