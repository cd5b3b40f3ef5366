use crate::storage::types::{DocumentId, Ordinal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relevance of one document for a query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHit {
    /// Sum of the occurrence counts of every matched query term.
    pub score: usize,
    /// Matched terms with their ordinals, in the order the rows were read.
    pub idx: Vec<(String, Vec<Ordinal>)>,
}

/// Relevance results keyed by `document_key`.
pub type SearchResults = BTreeMap<String, SearchHit>;

/// Stable string form of a document's `(title, author)` pair.
pub fn document_key(title: &str, author: &str) -> String {
    format!("({}, {})", title, author)
}

/// The `case` flag as it arrives: a query-string value or any JSON scalar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CaseFlag {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CaseFlag {
    /// Text is truthy unless empty, `false`, `0` or `no`. Numbers are truthy unless zero.
    pub fn is_set(&self) -> bool {
        match self {
            CaseFlag::Bool(value) => *value,
            CaseFlag::Number(value) => *value != 0.0,
            CaseFlag::Text(value) => {
                let value = value.trim();
                !value.is_empty()
                    && !matches!(value.to_ascii_lowercase().as_str(), "false" | "0" | "no")
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub phrase: Option<String>,
    pub case: Option<CaseFlag>,
}

impl SearchParams {
    pub fn case_sensitive(&self) -> bool {
        self.case.as_ref().is_some_and(CaseFlag::is_set)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ExactParams {
    pub phrase: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IndexDocumentRequest {
    pub title: String,
    pub author: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexDocumentResponse {
    pub document_id: DocumentId,
    pub message: String,
}
