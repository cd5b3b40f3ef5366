//! Search Service Module
//!
//! Builds the positional inverted index and answers queries against it.
//!
//! ## Overview
//! Content is split into whitespace-delimited chunks. Every chunk keeps its ordinal
//! (its position among all chunks), and the chunks that survive normalization become
//! tokens. The indexer merges each token's ordinal set into two posting tables, one
//! keyed by the exact token and one by its lowercased form.
//!
//! ## Responsibilities
//! - **Tokenization**: Tag filtering, punctuation stripping, length and stopword filters.
//! - **Indexing**: Document creation followed by additive posting merges.
//! - **Relevance search**: Term-frequency sum across the query terms.
//! - **Exact search**: Contiguous phrase matching through ordinal adjacency.
//! - **API**: Axum handlers for `/search`, `/exact` and `/documents/index`.
//!
//! ## Submodules
//! - **`tokenizer`**: Chunk normalization rules.
//! - **`indexer`**: `index_document`.
//! - **`engine`**: `search` and `exact`.
//! - **`handlers`**: HTTP request handlers.
//! - **`types`**: Result and request DTOs.

pub mod engine;
pub mod handlers;
pub mod indexer;
pub mod tokenizer;
pub mod types;

#[cfg(test)]
mod tests;
