//! Positional Inverted Index Library
//!
//! This library crate defines the modules behind the `wordindex` binary (`main.rs`).
//!
//! ## Architecture Modules
//! - **`search`**: The core engine. Tokenizes content, merges positional postings into
//!   an exact-case and a lowercased table, and answers relevance and exact-phrase queries.
//! - **`storage`**: The `IndexStore` collaborator interface and its in-memory implementation.
//! - **`ingestion`**: Bulk reindexing from an external document source with per-batch
//!   `(title, author)` dedup.
//! - **`executor`**: A bounded background task queue and worker pool with a retry ceiling.
//! - **`config`**: Node settings from command line flags and environment variables.
//! - **`error`**: Error types shared by the core APIs.

pub mod config;
pub mod error;
pub mod executor;
pub mod ingestion;
pub mod search;
pub mod storage;
