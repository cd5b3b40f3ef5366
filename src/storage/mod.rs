//! Storage Module
//!
//! The document store and the two positional posting tables the search engine
//! reads and writes.
//!
//! ## Core Concepts
//! - **Documents**: `(id, title, author)` records, created once and never updated.
//! - **Posting tables**: `words` keyed by the exact token and `lower_words` keyed by
//!   its lowercased form. Each row maps document ids to the set of ordinals where the
//!   token occurs.
//! - **Merge semantics**: writes are additive set unions, so re-applying the same
//!   postings is a no-op.
//! - **Access**: callers depend on the `IndexStore` trait; `InMemoryStore` is the
//!   bundled implementation.

pub mod handlers;
pub mod memory;
pub mod repository;
pub mod types;
