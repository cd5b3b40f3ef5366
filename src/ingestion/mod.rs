//! Ingestion Service Module
//!
//! Bulk reindexing from the external document source.
//!
//! ## Workflow
//! 1. **Trigger**: `/index` queues a `Task::ReindexAll` and returns immediately.
//! 2. **Fetch**: A worker pulls the full document list from the `DocumentSource`.
//! 3. **Dedup**: Documents repeating an earlier `(title, author)` in the batch are skipped.
//! 4. **Index**: Each remaining document goes through `index_document`.

pub mod coordinator;
pub mod handlers;
pub mod source;
pub mod types;
