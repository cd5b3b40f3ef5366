//! Background Task Executor Module
//!
//! Runs long jobs such as the full-corpus reindex outside the request that
//! triggered them.
//!
//! ## Architecture Overview
//! 1. **Submission**: A typed `Task` is queued in the bounded `TaskQueue` and the
//!    caller gets a `TaskId` back immediately.
//! 2. **Execution**: A fixed pool of workers polls the queue and claims ready tasks.
//! 3. **Retries**: A failed attempt goes back to `Pending` with an exponential
//!    backoff delay until `RetryPolicy::max_attempts` is reached, then becomes `Failed`.
//!
//! ## Submodules
//! - **`queue`**: Task state, admission control and retry bookkeeping.
//! - **`executor`**: The worker pool and retry policy.
//! - **`registry`**: Maps each `TaskKind` to executable Rust code.
//! - **`protocol`**: HTTP response bodies.

pub mod executor;
pub mod handlers;
pub mod protocol;
pub mod queue;
pub mod registry;
pub mod types;
