//! Worker Pool Implementation
//!
//! A fixed number of workers poll the `TaskQueue`, claim ready tasks and run
//! them through the `TaskHandlerRegistry`.
//!
//! ## Responsibilities
//! - **Polling**: Checking the queue for tasks that are ready to run.
//! - **Execution**: Invoking the handler registered for the task's kind.
//! - **Retries**: Reporting failures back to the queue with a backoff delay until
//!   the policy's attempt ceiling is reached. Non-retriable `IndexError`s fail the
//!   task at once.
//! - **Isolation**: Running each handler in its own tokio task so a panic is
//!   reported as a failed attempt instead of killing the worker.

use super::queue::TaskQueue;
use super::registry::TaskHandlerRegistry;
use super::types::*;
use crate::error::IndexError;

use std::sync::Arc;
use std::time::Duration;

/// How failed tasks are retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry. Doubles on every further attempt.
    pub base_delay_ms: u64,
    /// Upper bound for the doubled delay.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 150,
            max_delay_ms: 1200,
        }
    }
}

impl RetryPolicy {
    /// Backoff before the retry that follows attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> u64 {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self
            .base_delay_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_delay_ms);
        let jitter = if self.base_delay_ms == 0 {
            0
        } else {
            rand::random::<u64>() % 50
        };
        delay + jitter
    }
}

/// The engine that drives task execution.
pub struct TaskExecutor {
    /// Source of tasks.
    queue: Arc<TaskQueue>,
    /// Registry containing the code (closures) for each task kind.
    handlers: Arc<TaskHandlerRegistry>,
    /// Number of concurrent workers.
    worker_count: usize,
    retry: RetryPolicy,
}

impl TaskExecutor {
    pub fn new(
        queue: Arc<TaskQueue>,
        handlers: Arc<TaskHandlerRegistry>,
        worker_count: usize,
        retry: RetryPolicy,
    ) -> Arc<Self> {
        Arc::new(Self {
            queue,
            handlers,
            worker_count: worker_count.max(1),
            retry,
        })
    }

    /// Spawns the workers and returns immediately.
    pub async fn start(self: Arc<Self>) {
        for worker_id in 0..self.worker_count {
            let executor = self.clone();
            tokio::spawn(async move {
                executor.worker_loop(worker_id).await;
            });
        }

        tracing::info!(
            "Task executor started with {} workers (max {} attempts per task)",
            self.worker_count,
            self.retry.max_attempts
        );
    }

    async fn worker_loop(&self, worker_id: usize) {
        tracing::info!("Worker {} started", worker_id);

        loop {
            if !self.run_next(worker_id).await {
                // Sleep if no work to avoid busy-waiting
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }

    /// Claims and runs at most one ready task. Returns `false` if nothing was claimed.
    pub async fn run_next(&self, worker_id: usize) -> bool {
        for (task_id, entry) in self.queue.ready_tasks() {
            match self.queue.try_claim_task(&task_id) {
                Ok(true) => {
                    tracing::info!(
                        "Worker {} claimed task {} ({:?})",
                        worker_id,
                        task_id.0,
                        entry.task.kind()
                    );
                    self.execute(&task_id, &entry.task).await;
                    return true;
                }
                Ok(false) => {
                    tracing::trace!("Task {} already claimed by another worker", task_id.0);
                }
                Err(e) => {
                    tracing::warn!("Failed to claim task {}: {}", task_id.0, e);
                }
            }
        }

        false
    }

    async fn execute(&self, task_id: &TaskId, task: &Task) {
        let handlers = self.handlers.clone();
        let owned_task = task.clone();
        let handle = tokio::spawn(async move { handlers.execute(&owned_task).await });
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("Task handler aborted: {}", e)),
        };

        let attempts = self
            .queue
            .get_task(task_id)
            .map(|entry| entry.attempts)
            .unwrap_or(self.retry.max_attempts);
        let retry_delay_ms = self.retry.delay_for(attempts);

        let max_attempts = match &result {
            Err(e) if !is_retriable(e) => {
                tracing::warn!("Task {} hit a non-retriable error", task_id.0);
                attempts
            }
            _ => self.retry.max_attempts,
        };

        match self
            .queue
            .complete_task(task_id, result, max_attempts, retry_delay_ms)
        {
            Ok(status) => {
                tracing::debug!("Task {} is now {:?}", task_id.0, status);
            }
            Err(e) => {
                tracing::error!("Failed to complete task {}: {}", task_id.0, e);
            }
        }
    }
}

/// Errors that are not an `IndexError` (network, source, panics) are retried.
fn is_retriable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<IndexError>()
        .map_or(true, IndexError::is_retriable)
}
