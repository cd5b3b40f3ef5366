//! Task Handler Registry
//!
//! Maps each `TaskKind` to the async closure that performs it, so the queue and
//! the workers stay independent of what the tasks actually do.

use super::types::*;

use anyhow::Result;
use dashmap::DashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a thread-safe, asynchronous task handler function.
pub type TaskHandlerFn =
    Arc<dyn Fn(Task) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

/// Registry holding the mapping between task kinds and their implementation.
pub struct TaskHandlerRegistry {
    handlers: DashMap<TaskKind, TaskHandlerFn>,
}

impl TaskHandlerRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers the handler for `kind`, replacing any previous one.
    pub fn register<F, Fut>(&self, kind: TaskKind, handler: F)
    where
        F: Fn(Task) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        // Box::pin erases the concrete Future type so all handlers share one map.
        let handler_fn: TaskHandlerFn = Arc::new(move |task: Task| {
            Box::pin(handler(task)) as Pin<Box<dyn Future<Output = Result<()>> + Send>>
        });

        self.handlers.insert(kind, handler_fn);

        tracing::info!("Registered task handler: {:?}", kind);
    }

    /// Looks up the handler for the task's kind and runs it.
    pub async fn execute(&self, task: &Task) -> Result<()> {
        let kind = task.kind();

        // Clone the Arc out so no map guard is held across the await.
        let handler_fn = self
            .handlers
            .get(&kind)
            .map(|entry| entry.value().clone());

        match handler_fn {
            Some(handler_fn) => {
                tracing::debug!("Executing task with handler {:?}", kind);
                handler_fn(task.clone()).await
            }
            None => {
                let error = format!("Unknown task handler: {:?}", kind);
                tracing::error!("{}", error);
                Err(anyhow::anyhow!(error))
            }
        }
    }

    pub fn has_handler(&self, kind: TaskKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for TaskHandlerRegistry {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}
