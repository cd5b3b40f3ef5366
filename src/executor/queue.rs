//! Task Queue
//!
//! Bounded, in-process store of background tasks and their execution state.
//!
//! ## Responsibilities
//! - **Admission**: Rejecting submissions once `capacity` unfinished tasks are queued.
//! - **Claiming**: Atomically moving a ready task from `Pending` to `Running`.
//! - **Retry bookkeeping**: Re-queueing failed attempts with a delay until the
//!   attempt ceiling, then marking the task `Failed`.
//! - **Retention**: Keeping only the most recently finished tasks for status lookups.

use super::types::*;

use anyhow::Result;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Finished tasks kept for `/task/status` lookups.
pub const DEFAULT_RETAINED_FINISHED: usize = 128;

/// The central component managing task state.
pub struct TaskQueue {
    /// `Task ID -> TaskEntry`.
    tasks: DashMap<TaskId, TaskEntry>,
    /// Maximum number of tasks that are `Pending` or `Running` at once.
    capacity: usize,
    /// Ids of `Completed`/`Failed` tasks, oldest first.
    finished: Mutex<VecDeque<TaskId>>,
    retained_finished: usize,
}

impl TaskQueue {
    pub fn new(capacity: usize) -> Self {
        Self::with_retention(capacity, DEFAULT_RETAINED_FINISHED)
    }

    pub fn with_retention(capacity: usize, retained_finished: usize) -> Self {
        Self {
            tasks: DashMap::new(),
            capacity,
            finished: Mutex::new(VecDeque::new()),
            retained_finished,
        }
    }

    /// Queues a new task and returns its id.
    ///
    /// Fails when the queue already holds `capacity` unfinished tasks.
    pub fn submit(&self, task: Task) -> Result<TaskId> {
        self.prune_finished();

        let (pending, running, _, _) = self.status_counts();
        if pending + running >= self.capacity {
            tracing::warn!("Task queue full ({} unfinished tasks)", pending + running);
            return Err(anyhow::anyhow!(
                "Task queue is full (capacity {})",
                self.capacity
            ));
        }

        let task_id = TaskId::new();
        tracing::info!("Queued task {} ({:?})", task_id.0, task.kind());
        self.tasks.insert(task_id.clone(), TaskEntry::new(task));

        Ok(task_id)
    }

    /// Tasks a worker may claim right now, oldest first.
    pub fn ready_tasks(&self) -> Vec<(TaskId, TaskEntry)> {
        let now = now_ms();
        let mut tasks: Vec<(TaskId, TaskEntry)> = self
            .tasks
            .iter()
            .filter(|entry| entry.value().is_ready(now))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        tasks.sort_by_key(|(_, entry)| entry.created_at);
        tasks
    }

    /// Attempts to lock a ready task for execution by a worker.
    ///
    /// Sets the status to `Running` and counts the attempt. Returns `false` if
    /// another worker claimed it first or it is not ready.
    pub fn try_claim_task(&self, task_id: &TaskId) -> Result<bool> {
        let Some(mut entry) = self.tasks.get_mut(task_id) else {
            return Err(anyhow::anyhow!("Task not found"));
        };

        if !entry.is_ready(now_ms()) {
            return Ok(false);
        }

        entry.status = TaskStatus::Running;
        entry.attempts += 1;
        tracing::debug!("Claimed task {} (attempt {})", task_id.0, entry.attempts);

        Ok(true)
    }

    /// Records the outcome of an attempt.
    ///
    /// On failure the task goes back to `Pending` with `not_before = now + retry_delay_ms`
    /// unless `max_attempts` is reached, in which case it becomes `Failed`.
    pub fn complete_task(
        &self,
        task_id: &TaskId,
        result: Result<()>,
        max_attempts: u32,
        retry_delay_ms: u64,
    ) -> Result<TaskStatus> {
        let Some(mut entry) = self.tasks.get_mut(task_id) else {
            return Err(anyhow::anyhow!("Task not found"));
        };

        match result {
            Ok(_) => {
                entry.status = TaskStatus::Completed;
                entry.not_before = None;
                tracing::info!("Task {} completed", task_id.0);
            }
            Err(e) => {
                let error = format!("{:#}", e);
                entry.last_error = Some(error.clone());

                if entry.attempts >= max_attempts {
                    entry.status = TaskStatus::Failed { error };
                    entry.not_before = None;
                    tracing::error!(
                        "Task {} failed after {} attempts: {}",
                        task_id.0,
                        entry.attempts,
                        e
                    );
                } else {
                    entry.status = TaskStatus::Pending;
                    entry.not_before = Some(now_ms() + retry_delay_ms);
                    tracing::warn!(
                        "Task {} attempt {}/{} failed, retrying in {}ms: {}",
                        task_id.0,
                        entry.attempts,
                        max_attempts,
                        retry_delay_ms,
                        e
                    );
                }
            }
        }

        let status = entry.status.clone();
        drop(entry);

        if matches!(status, TaskStatus::Completed | TaskStatus::Failed { .. }) {
            self.finished_ids().push_back(task_id.clone());
        }

        Ok(status)
    }

    /// Drops the oldest finished tasks beyond the retention limit.
    fn prune_finished(&self) {
        let mut finished = self.finished_ids();
        while finished.len() > self.retained_finished {
            if let Some(task_id) = finished.pop_front() {
                self.tasks.remove(&task_id);
            }
        }
    }

    fn finished_ids(&self) -> std::sync::MutexGuard<'_, VecDeque<TaskId>> {
        // The deque holds plain ids, so a poisoned lock is still consistent
        self.finished.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_task(&self, task_id: &TaskId) -> Option<TaskEntry> {
        self.tasks.get(task_id).map(|entry| entry.value().clone())
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `(pending, running, completed, failed)`.
    pub fn status_counts(&self) -> (usize, usize, usize, usize) {
        let mut pending = 0;
        let mut running = 0;
        let mut completed = 0;
        let mut failed = 0;

        for entry in self.tasks.iter() {
            match entry.status {
                TaskStatus::Pending => pending += 1,
                TaskStatus::Running => running += 1,
                TaskStatus::Completed => completed += 1,
                TaskStatus::Failed { .. } => failed += 1,
            }
        }

        (pending, running, completed, failed)
    }
}
