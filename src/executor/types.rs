use serde::{Deserialize, Serialize};

/// Unique identifier for a queued task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generates a new random UUID v4-based TaskId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents the lifecycle state of a task in the queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TaskStatus {
    /// Waiting for a worker, either fresh or scheduled for a retry.
    Pending,
    /// Claimed by a worker.
    Running,
    /// Handler returned `Ok`.
    Completed,
    /// Handler kept failing until the retry ceiling was reached.
    Failed { error: String },
}

/// A unit of background work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Task {
    /// Fetch every document from the document source and index it.
    ReindexAll,
}

/// Discriminant used to look up the handler for a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskKind {
    ReindexAll,
}

impl Task {
    pub fn kind(&self) -> TaskKind {
        match self {
            Task::ReindexAll => TaskKind::ReindexAll,
        }
    }
}

/// The queue's record of a task and its execution state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEntry {
    /// The actual work definition.
    pub task: Task,
    /// Current execution status.
    pub status: TaskStatus,
    /// Number of times a worker has started this task.
    pub attempts: u32,
    /// Error of the most recent failed attempt.
    pub last_error: Option<String>,
    /// Timestamp (ms) when the task was submitted.
    pub created_at: u64,
    /// Earliest timestamp (ms) a retry may start.
    pub not_before: Option<u64>,
}

impl TaskEntry {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            status: TaskStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: now_ms(),
            not_before: None,
        }
    }

    /// Pending and past its retry delay.
    pub fn is_ready(&self, now: u64) -> bool {
        self.status == TaskStatus::Pending && self.not_before.map_or(true, |at| now >= at)
    }
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
