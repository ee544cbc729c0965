//! Error kinds raised by the heterogeneous scheduler.
use thiserror::Error;

use crate::task::Task;

#[derive(Debug, Error)]
pub enum SchedError {
    /// Tasks were given but neither core pool has any core.
    #[error("no cores available to process tasks ({tasks} tasks queued)")]
    NoCoresAvailable { tasks: usize },

    #[error("task {task} has invalid difficulty {difficulty}")]
    InvalidDifficulty { task: String, difficulty: f64 },

    #[error("invalid core parameter {name}: {value}")]
    InvalidCoreParameter { name: String, value: f64 },

    /// The rejected task is handed back so the caller can requeue it.
    #[error("core {core} is busy, cannot accept task {}", .task.name)]
    CoreBusy { core: String, task: Box<Task> },

    #[error("tasks have already been partitioned into the wait queues")]
    AlreadyPartitioned,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
