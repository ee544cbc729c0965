//! This module contains the definition of the task and its routing class
use std::fmt;

use serde_derive::{Deserialize, Serialize};

///Lifecycle of a task. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Queued,
    Running,
    Completed,
}

///Routing tag decided by the difficulty threshold.
///Cores declare which class they natively serve (see `CoreType::serves`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskClass {
    Heavy,
    Light,
}

impl TaskClass {
    pub fn classify(difficulty: f64, threshold: f64) -> Self {
        if difficulty > threshold {
            TaskClass::Heavy
        } else {
            TaskClass::Light
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub name: String,
    pub difficulty: f64,
    pub remaining: f64,
    pub state: TaskState,
    pub core_name: Option<String>,
    pub start_cycle: Option<u64>,
    pub finish_cycle: Option<u64>,
}

impl Task {
    pub fn new(name: &str, difficulty: f64) -> Self {
        Self {
            name: name.to_string(),
            difficulty,
            remaining: difficulty,
            state: TaskState::Queued,
            core_name: None,
            start_cycle: None,
            finish_cycle: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn work_done(&self) -> f64 {
        self.difficulty - self.remaining
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(Diff:{}, Rem:{})",
            self.name, self.difficulty, self.remaining
        )
    }
}
