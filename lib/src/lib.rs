//! Cycle-stepped simulation of a heterogeneous pool of performance and
//! efficiency cores draining a task list, with time and energy accounting.
pub mod bounded;
pub mod config;
pub mod core;
pub mod error;
pub mod heterogeneous;
pub mod output_log;
pub mod processor;
pub mod run_log;
pub mod scheduler;
pub mod task;
