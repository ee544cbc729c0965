//! This module contains the definition of the core and the process result enum
use std::fmt;

use getset::{CopyGetters, Getters};
use log::warn;
use serde_derive::{Deserialize, Serialize};

use crate::{
    core::ProcessResult::*,
    error::SchedError,
    task::{Task, TaskClass, TaskState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoreType {
    Performance,
    Efficiency,
}

impl CoreType {
    ///The task class this core type drains from its own wait queue.
    pub fn serves(&self) -> TaskClass {
        match self {
            CoreType::Performance => TaskClass::Heavy,
            CoreType::Efficiency => TaskClass::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CoreType::Performance => "P",
            CoreType::Efficiency => "E",
        }
    }
}

///enum to represent three types of states
///execution not possible because not allocate, execution in progress, execution finished
#[derive(Debug, PartialEq, Clone)]
pub enum ProcessResult {
    Idle,
    Continue,
    Done(Task),
}

#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Core {
    #[getset(get_copy = "pub")]
    core_id: usize,
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    core_type: CoreType,
    #[getset(get_copy = "pub")]
    speed: f64,
    #[getset(get_copy = "pub")]
    energy_multiplier: f64,
    #[getset(get = "pub")]
    processing_task: Option<Task>,
    #[getset(get_copy = "pub")]
    total_work: f64,
    #[getset(get_copy = "pub")]
    energy_used: f64,
    #[getset(get_copy = "pub")]
    busy_cycles: u64,
}

impl Core {
    pub fn new(
        core_id: usize,
        name: &str,
        core_type: CoreType,
        speed: f64,
        energy_multiplier: f64,
    ) -> Self {
        Self {
            core_id,
            name: name.to_string(),
            core_type,
            speed,
            energy_multiplier,
            processing_task: None,
            total_work: 0.0,
            energy_used: 0.0,
            busy_cycles: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.processing_task.is_none()
    }

    ///A busy core refuses the task and hands it back inside the error.
    pub fn allocate(&mut self, mut task: Task) -> Result<(), SchedError> {
        if !self.is_idle() {
            warn!("Core {} is already allocated to a task", self.name);
            return Err(SchedError::CoreBusy {
                core: self.name.clone(),
                task: Box::new(task),
            });
        }
        task.state = TaskState::Running;
        self.processing_task = Some(task);
        Ok(())
    }

    ///Drains up to `speed` work units from the allocated task and charges
    ///energy for the work actually done. The task is detached in the same
    ///call that brings its remaining work to zero.
    pub fn process(&mut self) -> ProcessResult {
        let task = match self.processing_task.as_mut() {
            Some(task) => task,
            None => return Idle,
        };
        let work_done = task.remaining.min(self.speed);
        task.remaining -= work_done;
        self.total_work += work_done;
        self.energy_used += work_done * self.energy_multiplier;
        self.busy_cycles += 1;

        if !task.is_complete() {
            return Continue;
        }
        task.remaining = 0.0;
        task.state = TaskState::Completed;
        self.processing_task.take().map_or(Idle, Done)
    }

    pub fn remaining_work(&self) -> f64 {
        self.processing_task
            .as_ref()
            .map_or(0.0, |task| task.remaining)
    }
}

impl fmt::Display for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.processing_task {
            Some(task) => write!(f, "{}-{} [{}]", self.name, self.core_type.label(), task),
            None => write!(f, "{}-{} [None]", self.name, self.core_type.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn create_perf_core() -> Core {
        Core::new(0, "P1", CoreType::Performance, 1.5, 1.33)
    }

    fn create_eff_core() -> Core {
        Core::new(1, "E1", CoreType::Efficiency, 1.0, 1.0)
    }

    #[test]
    fn test_core_new_params() {
        let core = create_perf_core();
        assert!(core.is_idle());
        assert_eq!(core.processing_task(), &None);
        assert_eq!(core.energy_used(), 0.0);
        assert_eq!(core.busy_cycles(), 0);
        assert_eq!(core.core_type().serves(), TaskClass::Heavy);
    }

    #[test]
    fn test_core_allocate_normal() {
        let mut core = create_eff_core();
        assert!(core.allocate(Task::new("B", 2.0)).is_ok());
        assert!(!core.is_idle());
        assert_eq!(
            core.processing_task().as_ref().map(|task| task.state),
            Some(TaskState::Running)
        );
    }

    #[test]
    fn test_core_allocate_already_allocated() {
        let mut core = create_eff_core();
        core.allocate(Task::new("B", 2.0)).unwrap();
        match core.allocate(Task::new("C", 1.0)) {
            Err(SchedError::CoreBusy { core: name, task }) => {
                assert_eq!(name, "E1");
                assert_eq!(task.name, "C");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // The running task is untouched.
        assert_eq!(core.processing_task().as_ref().unwrap().name, "B");
    }

    #[test]
    fn test_core_process_no_allocated() {
        let mut core = create_perf_core();
        assert_eq!(core.process(), Idle);
        assert_eq!(core.energy_used(), 0.0);
        assert_eq!(core.busy_cycles(), 0);
    }

    #[test]
    fn test_core_process_normal() {
        let mut core = create_perf_core();
        core.allocate(Task::new("A", 5.0)).unwrap();
        assert_eq!(core.process(), Continue);
        assert!((core.remaining_work() - 3.5).abs() < EPSILON);
        assert!((core.energy_used() - 1.5 * 1.33).abs() < EPSILON);
    }

    #[test]
    fn test_core_process_when_finished() {
        let mut core = create_perf_core();
        core.allocate(Task::new("A", 5.0)).unwrap();
        for _ in 0..3 {
            assert_eq!(core.process(), Continue);
        }
        match core.process() {
            Done(task) => {
                assert_eq!(task.name, "A");
                assert_eq!(task.remaining, 0.0);
                assert_eq!(task.state, TaskState::Completed);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(core.is_idle());
        assert_eq!(core.busy_cycles(), 4);
        assert_eq!(core.total_work(), 5.0);
        // Energy follows work, not time: the last cycle only drained 0.5.
        assert!((core.energy_used() - 5.0 * 1.33).abs() < EPSILON);
    }

    #[test]
    fn test_core_process_zero_difficulty() {
        let mut core = create_eff_core();
        core.allocate(Task::new("Nothing", 0.0)).unwrap();
        assert!(matches!(core.process(), Done(_)));
        assert_eq!(core.energy_used(), 0.0);
    }

    #[test]
    fn test_core_display() {
        let mut core = create_eff_core();
        assert_eq!(core.to_string(), "E1-E [None]");
        core.allocate(Task::new("B", 2.0)).unwrap();
        assert_eq!(core.to_string(), "E1-E [B(Diff:2, Rem:2)]");
    }
}
