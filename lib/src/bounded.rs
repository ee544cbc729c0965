//! Cycle-capped runs that report partial completion instead of failing.
use log::{info, warn};
use serde_derive::{Deserialize, Serialize};

use crate::scheduler::Scheduler;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedRunResult {
    pub cycles_used: u64,
    pub max_cycles: u64,
    pub tasks_completed: usize,
    pub total_tasks: usize,
    pub completion_rate_percent: f64,
    pub energy_used: f64,
    pub fully_completed: bool,
    pub estimated_remaining_cycles: Option<u64>,
}

pub struct BoundedRunner {
    scheduler: Scheduler,
}

impl BoundedRunner {
    pub fn new(scheduler: Scheduler) -> Self {
        Self { scheduler }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn into_scheduler(self) -> Scheduler {
        self.scheduler
    }

    ///Steps until every task is done or the scheduler clock reaches
    ///`max_cycles`. The cap is absolute, so calling again with a larger cap
    ///resumes where the previous call stopped.
    pub fn run(&mut self, max_cycles: u64) -> BoundedRunResult {
        if !self.scheduler.is_partitioned() {
            // Only fails when already partitioned, which was just checked.
            let _ = self.scheduler.partition_tasks();
        }
        if self.scheduler.check_feasibility().is_err() {
            warn!("No core can make progress; idling until cycle {}", max_cycles);
        }

        while !self.scheduler.is_finished() && self.scheduler.cycle() < max_cycles {
            self.scheduler.dispatch();
            self.scheduler.step();
        }

        let result = self.result(max_cycles);
        info!(
            "Bounded run stopped at cycle {}/{}: {}/{} tasks ({:.1}%), energy {:.2}",
            result.cycles_used,
            result.max_cycles,
            result.tasks_completed,
            result.total_tasks,
            result.completion_rate_percent,
            result.energy_used
        );
        if !result.fully_completed {
            match result.estimated_remaining_cycles {
                Some(cycles) => info!("Simulation incomplete, about {} more cycles needed", cycles),
                None => warn!("Simulation incomplete and cannot finish without cores"),
            }
        }
        result
    }

    fn result(&self, max_cycles: u64) -> BoundedRunResult {
        let tasks_completed = self.scheduler.completed_tasks().len();
        let total_tasks = self.scheduler.total_tasks();
        let completion_rate_percent = if total_tasks == 0 {
            100.0
        } else {
            tasks_completed as f64 / total_tasks as f64 * 100.0
        };
        let fully_completed = tasks_completed >= total_tasks;
        BoundedRunResult {
            cycles_used: self.scheduler.cycle(),
            max_cycles,
            tasks_completed,
            total_tasks,
            completion_rate_percent,
            energy_used: self.scheduler.total_energy(),
            fully_completed,
            estimated_remaining_cycles: if fully_completed {
                Some(0)
            } else {
                self.scheduler.estimate_remaining_cycles()
            },
        }
    }
}
