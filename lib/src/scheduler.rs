use std::collections::VecDeque;

use getset::{CopyGetters, Getters};
use log::{debug, info, log_enabled, warn, Level};
use serde_derive::{Deserialize, Serialize};

use crate::{
    config::SimulatorConfig,
    core::{Core, ProcessResult},
    error::SchedError,
    heterogeneous::HeterogeneousProcessor,
    processor::ProcessorBase,
    task::{Task, TaskClass},
};

///Order in which queues whose own pool is empty are offered to the other pools.
const FALLBACK_ORDER: [TaskClass; 2] = [TaskClass::Light, TaskClass::Heavy];

#[derive(Debug, Clone, Default)]
pub struct WaitQueues {
    perf: VecDeque<Task>,
    eff: VecDeque<Task>,
}

impl WaitQueues {
    pub fn get(&self, class: TaskClass) -> &VecDeque<Task> {
        match class {
            TaskClass::Heavy => &self.perf,
            TaskClass::Light => &self.eff,
        }
    }

    pub fn get_mut(&mut self, class: TaskClass) -> &mut VecDeque<Task> {
        match class {
            TaskClass::Heavy => &mut self.perf,
            TaskClass::Light => &mut self.eff,
        }
    }

    pub fn len(&self) -> usize {
        self.perf.len() + self.eff.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perf.is_empty() && self.eff.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.perf.iter().chain(self.eff.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub cycles: u64,
    pub total_energy: f64,
    pub completed_tasks: Vec<String>,
}

///Cycle-stepped scheduler over a performance pool and an efficiency pool.
///
///Tasks are routed once by difficulty: above `threshold` they wait for a
///performance core, otherwise for an efficiency core. A queue is only
///drained by the other pool when its own pool has no cores at all.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Scheduler {
    #[getset(get = "pub")]
    config: SimulatorConfig,
    backlog: Vec<Task>,
    #[getset(get = "pub")]
    processor: HeterogeneousProcessor,
    #[getset(get = "pub")]
    wait_queues: WaitQueues,
    #[getset(get_copy = "pub")]
    threshold: f64,
    #[getset(get_copy = "pub")]
    cycle: u64,
    #[getset(get = "pub")]
    completed_tasks: Vec<Task>,
    #[getset(get_copy = "pub")]
    total_tasks: usize,
    #[getset(get_copy = "pub")]
    is_partitioned: bool,
}

impl Scheduler {
    pub fn new(config: &SimulatorConfig) -> Result<Self, SchedError> {
        config.validate()?;
        let backlog = config
            .tasks
            .iter()
            .map(|spec| Task::new(&spec.name, spec.difficulty))
            .collect::<Vec<Task>>();
        Ok(Self {
            config: config.clone(),
            total_tasks: backlog.len(),
            backlog,
            processor: HeterogeneousProcessor::new(config),
            wait_queues: WaitQueues::default(),
            threshold: config.threshold,
            cycle: 0,
            completed_tasks: Vec::new(),
            is_partitioned: false,
        })
    }

    pub fn wait_queue_perf(&self) -> &VecDeque<Task> {
        self.wait_queues.get(TaskClass::Heavy)
    }

    pub fn wait_queue_eff(&self) -> &VecDeque<Task> {
        self.wait_queues.get(TaskClass::Light)
    }

    ///Moves every task of the initial list into its wait queue, keeping input
    ///order within each queue. Allowed once per scheduler.
    pub fn partition_tasks(&mut self) -> Result<(), SchedError> {
        if self.is_partitioned {
            warn!("Tasks have already been partitioned");
            return Err(SchedError::AlreadyPartitioned);
        }
        for task in self.backlog.drain(..) {
            let class = TaskClass::classify(task.difficulty, self.threshold);
            self.wait_queues.get_mut(class).push_back(task);
        }
        self.total_tasks = self.wait_queues.len();
        self.is_partitioned = true;
        info!(
            "Partitioned {} tasks: {} to performance queue, {} to efficiency queue",
            self.total_tasks,
            self.wait_queue_perf().len(),
            self.wait_queue_eff().len()
        );
        Ok(())
    }

    ///A queue is drained by its own pool or, when that pool is empty, by any
    ///other pool through the fallback.
    fn can_drain(&self, class: TaskClass) -> bool {
        self.processor.has_cores_serving(class) || self.processor.get_number_of_cores() > 0
    }

    pub fn check_feasibility(&self) -> Result<(), SchedError> {
        let blocked = FALLBACK_ORDER
            .iter()
            .any(|&class| !self.wait_queues.get(class).is_empty() && !self.can_drain(class));
        let unrouted = !self.backlog.is_empty() && self.processor.get_number_of_cores() == 0;
        if blocked || unrouted {
            let tasks = self.backlog.len() + self.wait_queues.len();
            warn!("{} tasks are pending but no core can process them", tasks);
            return Err(SchedError::NoCoresAvailable { tasks });
        }
        Ok(())
    }

    ///Fills idle cores for the next cycle and returns how many tasks started.
    ///
    ///Each core first takes from the queue of the class it serves. Afterwards,
    ///a non-empty queue whose own pool has no cores is offered to every idle
    ///core of the remaining pools. A pool that exists but is fully busy never
    ///triggers the fallback.
    pub fn dispatch(&mut self) -> usize {
        if !self.processor.has_idle_core() {
            return 0;
        }
        let next_cycle = self.cycle + 1;
        let mut started = 0;

        for core in self.processor.cores_mut() {
            if core.is_idle() {
                let queue = self.wait_queues.get_mut(core.core_type().serves());
                if assign_from_queue(core, queue, next_cycle) {
                    started += 1;
                }
            }
        }

        for class in FALLBACK_ORDER {
            if self.processor.has_cores_serving(class) || self.wait_queues.get(class).is_empty() {
                continue;
            }
            let queue = self.wait_queues.get_mut(class);
            for core in self.processor.cores_mut() {
                if core.is_idle() && assign_from_queue(core, queue, next_cycle) {
                    debug!("Fallback: core {} takes a {:?} task", core.name(), class);
                    started += 1;
                }
            }
        }
        started
    }

    ///Advances the clock by one cycle and processes every core in
    ///performance-then-efficiency order. Returns how many tasks finished.
    pub fn step(&mut self) -> usize {
        self.cycle += 1;
        let mut finished = 0;
        for result in self.processor.process() {
            if let ProcessResult::Done(mut task) = result {
                task.finish_cycle = Some(self.cycle);
                self.completed_tasks.push(task);
                finished += 1;
            }
        }
        self.log_core_status();
        finished
    }

    pub fn is_finished(&self) -> bool {
        self.is_partitioned && self.completed_tasks.len() >= self.total_tasks
    }

    /// Runs the simulation until every task has completed.
    ///
    /// # Returns
    ///
    /// * The number of cycles, the total energy and the names of the tasks in
    ///   completion order.
    ///
    /// # Description
    ///
    /// The tasks are partitioned first unless a previous run already did it, so
    /// a scheduler stopped by a bounded run can be continued to completion.
    /// Each iteration dispatches queued tasks to idle cores and then steps one
    /// cycle; the termination condition is checked after each step.
    ///
    /// # Errors
    ///
    /// * `SchedError::NoCoresAvailable` when tasks are pending but there are no
    ///   cores, which would otherwise never terminate.
    pub fn run_to_completion(&mut self) -> Result<SimulationSummary, SchedError> {
        if !self.is_partitioned {
            self.partition_tasks()?;
        }
        self.check_feasibility()?;
        info!(
            "Starting simulation: {} tasks, {} performance cores, {} efficiency cores",
            self.total_tasks,
            self.processor.perf_cores().len(),
            self.processor.eff_cores().len()
        );

        while !self.is_finished() {
            self.dispatch();
            self.step();
        }

        let summary = self.summary();
        info!(
            "Simulation finished after {} cycles using {:.2} energy",
            summary.cycles, summary.total_energy
        );
        Ok(summary)
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            cycles: self.cycle,
            total_energy: self.total_energy(),
            completed_tasks: self
                .completed_tasks
                .iter()
                .map(|task| task.name.clone())
                .collect(),
        }
    }

    ///Sum of every core's energy. Safe to call at any point of a run.
    pub fn total_energy(&self) -> f64 {
        self.processor.get_total_energy()
    }

    ///Work still to be done by queued, in-flight and not yet partitioned tasks.
    pub fn remaining_work(&self) -> f64 {
        self.backlog.iter().map(|task| task.remaining).sum::<f64>()
            + self.wait_queues.iter().map(|task| task.remaining).sum::<f64>()
            + self.processor.get_in_flight_work()
    }

    ///Heuristic projection of the cycles still needed: remaining work over the
    ///average core speed, truncated, plus one. It ignores the queue affinity
    ///and fallback rules and the per-pool speed differences, so it can be far
    ///from the real count. `None` means no core exists and the work would never
    ///finish.
    pub fn estimate_remaining_cycles(&self) -> Option<u64> {
        let average_speed = self.processor.get_average_speed()?;
        Some((self.remaining_work() / average_speed).floor() as u64 + 1)
    }

    ///Every task owned by the scheduler: completed, running, queued, then not
    ///yet partitioned.
    pub fn all_tasks(&self) -> Vec<&Task> {
        self.completed_tasks
            .iter()
            .chain(
                self.processor
                    .cores()
                    .filter_map(|core| core.processing_task().as_ref()),
            )
            .chain(self.wait_queues.iter())
            .chain(self.backlog.iter())
            .collect()
    }

    fn log_core_status(&self) {
        if log_enabled!(Level::Debug) {
            debug!("Cycle {}", self.cycle);
            for core in self.processor.cores() {
                debug!("  {}", core);
            }
        }
    }
}

fn assign_from_queue(core: &mut Core, queue: &mut VecDeque<Task>, cycle: u64) -> bool {
    let mut task = match queue.pop_front() {
        Some(task) => task,
        None => return false,
    };
    task.core_name = Some(core.name().clone());
    task.start_cycle = Some(cycle);
    match core.allocate(task) {
        Ok(()) => true,
        Err(SchedError::CoreBusy { task, .. }) => {
            let mut task = *task;
            task.core_name = None;
            task.start_cycle = None;
            queue.push_front(task);
            false
        }
        Err(err) => {
            warn!("Unexpected allocation failure on core {}: {}", core.name(), err);
            false
        }
    }
}
