use serde_derive::{Deserialize, Serialize};

use crate::{
    bounded::BoundedRunResult,
    core::{Core, CoreType},
    error::SchedError,
    output_log::append_info_to_yaml,
    scheduler::Scheduler,
    task::{Task, TaskClass, TaskState},
};

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProcessorInfo {
    pub number_of_perf_cores: usize,
    pub number_of_eff_cores: usize,
    pub perf_speed: f64,
    pub perf_energy: f64,
    pub eff_speed: f64,
    pub eff_energy: f64,
    pub threshold: f64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TaskLog {
    pub name: String,
    pub difficulty: f64,
    pub remaining: f64,
    pub class: TaskClass,
    pub state: TaskState,
    pub core_name: Option<String>,
    pub start_cycle: Option<u64>,
    pub finish_cycle: Option<u64>,
}

impl TaskLog {
    pub fn new(task: &Task, threshold: f64) -> Self {
        Self {
            name: task.name.clone(),
            difficulty: task.difficulty,
            remaining: task.remaining,
            class: TaskClass::classify(task.difficulty, threshold),
            state: task.state,
            core_name: task.core_name.clone(),
            start_cycle: task.start_cycle,
            finish_cycle: task.finish_cycle,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CoreLog {
    pub core_id: usize,
    pub name: String,
    pub core_type: CoreType,
    pub total_work: f64,
    pub energy_used: f64,
    pub busy_cycles: u64,
    pub utilization: f64,
}

impl CoreLog {
    pub fn new(core: &Core) -> Self {
        Self {
            core_id: core.core_id(),
            name: core.name().clone(),
            core_type: core.core_type(),
            total_work: core.total_work(),
            energy_used: core.energy_used(),
            busy_cycles: core.busy_cycles(),
            utilization: Default::default(),
        }
    }

    pub fn calculate_utilization(&mut self, schedule_length: u64) {
        self.utilization = if schedule_length == 0 {
            0.0
        } else {
            self.busy_cycles as f64 / schedule_length as f64
        };
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProcessorLog {
    pub average_utilization: f64,
    pub variance_utilization: f64,
    pub core_logs: Vec<CoreLog>,
}

impl ProcessorLog {
    pub fn new<'a>(cores: impl Iterator<Item = &'a Core>) -> Self {
        Self {
            average_utilization: Default::default(),
            variance_utilization: Default::default(),
            core_logs: cores.map(CoreLog::new).collect(),
        }
    }

    pub fn calculate_cores_utilization(&mut self, schedule_length: u64) {
        for core_log in self.core_logs.iter_mut() {
            core_log.calculate_utilization(schedule_length);
        }
    }

    pub fn calculate_average_utilization(&mut self) {
        if self.core_logs.is_empty() {
            return;
        }
        self.average_utilization = self
            .core_logs
            .iter()
            .map(|core_log| core_log.utilization)
            .sum::<f64>()
            / self.core_logs.len() as f64;
    }

    pub fn calculate_variance_utilization(&mut self) {
        if self.core_logs.is_empty() {
            return;
        }
        self.variance_utilization = self
            .core_logs
            .iter()
            .map(|core_log| (core_log.utilization - self.average_utilization).powi(2))
            .sum::<f64>()
            / self.core_logs.len() as f64;
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SimulationLog {
    pub cycles: u64,
    pub total_energy: f64,
    pub tasks_completed: usize,
    pub total_tasks: usize,
    pub processor_info: ProcessorInfo,
    pub processor_log: ProcessorLog,
    pub task_logs: Vec<TaskLog>,
}

impl SimulationLog {
    pub fn new(scheduler: &Scheduler) -> Self {
        let config = scheduler.config();
        let processor = scheduler.processor();
        let processor_info = ProcessorInfo {
            number_of_perf_cores: processor.perf_cores().len(),
            number_of_eff_cores: processor.eff_cores().len(),
            perf_speed: config.perf_speed,
            perf_energy: config.perf_energy,
            eff_speed: config.eff_speed,
            eff_energy: config.eff_energy,
            threshold: config.threshold,
        };

        let mut processor_log = ProcessorLog::new(processor.cores());
        processor_log.calculate_cores_utilization(scheduler.cycle());
        processor_log.calculate_average_utilization();
        processor_log.calculate_variance_utilization();

        Self {
            cycles: scheduler.cycle(),
            total_energy: scheduler.total_energy(),
            tasks_completed: scheduler.completed_tasks().len(),
            total_tasks: scheduler.total_tasks(),
            processor_info,
            processor_log,
            task_logs: scheduler
                .all_tasks()
                .into_iter()
                .map(|task| TaskLog::new(task, scheduler.threshold()))
                .collect(),
        }
    }

    pub fn dump_log_to_yaml(&self, file_path: &str) -> Result<(), SchedError> {
        let yaml = serde_yaml::to_string(&self)?;
        append_info_to_yaml(file_path, &yaml)
    }
}

pub fn dump_bounded_run_result_to_yaml(
    file_path: &str,
    result: &BoundedRunResult,
) -> Result<(), SchedError> {
    let yaml = serde_yaml::to_string(result)?;
    append_info_to_yaml(file_path, &yaml)
}
