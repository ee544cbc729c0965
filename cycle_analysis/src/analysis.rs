//! Experiments comparing core configurations and cycle caps on one workload.
use std::time::Instant;

use hetero_sched::{
    bounded::{BoundedRunResult, BoundedRunner},
    config::{SimulatorConfig, TaskSpec},
    error::SchedError,
    scheduler::Scheduler,
};
use log::info;
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationResult {
    pub config: String,
    pub cycles: u64,
    pub energy: f64,
    pub runtime_ms: f64,
    pub energy_per_cycle: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingResult {
    pub number_of_tasks: usize,
    pub cycles: u64,
    pub energy: f64,
    pub runtime_ms: f64,
}

pub const CORE_CONFIGURATIONS: [(usize, usize); 6] =
    [(1, 1), (2, 2), (4, 0), (0, 4), (1, 7), (7, 1)];

fn with_cores(base: &SimulatorConfig, num_perf: usize, num_eff: usize) -> SimulatorConfig {
    SimulatorConfig {
        num_perf,
        num_eff,
        ..base.clone()
    }
}

///Runs the same workload to completion on every `(num_perf, num_eff)` pair.
pub fn analyze_core_configurations(
    base: &SimulatorConfig,
    configurations: &[(usize, usize)],
) -> Result<Vec<ConfigurationResult>, SchedError> {
    let mut results = Vec::with_capacity(configurations.len());
    for &(num_perf, num_eff) in configurations {
        let mut scheduler = Scheduler::new(&with_cores(base, num_perf, num_eff))?;
        let start = Instant::now();
        let summary = scheduler.run_to_completion()?;
        let runtime_ms = start.elapsed().as_secs_f64() * 1000.0;
        results.push(ConfigurationResult {
            config: format!("{}P+{}E", num_perf, num_eff),
            cycles: summary.cycles,
            energy: summary.total_energy,
            runtime_ms,
            energy_per_cycle: if summary.cycles > 0 {
                summary.total_energy / summary.cycles as f64
            } else {
                0.0
            },
        });
    }
    Ok(results)
}

///Runs a fresh scheduler for every cycle cap.
pub fn cycle_limit_experiment(
    config: &SimulatorConfig,
    cycle_limits: &[u64],
) -> Result<Vec<BoundedRunResult>, SchedError> {
    let mut results = Vec::with_capacity(cycle_limits.len());
    for &limit in cycle_limits {
        let mut runner = BoundedRunner::new(Scheduler::new(config)?);
        results.push(runner.run(limit));
    }
    Ok(results)
}

///`size` tasks named `Task{i}` with difficulties cycling through 1..=5.
pub fn generate_workload(size: usize) -> Vec<TaskSpec> {
    (0..size)
        .map(|i| TaskSpec::new(&format!("Task{}", i), (i % 5 + 1) as f64))
        .collect()
}

pub fn workload_scaling_test(
    sizes: &[usize],
    num_perf: usize,
    num_eff: usize,
) -> Result<Vec<ScalingResult>, SchedError> {
    let mut results = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let config = SimulatorConfig {
            tasks: generate_workload(size),
            num_perf,
            num_eff,
            ..Default::default()
        };
        let mut scheduler = Scheduler::new(&config)?;
        let start = Instant::now();
        let summary = scheduler.run_to_completion()?;
        results.push(ScalingResult {
            number_of_tasks: size,
            cycles: summary.cycles,
            energy: summary.total_energy,
            runtime_ms: start.elapsed().as_secs_f64() * 1000.0,
        });
    }
    Ok(results)
}

///Bounded run first; if it stops short, the same scheduler is continued to
///completion. Returns the bounded result and the final cycle count.
pub fn resume_after_bounded_run(
    config: &SimulatorConfig,
    max_cycles: u64,
) -> Result<(BoundedRunResult, u64), SchedError> {
    let mut runner = BoundedRunner::new(Scheduler::new(config)?);
    let bounded = runner.run(max_cycles);
    if bounded.fully_completed {
        return Ok((bounded.clone(), bounded.cycles_used));
    }
    info!("Continuing simulation to completion");
    let mut scheduler = runner.into_scheduler();
    let summary = scheduler.run_to_completion()?;
    Ok((bounded, summary.cycles))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_mixed_config() -> SimulatorConfig {
        SimulatorConfig::from_yaml_file("../lib/tests/sample_workloads/mixed_workload.yaml")
            .unwrap()
    }

    #[test]
    fn test_analyze_core_configurations() {
        let results = analyze_core_configurations(&create_mixed_config(), &CORE_CONFIGURATIONS)
            .unwrap();
        let cycles: Vec<u64> = results.iter().map(|result| result.cycles).collect();
        assert_eq!(cycles, vec![24, 13, 8, 11, 24, 7]);
        assert_eq!(results[2].config, "4P+0E");
        assert!((results[3].energy - 38.0).abs() < 1e-6);
        assert!((results[3].energy_per_cycle - 38.0 / 11.0).abs() < 1e-6);
    }

    #[test]
    fn test_analyze_core_configurations_without_cores() {
        assert!(matches!(
            analyze_core_configurations(&create_mixed_config(), &[(0, 0)]),
            Err(SchedError::NoCoresAvailable { tasks: 9 })
        ));
    }

    #[test]
    fn test_cycle_limit_experiment() {
        let config = SimulatorConfig::new(
            &[("BigTask", 20.0), ("MedTask", 5.0), ("SmallTask", 2.0)],
            2,
            2,
        );
        let results = cycle_limit_experiment(&config, &[5, 10, 15, 50]).unwrap();
        let completed: Vec<usize> = results.iter().map(|result| result.tasks_completed).collect();
        assert_eq!(completed, vec![2, 2, 3, 3]);
        assert!(!results[1].fully_completed);
        assert_eq!(results[3].cycles_used, 14);
    }

    #[test]
    fn test_generate_workload() {
        let tasks = generate_workload(7);
        assert_eq!(tasks.len(), 7);
        assert_eq!(tasks[0], TaskSpec::new("Task0", 1.0));
        assert_eq!(tasks[4].difficulty, 5.0);
        assert_eq!(tasks[5].difficulty, 1.0);
    }

    #[test]
    fn test_workload_scaling_test() {
        let results = workload_scaling_test(&[10, 50], 4, 4).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[1].cycles >= results[0].cycles);
        // 10 tasks hold 30 work units and no core spends less than 1.0 per unit.
        assert!(results[0].energy >= 30.0);
    }

    #[test]
    fn test_resume_after_bounded_run() {
        let config = SimulatorConfig::new(
            &[
                ("InteractiveTask1", 10.0),
                ("InteractiveTask2", 5.0),
                ("InteractiveTask3", 3.0),
            ],
            2,
            1,
        );
        let (bounded, cycles) = resume_after_bounded_run(&config, 4).unwrap();
        assert!(!bounded.fully_completed);
        assert_eq!(cycles, 7);

        let (bounded, cycles) = resume_after_bounded_run(&config, 8).unwrap();
        assert!(bounded.fully_completed);
        assert_eq!(cycles, 7);
    }
}
