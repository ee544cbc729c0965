use hetero_sched::{
    error::SchedError, output_log::append_info_to_yaml, scheduler::SimulationSummary,
};
use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct ResultInfo {
    cycles: u64,
    total_energy: f64,
    energy_per_cycle: f64,
    completion_order: Vec<String>,
}

pub fn dump_energy_sim_result_to_file(
    file_path: &str,
    summary: &SimulationSummary,
) -> Result<(), SchedError> {
    let result_info = ResultInfo {
        cycles: summary.cycles,
        total_energy: summary.total_energy,
        energy_per_cycle: if summary.cycles > 0 {
            summary.total_energy / summary.cycles as f64
        } else {
            0.0
        },
        completion_order: summary.completed_tasks.clone(),
    };
    let yaml = serde_yaml::to_string(&result_info)?;
    append_info_to_yaml(file_path, &yaml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hetero_sched::{
        config::SimulatorConfig, output_log::create_scheduler_log_yaml_file, scheduler::Scheduler,
    };
    use std::fs::remove_file;

    #[test]
    fn test_dump_energy_sim_result_to_file_normal() {
        let config = SimulatorConfig::new(&[("A", 5.0), ("B", 2.0), ("C", 3.0)], 1, 1);
        let mut scheduler = Scheduler::new(&config).unwrap();
        let summary = scheduler.run_to_completion().unwrap();

        let file_path = create_scheduler_log_yaml_file(
            "../lib/tests/outputs",
            "test_dump_energy_sim_result_to_file_normal",
        )
        .unwrap();
        dump_energy_sim_result_to_file(&file_path, &summary).unwrap();

        let file_contents = std::fs::read_to_string(&file_path).unwrap();
        let result_info: ResultInfo = serde_yaml::from_str(&file_contents).unwrap();

        assert_eq!(result_info.cycles, 6);
        assert!((result_info.total_energy - 12.64).abs() < 1e-9);
        assert!((result_info.energy_per_cycle - 12.64 / 6.0).abs() < 1e-9);
        assert_eq!(result_info.completion_order, vec!["B", "A", "C"]);

        remove_file(file_path).unwrap();
    }
}
