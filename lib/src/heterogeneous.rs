//! Performance and efficiency core pools.
use crate::{
    config::SimulatorConfig,
    core::{Core, CoreType, ProcessResult},
    processor::ProcessorBase,
    task::TaskClass,
};

#[derive(Debug, Clone)]
pub struct HeterogeneousProcessor {
    perf_cores: Vec<Core>,
    eff_cores: Vec<Core>,
}

impl HeterogeneousProcessor {
    pub fn new(config: &SimulatorConfig) -> Self {
        let perf_cores = (0..config.num_perf)
            .map(|i| {
                Core::new(
                    i,
                    &format!("P{}", i + 1),
                    CoreType::Performance,
                    config.perf_speed,
                    config.perf_energy,
                )
            })
            .collect::<Vec<Core>>();
        let eff_cores = (0..config.num_eff)
            .map(|i| {
                Core::new(
                    config.num_perf + i,
                    &format!("E{}", i + 1),
                    CoreType::Efficiency,
                    config.eff_speed,
                    config.eff_energy,
                )
            })
            .collect::<Vec<Core>>();
        Self {
            perf_cores,
            eff_cores,
        }
    }

    pub fn perf_cores(&self) -> &[Core] {
        &self.perf_cores
    }

    pub fn eff_cores(&self) -> &[Core] {
        &self.eff_cores
    }

    ///Performance pool first, then efficiency pool.
    pub fn cores(&self) -> impl Iterator<Item = &Core> {
        self.perf_cores.iter().chain(self.eff_cores.iter())
    }

    pub fn cores_mut(&mut self) -> impl Iterator<Item = &mut Core> {
        self.perf_cores.iter_mut().chain(self.eff_cores.iter_mut())
    }

    ///Whether a non-empty pool natively serves the given class.
    pub fn has_cores_serving(&self, class: TaskClass) -> bool {
        self.cores().any(|core| core.core_type().serves() == class)
    }

    pub fn has_idle_core(&self) -> bool {
        self.cores().any(|core| core.is_idle())
    }

    pub fn is_all_idle(&self) -> bool {
        self.cores().all(|core| core.is_idle())
    }
}

impl ProcessorBase for HeterogeneousProcessor {
    fn get_number_of_cores(&self) -> usize {
        self.perf_cores.len() + self.eff_cores.len()
    }

    fn process(&mut self) -> Vec<ProcessResult> {
        self.cores_mut().map(|core| core.process()).collect()
    }

    fn get_total_energy(&self) -> f64 {
        self.cores().map(|core| core.energy_used()).sum()
    }

    fn get_in_flight_work(&self) -> f64 {
        self.cores().map(|core| core.remaining_work()).sum()
    }

    fn get_average_speed(&self) -> Option<f64> {
        let number_of_cores = self.get_number_of_cores();
        if number_of_cores == 0 {
            return None;
        }
        Some(self.cores().map(|core| core.speed()).sum::<f64>() / number_of_cores as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn create_processor(num_perf: usize, num_eff: usize) -> HeterogeneousProcessor {
        HeterogeneousProcessor::new(&SimulatorConfig {
            num_perf,
            num_eff,
            ..Default::default()
        })
    }

    #[test]
    fn test_heterogeneous_processor_new() {
        let processor = create_processor(2, 3);
        assert_eq!(processor.get_number_of_cores(), 5);
        let names: Vec<&str> = processor.cores().map(|core| core.name().as_str()).collect();
        assert_eq!(names, vec!["P1", "P2", "E1", "E2", "E3"]);
        let ids: Vec<usize> = processor.cores().map(|core| core.core_id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert!(processor
            .perf_cores()
            .iter()
            .all(|core| core.speed() == 1.5 && core.energy_multiplier() == 1.33));
        assert!(processor
            .eff_cores()
            .iter()
            .all(|core| core.speed() == 1.0 && core.energy_multiplier() == 1.0));
    }

    #[test]
    fn test_heterogeneous_processor_has_cores_serving() {
        let processor = create_processor(0, 2);
        assert!(!processor.has_cores_serving(TaskClass::Heavy));
        assert!(processor.has_cores_serving(TaskClass::Light));
    }

    #[test]
    fn test_heterogeneous_processor_process_order() {
        let mut processor = create_processor(1, 1);
        for core in processor.cores_mut() {
            core.allocate(Task::new(&format!("on-{}", core.name()), 1.0))
                .unwrap();
        }
        let results = processor.process();
        assert_eq!(results.len(), 2);
        match (&results[0], &results[1]) {
            (ProcessResult::Done(first), ProcessResult::Done(second)) => {
                assert_eq!(first.name, "on-P1");
                assert_eq!(second.name, "on-E1");
            }
            other => panic!("unexpected results: {:?}", other),
        }
        assert!(processor.cores().all(|core| core.is_idle()));
    }

    #[test]
    fn test_heterogeneous_processor_energy_and_speed() {
        let mut processor = create_processor(1, 1);
        assert_eq!(processor.get_average_speed(), Some(1.25));
        for core in processor.cores_mut() {
            core.allocate(Task::new("T", 4.0)).unwrap();
        }
        processor.process();
        assert!((processor.get_total_energy() - (1.5 * 1.33 + 1.0)).abs() < 1e-9);
        assert!((processor.get_in_flight_work() - (2.5 + 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_heterogeneous_processor_without_cores() {
        let mut processor = create_processor(0, 0);
        assert_eq!(processor.get_average_speed(), None);
        assert!(processor.process().is_empty());
        assert_eq!(processor.get_total_energy(), 0.0);
    }
}
