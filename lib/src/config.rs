//! Simulator configuration and workload files.
//!
//! A workload file is a YAML document holding the task list and, optionally,
//! the core pool parameters:
//!
//! ```yaml
//! num_perf: 2
//! num_eff: 2
//! threshold: 2
//! tasks:
//!   - name: TranscribeDebate
//!     difficulty: 5
//!   - name: RenderQuiz
//!     difficulty: 2
//! ```
use std::fs;

use serde_derive::{Deserialize, Serialize};

use crate::error::SchedError;

pub const DEFAULT_PERF_SPEED: f64 = 1.5;
pub const DEFAULT_PERF_ENERGY: f64 = 1.33;
pub const DEFAULT_EFF_SPEED: f64 = 1.0;
pub const DEFAULT_EFF_ENERGY: f64 = 1.0;
pub const DEFAULT_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub name: String,
    pub difficulty: f64,
}

impl TaskSpec {
    pub fn new(name: &str, difficulty: f64) -> Self {
        Self {
            name: name.to_string(),
            difficulty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub tasks: Vec<TaskSpec>,
    pub num_perf: usize,
    pub num_eff: usize,
    pub perf_speed: f64,
    pub perf_energy: f64,
    pub eff_speed: f64,
    pub eff_energy: f64,
    pub threshold: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            num_perf: 0,
            num_eff: 0,
            perf_speed: DEFAULT_PERF_SPEED,
            perf_energy: DEFAULT_PERF_ENERGY,
            eff_speed: DEFAULT_EFF_SPEED,
            eff_energy: DEFAULT_EFF_ENERGY,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SimulatorConfig {
    pub fn new(tasks: &[(&str, f64)], num_perf: usize, num_eff: usize) -> Self {
        Self {
            tasks: tasks
                .iter()
                .map(|&(name, difficulty)| TaskSpec::new(name, difficulty))
                .collect(),
            num_perf,
            num_eff,
            ..Default::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchedError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(file_path: &str) -> Result<Self, SchedError> {
        let file_content = fs::read_to_string(file_path)?;
        Self::from_yaml_str(&file_content)
    }

    ///Rejects negative or non-finite difficulties and core parameters that
    ///would stall or corrupt the simulation.
    pub fn validate(&self) -> Result<(), SchedError> {
        if let Some(task) = self
            .tasks
            .iter()
            .find(|task| !task.difficulty.is_finite() || task.difficulty < 0.0)
        {
            return Err(SchedError::InvalidDifficulty {
                task: task.name.clone(),
                difficulty: task.difficulty,
            });
        }

        let mut speeds = Vec::new();
        if self.num_perf > 0 {
            speeds.push(("perf_speed", self.perf_speed));
        }
        if self.num_eff > 0 {
            speeds.push(("eff_speed", self.eff_speed));
        }
        for (name, value) in speeds {
            if !value.is_finite() || value <= 0.0 {
                return Err(SchedError::InvalidCoreParameter {
                    name: name.to_string(),
                    value,
                });
            }
        }

        for (name, value) in [
            ("perf_energy", self.perf_energy),
            ("eff_energy", self.eff_energy),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SchedError::InvalidCoreParameter {
                    name: name.to_string(),
                    value,
                });
            }
        }

        if !self.threshold.is_finite() {
            return Err(SchedError::InvalidCoreParameter {
                name: "threshold".to_string(),
                value: self.threshold,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SimulatorConfig::new(&[("A", 5.0), ("B", 2.0)], 1, 1);
        assert_eq!(config.tasks.len(), 2);
        assert_eq!(config.tasks[1], TaskSpec::new("B", 2.0));
        assert_eq!(config.perf_speed, 1.5);
        assert_eq!(config.perf_energy, 1.33);
        assert_eq!(config.eff_speed, 1.0);
        assert_eq!(config.eff_energy, 1.0);
        assert_eq!(config.threshold, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml_str_partial() {
        let yaml = "
num_perf: 1
threshold: 3
tasks:
  - name: Heavy
    difficulty: 8
  - name: Light
    difficulty: 0.5
";
        let config = SimulatorConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.num_perf, 1);
        assert_eq!(config.num_eff, 0);
        assert_eq!(config.threshold, 3.0);
        assert_eq!(config.perf_speed, 1.5);
        assert_eq!(config.tasks[0], TaskSpec::new("Heavy", 8.0));
        assert_eq!(config.tasks[1].difficulty, 0.5);
    }

    #[test]
    fn test_config_from_yaml_file() {
        let config =
            SimulatorConfig::from_yaml_file("tests/sample_workloads/edtech_workload.yaml")
                .unwrap();
        assert_eq!(config.num_perf, 2);
        assert_eq!(config.num_eff, 2);
        assert_eq!(config.tasks.len(), 7);
        assert_eq!(config.tasks[0].name, "TranscribeDebate");
    }

    #[test]
    fn test_config_from_yaml_file_missing() {
        assert!(matches!(
            SimulatorConfig::from_yaml_file("tests/sample_workloads/no_such_file.yaml"),
            Err(SchedError::Io(_))
        ));
    }

    #[test]
    fn test_config_from_yaml_str_malformed() {
        assert!(matches!(
            SimulatorConfig::from_yaml_str("tasks: [name: 1"),
            Err(SchedError::Yaml(_))
        ));
    }

    #[test]
    fn test_config_validate_negative_difficulty() {
        let config = SimulatorConfig::new(&[("Ok", 1.0), ("Bad", -1.0)], 1, 1);
        match config.validate() {
            Err(SchedError::InvalidDifficulty { task, difficulty }) => {
                assert_eq!(task, "Bad");
                assert_eq!(difficulty, -1.0);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_config_validate_nan_difficulty() {
        let config = SimulatorConfig::new(&[("NaN", f64::NAN)], 1, 1);
        assert!(matches!(
            config.validate(),
            Err(SchedError::InvalidDifficulty { .. })
        ));
    }

    #[test]
    fn test_config_validate_zero_speed() {
        let config = SimulatorConfig {
            eff_speed: 0.0,
            ..SimulatorConfig::new(&[("A", 1.0)], 1, 1)
        };
        assert!(matches!(
            config.validate(),
            Err(SchedError::InvalidCoreParameter { ref name, .. }) if name == "eff_speed"
        ));
    }

    #[test]
    fn test_config_validate_zero_speed_for_absent_pool() {
        let config = SimulatorConfig {
            eff_speed: 0.0,
            ..SimulatorConfig::new(&[("A", 1.0)], 1, 0)
        };
        assert!(config.validate().is_ok());
    }
}
