mod analysis;

use analysis::*;
use clap::{Parser, Subcommand};
use hetero_sched::{
    config::SimulatorConfig,
    error::SchedError,
    output_log::{append_info_to_yaml, create_scheduler_log_yaml_file},
};
use log::error;

#[derive(Parser)]
#[clap(
    name = "cycle_analysis",
    version = "1.0",
    about = "About:
    Compares how core configurations and cycle caps affect cycle counts and energy."
)]
struct ArgParser {
    ///Path to the workload YAML file.
    #[clap(
        short = 'f',
        long = "workload_file_path",
        default_value = "../lib/tests/sample_workloads/mixed_workload.yaml"
    )]
    workload_file_path: String,
    ///Path to output directory.
    #[clap(short = 'o', long = "output_dir_path", default_value = "../outputs")]
    output_dir_path: String,
    #[clap(subcommand)]
    experiment: Experiment,
}

#[derive(Subcommand)]
enum Experiment {
    ///Run the workload to completion on several P/E core splits.
    Patterns,
    ///Run the workload on a fixed core split under several cycle caps.
    Limits {
        #[clap(short = 'p', long = "num_perf", default_value = "2")]
        num_perf: usize,
        #[clap(short = 'e', long = "num_eff", default_value = "2")]
        num_eff: usize,
        #[clap(
            short = 'l',
            long = "limits",
            value_delimiter = ',',
            default_value = "5,10,15,20,25,50"
        )]
        limits: Vec<u64>,
    },
    ///Run generated workloads of growing size.
    Scaling {
        #[clap(
            short = 's',
            long = "sizes",
            value_delimiter = ',',
            default_value = "10,50,100,500"
        )]
        sizes: Vec<usize>,
        #[clap(short = 'p', long = "num_perf", default_value = "4")]
        num_perf: usize,
        #[clap(short = 'e', long = "num_eff", default_value = "4")]
        num_eff: usize,
    },
    ///Run with a cycle cap, then continue the same simulation to completion.
    Resume {
        #[clap(short = 'p', long = "num_perf", default_value = "2")]
        num_perf: usize,
        #[clap(short = 'e', long = "num_eff", default_value = "1")]
        num_eff: usize,
        #[clap(short = 'm', long = "max_cycles", default_value = "8")]
        max_cycles: u64,
    },
}

fn run(arg: &ArgParser) -> Result<(), SchedError> {
    let base = SimulatorConfig::from_yaml_file(&arg.workload_file_path)?;

    match &arg.experiment {
        Experiment::Patterns => {
            let results = analyze_core_configurations(&base, &CORE_CONFIGURATIONS)?;
            println!(
                "{:<8} {:<8} {:<8} {:<10} {:<10}",
                "Config", "Cycles", "Energy", "Runtime", "Efficiency"
            );
            println!("{}", "-".repeat(50));
            for result in &results {
                println!(
                    "{:<8} {:<8} {:<8.1} {:<8.1}ms {:<10.2}",
                    result.config,
                    result.cycles,
                    result.energy,
                    result.runtime_ms,
                    result.energy_per_cycle
                );
            }
            let file_path = create_scheduler_log_yaml_file(&arg.output_dir_path, "patterns")?;
            append_info_to_yaml(&file_path, &serde_yaml::to_string(&results)?)?;
        }
        Experiment::Limits {
            num_perf,
            num_eff,
            limits,
        } => {
            let config = SimulatorConfig {
                num_perf: *num_perf,
                num_eff: *num_eff,
                ..base
            };
            let results = cycle_limit_experiment(&config, limits)?;
            for result in &results {
                println!(
                    "Limit {:>3} cycles: {}/{} tasks, {:5.1}% complete, {:6.2} energy - {}",
                    result.max_cycles,
                    result.tasks_completed,
                    result.total_tasks,
                    result.completion_rate_percent,
                    result.energy_used,
                    if result.fully_completed {
                        "Complete"
                    } else {
                        "Partial"
                    }
                );
            }
            let file_path = create_scheduler_log_yaml_file(&arg.output_dir_path, "limits")?;
            append_info_to_yaml(&file_path, &serde_yaml::to_string(&results)?)?;
        }
        Experiment::Scaling {
            sizes,
            num_perf,
            num_eff,
        } => {
            let results = workload_scaling_test(sizes, *num_perf, *num_eff)?;
            for result in &results {
                println!(
                    "{:>4} tasks: {:>5} cycles, {:>8.1} energy, {:>7.1}ms runtime",
                    result.number_of_tasks, result.cycles, result.energy, result.runtime_ms
                );
            }
            let file_path = create_scheduler_log_yaml_file(&arg.output_dir_path, "scaling")?;
            append_info_to_yaml(&file_path, &serde_yaml::to_string(&results)?)?;
        }
        Experiment::Resume {
            num_perf,
            num_eff,
            max_cycles,
        } => {
            let config = SimulatorConfig {
                num_perf: *num_perf,
                num_eff: *num_eff,
                ..base
            };
            let (bounded, cycles) = resume_after_bounded_run(&config, *max_cycles)?;
            println!(
                "Bounded run: {}/{} cycles, {}/{} tasks ({:.1}%)",
                bounded.cycles_used,
                bounded.max_cycles,
                bounded.tasks_completed,
                bounded.total_tasks,
                bounded.completion_rate_percent
            );
            println!("Final completion: {} total cycles", cycles);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let arg: ArgParser = ArgParser::parse();
    if let Err(err) = run(&arg) {
        error!("{}", err);
        std::process::exit(1);
    }
}
