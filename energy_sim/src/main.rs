mod outputs_result;

use clap::Parser;
use hetero_sched::{
    bounded::BoundedRunner,
    config::SimulatorConfig,
    error::SchedError,
    output_log::create_scheduler_log_yaml_file,
    run_log::{dump_bounded_run_result_to_yaml, SimulationLog},
    scheduler::Scheduler,
};
use log::error;
use outputs_result::dump_energy_sim_result_to_file;

#[derive(Parser)]
#[clap(
    name = "energy_sim",
    version = "1.0",
    about = "About:
    Simulates performance (P) and efficiency (E) cores draining a workload cycle by cycle.
    Tasks harder than the threshold wait for P cores, the rest for E cores.
    Set RUST_LOG=debug to print the core status of every cycle."
)]
struct ArgParser {
    ///Path to the workload YAML file.
    #[clap(short = 'f', long = "workload_file_path", required = true)]
    workload_file_path: String,
    ///Number of performance cores (overrides the workload file).
    #[clap(short = 'p', long = "num_perf")]
    num_perf: Option<usize>,
    ///Number of efficiency cores (overrides the workload file).
    #[clap(short = 'e', long = "num_eff")]
    num_eff: Option<usize>,
    #[clap(long = "perf_speed")]
    perf_speed: Option<f64>,
    #[clap(long = "perf_energy")]
    perf_energy: Option<f64>,
    #[clap(long = "eff_speed")]
    eff_speed: Option<f64>,
    #[clap(long = "eff_energy")]
    eff_energy: Option<f64>,
    ///Difficulty above which a task is routed to the performance queue.
    #[clap(short = 't', long = "threshold")]
    threshold: Option<f64>,
    ///Stop after this many cycles and report partial completion.
    #[clap(short = 'm', long = "max_cycles")]
    max_cycles: Option<u64>,
    ///Path to output directory.
    #[clap(short = 'o', long = "output_dir_path", default_value = "../outputs")]
    output_dir_path: String,
}

fn load_config(arg: &ArgParser) -> Result<SimulatorConfig, SchedError> {
    let mut config = SimulatorConfig::from_yaml_file(&arg.workload_file_path)?;
    if let Some(num_perf) = arg.num_perf {
        config.num_perf = num_perf;
    }
    if let Some(num_eff) = arg.num_eff {
        config.num_eff = num_eff;
    }
    if let Some(perf_speed) = arg.perf_speed {
        config.perf_speed = perf_speed;
    }
    if let Some(perf_energy) = arg.perf_energy {
        config.perf_energy = perf_energy;
    }
    if let Some(eff_speed) = arg.eff_speed {
        config.eff_speed = eff_speed;
    }
    if let Some(eff_energy) = arg.eff_energy {
        config.eff_energy = eff_energy;
    }
    if let Some(threshold) = arg.threshold {
        config.threshold = threshold;
    }
    Ok(config)
}

fn run(arg: &ArgParser) -> Result<(), SchedError> {
    let config = load_config(arg)?;
    let scheduler = Scheduler::new(&config)?;

    match arg.max_cycles {
        Some(max_cycles) => {
            let mut runner = BoundedRunner::new(scheduler);
            let result = runner.run(max_cycles);
            println!("Cycles Used: {}/{}", result.cycles_used, result.max_cycles);
            println!("Tasks Completed: {}/{}", result.tasks_completed, result.total_tasks);
            println!("Completion Rate: {:.1}%", result.completion_rate_percent);
            println!("Energy Used: {:.2}", result.energy_used);

            let file_path = create_scheduler_log_yaml_file(&arg.output_dir_path, "bounded")?;
            dump_bounded_run_result_to_yaml(&file_path, &result)?;
            SimulationLog::new(runner.scheduler()).dump_log_to_yaml(&file_path)?;
        }
        None => {
            let mut scheduler = scheduler;
            let summary = scheduler.run_to_completion()?;
            println!("Total CPU Cycles: {}", summary.cycles);
            println!("Total Energy Used: {:.2}", summary.total_energy);

            let file_path = create_scheduler_log_yaml_file(&arg.output_dir_path, "energy_sim")?;
            dump_energy_sim_result_to_file(&file_path, &summary)?;
            SimulationLog::new(&scheduler).dump_log_to_yaml(&file_path)?;
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
