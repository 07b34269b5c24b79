use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use workflow_schedule_sim::api::config_dto::scheduling_config_dto::SchedulingConfigDto;
use workflow_schedule_sim::domain::scheduling_model::critical_path::analyzer::{analyze_critical_path, theoretical_minimum_duration};
use workflow_schedule_sim::domain::scheduling_model::persistence::json_file_store::JsonFileStore;
use workflow_schedule_sim::domain::scheduling_model::persistence::simulation_store::SimulationStore;
use workflow_schedule_sim::domain::scheduling_model::resource::worker::{Worker, create_worker_pool};
use workflow_schedule_sim::domain::scheduling_model::scheduler::workflow_scheduler::TieBreak;
use workflow_schedule_sim::domain::scheduling_model::scheduler::workflow_scheduler_type::WorkflowSchedulerType;
use workflow_schedule_sim::domain::scheduling_model::utils::statistics::{ScheduleStatistics, StatisticsWriter};
use workflow_schedule_sim::domain::scheduling_model::workflow::sampler::SeededGammaSampler;
use workflow_schedule_sim::loader::parser::parse_json_file;
use workflow_schedule_sim::{load_workflow, logger};

const DEFAULT_WORKER_COUNT: usize = 4;

#[derive(Parser)]
#[command(version, about = "Schedules a workflow with Greedy, HEFT, CP-HEFT and ODP-IP and compares the results.")]
struct Cli {
    /// Workflow JSON file.
    #[arg(long)]
    workflow: PathBuf,

    /// Run configuration (JSON). Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of identical workers; ignored if the configuration lists workers explicitly.
    #[arg(long)]
    workers: Option<usize>,

    /// Algorithm to run (Greedy, HEFT, CP-HEFT, ODP-IP). Repeat for several; default is all.
    #[arg(long = "algorithm")]
    algorithms: Vec<String>,

    /// Number of sampled runs per algorithm.
    #[arg(long)]
    simulations: Option<u32>,

    /// Seed for duration sampling and tie-breaking. Without a seed expected durations are used.
    #[arg(long)]
    seed: Option<u64>,

    /// Ignore transfer times while scheduling.
    #[arg(long)]
    no_transfer: bool,

    /// Directory for schedules and statistics.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> anyhow::Result<SchedulingConfigDto> {
    let mut config = match &cli.config {
        Some(path) => parse_json_file::<SchedulingConfigDto>(path).with_context(|| format!("reading configuration '{}'", path.display()))?,
        None => SchedulingConfigDto::default(),
    };

    if let Some(workers) = cli.workers {
        config.worker_count = Some(workers);
    }
    if !cli.algorithms.is_empty() {
        config.algorithms = cli.algorithms.clone();
    }
    if let Some(simulations) = cli.simulations {
        config.simulations = simulations;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.no_transfer {
        config.include_transfer_times = false;
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.display().to_string();
    }

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let mut workflow = load_workflow(&cli.workflow).with_context(|| format!("loading workflow '{}'", cli.workflow.display()))?;

    if config.zero_critical_path_transfers {
        let analysis = analyze_critical_path(&workflow.with_expected_durations(), config.include_transfer_times)?;
        let zeroed = workflow.zero_critical_path_transfers(&analysis.ordered_critical_path)?;
        log::info!("Zeroed {} transfer(s) along the critical path.", zeroed);
    }

    let workers: Vec<Worker> = if config.workers.is_empty() {
        create_worker_pool(config.worker_count.unwrap_or(DEFAULT_WORKER_COUNT))
    } else {
        config.workers.iter().cloned().map(Worker::from).collect()
    };

    let algorithms: Vec<WorkflowSchedulerType> = if config.algorithms.is_empty() {
        WorkflowSchedulerType::ALL.to_vec()
    } else {
        config.algorithms.iter().map(|name| name.parse()).collect::<Result<_, _>>()?
    };

    let tie_break = config.seed.map(TieBreak::Seeded).unwrap_or_default();
    let store = JsonFileStore::new(&config.output_dir);
    store.save_workflow(&workflow)?;
    let mut statistics_writer = StatisticsWriter::create(store.root().join("statistics.csv"))?;

    println!(
        "{} '{}': {} task(s), {} worker(s), transfers {}",
        "Workflow".bold(),
        workflow.id,
        workflow.len(),
        workers.len(),
        if config.include_transfer_times { "included" } else { "ignored" }
    );

    for simulation_number in 1..=config.simulations {
        let run = match config.seed {
            Some(seed) => workflow.sample_durations(&mut SeededGammaSampler::new(seed.wrapping_add(simulation_number as u64))),
            None => workflow.with_expected_durations(),
        };
        let theoretical_duration = theoretical_minimum_duration(&run)?;

        println!("{} #{} (lower bound {:.2})", "Simulation".bold(), simulation_number, theoretical_duration);

        for algorithm in &algorithms {
            let scheduler = algorithm.get_instance(config.include_transfer_times, tie_break);
            let schedule = match scheduler.schedule(&run, &workers) {
                Ok(schedule) => schedule,
                Err(e) => {
                    log::error!("{} failed on simulation #{}: {}", algorithm, simulation_number, e);
                    println!("  {:<8} {}", algorithm.to_string(), "failed".red());
                    continue;
                }
            };

            let statistics = ScheduleStatistics::collect(&run, &schedule, theoretical_duration).for_simulation(simulation_number);
            let verdict = if schedule.is_valid() { "valid".green() } else { format!("{} violation(s)", statistics.verification_violations).yellow() };
            println!(
                "  {:<8} makespan {:>10.2}  efficiency {:>5.1}%  workers {}/{}  {}",
                algorithm.to_string(),
                statistics.makespan,
                statistics.efficiency * 100.0,
                statistics.workers_used,
                statistics.workers_available,
                verdict
            );

            store.save_schedule(&run.id, &schedule, simulation_number)?;
            statistics_writer.write(&statistics)?;
        }
    }

    statistics_writer.flush()?;
    println!("Results written to '{}'.", store.root().display());

    Ok(())
}
