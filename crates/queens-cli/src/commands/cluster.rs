use crate::cli::{Cli, ClusterArgs};
use crate::config::PartialConfig;
use crate::error::Result;
use crate::report::{self, RunSummary};
use crate::utils::progress::CliProgressHandler;
use queens::{engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub fn run(args: &ClusterArgs, cli: &Cli) -> Result<()> {
    let partial = PartialConfig::load(cli.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let plan = partial.merge_cluster(args, &cli.set_values)?;

    let progress_handler = CliProgressHandler::new();
    if cli.quiet {
        progress_handler.hide();
    }
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Solving N = {} with {} worker threads...",
        plan.config.board_size, plan.config.workers
    );
    let result = workflows::cluster::run(&plan.config, &reporter)?;

    for (i, stats) in result.workers.iter().enumerate() {
        info!(
            "Worker {:03} solved {} jobs ({} solutions) in {:.3}s of search.",
            i + 1,
            stats.jobs_solved,
            stats.solutions,
            stats.busy.as_secs_f64()
        );
    }
    if !result.summary.is_complete() {
        warn!(
            "Only {} of {} jobs were solved; the total is partial.",
            result.summary.completed, result.summary.job_count
        );
    }

    if let Some(path) = &plan.report {
        report::write_job_report(path, &result.summary.records)?;
        println!("Job report written to: {}", path.display());
    }

    match RunSummary::from_schedule(&result.summary, result.verdict) {
        Some(run) => report::print_summary(&run),
        None => {
            warn!("No available worker; nothing was counted.");
            println!("No available worker and exit.");
        }
    }
    Ok(())
}
