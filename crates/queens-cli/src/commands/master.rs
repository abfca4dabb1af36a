use crate::cli::{Cli, MasterArgs};
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::report::{self, RunSummary};
use crate::utils::progress::CliProgressHandler;
use queens::{engine::progress::ProgressReporter, workflows};
use std::net::TcpListener;
use tracing::{info, warn};

pub fn run(args: &MasterArgs, cli: &Cli) -> Result<()> {
    let partial = PartialConfig::load(cli.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let plan = partial.merge_master(args, &cli.set_values)?;

    let listener = TcpListener::bind(&plan.listen).map_err(|e| {
        CliError::Other(anyhow::anyhow!("Failed to listen on {}: {}", plan.listen, e))
    })?;

    let progress_handler = CliProgressHandler::new();
    if cli.quiet {
        progress_handler.hide();
    }
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Serving N = {} on {}; waiting for {} workers...",
        plan.config.board_size, plan.listen, plan.config.workers
    );
    let result = workflows::network::serve(&plan.config, &listener, &reporter)?;

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
