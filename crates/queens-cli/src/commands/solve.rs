use crate::cli::{Cli, SolveArgs};
use crate::config::PartialConfig;
use crate::error::Result;
use crate::report::{self, RunSummary};
use crate::utils::progress::CliProgressHandler;
use queens::{engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub fn run(args: &SolveArgs, cli: &Cli) -> Result<()> {
    let partial = PartialConfig::load(cli.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial.merge_solve(args, &cli.set_values)?;

    let progress_handler = CliProgressHandler::new();
    if cli.quiet {
        progress_handler.hide();
    }
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Counting solutions for N = {}...", config.board_size);
    let result = workflows::count::run(&config, &reporter);

    if result.verdict.is_wrong() {
        warn!(
            "Computed {} solutions for N = {}, which disagrees with the reference table.",
            result.solutions, result.board_size
        );
    }
    report::print_summary(&RunSummary {
        board_size: result.board_size,
        solutions: result.solutions,
        elapsed: result.elapsed,
        verdict: result.verdict,
    });
    Ok(())
}
