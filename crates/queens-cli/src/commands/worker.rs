use crate::cli::{Cli, WorkerArgs};
use crate::config::PartialConfig;
use crate::error::Result;
use queens::workflows;
use tracing::info;

pub fn run(args: &WorkerArgs, cli: &Cli) -> Result<()> {
    let partial = PartialConfig::load(cli.config.as_deref())?;
    let plan = partial.merge_worker(args, &cli.set_values)?;

    println!(
        "Working on N = {} for the master at {}...",
        plan.board_size, plan.connect
    );
    let stats = workflows::network::work(plan.board_size, &plan.connect)?;

    info!("Received stop from master.");
    println!(
        "Solved {} jobs ({} solutions) in {:.3}s of search.",
        stats.jobs_solved,
        stats.solutions,
        stats.busy.as_secs_f64()
    );
    Ok(())
}
