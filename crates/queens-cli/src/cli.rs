use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "qn24b - count N-queens solutions with a bit-parallel kernel, on one machine or across a master/worker cluster.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used by `solve --parallel`.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Optional configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S cluster.workers=8
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count every solution in this process.
    Solve(SolveArgs),
    /// Split the board into jobs and solve them with worker threads in this process.
    Cluster(ClusterArgs),
    /// Serve jobs to worker processes over TCP and aggregate their counts.
    Master(MasterArgs),
    /// Pull jobs from a master over TCP until it signals that no work remains.
    Worker(WorkerArgs),
}

/// Arguments for the `solve` subcommand.
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Board size (2-29).
    #[arg(value_name = "N")]
    pub board_size: Option<usize>,

    /// Explore the row-1 columns on a thread pool.
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for the `cluster` subcommand.
#[derive(Args, Debug)]
pub struct ClusterArgs {
    /// Board size (2-26).
    #[arg(value_name = "N")]
    pub board_size: Option<usize>,

    /// Number of worker threads. Defaults to the number of logical cores.
    #[arg(short, long, value_name = "INT")]
    pub workers: Option<usize>,

    /// Write one CSV row per finished job to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Arguments for the `master` subcommand.
#[derive(Args, Debug)]
pub struct MasterArgs {
    /// Board size (2-26). Every worker must be started with the same value.
    #[arg(value_name = "N")]
    pub board_size: Option<usize>,

    /// Address to accept worker connections on.
    #[arg(short, long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// Number of worker processes to wait for before dispatching.
    #[arg(short, long, value_name = "INT")]
    pub workers: Option<usize>,

    /// Write one CSV row per finished job to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Arguments for the `worker` subcommand.
#[derive(Args, Debug)]
pub struct WorkerArgs {
    /// Board size (2-26). Must match the master's.
    #[arg(value_name = "N")]
    pub board_size: Option<usize>,

    /// Address of the master.
    #[arg(long, value_name = "ADDR")]
    pub connect: Option<String>,
}
