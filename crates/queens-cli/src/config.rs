mod defaults;

use crate::cli::{ClusterArgs, MasterArgs, SolveArgs, WorkerArgs};
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use queens::engine::config::{
    self as core_config, ClusterConfig, ClusterConfigBuilder, SearchConfig, SearchConfigBuilder,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSearchConfig {
    parallel: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialClusterConfig {
    workers: Option<usize>,
    listen: Option<String>,
    connect: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    #[serde(rename = "job-report")]
    job_report: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(rename = "board-size")]
    board_size: Option<usize>,
    search: Option<PartialSearchConfig>,
    cluster: Option<PartialClusterConfig>,
    output: Option<PartialOutputConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPlan {
    pub config: ClusterConfig,
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasterPlan {
    pub config: ClusterConfig,
    pub listen: String,
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkerPlan {
    pub board_size: usize,
    pub connect: String,
}

impl PartialConfig {
    /// Reads the config file if one was given, otherwise starts empty.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_solve(mut self, args: &SolveArgs, set_values: &[String]) -> Result<SearchConfig> {
        self.apply_set_values(set_values)?;
        let defaults = DefaultsConfig::default();
        let search = self.search.take().unwrap_or_default();

        let parallel = args.parallel || search.parallel.unwrap_or(defaults.parallel);
        Ok(SearchConfigBuilder::new()
            .board_size(self.resolve_board_size(args.board_size)?)
            .parallel(parallel)
            .build()?)
    }

    pub fn merge_cluster(mut self, args: &ClusterArgs, set_values: &[String]) -> Result<ClusterPlan> {
        self.apply_set_values(set_values)?;
        let defaults = DefaultsConfig::default();
        let cluster = self.cluster.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let config = ClusterConfigBuilder::new()
            .board_size(self.resolve_board_size(args.board_size)?)
            .workers(args.workers.or(cluster.workers).unwrap_or(defaults.workers))
            .build()?;
        Ok(ClusterPlan {
            config,
            report: args.report.clone().or(output.job_report),
        })
    }

    pub fn merge_master(mut self, args: &MasterArgs, set_values: &[String]) -> Result<MasterPlan> {
        self.apply_set_values(set_values)?;
        let defaults = DefaultsConfig::default();
        let cluster = self.cluster.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let config = ClusterConfigBuilder::new()
            .board_size(self.resolve_board_size(args.board_size)?)
            .workers(args.workers.or(cluster.workers).unwrap_or(defaults.workers))
            .build()?;
        Ok(MasterPlan {
            config,
            listen: args
                .listen
                .clone()
                .or(cluster.listen)
                .unwrap_or(defaults.listen),
            report: args.report.clone().or(output.job_report),
        })
    }

    pub fn merge_worker(mut self, args: &WorkerArgs, set_values: &[String]) -> Result<WorkerPlan> {
        self.apply_set_values(set_values)?;
        let defaults = DefaultsConfig::default();
        let cluster = self.cluster.take().unwrap_or_default();

        let board_size =
            core_config::check_distributed_board_size(self.resolve_board_size(args.board_size)?)?;
        Ok(WorkerPlan {
            board_size,
            connect: args
                .connect
                .clone()
                .or(cluster.connect)
                .unwrap_or(defaults.connect),
        })
    }

    fn resolve_board_size(&self, cli_value: Option<usize>) -> Result<usize> {
        cli_value.or(self.board_size).ok_or_else(|| {
            CliError::Argument(
                "A board size N is required either on the command line or as `board-size` in the config file."
                    .to_string(),
            )
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "board-size" => {
                    self.board_size = Some(parse_value(key, value_str)?);
                }
                "search.parallel" => {
                    self.search.get_or_insert_with(Default::default).parallel =
                        Some(parse_value(key, value_str)?);
                }
                "cluster.workers" => {
                    self.cluster.get_or_insert_with(Default::default).workers =
                        Some(parse_value(key, value_str)?);
                }
                "cluster.listen" => {
                    self.cluster.get_or_insert_with(Default::default).listen =
                        Some(value_str.to_string());
                }
                "cluster.connect" => {
                    self.cluster.get_or_insert_with(Default::default).connect =
                        Some(value_str.to_string());
                }
                "output.job-report" => {
                    self.output.get_or_insert_with(Default::default).job_report =
                        Some(PathBuf::from(value_str));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value_str))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let file_path = dir.path().join("queens.toml");
        fs::write(&file_path, content).unwrap();
        file_path
    }

    #[test]
    fn file_values_fill_in_missing_arguments() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            board-size = 10

            [cluster]
            workers = 3
            listen = "0.0.0.0:9000"

            [output]
            job-report = "jobs.csv"
            "#,
        );

        let cli = Cli::parse_from(["queens", "master"]);
        let Commands::Master(args) = cli.command else {
            panic!("Expected 'master' subcommand");
        };
        let plan = PartialConfig::from_file(&path)
            .unwrap()
            .merge_master(&args, &[])
            .unwrap();

        assert_eq!(plan.config.board_size, 10);
        assert_eq!(plan.config.workers, 3);
        assert_eq!(plan.listen, "0.0.0.0:9000");
        assert_eq!(plan.report, Some(PathBuf::from("jobs.csv")));
    }

    #[test]
    fn cli_arguments_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            board-size = 10
            [cluster]
            workers = 3
            "#,
        );

        let cli = Cli::parse_from(["queens", "cluster", "8", "--workers", "5"]);
        let Commands::Cluster(args) = cli.command else {
            panic!("Expected 'cluster' subcommand");
        };
        let plan = PartialConfig::from_file(&path)
            .unwrap()
            .merge_cluster(&args, &[])
            .unwrap();

        assert_eq!(plan.config.board_size, 8);
        assert_eq!(plan.config.workers, 5);
        assert_eq!(plan.report, None);
    }

    #[test]
    fn set_values_override_file() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "board-size = 9\n[search]\nparallel = false\n");

        let cli = Cli::parse_from([
            "queens",
            "-S",
            "search.parallel=true",
            "--set",
            "board-size=11",
            "solve",
        ]);
        let Commands::Solve(args) = &cli.command else {
            panic!("Expected 'solve' subcommand");
        };
        let config = PartialConfig::from_file(&path)
            .unwrap()
            .merge_solve(args, &cli.set_values)
            .unwrap();

        assert_eq!(config.board_size, 11);
        assert!(config.parallel);
    }

    #[test]
    fn missing_board_size_is_an_argument_error() {
        let cli = Cli::parse_from(["queens", "solve"]);
        let Commands::Solve(args) = cli.command else {
            panic!("Expected 'solve' subcommand");
        };
        let result = PartialConfig::default().merge_solve(&args, &[]);
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn out_of_range_board_size_halts_before_search() {
        let cli = Cli::parse_from(["queens", "solve", "30"]);
        let Commands::Solve(args) = cli.command else {
            panic!("Expected 'solve' subcommand");
        };
        let result = PartialConfig::default().merge_solve(&args, &[]);
        assert!(matches!(result, Err(CliError::Argument(msg)) if msg.contains("2-29")));

        let cli = Cli::parse_from(["queens", "worker", "27"]);
        let Commands::Worker(args) = cli.command else {
            panic!("Expected 'worker' subcommand");
        };
        let result = PartialConfig::default().merge_worker(&args, &[]);
        assert!(matches!(result, Err(CliError::Argument(msg)) if msg.contains("2-26")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "board-size = 8\nthreads = 4\n");
        assert!(matches!(
            PartialConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));

        let result = PartialConfig::default().apply_set_values(&["cluster.port=1".to_string()]);
        assert!(matches!(result, Err(CliError::Config(_))));

        let result = PartialConfig::default().apply_set_values(&["cluster.workers".to_string()]);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn worker_defaults_to_local_master_address() {
        let cli = Cli::parse_from(["queens", "worker", "12"]);
        let Commands::Worker(args) = cli.command else {
            panic!("Expected 'worker' subcommand");
        };
        let plan = PartialConfig::default().merge_worker(&args, &[]).unwrap();
        assert_eq!(plan.board_size, 12);
        assert_eq!(plan.connect, defaults::DEFAULT_ADDRESS);
    }
}
