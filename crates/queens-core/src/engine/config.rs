use crate::core::board::{MAX_BOARD_SIZE, MAX_DISTRIBUTED_BOARD_SIZE, MIN_BOARD_SIZE};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Board size {size} is outside the supported range {min}-{max}")]
    BoardSizeOutOfRange { size: usize, min: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub board_size: usize,
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    pub board_size: usize,
    pub workers: usize,
}

fn check_board_size(size: usize, max: usize) -> Result<usize, ConfigError> {
    if (MIN_BOARD_SIZE..=max).contains(&size) {
        Ok(size)
    } else {
        Err(ConfigError::BoardSizeOutOfRange {
            size,
            min: MIN_BOARD_SIZE,
            max,
        })
    }
}

/// Validates a board size for a job-decomposed run (master or worker).
pub fn check_distributed_board_size(size: usize) -> Result<usize, ConfigError> {
    check_board_size(size, MAX_DISTRIBUTED_BOARD_SIZE)
}

#[derive(Default)]
pub struct SearchConfigBuilder {
    board_size: Option<usize>,
    parallel: Option<bool>,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board_size(mut self, n: usize) -> Self {
        self.board_size = Some(n);
        self
    }
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = Some(enabled);
        self
    }

    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let board_size = self
            .board_size
            .ok_or(ConfigError::MissingParameter("board_size"))?;
        Ok(SearchConfig {
            board_size: check_board_size(board_size, MAX_BOARD_SIZE)?,
            parallel: self.parallel.unwrap_or(false),
        })
    }
}

#[derive(Default)]
pub struct ClusterConfigBuilder {
    board_size: Option<usize>,
    workers: Option<usize>,
}

impl ClusterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board_size(mut self, n: usize) -> Self {
        self.board_size = Some(n);
        self
    }
    pub fn workers(mut self, count: usize) -> Self {
        self.workers = Some(count);
        self
    }

    pub fn build(self) -> Result<ClusterConfig, ConfigError> {
        let board_size = self
            .board_size
            .ok_or(ConfigError::MissingParameter("board_size"))?;
        Ok(ClusterConfig {
            board_size: check_distributed_board_size(board_size)?,
            workers: self
                .workers
                .ok_or(ConfigError::MissingParameter("workers"))?,
        })
    }
}
