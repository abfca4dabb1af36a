use thiserror::Error;

use super::config::ConfigError;
use super::transport::{PeerId, TransportError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Transport failure: {source}")]
    Transport {
        #[from]
        source: TransportError,
    },

    #[error("Worker {peer} terminated abnormally")]
    WorkerPanicked { peer: PeerId },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
