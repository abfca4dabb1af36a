//! Blocking point-to-point channels between the master and its workers.
//!
//! The scheduler and worker loop only see the two traits below. A transport must
//! deliver every frame exactly once and in order per peer; it does not retry and
//! has no timeouts, so a worker that goes silent without closing its channel
//! stalls the master indefinitely.

pub mod local;
pub mod tcp;

use super::packet::{Assignment, ResultPacket};
use thiserror::Error;

/// Identifies a worker. Workers are numbered from 1; 0 denotes the master.
pub type PeerId = usize;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error while talking to peer {peer}: {source}")]
    Io {
        peer: PeerId,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to reach '{addr}': {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Peer {0} disconnected")]
    Disconnected(PeerId),

    #[error("Every worker channel is closed")]
    Closed,

    #[error("No such peer: {0}")]
    UnknownPeer(PeerId),

    #[error("Worker {peer} runs board size {actual}, the master runs {expected}")]
    BoardSizeMismatch {
        peer: PeerId,
        expected: usize,
        actual: usize,
    },

    #[error("Malformed {kind} frame: {reason}")]
    Malformed { kind: &'static str, reason: String },
}

/// The master's side: receive from whichever worker speaks first, reply to one.
pub trait MasterTransport {
    fn worker_count(&self) -> usize;

    fn receive_any(&mut self) -> Result<(PeerId, ResultPacket), TransportError>;

    fn send(&mut self, peer: PeerId, assignment: Assignment) -> Result<(), TransportError>;
}

/// A worker's side: send a request and block until the master's assignment arrives.
pub trait WorkerTransport {
    fn exchange(&mut self, report: ResultPacket) -> Result<Assignment, TransportError>;
}
