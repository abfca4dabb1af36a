//! # Engine Module
//!
//! This module implements the distributed side of the solver: it splits the search
//! space into independent jobs, moves them between a master and its workers, and
//! aggregates the returned counts.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated search and cluster settings
//! - **Decomposition** ([`decompose`]) - Four-row prefixes and the ordered job list
//! - **Wire Format** ([`packet`]) - Result packets and assignments as fixed-width frames
//! - **Transport** ([`transport`]) - Blocking point-to-point channels, in-process or TCP
//! - **Scheduler** ([`scheduler`]) - The master's pull-based dispatch state machine
//! - **Worker** ([`worker`]) - The request/solve/report loop run by every worker
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Engine-level error types
//!
//! ## Protocol
//!
//! Workers pull work. Each request carries the result of the previous job (job id 0
//! on first contact) and is answered with exactly one assignment; job id 0 in an
//! assignment tells the worker to stop. The master never has more than one
//! outstanding job per worker and owns all scheduling state on a single thread.

pub mod config;
pub mod decompose;
pub mod error;
pub mod packet;
pub mod progress;
pub mod scheduler;
pub mod transport;
pub mod worker;
