//! # Queens Core Library
//!
//! A bit-parallel solution counter for the N-queens problem, with a pull-based
//! master/worker scheduler that splits the search into independent jobs.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless board encoding, the iterative
//!   backtracking kernel and the reference answer table.
//!
//! - **[`engine`]: The Logic Core.** Job decomposition, the wire packets, the
//!   transport abstraction and the two protocol roles (scheduler and worker).
//!
//! - **[`workflows`]: The Public API.** Complete runs: a single-process count and
//!   an in-process cluster of worker threads driven by one scheduler.

pub mod core;
pub mod engine;
pub mod workflows;
