//! # Workflows Module
//!
//! Complete runs built from the kernel and the engine. Each workflow takes a
//! validated configuration, reports progress, and returns a result carrying the
//! reference verdict for the board size.
//!
//! - **Count Workflow** ([`count`]) - Single-process count, optionally parallel over
//!   the row-1 columns
//! - **Cluster Workflow** ([`cluster`]) - One scheduler and N worker threads joined
//!   by in-process channels
//! - **Network Workflow** ([`network`]) - The master and worker roles over TCP, one
//!   process per role

pub mod cluster;
pub mod count;
pub mod network;
