//! # Core Module
//!
//! Board encoding and the search kernel.
//!
//! - **Board** ([`board`]) - Per-height frames of column and diagonal masks
//! - **Kernel** ([`kernel`]) - Iterative depth-first counting and prefix seeding
//! - **Answers** ([`answers`]) - Published solution counts used for self-checks

pub mod answers;
pub mod board;
pub mod kernel;
