//! Splitting the search space into independent jobs.
//!
//! A job fixes the queens of the first four rows. Candidate prefixes are numbered
//! densely by a radix-`n` encoding of their columns, restricted to row-1 columns in
//! the left half of the board (plus the centre column on odd boards); the mirror
//! half is accounted for by doubling. Only prefixes that survive the kernel's own
//! placement rules become jobs.

use crate::core::board::{Board, PREFIX_DEPTH};
use crate::core::kernel::{self, seed_prefix};
use tracing::debug;

/// Dense identifier of a candidate prefix, `1..=problem_space(n)`.
pub type ProblemId = u32;

/// Position of a valid prefix in the job list, `1..=job_count`; 0 is reserved.
pub type JobId = u32;

/// Column choices for rows 1 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix([usize; PREFIX_DEPTH]);

impl Prefix {
    pub fn new(columns: [usize; PREFIX_DEPTH]) -> Self {
        Self(columns)
    }

    /// Decodes a problem id by fixed-radix division. `id` must be at least 1.
    pub fn decode(n: usize, id: ProblemId) -> Self {
        let radix = n as u32;
        let offset = id - 1;
        Self([
            (offset / radix / radix / radix) as usize,
            (offset / radix / radix % radix) as usize,
            (offset / radix % radix) as usize,
            (offset % radix) as usize,
        ])
    }

    pub fn encode(&self, n: usize) -> ProblemId {
        let radix = n as u32;
        1 + self
            .0
            .iter()
            .fold(0u32, |acc, &column| acc * radix + column as u32)
    }

    pub fn columns(&self) -> &[usize] {
        &self.0
    }

    pub fn first_column(&self) -> usize {
        self.0[0]
    }

    pub fn is_mirrored(&self, n: usize) -> bool {
        kernel::is_mirrored(n, self.first_column())
    }
}

/// Number of candidate problem ids: `ceil(n / 2) * n^3`.
pub fn problem_space(n: usize) -> ProblemId {
    let radix = n as u32;
    (n.div_ceil(2) as u32) * radix * radix * radix
}

/// The ordered list of valid prefixes for one board size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobList {
    board_size: usize,
    problems: Vec<ProblemId>,
}

impl JobList {
    /// Enumerates every candidate prefix in increasing id order and keeps the valid ones.
    pub fn build(n: usize) -> Self {
        let mut board = Board::new();
        let space = problem_space(n);
        let problems: Vec<ProblemId> = (1..=space)
            .filter(|&id| seed_prefix(&mut board, n, Prefix::decode(n, id).columns()).is_some())
            .collect();

        debug!(
            "Decomposed n = {} into {} jobs out of {} candidate prefixes.",
            n,
            problems.len(),
            space
        );

        Self {
            board_size: n,
            problems,
        }
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// The job count as carried in wire frames.
    pub fn job_count(&self) -> JobId {
        self.problems.len() as JobId
    }

    pub fn contains(&self, job: JobId) -> bool {
        (1..=self.job_count()).contains(&job)
    }

    pub fn problem_id(&self, job: JobId) -> Option<ProblemId> {
        if !self.contains(job) {
            return None;
        }
        self.problems.get(job as usize - 1).copied()
    }

    pub fn prefix(&self, job: JobId) -> Option<Prefix> {
        self.problem_id(job)
            .map(|id| Prefix::decode(self.board_size, id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (JobId, ProblemId)> + '_ {
        self.problems
            .iter()
            .enumerate()
            .map(|(index, &id)| (index as JobId + 1, id))
    }
}
