use super::decompose::{JobId, JobList};
use super::error::EngineError;
use super::packet::{Assignment, ResultPacket};
use super::transport::WorkerTransport;
use crate::core::board::{Board, PREFIX_DEPTH};
use crate::core::kernel::{count_from, mirror_weight, seed_prefix};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, trace, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub jobs_solved: u32,
    pub solutions: u64,
    pub busy: Duration,
}

/// Counts the solutions below one job's prefix, weighted for its mirror image.
///
/// Ids outside the job list and prefixes the kernel rejects count as zero.
pub fn solve_job(board: &mut Board, jobs: &JobList, job: JobId) -> u64 {
    let n = jobs.board_size();
    let Some(prefix) = jobs.prefix(job) else {
        warn!("The id {} is out of range.", job);
        return 0;
    };
    let Some(row) = seed_prefix(board, n, prefix.columns()) else {
        warn!("Job {} has an invalid prefix {:?}.", job, prefix.columns());
        return 0;
    };

    count_from(board, n, PREFIX_DEPTH + 1, row) * mirror_weight(n, prefix.first_column())
}

/// Pulls jobs from the master until it answers with `Stop`.
#[instrument(skip_all, name = "worker", fields(n = jobs.board_size()))]
pub fn run<T: WorkerTransport>(
    transport: &mut T,
    jobs: &JobList,
) -> Result<WorkerStats, EngineError> {
    let mut board = Board::new();
    let mut report = ResultPacket::EMPTY;
    let mut stats = WorkerStats::default();

    loop {
        match transport.exchange(report)? {
            Assignment::Stop => {
                debug!(
                    "Stopping after {} jobs ({} solutions).",
                    stats.jobs_solved, stats.solutions
                );
                return Ok(stats);
            }
            Assignment::Job(job) => {
                let started = Instant::now();
                let solutions = solve_job(&mut board, jobs, job);
                let elapsed = started.elapsed();
                trace!("Job {} produced {} solutions.", job, solutions);

                stats.jobs_solved += 1;
                stats.solutions += solutions;
                stats.busy += elapsed;
                report = ResultPacket::new(job, solutions, elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::answers::known_solutions;
    use crate::engine::transport::TransportError;
    use std::collections::VecDeque;

    struct ScriptedMaster {
        replies: VecDeque<Assignment>,
        reports: Vec<ResultPacket>,
    }

    impl WorkerTransport for ScriptedMaster {
        fn exchange(&mut self, report: ResultPacket) -> Result<Assignment, TransportError> {
            self.reports.push(report);
            self.replies.pop_front().ok_or(TransportError::Disconnected(0))
        }
    }

    #[test]
    fn job_results_sum_to_the_full_count() {
        for n in 4..=10 {
            let jobs = JobList::build(n);
            let mut board = Board::new();
            let total: u64 = (1..=jobs.job_count())
                .map(|job| solve_job(&mut board, &jobs, job))
                .sum();
            assert_eq!(Some(total), known_solutions(n), "n = {}", n);
        }
    }

    #[test]
    fn out_of_range_job_counts_zero() {
        let jobs = JobList::build(8);
        let mut board = Board::new();
        assert_eq!(solve_job(&mut board, &jobs, 0), 0);
        assert_eq!(solve_job(&mut board, &jobs, jobs.job_count() + 1), 0);
    }

    #[test]
    fn worker_reports_each_job_with_its_next_request() {
        let jobs = JobList::build(8);
        let mut master = ScriptedMaster {
            replies: VecDeque::from(vec![Assignment::Job(1), Assignment::Job(2), Assignment::Stop]),
            reports: Vec::new(),
        };

        let stats = run(&mut master, &jobs).unwrap();

        assert_eq!(stats.jobs_solved, 2);
        assert_eq!(master.reports.len(), 3);
        assert!(master.reports[0].is_empty());
        assert_eq!(master.reports[1].job_id, 1);
        assert_eq!(master.reports[2].job_id, 2);

        let mut board = Board::new();
        let expected = solve_job(&mut board, &jobs, 1) + solve_job(&mut board, &jobs, 2);
        assert_eq!(
            (master.reports[1].solutions + master.reports[2].solutions) as u64,
            expected
        );
        assert_eq!(stats.solutions, expected);
    }

    #[test]
    fn worker_propagates_transport_failure() {
        let jobs = JobList::build(6);
        let mut master = ScriptedMaster {
            replies: VecDeque::from(vec![Assignment::Job(1)]),
            reports: Vec::new(),
        };

        let err = run(&mut master, &jobs).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Transport {
                source: TransportError::Disconnected(0)
            }
        ));
    }
}
