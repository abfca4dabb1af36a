use crate::core::answers::Verdict;
use crate::engine::config::ClusterConfig;
use crate::engine::decompose::JobList;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scheduler::{self, ScheduleSummary};
use crate::engine::transport::local::channel_cluster;
use crate::engine::worker::{self, WorkerStats};
use std::thread;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterResult {
    pub summary: ScheduleSummary,
    pub workers: Vec<WorkerStats>,
    pub verdict: Verdict,
}

/// Decomposes the board into jobs, the first step of every distributed run.
pub fn decompose(n: usize, reporter: &ProgressReporter) -> JobList {
    reporter.report(Progress::PhaseStart {
        name: "Decomposition",
    });
    let jobs = JobList::build(n);
    reporter.report(Progress::PhaseFinish);
    info!("There are {} sub problems for n = {}.", jobs.len(), n);
    jobs
}

/// Runs the scheduler on the calling thread against `config.workers` worker threads.
#[instrument(skip_all, name = "cluster_workflow", fields(n = config.board_size, workers = config.workers))]
pub fn run(config: &ClusterConfig, reporter: &ProgressReporter) -> Result<ClusterResult, EngineError> {
    let jobs = decompose(config.board_size, reporter);
    let (mut master, endpoints) = channel_cluster(config.workers);

    reporter.report(Progress::PhaseStart { name: "Search" });
    let (summary, workers) = thread::scope(|scope| {
        let spawned: Result<Vec<_>, EngineError> = endpoints
            .into_iter()
            .map(|mut endpoint| {
                let jobs = &jobs;
                let peer = endpoint.peer();
                thread::Builder::new()
                    .name(format!("worker-{:03}", peer))
                    .spawn_scoped(scope, move || worker::run(&mut endpoint, jobs))
                    .map(|handle| (peer, handle))
                    .map_err(|e| {
                        EngineError::Internal(format!("Failed to spawn worker {}: {}", peer, e))
                    })
            })
            .collect();
        let handles = match spawned {
            Ok(handles) => handles,
            Err(e) => {
                drop(master);
                return Err(e);
            }
        };

        let summary = scheduler::run(&jobs, &mut master, reporter);
        // Unblocks any worker still waiting for a reply if the scheduler failed.
        drop(master);

        let mut workers = Vec::with_capacity(handles.len());
        for (peer, handle) in handles {
            let stats = handle
                .join()
                .map_err(|_| EngineError::WorkerPanicked { peer })?;
            match stats {
                Ok(stats) => workers.push(stats),
                Err(e) if summary.is_err() => {
                    debug!("Worker {} stopped after scheduler failure: {}", peer, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok::<_, EngineError>((summary?, workers))
    })?;
    reporter.report(Progress::PhaseFinish);

    let verdict = Verdict::check(config.board_size, summary.solutions);
    Ok(ClusterResult {
        summary,
        workers,
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::answers::known_solutions;
    use crate::engine::config::ClusterConfigBuilder;

    fn config(n: usize, workers: usize) -> ClusterConfig {
        ClusterConfigBuilder::new()
            .board_size(n)
            .workers(workers)
            .build()
            .unwrap()
    }

    #[test]
    fn eight_queens_across_three_workers() {
        let result = run(&config(8, 3), &ProgressReporter::new()).unwrap();

        assert_eq!(result.summary.solutions, 92);
        assert_eq!(result.summary.job_count, JobList::build(8).job_count());
        assert_eq!(result.summary.dispatched, result.summary.job_count);
        assert!(result.summary.is_complete());
        assert_eq!(result.workers.len(), 3);
        assert_eq!(
            result.workers.iter().map(|w| w.jobs_solved).sum::<u32>(),
            result.summary.job_count
        );
        assert_eq!(result.verdict, Verdict::Correct);
    }

    #[test]
    fn distributed_sum_matches_reference_for_small_boards() {
        for n in 2..=10 {
            let result = run(&config(n, 2), &ProgressReporter::new()).unwrap();
            assert_eq!(Some(result.summary.solutions), known_solutions(n), "n = {}", n);
        }
    }

    #[test]
    fn more_workers_than_jobs_still_terminates() {
        let result = run(&config(4, 5), &ProgressReporter::new()).unwrap();
        assert_eq!(result.summary.job_count, 1);
        assert_eq!(result.summary.solutions, 2);
        assert_eq!(result.workers.len(), 5);
    }

    #[test]
    fn zero_workers_dispatch_nothing() {
        let result = run(&config(8, 0), &ProgressReporter::new()).unwrap();
        assert_eq!(result.summary.dispatched, 0);
        assert_eq!(result.summary.solutions, 0);
        assert!(result.workers.is_empty());
        assert_eq!(result.summary.worker_count, 0);
        assert!(result.summary.records.is_empty());
    }
}
