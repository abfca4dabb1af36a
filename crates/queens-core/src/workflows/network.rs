use super::cluster::decompose;
use crate::core::answers::Verdict;
use crate::engine::config::{ClusterConfig, check_distributed_board_size};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scheduler::{self, ScheduleSummary};
use crate::engine::transport::tcp::{TcpMaster, TcpWorker};
use crate::engine::worker::{self, WorkerStats};
use std::net::TcpListener;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct MasterResult {
    pub summary: ScheduleSummary,
    pub verdict: Verdict,
}

/// Waits for `config.workers` workers on `listener`, then schedules every job.
#[instrument(skip_all, name = "tcp_master", fields(n = config.board_size, workers = config.workers))]
pub fn serve(
    config: &ClusterConfig,
    listener: &TcpListener,
    reporter: &ProgressReporter,
) -> Result<MasterResult, EngineError> {
    let jobs = decompose(config.board_size, reporter);

    reporter.report(Progress::PhaseStart {
        name: "Waiting for workers",
    });
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {} for {} workers.", addr, config.workers);
    }
    let mut master = TcpMaster::accept(listener, config.workers, config.board_size)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Search" });
    let summary = scheduler::run(&jobs, &mut master, reporter)?;
    reporter.report(Progress::PhaseFinish);

    let verdict = Verdict::check(config.board_size, summary.solutions);
    Ok(MasterResult { summary, verdict })
}

/// Connects to a master at `addr` and works until told to stop.
#[instrument(skip_all, name = "tcp_worker", fields(n = board_size, master = addr))]
pub fn work(board_size: usize, addr: &str) -> Result<WorkerStats, EngineError> {
    let n = check_distributed_board_size(board_size)?;
    let jobs = decompose(n, &ProgressReporter::new());
    let mut transport = TcpWorker::connect(addr, n)?;
    info!("Connected to master at {}.", addr);
    worker::run(&mut transport, &jobs)
}
