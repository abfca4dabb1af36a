use super::decompose::{JobId, JobList};
use super::error::EngineError;
use super::packet::{Assignment, ResultPacket};
use super::progress::{Progress, ProgressReporter};
use super::transport::{MasterTransport, PeerId};
use serde::Serialize;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Jobs remain to be handed out.
    Dispatching,
    /// Every job is out; answering the remaining requests with `Stop`.
    Draining,
    Done,
}

/// One aggregated job result, as reported on the master's progress line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub worker: PeerId,
    pub job_id: JobId,
    pub job_count: JobId,
    pub solutions: u64,
    pub running_total: u64,
    pub percent_done: f64,
    pub elapsed_us: u64,
    pub finished_at_unix: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSummary {
    pub board_size: usize,
    pub job_count: JobId,
    pub worker_count: usize,
    pub dispatched: JobId,
    pub completed: JobId,
    pub solutions: u64,
    pub elapsed: Duration,
    pub records: Vec<JobRecord>,
}

impl ScheduleSummary {
    pub fn is_complete(&self) -> bool {
        self.completed == self.job_count
    }
}

/// The master's dispatch state machine, independent of any transport.
///
/// Each call to [`Scheduler::handle_request`] is one request/reply round. A run
/// takes exactly `job_count + worker_count` rounds: one per job plus the final
/// `Stop` each worker receives.
#[derive(Debug)]
pub struct Scheduler<'a> {
    jobs: &'a JobList,
    worker_count: usize,
    next: Assignment,
    rounds_left: usize,
    dispatched: JobId,
    completed: JobId,
    solutions: u64,
    finished: Vec<bool>,
    records: Vec<JobRecord>,
}

impl<'a> Scheduler<'a> {
    pub fn new(jobs: &'a JobList, worker_count: usize) -> Self {
        let next = if jobs.is_empty() {
            Assignment::Stop
        } else {
            Assignment::Job(1)
        };
        Self {
            jobs,
            worker_count,
            next,
            rounds_left: if worker_count == 0 {
                0
            } else {
                jobs.len() + worker_count
            },
            dispatched: 0,
            completed: 0,
            solutions: 0,
            finished: vec![false; jobs.len()],
            records: Vec::with_capacity(jobs.len()),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.rounds_left == 0 {
            SchedulerState::Done
        } else if matches!(self.next, Assignment::Job(_)) {
            SchedulerState::Dispatching
        } else {
            SchedulerState::Draining
        }
    }

    pub fn solutions(&self) -> u64 {
        self.solutions
    }

    pub fn completed(&self) -> JobId {
        self.completed
    }

    /// Folds the result carried by a request into the totals and picks the reply.
    pub fn handle_request(
        &mut self,
        peer: PeerId,
        packet: ResultPacket,
        reporter: &ProgressReporter,
    ) -> Assignment {
        if self.rounds_left == 0 {
            warn!("Request from worker {} after the schedule finished.", peer);
            return Assignment::Stop;
        }
        if !packet.is_empty() {
            self.aggregate(peer, packet, reporter);
        }

        let reply = self.next;
        if let Assignment::Job(job) = reply {
            self.dispatched += 1;
            self.next = if job >= self.jobs.job_count() {
                Assignment::Stop
            } else {
                Assignment::Job(job + 1)
            };
        }
        self.rounds_left -= 1;
        reply
    }

    fn aggregate(&mut self, peer: PeerId, packet: ResultPacket, reporter: &ProgressReporter) {
        let job = match JobId::try_from(packet.job_id) {
            Ok(job) if self.jobs.contains(job) => job,
            _ => {
                warn!(
                    "Worker {} reported unknown job id {}; result ignored.",
                    peer, packet.job_id
                );
                return;
            }
        };
        let slot = &mut self.finished[job as usize - 1];
        if *slot {
            warn!(
                "Worker {} reported job {} a second time; result ignored.",
                peer, job
            );
            return;
        }
        let Ok(solutions) = u64::try_from(packet.solutions) else {
            warn!(
                "Worker {} reported a negative count for job {}; result ignored.",
                peer, job
            );
            return;
        };
        *slot = true;

        self.solutions += solutions;
        self.completed += 1;
        let job_count = self.jobs.job_count();
        let percent_done = f64::from(self.completed) / f64::from(job_count) * 100.0;
        let elapsed_us = u64::try_from(packet.elapsed_us).unwrap_or_default();

        info!(
            "{:03} : {:05} {:05} {:016} {:06.2} {:08.2}",
            peer,
            job,
            job_count,
            self.solutions,
            percent_done,
            elapsed_us as f64 / 1_000_000.0
        );
        reporter.report(Progress::TaskIncrement);
        reporter.report(Progress::Tally(self.solutions));

        self.records.push(JobRecord {
            worker: peer,
            job_id: job,
            job_count,
            solutions,
            running_total: self.solutions,
            percent_done,
            elapsed_us,
            finished_at_unix: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        });
    }

    pub fn into_summary(self, elapsed: Duration) -> ScheduleSummary {
        ScheduleSummary {
            board_size: self.jobs.board_size(),
            job_count: self.jobs.job_count(),
            worker_count: self.worker_count,
            dispatched: self.dispatched,
            completed: self.completed,
            solutions: self.solutions,
            elapsed,
            records: self.records,
        }
    }
}

/// Serves `jobs` to the workers behind `transport` until every worker is stopped.
#[instrument(skip_all, name = "scheduler", fields(n = jobs.board_size()))]
pub fn run<T: MasterTransport>(
    jobs: &JobList,
    transport: &mut T,
    reporter: &ProgressReporter,
) -> Result<ScheduleSummary, EngineError> {
    let worker_count = transport.worker_count();
    info!("There are {} workers.", worker_count);
    info!("There are {} sub problems.", jobs.len());

    let started = Instant::now();
    let mut scheduler = Scheduler::new(jobs, worker_count);
    if worker_count == 0 {
        warn!("No available worker; nothing was dispatched.");
        return Ok(scheduler.into_summary(started.elapsed()));
    }

    reporter.report(Progress::TaskStart {
        total_steps: jobs.len() as u64,
    });

    while scheduler.state() != SchedulerState::Done {
        let (peer, packet) = transport.receive_any()?;
        let reply = scheduler.handle_request(peer, packet, reporter);
        transport.send(peer, reply)?;
    }

    reporter.report(Progress::TaskFinish);

    let summary = scheduler.into_summary(started.elapsed());
    if !summary.is_complete() {
        warn!(
            "Only {} of {} jobs reported a result.",
            summary.completed, summary.job_count
        );
    }
    info!(
        "Schedule finished: {} solutions from {} jobs in {:.3}s.",
        summary.solutions,
        summary.completed,
        summary.elapsed.as_secs_f64()
    );
    Ok(summary)
}
