use queens::core::answers::known_solutions;
use queens::core::board::Board;
use queens::core::kernel::count_solutions;
use queens::engine::decompose::{JobList, Prefix};
use queens::engine::packet::{Assignment, ResultPacket};
use queens::engine::progress::ProgressReporter;
use queens::engine::scheduler::{Scheduler, SchedulerState};
use queens::engine::worker::solve_job;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

fn job_results(jobs: &JobList) -> Vec<ResultPacket> {
    let mut board = Board::new();
    (1..=jobs.job_count())
        .map(|job| ResultPacket::new(job, solve_job(&mut board, jobs, job), Duration::ZERO))
        .collect()
}

#[test]
fn weighted_job_counts_equal_single_process_count() {
    for n in 4..=11 {
        let jobs = JobList::build(n);
        let total: i64 = job_results(&jobs).iter().map(|p| p.solutions).sum();
        assert_eq!(total as u64, count_solutions(n), "n = {}", n);
    }
}

#[test]
fn aggregate_is_independent_of_arrival_order() {
    let n = 9;
    let jobs = JobList::build(n);
    let workers = 4;
    let reporter = ProgressReporter::new();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..5 {
        let mut results = job_results(&jobs);
        results.shuffle(&mut rng);

        let mut scheduler = Scheduler::new(&jobs, workers);
        for peer in 1..=workers {
            scheduler.handle_request(peer, ResultPacket::EMPTY, &reporter);
        }
        for packet in results {
            let peer = rng.gen_range(1..=workers);
            scheduler.handle_request(peer, packet, &reporter);
        }

        assert_eq!(scheduler.state(), SchedulerState::Done);
        assert_eq!(Some(scheduler.solutions()), known_solutions(n));
    }
}

#[test]
fn every_worker_gets_exactly_one_stop() {
    let jobs = JobList::build(8);
    let workers = 3;
    let reporter = ProgressReporter::new();
    let mut scheduler = Scheduler::new(&jobs, workers);
    let mut stops = vec![0; workers + 1];
    let mut peer = 1;

    while scheduler.state() != SchedulerState::Done {
        if scheduler.handle_request(peer, ResultPacket::EMPTY, &reporter) == Assignment::Stop {
            stops[peer] += 1;
            peer += 1;
        }
    }

    assert_eq!(&stops[1..], &[1, 1, 1]);
}

#[test]
fn problem_ids_round_trip_for_every_job() {
    for n in 4..=12 {
        let jobs = JobList::build(n);
        for (job, id) in jobs.iter() {
            assert_eq!(Prefix::decode(n, id).encode(n), id, "n = {}, job = {}", n, job);
        }
    }
}
