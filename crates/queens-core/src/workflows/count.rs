use crate::core::answers::Verdict;
use crate::core::board::Board;
use crate::core::kernel::{count_with_first_column, first_row_columns, mirror_weight};
use crate::engine::config::SearchConfig;
use crate::engine::progress::{Progress, ProgressReporter};
use std::time::{Duration, Instant};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct CountResult {
    pub board_size: usize,
    pub solutions: u64,
    pub elapsed: Duration,
    pub verdict: Verdict,
}

#[instrument(skip_all, name = "count_workflow", fields(n = config.board_size))]
pub fn run(config: &SearchConfig, reporter: &ProgressReporter) -> CountResult {
    let n = config.board_size;
    let columns = first_row_columns(n);

    reporter.report(Progress::PhaseStart { name: "Search" });
    reporter.report(Progress::TaskStart {
        total_steps: columns.len() as u64,
    });
    info!(
        "Counting n = {} over {} row-1 columns ({}).",
        n,
        columns.len(),
        if config.parallel { "parallel" } else { "sequential" }
    );

    let started = Instant::now();
    let solve = |board: &mut Board, column: usize| {
        let count = count_with_first_column(board, n, column) * mirror_weight(n, column);
        reporter.report(Progress::TaskIncrement);
        count
    };

    #[cfg(feature = "parallel")]
    let solutions: u64 = if config.parallel {
        columns
            .into_par_iter()
            .map_init(Board::new, |board, column| solve(board, column))
            .sum()
    } else {
        let mut board = Board::new();
        columns.map(|column| solve(&mut board, column)).sum()
    };

    #[cfg(not(feature = "parallel"))]
    let solutions: u64 = {
        let mut board = Board::new();
        columns.map(|column| solve(&mut board, column)).sum()
    };

    let elapsed = started.elapsed();
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let verdict = Verdict::check(n, solutions);
    info!(
        "Found {} solutions for n = {} in {:.3}s ({:?}).",
        solutions,
        n,
        elapsed.as_secs_f64(),
        verdict
    );

    CountResult {
        board_size: n,
        solutions,
        elapsed,
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SearchConfigBuilder;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn config(n: usize, parallel: bool) -> SearchConfig {
        SearchConfigBuilder::new()
            .board_size(n)
            .parallel(parallel)
            .build()
            .unwrap()
    }

    #[test]
    fn eight_queens_single_process_has_92_solutions() {
        let result = run(&config(8, false), &ProgressReporter::new());
        assert_eq!(result.solutions, 92);
        assert_eq!(result.verdict, Verdict::Correct);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        for n in [5, 6, 9, 10] {
            let sequential = run(&config(n, false), &ProgressReporter::new());
            let parallel = run(&config(n, true), &ProgressReporter::new());
            assert_eq!(sequential.solutions, parallel.solutions, "n = {}", n);
        }
    }

    #[test]
    fn reports_one_increment_per_row_one_column() {
        let increments = AtomicU64::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if matches!(event, Progress::TaskIncrement) {
                increments.fetch_add(1, Ordering::Relaxed);
            }
        }));

        run(&config(7, true), &reporter);
        drop(reporter);

        assert_eq!(increments.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn boards_without_solutions_are_still_correct() {
        let result = run(&config(3, false), &ProgressReporter::new());
        assert_eq!(result.solutions, 0);
        assert_eq!(result.verdict, Verdict::Correct);
    }
}
