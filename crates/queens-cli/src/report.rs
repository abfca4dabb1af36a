use crate::error::Result;
use queens::core::answers::{Verdict, known_solutions};
use queens::engine::scheduler::{JobRecord, ScheduleSummary};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;
use tracing::info;

const RULE_WIDTH: usize = 45;

/// Final figures of one run, rendered as the result banner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub board_size: usize,
    pub solutions: u64,
    pub elapsed: Duration,
    pub verdict: Verdict,
}

impl RunSummary {
    /// The banner figures of a distributed run, or `None` when no worker took
    /// part and there is nothing to report.
    pub fn from_schedule(summary: &ScheduleSummary, verdict: Verdict) -> Option<Self> {
        if summary.worker_count == 0 {
            return None;
        }
        Some(Self {
            board_size: summary.board_size,
            solutions: summary.solutions,
            elapsed: summary.elapsed,
            verdict,
        })
    }

    /// Solutions per microsecond, which is millions per second.
    pub fn million_per_second(&self) -> f64 {
        let micros = self.elapsed.as_micros().max(1);
        self.solutions as f64 / micros as f64
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let expected = known_solutions(self.board_size)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
        let _ = writeln!(out, "qn24b {}", env!("CARGO_PKG_VERSION"));
        let _ = writeln!(out, "problem size n        : {}", self.board_size);
        let _ = writeln!(out, "total   solutions     : {}", self.solutions);
        let _ = writeln!(out, "correct solutions     : {}", expected);
        let _ = writeln!(out, "million solutions/sec : {:.3}", self.million_per_second());
        let _ = writeln!(out, "elapsed time (sec)    : {:.3}", self.elapsed.as_secs_f64());
        if self.verdict.is_wrong() {
            let _ = writeln!(out, " ### Wrong answer");
        }
        let _ = write!(out, "{}", "=".repeat(RULE_WIDTH));
        out
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("{}", summary.render());
}

/// Writes one CSV row per finished job, in completion order.
pub fn write_job_report(path: &Path, records: &[JobRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("Wrote {} job records to {:?}", records.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn summary(board_size: usize, solutions: u64) -> RunSummary {
        RunSummary {
            board_size,
            solutions,
            elapsed: Duration::from_millis(1500),
            verdict: Verdict::check(board_size, solutions),
        }
    }

    #[test]
    fn banner_lists_the_run_figures() {
        let text = summary(8, 92).render();
        assert!(text.contains("problem size n        : 8"));
        assert!(text.contains("total   solutions     : 92"));
        assert!(text.contains("correct solutions     : 92"));
        assert!(text.contains("elapsed time (sec)    : 1.500"));
        assert!(!text.contains("Wrong answer"));
    }

    #[test]
    fn mismatch_is_flagged() {
        let text = summary(8, 91).render();
        assert!(text.contains(" ### Wrong answer"));
    }

    #[test]
    fn boards_past_the_table_are_not_flagged() {
        let text = summary(25, 7).render();
        assert!(text.contains("correct solutions     : unknown"));
        assert!(!text.contains("Wrong answer"));
    }

    fn schedule(worker_count: usize, solutions: u64) -> ScheduleSummary {
        ScheduleSummary {
            board_size: 8,
            job_count: 4,
            worker_count,
            dispatched: if worker_count == 0 { 0 } else { 4 },
            completed: if worker_count == 0 { 0 } else { 4 },
            solutions,
            elapsed: Duration::from_millis(2),
            records: Vec::new(),
        }
    }

    #[test]
    fn run_without_workers_has_no_banner() {
        let summary = schedule(0, 0);
        assert_eq!(
            RunSummary::from_schedule(&summary, Verdict::check(8, 0)),
            None
        );
    }

    #[test]
    fn distributed_run_fills_the_banner() {
        let summary = schedule(3, 92);
        let run = RunSummary::from_schedule(&summary, Verdict::check(8, 92)).unwrap();
        assert_eq!(run.board_size, 8);
        assert_eq!(run.solutions, 92);
        assert_eq!(run.verdict, Verdict::Correct);
        assert!(run.render().contains("total   solutions     : 92"));
    }

    #[test]
    fn rate_survives_a_zero_elapsed_time() {
        let mut s = summary(4, 2);
        s.elapsed = Duration::ZERO;
        assert_eq!(s.million_per_second(), 2.0);
    }

    #[test]
    fn job_report_has_header_and_one_row_per_job() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        let records = vec![
            JobRecord {
                worker: 1,
                job_id: 1,
                job_count: 2,
                solutions: 10,
                running_total: 10,
                percent_done: 50.0,
                elapsed_us: 120,
                finished_at_unix: 1_700_000_000,
            },
            JobRecord {
                worker: 2,
                job_id: 2,
                job_count: 2,
                solutions: 4,
                running_total: 14,
                percent_done: 100.0,
                elapsed_us: 80,
                finished_at_unix: 1_700_000_001,
            },
        ];

        write_job_report(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "worker,job_id,job_count,solutions,running_total,percent_done,elapsed_us,finished_at_unix"
        );
        assert!(lines[2].starts_with("2,2,2,4,14,100.0,80,"));
    }
}
