//! Aggregation of per-item deltas into the run's report.

use crate::metrics::{self, IssueDeltas, PullRequestDeltas};
use serde::Serialize;
use std::fmt;

/// Accumulates the applicable samples for one metric. A delta of zero
/// minutes is applicable and is recorded; only `None` is skipped.
#[derive(Debug, Default)]
pub struct Samples(Vec<i64>);

impl Samples {
    pub fn record(&mut self, delta: Option<i64>) {
        if let Some(minutes) = delta {
            self.0.push(minutes);
        }
    }

    pub fn average(&self) -> Option<i64> {
        metrics::average(&self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueStats {
    /// Number of issues the averages were computed over.
    pub sampled: usize,
    pub avg_time_to_first_comment: Option<i64>,
    pub avg_time_to_close: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PullRequestStats {
    pub sampled: usize,
    pub avg_time_to_first_comment: Option<i64>,
    pub avg_time_to_merge: Option<i64>,
    pub avg_time_to_close: Option<i64>,
}

/// The complete result of one reporting run.
#[derive(Debug, Clone, Serialize)]
pub struct LatencyReport {
    pub repo: String,
    pub issues: IssueStats,
    pub pull_requests: PullRequestStats,
    /// Comment threads that could not be fetched; the affected items were
    /// excluded from the first-comment averages only.
    pub comment_fetch_failures: usize,
}

/// Collects issue deltas across the fetched set.
#[derive(Debug, Default)]
pub struct IssueAggregator {
    sampled: usize,
    time_to_close: Samples,
    time_to_first_comment: Samples,
}

impl IssueAggregator {
    pub fn record(&mut self, deltas: IssueDeltas) {
        self.sampled += 1;
        self.time_to_close.record(deltas.time_to_close);
        self.time_to_first_comment.record(deltas.time_to_first_comment);
    }

    pub fn finish(self) -> IssueStats {
        IssueStats {
            sampled: self.sampled,
            avg_time_to_first_comment: self.time_to_first_comment.average(),
            avg_time_to_close: self.time_to_close.average(),
        }
    }
}

/// Collects pull request deltas across the fetched set.
#[derive(Debug, Default)]
pub struct PullRequestAggregator {
    sampled: usize,
    time_to_close: Samples,
    time_to_merge: Samples,
    time_to_first_comment: Samples,
}

impl PullRequestAggregator {
    pub fn record(&mut self, deltas: PullRequestDeltas) {
        self.sampled += 1;
        self.time_to_close.record(deltas.time_to_close);
        self.time_to_merge.record(deltas.time_to_merge);
        self.time_to_first_comment.record(deltas.time_to_first_comment);
    }

    pub fn finish(self) -> PullRequestStats {
        PullRequestStats {
            sampled: self.sampled,
            avg_time_to_first_comment: self.time_to_first_comment.average(),
            avg_time_to_merge: self.time_to_merge.average(),
            avg_time_to_close: self.time_to_close.average(),
        }
    }
}

fn mins(value: Option<i64>) -> String {
    match value {
        Some(minutes) => format!("{minutes} mins"),
        None => "n/a".to_string(),
    }
}

impl fmt::Display for LatencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Latency report for {}", self.repo)?;
        writeln!(f)?;
        writeln!(f, "Issues ({} sampled):", self.issues.sampled)?;
        writeln!(
            f,
            "  average time until first comment: {}",
            mins(self.issues.avg_time_to_first_comment)
        )?;
        writeln!(
            f,
            "  average time until close: {}",
            mins(self.issues.avg_time_to_close)
        )?;
        writeln!(f)?;
        writeln!(f, "Pull requests ({} sampled):", self.pull_requests.sampled)?;
        writeln!(
            f,
            "  average time until first comment: {}",
            mins(self.pull_requests.avg_time_to_first_comment)
        )?;
        writeln!(
            f,
            "  average time until merge: {}",
            mins(self.pull_requests.avg_time_to_merge)
        )?;
        writeln!(
            f,
            "  average time until close: {}",
            mins(self.pull_requests.avg_time_to_close)
        )?;

        if self.comment_fetch_failures > 0 {
            writeln!(f)?;
            writeln!(
                f,
                "Warning: {} comment thread(s) could not be fetched; those items are excluded from the first-comment averages.",
                self.comment_fetch_failures
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_minute_deltas_count_as_samples() {
        let mut agg = IssueAggregator::default();
        agg.record(IssueDeltas {
            time_to_close: Some(0),
            time_to_first_comment: Some(0),
        });
        agg.record(IssueDeltas {
            time_to_close: Some(10),
            time_to_first_comment: None,
        });

        let stats = agg.finish();
        assert_eq!(stats.sampled, 2);
        assert_eq!(stats.avg_time_to_close, Some(5));
        // The lone zero-minute response is a real sample, not "missing".
        assert_eq!(stats.avg_time_to_first_comment, Some(0));
    }

    #[test]
    fn merge_and_close_aggregate_independently() {
        let mut agg = PullRequestAggregator::default();
        agg.record(PullRequestDeltas {
            time_to_close: None,
            time_to_merge: Some(60),
            time_to_first_comment: None,
        });
        agg.record(PullRequestDeltas {
            time_to_close: Some(90),
            time_to_merge: None,
            time_to_first_comment: None,
        });

        let stats = agg.finish();
        assert_eq!(stats.avg_time_to_merge, Some(60));
        assert_eq!(stats.avg_time_to_close, Some(90));
        assert_eq!(stats.avg_time_to_first_comment, None);
    }

    #[test]
    fn display_renders_averages_and_na() {
        let report = LatencyReport {
            repo: "rust-lang/cargo".to_string(),
            issues: IssueStats {
                sampled: 3,
                avg_time_to_first_comment: Some(12),
                avg_time_to_close: None,
            },
            pull_requests: PullRequestStats {
                sampled: 2,
                avg_time_to_first_comment: Some(0),
                avg_time_to_merge: Some(300),
                avg_time_to_close: Some(310),
            },
            comment_fetch_failures: 1,
        };

        let text = report.to_string();
        assert!(text.contains("Latency report for rust-lang/cargo"));
        assert!(text.contains("Issues (3 sampled):"));
        assert!(text.contains("  average time until first comment: 12 mins"));
        assert!(text.contains("  average time until close: n/a"));
        assert!(text.contains("Pull requests (2 sampled):"));
        assert!(text.contains("  average time until first comment: 0 mins"));
        assert!(text.contains("  average time until merge: 300 mins"));
        assert!(text.contains("1 comment thread(s) could not be fetched"));
    }

    #[test]
    fn display_omits_warning_when_nothing_failed() {
        let report = LatencyReport {
            repo: "o/r".to_string(),
            issues: IssueStats {
                sampled: 0,
                avg_time_to_first_comment: None,
                avg_time_to_close: None,
            },
            pull_requests: PullRequestStats {
                sampled: 0,
                avg_time_to_first_comment: None,
                avg_time_to_merge: None,
                avg_time_to_close: None,
            },
            comment_fetch_failures: 0,
        };

        assert!(!report.to_string().contains("Warning"));
    }
}
