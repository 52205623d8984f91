//! Latency metrics derived from item and comment timestamps.
//!
//! Every delta is an `Option<i64>` of whole minutes: `None` means the item
//! never reached that state, while `Some(0)` is a genuine zero-minute
//! measurement and counts as a sample. The two must never be conflated.

use crate::github::{Comment, Issue, PullRequest};
use chrono::{DateTime, Utc};

/// Half-up rounding: `round(1.5) = 2`, `round(1.4) = 1`, `round(-1.5) = -1`.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    round_half_up((end - start).num_seconds() as f64 / 60.0) as i64
}

/// Per-issue latency deltas, in minutes.
#[derive(Debug, Clone, Copy)]
pub struct IssueDeltas {
    pub time_to_close: Option<i64>,
    pub time_to_first_comment: Option<i64>,
}

/// Per-pull-request latency deltas, in minutes. Close and merge are tracked
/// independently: a pull request can merge without a distinct close record
/// in the data, or close without ever merging.
#[derive(Debug, Clone, Copy)]
pub struct PullRequestDeltas {
    pub time_to_close: Option<i64>,
    pub time_to_merge: Option<i64>,
    pub time_to_first_comment: Option<i64>,
}

pub fn issue_deltas(issue: &Issue, comments: &[Comment]) -> IssueDeltas {
    IssueDeltas {
        time_to_close: issue
            .closed_at
            .map(|closed| minutes_between(issue.created_at, closed)),
        time_to_first_comment: first_response(issue.author, issue.created_at, comments),
    }
}

pub fn pull_request_deltas(pr: &PullRequest, comments: &[Comment]) -> PullRequestDeltas {
    PullRequestDeltas {
        time_to_close: pr
            .closed_at
            .map(|closed| minutes_between(pr.created_at, closed)),
        time_to_merge: pr
            .merged_at
            .map(|merged| minutes_between(pr.created_at, merged)),
        time_to_first_comment: first_response(pr.author, pr.created_at, comments),
    }
}

/// Minutes until the first comment authored by someone other than the item's
/// own author. Self-replies are skipped entirely; they do not count as a
/// first response.
fn first_response(author: u64, created_at: DateTime<Utc>, comments: &[Comment]) -> Option<i64> {
    comments
        .iter()
        .find(|comment| comment.author != author)
        .map(|comment| minutes_between(created_at, comment.created_at))
}

/// Arithmetic mean of the applicable samples, rounded half-up.
///
/// `None` on empty input: averaging zero samples is undefined and reported
/// as such, never computed as a division by zero.
pub fn average(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().sum();
    Some(round_half_up(sum as f64 / values.len() as f64) as i64)
}
