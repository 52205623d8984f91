pub mod config;
pub mod fetch;
pub mod github;
pub mod metrics;
pub mod report;

use anyhow::Result;
use config::RunConfig;
use github::GitHubClient;
use report::{IssueAggregator, LatencyReport, PullRequestAggregator};

/// Runs one full reporting pass: closed issues, then closed pull requests,
/// each with its comment thread, strictly sequentially.
///
/// A failed issue or pull request listing aborts the run. A failed comment
/// fetch for a single item is logged and counted; that item keeps its
/// close/merge deltas (which need no comments) and is excluded from the
/// first-comment average only.
pub async fn run(client: &GitHubClient, config: &RunConfig) -> Result<LatencyReport> {
    let mut comment_fetch_failures = 0usize;

    let issues = client.closed_issues(&config.repo, config.max_items).await?;
    tracing::info!(repo = %config.repo, count = issues.len(), "fetched closed issues");

    let mut issue_agg = IssueAggregator::default();
    for issue in &issues {
        let comments = match client.issue_comments(&config.repo, issue.number).await {
            Ok(comments) => comments,
            Err(e) => {
                comment_fetch_failures += 1;
                tracing::warn!(
                    issue = issue.number,
                    error = %e,
                    "failed to fetch comment thread; first-comment delta unavailable"
                );
                Vec::new()
            }
        };
        issue_agg.record(metrics::issue_deltas(issue, &comments));
    }

    let prs = client
        .closed_pull_requests(&config.repo, config.max_items)
        .await?;
    tracing::info!(repo = %config.repo, count = prs.len(), "fetched closed pull requests");

    let mut pr_agg = PullRequestAggregator::default();
    for pr in &prs {
        let comments = match client.issue_comments(&config.repo, pr.number).await {
            Ok(comments) => comments,
            Err(e) => {
                comment_fetch_failures += 1;
                tracing::warn!(
                    pull_request = pr.number,
                    error = %e,
                    "failed to fetch comment thread; first-comment delta unavailable"
                );
                Vec::new()
            }
        };
        pr_agg.record(metrics::pull_request_deltas(pr, &comments));
    }

    Ok(LatencyReport {
        repo: config.repo.to_string(),
        issues: issue_agg.finish(),
        pull_requests: pr_agg.finish(),
        comment_fetch_failures,
    })
}
