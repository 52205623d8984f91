//! GitHub API access and conversion into the crate's own snapshot types.
//!
//! Everything here is read-only: items are fetched once per run, converted,
//! and never mutated afterwards. The issue-listing endpoint returns pull
//! requests too; [`only_issues`] strips those before they count against the
//! item cap.

use crate::config::{RepoId, PER_PAGE};
use crate::fetch::{collect_pages, FetchedPage};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use octocrab::params;
use octocrab::Octocrab;
use std::future::Future;
use std::time::Duration as StdDuration;

/// A closed issue as reported by the issue-listing endpoint.
#[derive(Debug, Clone)]
pub struct Issue {
    pub number: u64,
    /// Numeric id of the user who opened the issue.
    pub author: u64,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// True when the entry is actually backed by a pull request.
    pub pull_request: bool,
}

/// A closed pull request. A pull request can close without merging, so the
/// two timestamps are independently optional.
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    pub author: u64,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// One comment on an issue or pull request, in thread order.
#[derive(Debug, Clone)]
pub struct Comment {
    pub author: u64,
    pub created_at: DateTime<Utc>,
}

/// Drops entries that are pull requests in disguise, preserving order.
pub fn only_issues(items: Vec<Issue>) -> Vec<Issue> {
    items.into_iter().filter(|issue| !issue.pull_request).collect()
}

pub struct GitHubClient {
    octocrab: Octocrab,
    request_timeout: StdDuration,
}

impl GitHubClient {
    pub fn new(token: Option<String>, request_timeout: StdDuration) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }

        Ok(Self {
            octocrab: builder.build()?,
            request_timeout,
        })
    }

    /// Fetches up to `max_items` closed issues, newest first, with
    /// pull-request-backed entries already stripped. The cap counts true
    /// issues, so stripping happens per page before accumulation.
    pub async fn closed_issues(&self, repo: &RepoId, max_items: usize) -> Result<Vec<Issue>> {
        collect_pages(max_items, |page| async move {
            let fetched = self
                .bounded(
                    self.octocrab
                        .issues(repo.owner.clone(), repo.repo.clone())
                        .list()
                        .state(params::State::Closed)
                        .sort(params::issues::Sort::Created)
                        .direction(params::Direction::Descending)
                        .per_page(PER_PAGE)
                        .page(page)
                        .send(),
                )
                .await?;

            Ok(FetchedPage {
                items: only_issues(fetched.items.iter().map(issue_from_api).collect()),
                has_next: fetched.next.is_some(),
            })
        })
        .await
    }

    /// Fetches up to `max_items` closed pull requests, newest first.
    pub async fn closed_pull_requests(
        &self,
        repo: &RepoId,
        max_items: usize,
    ) -> Result<Vec<PullRequest>> {
        collect_pages(max_items, |page| async move {
            let fetched = self
                .bounded(
                    self.octocrab
                        .pulls(repo.owner.clone(), repo.repo.clone())
                        .list()
                        .state(params::State::Closed)
                        .sort(params::pulls::Sort::Created)
                        .direction(params::Direction::Descending)
                        .per_page(PER_PAGE)
                        .page(page)
                        .send(),
                )
                .await?;

            Ok(FetchedPage {
                items: fetched.items.iter().filter_map(pull_request_from_api).collect(),
                has_next: fetched.next.is_some(),
            })
        })
        .await
    }

    /// Fetches the full comment thread for one issue or pull request, in
    /// ascending creation order as the API returns it.
    pub async fn issue_comments(&self, repo: &RepoId, number: u64) -> Result<Vec<Comment>> {
        collect_pages(usize::MAX, |page| async move {
            let fetched = self
                .bounded(
                    self.octocrab
                        .issues(repo.owner.clone(), repo.repo.clone())
                        .list_comments(number)
                        .per_page(PER_PAGE)
                        .page(page)
                        .send(),
                )
                .await?;

            Ok(FetchedPage {
                items: fetched.items.iter().map(comment_from_api).collect(),
                has_next: fetched.next.is_some(),
            })
        })
        .await
    }

    /// Bounds one API call by the configured request timeout.
    async fn bounded<T>(&self, fut: impl Future<Output = octocrab::Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(anyhow!(
                "GitHub request timed out after {:?}",
                self.request_timeout
            )),
        }
    }
}

fn issue_from_api(raw: &octocrab::models::issues::Issue) -> Issue {
    Issue {
        number: raw.number,
        author: raw.user.id.into_inner(),
        created_at: raw.created_at,
        closed_at: raw.closed_at,
        pull_request: raw.pull_request.is_some(),
    }
}

/// The list endpoint can omit `created_at` and `user`; such entries carry
/// nothing measurable and are skipped.
fn pull_request_from_api(raw: &octocrab::models::pulls::PullRequest) -> Option<PullRequest> {
    let created_at = raw.created_at?;
    let author = raw.user.as_ref()?.id.into_inner();

    Some(PullRequest {
        number: raw.number,
        author,
        created_at,
        closed_at: raw.closed_at,
        merged_at: raw.merged_at,
    })
}

fn comment_from_api(raw: &octocrab::models::issues::Comment) -> Comment {
    Comment {
        author: raw.user.id.into_inner(),
        created_at: raw.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issue(number: u64, pull_request: bool) -> Issue {
        Issue {
            number,
            author: 7,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            closed_at: None,
            pull_request,
        }
    }

    #[test]
    fn only_issues_strips_pull_request_backed_entries_in_order() {
        let mixed = vec![
            issue(1, false),
            issue(2, true),
            issue(3, false),
            issue(4, true),
            issue(5, false),
        ];

        let numbers: Vec<u64> = only_issues(mixed).iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![1, 3, 5]);
    }

    #[test]
    fn only_issues_keeps_an_all_issue_page_intact() {
        let items = vec![issue(10, false), issue(11, false)];
        assert_eq!(only_issues(items).len(), 2);
    }
}
