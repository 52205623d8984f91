//! Run configuration for a single reporting pass.
//!
//! The repository identity and fetch limits live in an explicit config
//! struct passed by reference through every fetch call; nothing about the
//! target repository is ambient process state.

use std::fmt;
use std::time::Duration as StdDuration;

/// A unique identifier for a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepoId {
    /// The owner of the repository (e.g., "rust-lang").
    pub owner: String,
    /// The name of the repository (e.g., "cargo").
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Items requested per page. The GitHub API maximum, to minimize round trips.
pub const PER_PAGE: u8 = 100;

/// Settings governing one reporting run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// The repository to report on.
    pub repo: RepoId,

    /// Cap on the number of closed issues (and, separately, pull requests)
    /// to include. Full pages are fetched, so the fetcher may overshoot and
    /// truncate back down to this count.
    pub max_items: usize,

    /// Upper bound on each individual GitHub API request.
    pub request_timeout: StdDuration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_id_displays_as_owner_slash_repo() {
        let id = RepoId {
            owner: "rust-lang".to_string(),
            repo: "cargo".to_string(),
        };
        assert_eq!(id.to_string(), "rust-lang/cargo");
    }
}
