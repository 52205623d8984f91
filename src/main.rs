use clap::Parser;
use repolag::config::{RepoId, RunConfig};
use repolag::github::GitHubClient;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Report average response latency for a GitHub repository's closed issues
/// and pull requests.
#[derive(Parser)]
#[command(name = "repolag", version)]
struct Args {
    /// GitHub access token
    #[arg(env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Repository owner (e.g., "rust-lang")
    owner: String,

    /// Repository name (e.g., "cargo")
    repo: String,

    /// Maximum number of issues (and, separately, pull requests) to sample
    #[arg(default_value_t = 100)]
    count: usize,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    // Load a .env file if present, so GITHUB_TOKEN can come from there.
    dotenvy::dotenv().ok();

    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repolag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = RunConfig {
        repo: RepoId {
            owner: args.owner,
            repo: args.repo,
        },
        max_items: args.count,
        request_timeout: Duration::from_secs(args.timeout_secs),
    };

    let client = match GitHubClient::new(Some(args.token), config.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("failed to build GitHub client: {e:#}");
            std::process::exit(1);
        }
    };

    let report = match repolag::run(&client, &config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("report for {} failed: {e:#}", config.repo);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("failed to serialize report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{report}");
    }
}
