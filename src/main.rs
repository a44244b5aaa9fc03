use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use getbin::asset::MatcherTable;
use getbin::http::{HttpClient, default_client};
use getbin::release::GithubClient;
use getbin::server::{self, AppState};

/// getbin - GitHub release download server
///
/// Resolves the latest release of a GitHub repository and redirects to the
/// asset matching the requested platform, or decompresses it on the fly.
///
/// Examples:
///   getbin                        # serve on 127.0.0.1:8000
///   getbin --listen 0.0.0.0:80    # serve publicly
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Address to listen on (also via GETBIN_LISTEN)
    #[arg(
        long,
        env = "GETBIN_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8000"
    )]
    listen: SocketAddr,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(
        long = "api-url",
        env = "GETBIN_API_URL",
        value_name = "URL",
        default_value = "https://api.github.com"
    )]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let http = HttpClient::new(default_client()?);
    let state = AppState {
        github: GithubClient::new(http.clone(), &cli.api_url),
        fetcher: http,
        matchers: Arc::new(MatcherTable::default()),
    };

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("Failed to bind {}", cli.listen))?;
    server::serve(listener, state).await
}
