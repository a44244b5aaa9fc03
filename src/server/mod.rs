//! Inbound HTTP surface: routing, shared state, and the request handlers.

pub mod download;
mod home;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use log::info;
use tokio::net::TcpListener;

use crate::asset::MatcherTable;
use crate::http::HttpClient;
use crate::release::GithubClient;

/// Shared, read-only state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub github: GithubClient,
    pub fetcher: HttpClient,
    pub matchers: Arc<MatcherTable>,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/{username}/{repo}", get(download::download))
        .with_state(state)
}

/// Serve requests on the given listener until the process is stopped.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    info!("Listening at http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .await
        .context("Server terminated unexpectedly")
}
