use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use futures_util::TryStreamExt;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::archive::ByteStream;

/// Total deadline for small API calls (release listings).
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Time allowed to establish an upstream connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle-read deadline for asset downloads. A total deadline would cut off
/// large but healthy transfers, so only stalls are bounded.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared reqwest client with the service's deadlines applied.
pub fn default_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(CONNECT_TIMEOUT)
        .read_timeout(READ_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Thin wrapper around a shared [`reqwest::Client`].
///
/// Every failure is terminal for the current request; nothing here retries.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .timeout(API_TIMEOUT)
            .send()
            .await
            .context("Failed to send request")?
            .error_for_status()
            .context("Upstream returned an error status")?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Fetches a URL fully into memory. Used for zip assets, which cannot
    /// be decoded without random access over the whole payload.
    #[tracing::instrument(skip(self))]
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        debug!("GET bytes from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to start download request")?
            .error_for_status()
            .context("Upstream returned an error status")?;

        response
            .bytes()
            .await
            .context("Failed to read download body")
    }

    /// Opens a URL as a chunked byte stream. Dropping the stream aborts the
    /// transfer and releases the connection.
    #[tracing::instrument(skip(self))]
    pub async fn get_stream(&self, url: &str) -> Result<ByteStream> {
        debug!("GET stream from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to start download request")?
            .error_for_status()
            .context("Upstream returned an error status")?;

        Ok(Box::pin(
            response.bytes_stream().map_err(std::io::Error::other),
        ))
    }
}
