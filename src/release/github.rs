//! GitHub release-listing client.

use anyhow::Result;
use log::debug;

use crate::http::HttpClient;

use super::{Release, ReleaseAsset, RepoId};

/// GitHub API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Release {
        pub tag_name: String,
        pub assets: Vec<Asset>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Asset {
        pub browser_download_url: String,
        pub content_type: String,
    }
}

/// Fetches release listings from the GitHub API.
#[derive(Clone)]
pub struct GithubClient {
    http: HttpClient,
    api_url: String,
}

impl GithubClient {
    pub fn new(http: HttpClient, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
        }
    }

    /// Fetch the releases for a repository, ordered most-recent-first by
    /// the upstream API. Only the head of the list is ever consumed, so no
    /// pagination is attempted.
    #[tracing::instrument(skip(self))]
    pub async fn releases(&self, repo: &RepoId) -> Result<Vec<Release>> {
        let url = format!("{}/repos/{}/{}/releases", self.api_url, repo.owner, repo.repo);
        debug!("Fetching releases from {}...", url);

        let parsed: Vec<api::Release> = self.http.get_json(&url).await?;
        Ok(parsed.into_iter().map(Into::into).collect())
    }
}

impl From<api::Release> for Release {
    fn from(r: api::Release) -> Self {
        Release {
            tag: r.tag_name,
            assets: r.assets.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<api::Asset> for ReleaseAsset {
    fn from(a: api::Asset) -> Self {
        ReleaseAsset {
            download_url: a.browser_download_url,
            content_type: a.content_type,
        }
    }
}
