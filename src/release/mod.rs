//! Upstream release listings and their domain types.

mod github;

use std::fmt;

pub use github::GithubClient;

use crate::archive::ArchiveKind;

/// Repository identifier (owner/repo).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// An uploaded release asset. Read-only to the selection logic; identity is
/// positional within its release's asset list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub download_url: String,
    pub content_type: String,
}

impl ReleaseAsset {
    /// The final path segment of the download URL, which is what platform
    /// matchers run against and what the redirect response advertises.
    pub fn file_name(&self) -> &str {
        self.download_url
            .rsplit('/')
            .next()
            .unwrap_or(&self.download_url)
    }

    pub fn archive_kind(&self) -> ArchiveKind {
        ArchiveKind::from_content_type(&self.content_type)
    }
}

/// A published release, most recent first in the upstream listing.
#[derive(Debug, Clone, Default)]
pub struct Release {
    pub tag: String,
    pub assets: Vec<ReleaseAsset>,
}
