use std::fmt;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures_util::TryStreamExt;
use log::{error, info, warn};
use serde::Deserialize;

use crate::archive::{self, ArchiveKind, ExtractedFile};
use crate::asset::{self, PlatformRequest};
use crate::release::{ReleaseAsset, RepoId};

use super::AppState;

/// Query parameters accepted by the download endpoint. Unknown parameters
/// and unrecognized values are ignored rather than rejected.
#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    os: Option<String>,
    arch: Option<String>,
    uncompress: Option<String>,
}

/// Terminal failures of a download request, mapped onto status codes.
///
/// Nothing here is retried; each variant is reported to the caller as a
/// plain-text diagnostic.
#[derive(Debug)]
pub enum DownloadError {
    /// The upstream release listing could not be fetched or decoded.
    ReleaseLookup(anyhow::Error),
    /// The repository has no releases at all.
    NoReleases,
    /// No asset in the latest release satisfies both platform matchers.
    NoMatchingAsset,
    /// Extraction was requested but the asset's declared content type has
    /// no extraction strategy.
    UnsupportedArchive(String),
    /// The asset bytes could not be fetched for extraction.
    AssetFetch(anyhow::Error),
    /// The fetched asset was not a decodable archive.
    Extraction(anyhow::Error),
}

impl DownloadError {
    fn status(&self) -> StatusCode {
        match self {
            DownloadError::NoReleases
            | DownloadError::NoMatchingAsset
            | DownloadError::UnsupportedArchive(_) => StatusCode::BAD_REQUEST,
            DownloadError::ReleaseLookup(_)
            | DownloadError::AssetFetch(_)
            | DownloadError::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::ReleaseLookup(_) => {
                write!(f, "Unable to get the latest release from GitHub")
            }
            DownloadError::NoReleases => write!(f, "No GitHub releases for this repository"),
            DownloadError::NoMatchingAsset => {
                write!(f, "No release asset matches the requested platform")
            }
            DownloadError::UnsupportedArchive(content_type) => {
                write!(f, "Cannot uncompress an asset of type {}", content_type)
            }
            DownloadError::AssetFetch(_) => {
                write!(f, "Unable to download the release asset from GitHub")
            }
            DownloadError::Extraction(_) => write!(f, "Unable to uncompress the release asset"),
        }
    }
}

impl std::error::Error for DownloadError {}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        match &self {
            DownloadError::ReleaseLookup(e)
            | DownloadError::AssetFetch(e)
            | DownloadError::Extraction(e) => error!("{}: {:#}", self, e),
            _ => warn!("{}", self),
        }
        (self.status(), format!("{}\n", self)).into_response()
    }
}

/// Resolve the latest release of `{username}/{repo}`, pick the asset for
/// the caller's platform, and either redirect to it or stream its
/// decompressed contents.
#[tracing::instrument(skip_all)]
pub async fn download(
    State(state): State<AppState>,
    Path((username, repo)): Path<(String, String)>,
    Query(params): Query<DownloadParams>,
    headers: HeaderMap,
) -> Result<Response, DownloadError> {
    let request = PlatformRequest::from_params(
        params.os.as_deref(),
        params.arch.as_deref(),
        params.uncompress.as_deref(),
    );
    let repo = RepoId {
        owner: username,
        repo,
    };
    info!("New download request for {} with {:?}", repo, request);

    let releases = state
        .github
        .releases(&repo)
        .await
        .map_err(DownloadError::ReleaseLookup)?;
    let latest = releases.first().ok_or(DownloadError::NoReleases)?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let criteria = state.matchers.criteria(&request, user_agent);
    let asset = asset::select(&latest.assets, &criteria).ok_or(DownloadError::NoMatchingAsset)?;
    info!("Selected asset {} for {}", asset.download_url, repo);

    if !request.uncompress {
        return Ok(redirect_response(asset));
    }

    let extracted = match asset.archive_kind() {
        ArchiveKind::TarGzip => {
            let source = state
                .fetcher
                .get_stream(&asset.download_url)
                .await
                .map_err(DownloadError::AssetFetch)?;
            archive::tar_gz::extract(source)
                .await
                .map_err(DownloadError::Extraction)?
        }
        ArchiveKind::Zip => {
            let payload = state
                .fetcher
                .get_bytes(&asset.download_url)
                .await
                .map_err(DownloadError::AssetFetch)?;
            archive::zip::extract(payload)
                .await
                .map_err(DownloadError::Extraction)?
        }
        ArchiveKind::Unsupported => {
            return Err(DownloadError::UnsupportedArchive(asset.content_type.clone()));
        }
    };

    Ok(file_response(extracted))
}

fn redirect_response(asset: &ReleaseAsset) -> Response {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(header::LOCATION, asset.download_url.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", asset.file_name()),
        )
        .body(Body::empty())
        .unwrap()
}

/// Stream an extracted file to the caller. Once these headers are flushed a
/// mid-stream failure can only truncate the body; it is logged where it
/// happens but never rewritten into an error page.
fn file_response(file: ExtractedFile) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.name),
        );
    if let Some(size) = file.size {
        builder = builder.header(header::CONTENT_LENGTH, size);
    }
    let body = file
        .stream
        .inspect_err(|e| warn!("Response body truncated mid-stream: {}", e));
    builder.body(Body::from_stream(body)).unwrap()
}
