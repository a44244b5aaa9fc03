use anyhow::{Context, Result, anyhow};
use async_compression::tokio::bufread::GzipDecoder;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use log::debug;
use tokio_tar::Archive;
use tokio_util::io::{ReaderStream, StreamReader};

use super::ExtractedFile;

/// Extract the single file from a gzip-compressed tar stream.
///
/// Decompression and tar parsing are both incremental, so nothing beyond
/// the decoder's working buffers is held in memory. Only the first entry is
/// read: these archives are assumed to contain exactly one file, so there
/// is no name lookup and no directory skipping.
///
/// Fails before any payload bytes are produced when the gzip envelope
/// cannot be decoded or the archive has no entry; failures past that point
/// surface through the returned stream.
#[tracing::instrument(skip(source))]
pub async fn extract<S>(source: S) -> Result<ExtractedFile>
where
    S: Stream<Item = std::io::Result<Bytes>> + Send + Unpin + 'static,
{
    let decoder = GzipDecoder::new(StreamReader::new(source));
    let mut archive = Archive::new(decoder);

    let mut entries = archive.entries().context("Failed to open tar stream")?;
    let entry = entries
        .next()
        .await
        .ok_or_else(|| anyhow!("Archive contains no entries"))?
        .context("Failed to decode gzip-compressed tar data")?;

    let (name, size) = {
        let size = entry
            .header()
            .entry_size()
            .context("Failed to read tar entry size")?;
        let path = entry.path().context("Failed to read tar entry name")?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        (name, size)
    };

    debug!("Streaming tar entry {} ({} bytes declared)", name, size);

    Ok(ExtractedFile {
        name,
        size: Some(size),
        stream: Box::pin(ReaderStream::new(entry)),
    })
}
