pub mod tar_gz;
pub mod zip;

use bytes::Bytes;
use futures_util::stream::BoxStream;

/// Archive format of a release asset, derived from its declared content
/// type.
///
/// The two supported formats have incompatible resource shapes: tar+gzip
/// decodes as a stream while zip needs the whole payload in memory. Callers
/// dispatch on this tag and fetch accordingly rather than going through a
/// shared extractor interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGzip,
    Zip,
    Unsupported,
}

impl ArchiveKind {
    pub fn from_content_type(content_type: &str) -> Self {
        match content_type {
            "application/x-gzip" => ArchiveKind::TarGzip,
            "application/zip" => ArchiveKind::Zip,
            _ => ArchiveKind::Unsupported,
        }
    }
}

/// Decompressed bytes flowing toward one response body.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// The single file extracted from a release archive.
///
/// `size` is the length declared by the archive metadata, when the format
/// records one. The stream is bounded to one response; dropping it on any
/// exit path releases the underlying network connection.
pub struct ExtractedFile {
    pub name: String,
    pub size: Option<u64>,
    pub stream: ByteStream,
}
