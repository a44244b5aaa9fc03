use std::io::{Cursor, Read};

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use zip::ZipArchive;

use super::ExtractedFile;

const PUMP_CHUNK_SIZE: usize = 64 * 1024;
const PUMP_CHANNEL_CAPACITY: usize = 8;

/// Extract the single file from a fully-buffered zip payload.
///
/// Zip stores its central directory at the end of the file, so unlike the
/// tar path the whole payload must already be in memory before any entry
/// can be opened. The first entry is used (single-file assumption, as with
/// tar). Decompression runs on a blocking thread and chunks cross back over
/// a bounded channel; the channel closing early means the client went away,
/// which stops the pump.
///
/// Fails before any payload bytes are produced when the buffer is not a
/// valid zip structure or the archive has zero entries.
#[tracing::instrument(skip(payload))]
pub async fn extract(payload: Bytes) -> Result<ExtractedFile> {
    let mut archive =
        ZipArchive::new(Cursor::new(payload)).context("Failed to parse zip archive")?;
    if archive.len() == 0 {
        return Err(anyhow!("Zip archive contains no entries"));
    }

    let (name, size) = {
        let entry = archive.by_index(0).context("Failed to open zip entry")?;
        (entry.name().to_string(), entry.size())
    };
    debug!("Decompressing zip entry {} ({} bytes declared)", name, size);

    let (tx, rx) = mpsc::channel::<std::io::Result<Bytes>>(PUMP_CHANNEL_CAPACITY);
    tokio::task::spawn_blocking(move || {
        let mut entry = match archive.by_index(0) {
            Ok(entry) => entry,
            Err(e) => {
                let _ = tx.blocking_send(Err(std::io::Error::other(e)));
                return;
            }
        };

        let mut buf = vec![0u8; PUMP_CHUNK_SIZE];
        loop {
            match entry.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.blocking_send(Ok(Bytes::copy_from_slice(&buf[..n]))).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Zip entry decompression failed mid-stream: {}", e);
                    let _ = tx.blocking_send(Err(e));
                    break;
                }
            }
        }
    });

    Ok(ExtractedFile {
        name,
        size: Some(size),
        stream: Box::pin(ReceiverStream::new(rx)),
    })
}
