use crate::chunk::Segment;
use crate::{Error, Result};
use std::path::Path;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{self, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, instrument, warn};

/// Concatenate the segment files into `output` in ascending index order.
///
/// `output` must not exist yet. Every segment file is removed once copied.
/// Fails when a segment holds a different amount of bytes than its range or
/// when the total differs from `expected`.
#[instrument(skip(segments, output), fields(segments = segments.len(), output = %output.display()))]
pub(crate) async fn merge(
    segments: &[Segment],
    output: &Path,
    expected: u64,
    buffer_size: usize,
) -> Result<u64> {
    concat(segments, output, expected, buffer_size)
        .await
        .map_err(Error::Merge)
}

async fn concat(
    segments: &[Segment],
    output: &Path,
    expected: u64,
    buffer_size: usize,
) -> io::Result<u64> {
    let mut ordered = segments.iter().filter(|s| !s.is_empty()).collect::<Vec<_>>();
    ordered.sort_by_key(|s| s.index);
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(output)
        .await?;
    let mut out = BufWriter::with_capacity(buffer_size, file);
    let mut written = 0u64;
    for segment in ordered {
        let mut part = BufReader::with_capacity(buffer_size, File::open(&segment.path).await?);
        let n = io::copy_buf(&mut part, &mut out).await?;
        if n != segment.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "segment {} holds {} bytes, expected {}",
                    segment.index,
                    n,
                    segment.len()
                ),
            ));
        }
        written += n;
        debug!("Appended segment {} ({} bytes)", segment.index, n);
        drop(part);
        if let Err(e) = fs::remove_file(&segment.path).await {
            warn!("Failed to remove {}: {}", segment.path.display(), e);
        }
    }
    out.flush().await?;
    if written != expected {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("merged {} bytes, expected {}", written, expected),
        ));
    }
    out.get_ref().sync_all().await?;
    Ok(written)
}
