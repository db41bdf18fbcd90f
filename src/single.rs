use crate::config::FetchOptions;
use crate::error::FetchError;
use crate::progress::Progress;
use crate::stream;
use crate::{Error, Result};
use reqwest::{Client, Url};
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::BufWriter;
use tracing::{debug, instrument};

/// Fetch the whole resource with one plain GET, streaming it into `output`
/// through a buffer of `opts.buffer_size` bytes.
///
/// The body must match the response's `Content-Length`, or `probed` when the
/// response carries none.
#[instrument(skip(client, url, output, opts, progress), fields(URL=%url))]
pub(crate) async fn download(
    client: &Client,
    url: &Url,
    output: &Path,
    probed: Option<u64>,
    opts: FetchOptions,
    progress: &Progress,
) -> Result<u64> {
    fetch(client, url, output, probed, opts, progress)
        .await
        .map_err(Error::SingleFetch)
}

async fn fetch(
    client: &Client,
    url: &Url,
    output: &Path,
    probed: Option<u64>,
    opts: FetchOptions,
    progress: &Progress,
) -> std::result::Result<u64, FetchError> {
    let resp = stream::send(client.get(url.clone()), opts.idle_timeout).await?;
    if !resp.status().is_success() {
        return Err(FetchError::Status(resp.status()));
    }
    let expected = resp.content_length().or(probed);
    if let Some(len) = expected {
        progress.set_length(len);
    }
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(output)
        .await?;
    let mut out = BufWriter::with_capacity(opts.buffer_size, file);
    let written = stream::copy_body(resp, &mut out, opts.idle_timeout, progress).await?;
    if let Some(expected) = expected {
        if written != expected {
            return Err(FetchError::Length {
                expected,
                received: written,
            });
        }
    }
    out.get_ref().sync_all().await?;
    debug!("Written {} bytes", written);
    Ok(written)
}
