use crate::stream;
use crate::{Error, Result};
use reqwest::header::{HeaderMap, ACCEPT_RANGES, CONTENT_LENGTH};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument};

/// What a HEAD request revealed about the remote resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Total length in bytes, `None` when the server didn't report it
    pub length: Option<u64>,
    /// Server answered with success and `Accept-Ranges: bytes`
    pub accepts_ranges: bool,
}

impl Metadata {
    pub(crate) fn from_headers(success: bool, headers: &HeaderMap) -> Self {
        let length = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let accepts_ranges = success
            && headers
                .get_all(ACCEPT_RANGES)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|v| v.split(','))
                .any(|unit| unit.trim().eq_ignore_ascii_case("bytes"));
        Self {
            length,
            accepts_ranges,
        }
    }
}

/// Learn length and range support of `url` without transferring the body.
///
/// Only transport errors and a server silent for longer than `idle_timeout`
/// fail the probe, an error status just means the resource can't be segmented.
#[instrument(skip(client, url), fields(URL=%url))]
pub async fn probe(client: &Client, url: &Url, idle_timeout: Duration) -> Result<Metadata> {
    let resp = stream::send(client.head(url.clone()), idle_timeout)
        .await
        .map_err(Error::Probe)?;
    // reqwest reports a zero content_length() for HEAD, so the header is read directly
    let meta = Metadata::from_headers(resp.status().is_success(), resp.headers());
    debug!("Probed: {:?}", meta);
    Ok(meta)
}
