use crate::config::FetchOptions;
use crate::error::FetchError;
use crate::progress::Progress;
use crate::stream;
use crate::{Error, Result};
use reqwest::header::RANGE;
use reqwest::{Client, StatusCode, Url};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::BufWriter;
use tracing::{debug, instrument};

/// Iterator over the segments of a remote file.
///
/// Splits `[0, length)` into `workers` contiguous pieces of `length / workers`
/// bytes, the last one taking the remainder. Empty pieces are skipped.
#[derive(Debug, Clone)]
pub struct Chunks {
    length: u64,
    workers: u64,
    base: u64,
    current: u64,
    dir: PathBuf,
}

impl Chunks {
    /// Create the iterator
    /// # Arguments
    /// * `length` - total length of the resource in bytes
    /// * `workers` - desired amount of segments
    /// * `dir` - directory the segment files will be written to
    pub fn new(length: u64, workers: usize, dir: impl AsRef<Path>) -> Result<Self> {
        if workers == 0 {
            return Err(Error::NoWorkers);
        }
        let workers = workers as u64;
        Ok(Chunks {
            length,
            workers,
            base: length / workers,
            current: 0,
            dir: dir.as_ref().to_path_buf(),
        })
    }
}

impl Iterator for Chunks {
    type Item = Segment;
    fn next(&mut self) -> Option<Self::Item> {
        while self.current < self.workers {
            let index = self.current;
            self.current += 1;
            let start = index * self.base;
            let end = if index == self.workers - 1 {
                self.length
            } else {
                start + self.base
            };
            if start < end {
                return Some(Segment {
                    index: index as usize,
                    start,
                    end,
                    path: self.dir.join(format!("part-{:05}", index)),
                });
            }
        }
        None
    }
}

/// One contiguous byte range `[start, end)` of the resource and the file holding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position in the merge order
    pub index: usize,
    /// First byte, inclusive
    pub start: u64,
    /// Last byte, exclusive
    pub end: u64,
    pub path: PathBuf,
}

impl Segment {
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// `Range` header value selecting exactly this segment.
    ///
    /// The wire format is inclusive on both ends, so the exclusive `end` becomes `end - 1`.
    pub fn range_header(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(format!("bytes={}-{}", self.start, self.end - 1))
        }
    }

    #[instrument(skip(self, client, url, opts, progress), fields(index = self.index, start = self.start, end = self.end))]
    pub(crate) async fn download(
        self,
        client: Client,
        url: Url,
        opts: FetchOptions,
        progress: Progress,
    ) -> Result<Self> {
        let range = match self.range_header() {
            Some(r) => r,
            None => {
                debug!("Empty segment, nothing to fetch");
                return Ok(self);
            }
        };
        match self.fetch(&client, url, range, opts, &progress).await {
            Ok(n) => {
                debug!("Written {} bytes to {}", n, self.path.display());
                Ok(self)
            }
            Err(source) => Err(Error::SegmentFetch {
                index: self.index,
                source,
            }),
        }
    }

    async fn fetch(
        &self,
        client: &Client,
        url: Url,
        range: String,
        opts: FetchOptions,
        progress: &Progress,
    ) -> std::result::Result<u64, FetchError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let resp = stream::send(client.get(url).header(RANGE, range), opts.idle_timeout).await?;
        // a 200 here means the Range header was ignored and the full body follows
        if resp.status() != StatusCode::PARTIAL_CONTENT {
            return Err(FetchError::Status(resp.status()));
        }
        let file = fs::File::create(&self.path).await?;
        let mut out = BufWriter::with_capacity(opts.buffer_size, file);
        let received = stream::copy_body(resp, &mut out, opts.idle_timeout, progress).await?;
        if received != self.len() {
            return Err(FetchError::Length {
                expected: self.len(),
                received,
            });
        }
        Ok(received)
    }
}
