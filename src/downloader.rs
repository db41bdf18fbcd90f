use crate::chunk::Chunks;
use crate::config::Config;
use crate::join::join_all;
use crate::merge::merge;
use crate::probe::{probe, Metadata};
use crate::progress::Progress;
use crate::single;
use crate::workspace::Workspace;
use crate::{Error, Hash, Result};
#[cfg(feature = "progress")]
use indicatif::ProgressBar;
use reqwest::{Client, Url};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// How the resource gets fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Parallel ranged requests over `length` bytes, merged afterwards
    Segmented { length: u64 },
    /// One plain request streamed to disk
    Single,
}

impl Strategy {
    /// Segment only when the server takes ranges, reported a length, and
    /// that length gives every worker at least one byte
    pub fn select(meta: &Metadata, workers: usize) -> Self {
        match meta.length {
            Some(length) if meta.accepts_ranges && length >= workers as u64 => {
                Self::Segmented { length }
            }
            _ => Self::Single,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Probing,
    SegmentedFetch,
    SingleFetch,
    Merging,
    Done,
    Failed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Probing => "probing",
            Self::SegmentedFetch => "segmented fetch",
            Self::SingleFetch => "single fetch",
            Self::Merging => "merging",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Where the file was written
    pub path: PathBuf,
    /// Bytes written
    pub bytes: u64,
    pub strategy: Strategy,
}

#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    url: Url,
    output: Option<PathBuf>,
    config: Config,
    hash: Option<Hash>,
    #[cfg(feature = "progress")]
    pb: Option<ProgressBar>,
}

impl Downloader {
    /// Create a new downloader
    ///
    /// # Arguments
    /// * `url` - URL of the file
    /// * `config` - transfer settings, including the amount of concurrent tasks
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rangefetch::{Config, Downloader};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), rangefetch::Error> {
    /// let downloader = Downloader::new("https://crates.io/robots.txt", Config::new(5)?)?;
    /// let transfer = downloader.download().await?;
    /// println!("{} bytes in {}", transfer.bytes, transfer.path.display());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(url: &str, config: Config) -> Result<Self> {
        let url = Url::parse(url)?;
        let client = config.client()?;
        Ok(Self {
            client,
            url,
            output: None,
            config,
            hash: None,
            #[cfg(feature = "progress")]
            pb: None,
        })
    }
    pub fn url(&self) -> &Url {
        &self.url
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub(crate) fn url_to_filename(url: &Url) -> Result<String> {
        url.path_segments()
            .and_then(|segments| segments.last())
            .and_then(|name| {
                if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                }
            })
            .ok_or_else(|| Error::NoFilename(url.to_string()))
    }
    /// Set the output path, if it's a directory then the filename from the url is used inside it
    pub fn output(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }
    /// Add a checksum to verify against before the file is moved into place
    /// # Arguments
    /// * `hash` - [`Hash`][crate::Hash] to verify against
    pub fn verify(&mut self, hash: Hash) -> &mut Self {
        self.hash = Some(hash);
        self
    }
    /// Enable progress reporting
    #[cfg(feature = "progress")]
    pub fn progress_bar(&mut self) -> &mut Self {
        self.pb = Some(ProgressBar::new(0));
        self
    }
    /// Set the progress bar style
    #[cfg(feature = "progress")]
    pub fn bar_style(&self, style: indicatif::ProgressStyle) {
        if let Some(pb) = &self.pb {
            pb.set_style(style);
        }
    }
    fn progress(&self) -> Progress {
        #[cfg(feature = "progress")]
        return Progress::new(self.pb.clone());
        #[cfg(not(feature = "progress"))]
        return Progress::default();
    }
    /// Final path of the downloaded file
    pub fn destination(&self) -> Result<PathBuf> {
        match &self.output {
            Some(path) if path.is_dir() => Ok(path.join(Self::url_to_filename(&self.url)?)),
            Some(path) => Ok(path.clone()),
            None => Ok(PathBuf::from(Self::url_to_filename(&self.url)?)),
        }
    }

    /// Download the file to its destination, verifying it if a hash is set.
    ///
    /// The destination only appears once the file is complete. On failure no
    /// destination is written and the temporary directory is removed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rangefetch::{Config, Downloader, Hash};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), rangefetch::Error> {
    /// let hash = "sha256:039058c6f2c0cb492c533b0a4d14ef77cc0f78abccced5287d84a1a2011cfb81".parse::<Hash>()?;
    /// let mut client = Downloader::new("https://crates.io/robots.txt", Config::new(4)?)?;
    /// client.output("/tmp").verify(hash);
    /// client.download().await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(URL=%self.url, tasks=%self.config.workers()))]
    pub async fn download(&self) -> Result<Transfer> {
        let destination = self.destination()?;
        let progress = self.progress();
        match self.run(&destination, &progress).await {
            Ok(transfer) => {
                progress.finish();
                info!(
                    "{}: {} bytes written to {}",
                    State::Done,
                    transfer.bytes,
                    transfer.path.display()
                );
                Ok(transfer)
            }
            Err(e) => {
                progress.abandon();
                warn!("{}: {}", State::Failed, e);
                Err(e)
            }
        }
    }

    async fn run(&self, destination: &Path, progress: &Progress) -> Result<Transfer> {
        info!("{}", State::Probing);
        let meta = probe(&self.client, &self.url, self.config.idle_timeout()).await?;
        let strategy = Strategy::select(&meta, self.config.workers());
        let workspace = Workspace::create(destination)?;
        let staged = workspace.staging();
        let bytes = match strategy {
            Strategy::Segmented { length } => {
                self.segmented(length, &workspace, &staged, progress).await?
            }
            Strategy::Single => {
                info!("{}", State::SingleFetch);
                single::download(
                    &self.client,
                    &self.url,
                    &staged,
                    meta.length,
                    self.config.fetch_options(),
                    progress,
                )
                .await?
            }
        };
        if let Some(hash) = &self.hash {
            hash.verify_file(&staged, self.config.buffer_size()).await?;
        }
        workspace.persist(&staged, destination).await?;
        if let Err(e) = workspace.close() {
            warn!("Failed to remove temporary directory: {}", e);
        }
        Ok(Transfer {
            path: destination.to_path_buf(),
            bytes,
            strategy,
        })
    }

    async fn segmented(
        &self,
        length: u64,
        workspace: &Workspace,
        staged: &Path,
        progress: &Progress,
    ) -> Result<u64> {
        info!("{}", State::SegmentedFetch);
        progress.set_length(length);
        let segments = Chunks::new(length, self.config.workers(), workspace.parts())?
            .collect::<Vec<_>>();
        debug!(
            "File size: {}MB, {} segments in {}",
            length / 1_000_000,
            segments.len(),
            workspace.path().display()
        );
        let opts = self.config.fetch_options();
        let handles = segments
            .into_iter()
            .map(|segment| {
                tokio::spawn(segment.download(
                    self.client.clone(),
                    self.url.clone(),
                    opts,
                    progress.clone(),
                ))
            })
            .collect::<Vec<_>>();
        let fetched = join_all(handles).await?;
        info!("{}", State::Merging);
        merge(&fetched, staged, length, opts.buffer_size).await
    }
}
