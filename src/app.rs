use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use rangefetch::Hash;
use std::path::PathBuf;

/// Download a file over HTTP(S) using parallel ranged requests
#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub(crate) struct App {
    /// URL to download
    pub(crate) url: String,
    /// Output file or directory, defaults to the last segment of the URL
    #[clap(short, long)]
    pub(crate) output: Option<PathBuf>,
    /// Amount of concurrent segments, defaults to the available parallelism
    #[clap(short = 'n', long)]
    pub(crate) concurrency: Option<usize>,
    /// Checksum to verify against, as ALGO:HEX (sha224, sha256, sha384, sha512, md5)
    #[clap(long)]
    pub(crate) checksum: Option<Hash>,
    /// Upper bound in seconds for every request, body included
    #[clap(long)]
    pub(crate) timeout: Option<u64>,
    /// Seconds to wait for data before a request is considered stalled
    #[clap(long, default_value = "60")]
    pub(crate) idle_timeout: u64,
    /// Don't draw a progress bar
    #[clap(long)]
    pub(crate) no_progress: bool,
    #[clap(flatten)]
    pub(crate) verbose: Verbosity<InfoLevel>,
}

impl App {
    pub(crate) fn new() -> Self {
        Self::parse()
    }
    pub(crate) fn init_logging(&self) {
        pretty_env_logger::formatted_builder()
            .filter_level(self.verbose.log_level_filter())
            .init()
    }
}
