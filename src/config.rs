use crate::{Error, Result};
use reqwest::Client;
use std::time::Duration;

/// Default size of the intermediate copy buffer
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;
/// Default `User-Agent` sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("rangefetch/", env!("CARGO_PKG_VERSION"));

/// Settings of a transfer, immutable once the download starts
///
/// # Example
///
/// ```
/// use rangefetch::ConfigBuilder;
/// use std::time::Duration;
/// # fn main() -> Result<(), rangefetch::Error> {
/// let config = ConfigBuilder::default()
///     .workers(8)
///     .idle_timeout(Duration::from_secs(10))
///     .build()?;
/// assert_eq!(config.workers(), 8);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Config {
    /// Amount of concurrent segment fetchers
    #[builder(default = "1")]
    workers: usize,
    #[builder(default = "DEFAULT_BUFFER_SIZE")]
    buffer_size: usize,
    #[builder(default = "Duration::from_secs(30)")]
    connect_timeout: Duration,
    /// Upper bound for a whole request, body included
    #[builder(default, setter(strip_option))]
    request_timeout: Option<Duration>,
    /// Longest wait for response headers or the next body chunk
    #[builder(default = "Duration::from_secs(60)")]
    idle_timeout: Duration,
    #[builder(default = "DEFAULT_USER_AGENT.to_string()", setter(into))]
    user_agent: String,
}

impl ConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.workers == Some(0) {
            return Err("workers must be at least 1".to_string());
        }
        if self.buffer_size == Some(0) {
            return Err("buffer_size must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Config {
    /// Config with the given amount of workers and defaults for everything else
    pub fn new(workers: usize) -> Result<Self> {
        ConfigBuilder::default()
            .workers(workers)
            .build()
            .map_err(Into::into)
    }
    pub fn workers(&self) -> usize {
        self.workers
    }
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
    /// Build the reqwest [`Client`][reqwest::Client] shared by every fetcher of a transfer
    pub fn client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(self.user_agent.as_str())
            .connect_timeout(self.connect_timeout);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(Error::Client)
    }
    pub(crate) fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            buffer_size: self.buffer_size,
            idle_timeout: self.idle_timeout,
        }
    }
}

/// The part of [`Config`] every fetcher task carries
#[derive(Debug, Clone, Copy)]
pub(crate) struct FetchOptions {
    pub(crate) buffer_size: usize,
    pub(crate) idle_timeout: Duration,
}
