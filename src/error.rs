use crate::config::ConfigBuilderError;
use reqwest::StatusCode;
use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinError;

/// Error definition for possible errors in this crate
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure or timeout while probing the resource, nothing was fetched
    #[error("Probe failed: {0}")]
    Probe(#[source] FetchError),
    /// One of the segment fetchers failed, the whole transfer is abandoned
    #[error("Segment {index} failed: {source}")]
    SegmentFetch {
        index: usize,
        #[source]
        source: FetchError,
    },
    /// Failure while concatenating segments into the output
    #[error("Merge failed: {0}")]
    Merge(#[source] io::Error),
    /// The fallback single request failed
    #[error("Download failed: {0}")]
    SingleFetch(#[source] FetchError),
    /// Returned when the configuration doesn't validate
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigBuilderError),
    /// Returned when a plan is requested for zero workers
    #[error("At least one worker is required")]
    NoWorkers,
    /// Returned when the url couldn't be parsed
    #[error("Failed to parse URL: {0}")]
    UrlParse(#[from] url::ParseError),
    /// Returned when there's no filename in the url
    #[error("No filename in url {0}")]
    NoFilename(String),
    /// Returned when the HTTP client couldn't be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Creating or removing the transfer's temporary directory failed
    #[error("Temporary directory error: {0}")]
    Workspace(#[source] io::Error),
    /// Moving the finished file into place failed
    #[error("Failed to write destination: {0}")]
    Persist(#[source] io::Error),
    /// Returned when the checksum didn't match
    #[error("Checksum doesn't match, expected {expected}, got {actual}")]
    Checksum { expected: String, actual: String },
    /// Reading the finished file back for verification failed
    #[error("Failed to read file for verification: {0}")]
    Verify(#[source] io::Error),
    /// Returned when a checksum string couldn't be parsed
    #[error("Invalid checksum {0}, expected ALGO:HEX")]
    BadChecksum(String),
    /// A fetch task panicked
    #[error("Task failed: {0}")]
    Join(#[from] JoinError),
}

/// Failure of a single HTTP retrieval, shared by segment and single-stream fetchers
#[derive(Debug, Error)]
pub enum FetchError {
    /// Represents problems with network connectivity
    #[error("Reqwest error: {0}")]
    Net(#[from] reqwest::Error),
    /// The server answered with an unexpected status
    #[error("Unexpected status {0}")]
    Status(StatusCode),
    /// Represents problems with Tokio based IO
    #[error("Tokio IO error: {0}")]
    Io(#[from] io::Error),
    /// No bytes arrived within the idle timeout
    #[error("No data received for {0:?}")]
    Timeout(Duration),
    /// The body ended with a different amount of bytes than requested
    #[error("Expected {expected} bytes, received {received}")]
    Length { expected: u64, received: u64 },
}

/// Alias for Result<T, rangefetch::Error>
pub type Result<T> = std::result::Result<T, Error>;
