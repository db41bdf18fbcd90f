//! Fast and simple segmented downloads
//!
//! Fetches a single remote file using multiple concurrent ranged requests when the
//! server supports them, and falls back to one streamed request otherwise.
//! Segments are written to a temporary directory next to the destination and merged
//! in order, the destination only appears once the whole file is in place.
//!
//! The crate exposes debug logs through the [`tracing`][tracing] crate
//!
//! ## Feature flags
//!
//! - `progress`: Enables progress reporting using `indicatif`
//! - `rustls`: Use rustls for HTTPS, on by default
//! - `openssl`: Use openssl for HTTPS
//!
//! ## Crate usage
//!
//! # Example
//!
//! ```no_run
//! use rangefetch::{ConfigBuilder, Downloader};
//! #[tokio::main]
//! async fn main() -> Result<(), rangefetch::Error> {
//!     let config = ConfigBuilder::default().workers(5).build()?;
//!     let client = Downloader::new("https://crates.io/robots.txt", config)?;
//!     let transfer = client.download().await?;
//!     Ok(())
//! }
//! ```
#[macro_use]
extern crate derive_builder;

mod chunk;
mod config;
mod downloader;
mod error;
mod hash;
mod join;
mod merge;
mod probe;
mod progress;
mod single;
mod stream;
mod workspace;

pub use chunk::{Chunks, Segment};
pub use config::{Config, ConfigBuilder, ConfigBuilderError, DEFAULT_BUFFER_SIZE, DEFAULT_USER_AGENT};
pub use downloader::{Downloader, Strategy, Transfer};
pub use error::{Error, FetchError, Result};
pub use hash::Hash;
#[cfg(feature = "progress")]
pub use indicatif::ProgressStyle;
pub use probe::{probe, Metadata};
pub use reqwest::{header, Client, Url};
