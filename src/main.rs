mod app;

use crate::app::App;
use anyhow::{Context, Result};
use rangefetch::{ConfigBuilder, Downloader};
use std::num::NonZeroUsize;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let app: App = App::new();
    app.init_logging();
    let workers = match app.concurrency {
        Some(n) => n,
        None => std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1),
    };
    let mut builder = ConfigBuilder::default();
    builder
        .workers(workers)
        .idle_timeout(Duration::from_secs(app.idle_timeout));
    if let Some(t) = app.timeout {
        builder.request_timeout(Duration::from_secs(t));
    }
    let config = builder.build().context("Invalid options")?;
    let mut dl = Downloader::new(&app.url, config)
        .with_context(|| format!("Failed to set up download of {}", app.url))?;
    if let Some(p) = &app.output {
        dl.output(p);
    }
    if let Some(hash) = &app.checksum {
        dl.verify(hash.clone());
    }
    #[cfg(feature = "progress")]
    if !app.no_progress {
        let style = rangefetch::ProgressStyle::default_bar()
            .template("{spinner:.green} [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .progress_chars("#>-");
        dl.progress_bar().bar_style(style);
    }
    let transfer = dl
        .download()
        .await
        .with_context(|| format!("Failed to download {}", app.url))?;
    println!("{}", transfer.path.display());
    Ok(())
}
