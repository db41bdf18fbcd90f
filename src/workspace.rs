use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;
use tracing::debug;

const PREFIX: &str = ".rangefetch-";

/// Temporary directory owned by a single transfer.
///
/// Lives next to the destination so the finished file can be renamed into
/// place. Dropping it removes the directory and everything inside.
#[derive(Debug)]
pub(crate) struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub(crate) fn create(destination: &Path) -> Result<Self> {
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir_in(parent)
            .map_err(Error::Workspace)?;
        debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }
    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }
    /// Directory the segment files go to
    pub(crate) fn parts(&self) -> PathBuf {
        self.dir.path().join("parts")
    }
    /// File the output is assembled in before it's moved to the destination
    pub(crate) fn staging(&self) -> PathBuf {
        self.dir.path().join("output")
    }
    pub(crate) async fn persist(&self, staged: &Path, destination: &Path) -> Result<()> {
        fs::rename(staged, destination)
            .await
            .map_err(Error::Persist)?;
        debug!("Moved {} to {}", staged.display(), destination.display());
        Ok(())
    }
    /// Remove the directory, reporting failures that a drop would swallow
    pub(crate) fn close(self) -> Result<()> {
        self.dir.close().map_err(Error::Workspace)
    }
}
