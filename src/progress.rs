#[cfg(feature = "progress")]
use indicatif::ProgressBar;

/// Cloneable progress handle shared by every fetcher of a transfer.
///
/// Without the `progress` feature this is a no-op.
#[derive(Debug, Clone, Default)]
pub(crate) struct Progress {
    #[cfg(feature = "progress")]
    bar: Option<ProgressBar>,
}

impl Progress {
    #[cfg(feature = "progress")]
    pub(crate) fn new(bar: Option<ProgressBar>) -> Self {
        Self { bar }
    }
    pub(crate) fn inc(&self, n: u64) {
        #[cfg(feature = "progress")]
        if let Some(bar) = &self.bar {
            bar.inc(n);
        }
        #[cfg(not(feature = "progress"))]
        let _ = n;
    }
    pub(crate) fn set_length(&self, len: u64) {
        #[cfg(feature = "progress")]
        if let Some(bar) = &self.bar {
            bar.set_length(len);
        }
        #[cfg(not(feature = "progress"))]
        let _ = len;
    }
    pub(crate) fn finish(&self) {
        #[cfg(feature = "progress")]
        if let Some(bar) = &self.bar {
            bar.finish();
        }
    }
    pub(crate) fn abandon(&self) {
        #[cfg(feature = "progress")]
        if let Some(bar) = &self.bar {
            bar.abandon();
        }
    }
}
