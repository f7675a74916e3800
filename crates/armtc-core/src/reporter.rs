//! Reporter trait for dependency injection
//!
//! This trait allows the install pipeline to report progress and status
//! without being coupled to a specific terminal or CI log format.

use std::path::Path;

use crate::resolver::Distribution;

pub trait Reporter: Send + Sync {
    /// Indicates a new phase has started (e.g. "Downloading", "Extracting").
    fn section(&self, title: &str);

    /// Updates the progress of an archive download.
    fn downloading(&self, dist: &Distribution, current: u64, total: Option<u64>);

    /// Marks the install as finished at `path`.
    fn done(&self, dist: &Distribution, path: &Path, from_cache: bool);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn downloading(&self, dist: &Distribution, current: u64, total: Option<u64>) {
        (**self).downloading(dist, current, total);
    }
    fn done(&self, dist: &Distribution, path: &Path, from_cache: bool) {
        (**self).done(dist, path, from_cache);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn downloading(&self, _: &Distribution, _: u64, _: Option<u64>) {}
    fn done(&self, _: &Distribution, _: &Path, _: bool) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
}
