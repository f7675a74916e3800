//! Console reporter.
//!
//! Writes phase and progress lines to stderr so stdout stays reserved for
//! `key=value` results.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use armtc_core::{Distribution, Reporter};

use super::progress::{STEP, format_progress, format_size, percent};

/// Reporter printing to stderr, throttled to one progress line per step.
#[derive(Debug)]
pub struct ConsoleReporter {
    /// Last printed percent, `u64::MAX` before the first line
    last_step: AtomicU64,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            last_step: AtomicU64::new(u64::MAX),
        }
    }

    /// Whether a progress line for `pct` should be printed, recording it if so.
    fn should_print(&self, pct: u64) -> bool {
        let step = pct / STEP * STEP;
        self.last_step.swap(step, Ordering::Relaxed) != step
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        eprintln!("==> {title}");
    }

    fn downloading(&self, dist: &Distribution, current: u64, total: Option<u64>) {
        match percent(current, total) {
            Some(pct) if self.should_print(pct) => {
                eprintln!("    {}  {}", dist.file_name(), format_progress(current, total));
            }
            Some(_) => {}
            None if current == 0 => eprintln!("    {}  fetching", dist.file_name()),
            None => tracing::trace!(downloaded = %format_size(current), "download progress"),
        }
    }

    fn done(&self, dist: &Distribution, path: &Path, from_cache: bool) {
        let source = if from_cache { "cache" } else { "download" };
        eprintln!(
            "==> LLVM {} ({}) ready at {} [{source}]",
            dist.release,
            dist.platform,
            path.display()
        );
    }

    fn info(&self, msg: &str) {
        eprintln!("    {msg}");
    }

    fn warning(&self, msg: &str) {
        eprintln!("warning: {msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_once_per_step() {
        let reporter = ConsoleReporter::new();
        assert!(reporter.should_print(0));
        assert!(!reporter.should_print(3));
        assert!(reporter.should_print(10));
        assert!(!reporter.should_print(19));
        assert!(reporter.should_print(100));
        assert!(!reporter.should_print(100));
    }
}
