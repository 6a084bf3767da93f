// photom/src/core/mod.rs
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Worker pool size used when the caller does not ask for one.
pub const DEFAULT_THREADS: usize = 4;

/// Run-wide rule for a pre-existing destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    Reject,
    Overwrite,
}

impl ConflictPolicy {
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite {
            ConflictPolicy::Overwrite
        } else {
            ConflictPolicy::Reject
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub dry_run: bool,
    pub conflict_policy: ConflictPolicy,
    pub threads: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            conflict_policy: ConflictPolicy::Reject,
            threads: DEFAULT_THREADS,
        }
    }
}

/// Terminal state of one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Skipped(String),
    Failed(String),
}

/// Aggregate of per-file outcomes, reduced by the coordinator once all
/// units have finished. Counts only; reduction order never matters.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub skips: Vec<(PathBuf, String)>,
    pub failures: Vec<(PathBuf, String)>,
}

impl RunSummary {
    pub fn record(&mut self, path: &Path, outcome: Outcome) {
        match outcome {
            Outcome::Succeeded => self.succeeded += 1,
            Outcome::Skipped(reason) => {
                self.skipped += 1;
                self.skips.push((path.to_path_buf(), reason));
            }
            Outcome::Failed(reason) => {
                self.failed += 1;
                self.failures.push((path.to_path_buf(), reason));
            }
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Error, Debug)]
pub enum PhotomError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No DateTimeOriginal/DateTimeDigitized/DateTime for {}", .0.display())]
    DatetimeNotFound(PathBuf),

    #[error("{} already exists and overwrite is off", .0.display())]
    DestinationExists(PathBuf),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid target size: {0}")]
    InvalidTarget(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),
}

pub type Result<T> = std::result::Result<T, PhotomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_policy_from_overwrite_flag() {
        assert_eq!(
            ConflictPolicy::from_overwrite(true),
            ConflictPolicy::Overwrite
        );
        assert_eq!(ConflictPolicy::from_overwrite(false), ConflictPolicy::Reject);
    }

    #[test]
    fn summary_counts_and_reasons() {
        let mut summary = RunSummary::default();
        summary.record(Path::new("a.jpg"), Outcome::Succeeded);
        summary.record(Path::new("b.jpg"), Outcome::Skipped("no timestamp".into()));
        summary.record(Path::new("c.jpg"), Outcome::Failed("decode error".into()));

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 3);
        assert!(!summary.is_clean());
        assert_eq!(summary.skips[0].1, "no timestamp");
        assert_eq!(summary.failures[0].0, Path::new("c.jpg"));
    }
}
