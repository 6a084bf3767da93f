// photom/src/processors/renamer.rs
use crate::core::{ConflictPolicy, Outcome, PhotomError, Result, RunOptions};
use crate::processors::metadata;
use std::fs;
use std::path::{Path, PathBuf};

/// Rendering of the creation instant used for canonical basenames.
pub const DEFAULT_NAME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Computed (source, destination) pair for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl RenamePlan {
    /// The file already carries its canonical name.
    pub fn is_noop(&self) -> bool {
        self.source == self.dest
    }
}

/// Renames photos in place to a timestamp-derived canonical name.
pub struct Renamer {
    format: String,
    conflict_policy: ConflictPolicy,
    dry_run: bool,
}

impl Renamer {
    pub fn new(options: &RunOptions) -> Self {
        Self {
            format: DEFAULT_NAME_FORMAT.to_string(),
            conflict_policy: options.conflict_policy,
            dry_run: options.dry_run,
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    /// Compute the canonical destination for `path`.
    ///
    /// The basename is the rendered creation instant plus the original
    /// extension, case preserved. Fails with `DatetimeNotFound` when the
    /// photo carries no usable creation timestamp.
    pub fn plan(&self, path: &Path) -> Result<RenamePlan> {
        let taken = metadata::creation_time(path)?;
        let mut name = taken.format(&self.format).to_string();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            name.push('.');
            name.push_str(ext);
        }
        Ok(RenamePlan {
            source: path.to_path_buf(),
            dest: path.with_file_name(name),
        })
    }

    /// Carry out a plan under the configured conflict policy.
    ///
    /// The conflict check runs before the dry-run gate so a dry run reports
    /// the same `DestinationExists` failures a real run would.
    pub fn apply(&self, plan: &RenamePlan) -> Result<Outcome> {
        if plan.is_noop() {
            log::info!("No renaming required for {}", plan.source.display());
            return Ok(Outcome::Skipped("already canonically named".to_string()));
        }

        log::info!(
            "Rename {} -> {}",
            plan.source.display(),
            plan.dest.display()
        );

        if plan.dest.exists() {
            match self.conflict_policy {
                ConflictPolicy::Reject => {
                    return Err(PhotomError::DestinationExists(plan.dest.clone()));
                }
                ConflictPolicy::Overwrite => {
                    log::warn!("Overwriting {}", plan.dest.display());
                }
            }
        }

        if self.dry_run {
            return Ok(Outcome::Succeeded);
        }

        // On Windows rename cannot replace an existing file; the source
        // stays in place until the rename below lands, so a crash inside
        // this window loses only the old destination.
        #[cfg(windows)]
        if plan.dest.exists() {
            fs::remove_file(&plan.dest)?;
        }

        fs::rename(&plan.source, &plan.dest)?;
        Ok(Outcome::Succeeded)
    }

    /// Per-file unit of work: plan, then apply. A photo without a creation
    /// timestamp is skipped, not failed.
    pub fn process(&self, path: &Path) -> Result<Outcome> {
        let plan = match self.plan(path) {
            Ok(plan) => plan,
            Err(PhotomError::DatetimeNotFound(_)) => {
                log::info!("No creation time for {}, skipping", path.display());
                return Ok(Outcome::Skipped("no creation timestamp".to_string()));
            }
            Err(err) => return Err(err),
        };
        self.apply(&plan)
    }
}
