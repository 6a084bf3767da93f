// photom/src/processors/batch.rs
use crate::core::{Outcome, PhotomError, Result, RunOptions, RunSummary};
use crate::processors::renamer::Renamer;
use crate::processors::resizer::Downsizer;
use crate::processors::scanner;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Fans per-file units of work across a bounded worker pool and reduces
/// their outcomes into a [`RunSummary`] once every unit has finished.
pub struct BatchRunner {
    thread_pool: Option<rayon::ThreadPool>,
}

impl BatchRunner {
    /// `threads == 0` falls back to rayon's global pool.
    pub fn new(threads: usize) -> Result<Self> {
        let thread_pool = if threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|err| {
                    PhotomError::ProcessingError(format!("Failed to create thread pool: {}", err))
                })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self { thread_pool })
    }

    /// Run `op` for every path, in parallel. Errors never escape a unit:
    /// each is logged and recorded as a failed outcome, and the batch runs
    /// to completion regardless. Returns only after all units finish.
    pub fn run<F>(&self, paths: &[PathBuf], op: F) -> RunSummary
    where
        F: Fn(&Path) -> Result<Outcome> + Sync,
    {
        let progress = create_progress_bar(paths.len());

        let dispatch = || {
            paths
                .par_iter()
                .progress_with(progress.clone())
                .map(|path| (path.clone(), isolate(&op, path)))
                .collect::<Vec<_>>()
        };

        let outcomes = match &self.thread_pool {
            Some(pool) => pool.install(dispatch),
            None => dispatch(),
        };
        progress.finish_and_clear();

        let mut summary = RunSummary::default();
        for (path, outcome) in outcomes {
            summary.record(&path, outcome);
        }
        summary
    }
}

fn isolate<F>(op: &F, path: &Path) -> Outcome
where
    F: Fn(&Path) -> Result<Outcome>,
{
    match op(path) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("Failed {}: {}", path.display(), err);
            Outcome::Failed(err.to_string())
        }
    }
}

/// Rename every photo under `dir_path` (or a single photo file) in place
/// using its embedded creation date.
pub fn run_rename(dir_path: &Path, options: &RunOptions) -> Result<RunSummary> {
    let (_, paths) = discover(dir_path)?;
    let renamer = Renamer::new(options);
    let runner = BatchRunner::new(options.threads)?;

    let summary = runner.run(&paths, |path| renamer.process(path));
    log_summary("rename", &summary);
    Ok(summary)
}

/// Downsize every photo under `source` (or a single photo file) toward
/// `target_bytes`, mirroring the tree under `out_dir`.
pub fn run_downsize(
    source: &Path,
    out_dir: &Path,
    target_bytes: u64,
    options: &RunOptions,
) -> Result<RunSummary> {
    validate_out_dir(source, out_dir)?;

    let (root, paths) = discover(source)?;
    // Engine construction validates the byte target before any unit runs.
    let downsizer = Downsizer::new(target_bytes, &root, out_dir, options)?;
    let runner = BatchRunner::new(options.threads)?;

    let summary = runner.run(&paths, |path| downsizer.process(path));
    log_summary("downsize", &summary);
    Ok(summary)
}

/// Resolve an input path into a scan root and the file set to process.
///
/// A directory is scanned recursively; a single file degenerates to one
/// unit of work with relative paths rooted at its parent directory. An
/// unreadable or missing input is fatal, before any batch work starts.
fn discover(input: &Path) -> Result<(PathBuf, Vec<PathBuf>)> {
    if !input.exists() {
        return Err(PhotomError::InvalidParameter(format!(
            "Input path does not exist: {}",
            input.display()
        )));
    }
    let input = std::fs::canonicalize(input)?;

    if input.is_file() {
        let root = input
            .parent()
            .unwrap_or_else(|| Path::new("/"))
            .to_path_buf();
        if scanner::is_image(&input) {
            return Ok((root, vec![input]));
        }
        log::warn!("Not a decodable image: {}", input.display());
        return Ok((root, Vec::new()));
    }

    let paths = scanner::scan(&input);
    if paths.is_empty() {
        log::warn!("No image files found in {}", input.display());
    }
    Ok((input, paths))
}

fn validate_out_dir(source: &Path, out_dir: &Path) -> Result<()> {
    if out_dir.exists() && !out_dir.is_dir() {
        return Err(PhotomError::InvalidParameter(format!(
            "Output path exists but is not a directory: {}",
            out_dir.display()
        )));
    }
    if source == out_dir {
        return Err(PhotomError::InvalidParameter(
            "Source and output directories cannot be the same".to_string(),
        ));
    }
    Ok(())
}

fn log_summary(operation: &str, summary: &RunSummary) {
    log::info!(
        "{}: {} succeeded, {} skipped, {} failed",
        operation,
        summary.succeeded,
        summary.skipped,
        summary.failed
    );
    for (path, reason) in &summary.skips {
        log::info!("Skipped {}: {}", path.display(), reason);
    }
    for (path, reason) in &summary.failures {
        log::warn!("Failed {}: {}", path.display(), reason);
    }
}

fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress
}
