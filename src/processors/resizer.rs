// photom/src/processors/resizer.rs
use crate::core::{ConflictPolicy, Outcome, PhotomError, Result, RunOptions};
use crate::processors::compressor::Compressor;
use crate::utils::format_file_size;
use image::imageops::FilterType;
use image::{GenericImageView, ImageReader};
use std::fs;
use std::path::{Path, PathBuf};

/// One image under processing: where it lives, where it sits relative to
/// the scan root, and what the header says about it.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub source: PathBuf,
    pub relative: PathBuf,
    pub width: u32,
    pub height: u32,
    pub byte_size: u64,
}

impl ImageRecord {
    /// Header-only probe: dimensions and on-disk size, no pixel decode.
    pub fn probe(path: &Path, root: &Path) -> Result<Self> {
        let relative = path
            .strip_prefix(root)
            .map_err(|_| {
                PhotomError::InvalidParameter(format!(
                    "{} is not under {}",
                    path.display(),
                    root.display()
                ))
            })?
            .to_path_buf();
        let byte_size = fs::metadata(path)?.len();
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()?;

        Ok(Self {
            source: path.to_path_buf(),
            relative,
            width,
            height,
            byte_size,
        })
    }
}

/// Computed geometry change for one file. The ratio is derived from this
/// file's own byte size, so plans are never reused across files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizePlan {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub from: (u32, u32),
    pub to: (u32, u32),
}

/// Pixel geometry targeting `target_bytes` from a file of `byte_size`
/// bytes: `r = sqrt(target/size)`, each axis rounded and floored at 1.
///
/// Best effort only. Compression behavior after resampling is not modeled,
/// so the re-encoded output may land above or below the target.
pub fn target_dimensions(from: (u32, u32), byte_size: u64, target_bytes: u64) -> (u32, u32) {
    if byte_size == 0 {
        return from;
    }
    let ratio = (target_bytes as f64 / byte_size as f64).sqrt();
    let width = ((from.0 as f64 * ratio).round() as u32).max(1);
    let height = ((from.1 as f64 * ratio).round() as u32).max(1);
    (width, height)
}

/// Downsizes photos toward a byte budget, mirroring the source tree under
/// a destination root and carrying EXIF through unmodified.
#[derive(Debug)]
pub struct Downsizer {
    target_bytes: u64,
    source_root: PathBuf,
    out_root: PathBuf,
    filter: FilterType,
    compressor: Compressor,
    conflict_policy: ConflictPolicy,
    dry_run: bool,
}

impl Downsizer {
    pub fn new(
        target_bytes: u64,
        source_root: &Path,
        out_root: &Path,
        options: &RunOptions,
    ) -> Result<Self> {
        if target_bytes == 0 {
            return Err(PhotomError::InvalidTarget(
                "target byte size must be positive".to_string(),
            ));
        }

        Ok(Self {
            target_bytes,
            source_root: source_root.to_path_buf(),
            out_root: out_root.to_path_buf(),
            filter: FilterType::Lanczos3,
            compressor: Compressor::default(),
            conflict_policy: options.conflict_policy,
            dry_run: options.dry_run,
        })
    }

    /// Compute destination and target geometry for `path`.
    pub fn plan(&self, path: &Path) -> Result<ResizePlan> {
        let record = ImageRecord::probe(path, &self.source_root)?;
        let to = target_dimensions(
            (record.width, record.height),
            record.byte_size,
            self.target_bytes,
        );

        Ok(ResizePlan {
            dest: self.out_root.join(&record.relative),
            source: record.source,
            from: (record.width, record.height),
            to,
        })
    }

    /// Carry out a plan: decode, resample, re-encode with the source's
    /// EXIF blob re-attached, writing under the destination root.
    pub fn apply(&self, plan: &ResizePlan) -> Result<Outcome> {
        log::info!(
            "Downsize {} ({}x{}) -> {} ({}x{})",
            plan.source.display(),
            plan.from.0,
            plan.from.1,
            plan.dest.display(),
            plan.to.0,
            plan.to.1
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

        let data = fs::read(&plan.source)?;
        let format = image::guess_format(&data)?;
        Compressor::ensure_writable(format)?;

        let exif = Compressor::extract_exif(&data, format);
        let decoded = image::load_from_memory(&data)?;

        let resized = if plan.to == decoded.dimensions() {
            decoded
        } else {
            decoded.resize_exact(plan.to.0, plan.to.1, self.filter)
        };

        if let Some(parent) = plan.dest.parent() {
            fs::create_dir_all(parent)?;
        }
        self.compressor
            .save(&resized, &plan.dest, format, exif.as_deref())?;

        log::debug!(
            "Downsized {} -> {}",
            format_file_size(data.len() as u64),
            format_file_size(fs::metadata(&plan.dest)?.len())
        );
        Ok(Outcome::Succeeded)
    }

    /// Per-file unit of work: plan, then apply.
    pub fn process(&self, path: &Path) -> Result<Outcome> {
        let plan = self.plan(path)?;
        self.apply(&plan)
    }
}
