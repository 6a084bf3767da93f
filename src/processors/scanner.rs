// photom/src/processors/scanner.rs
use image::ImageReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Returns true if the file can be opened as a raster image.
///
/// Only the header is probed; pixel data is not decoded. Unreadable,
/// truncated-at-the-header, or non-image files yield false, never an error.
pub fn is_image(path: &Path) -> bool {
    let reader = match ImageReader::open(path) {
        Ok(reader) => reader,
        Err(_) => return false,
    };
    let reader = match reader.with_guessed_format() {
        Ok(reader) => reader,
        Err(_) => return false,
    };
    if reader.format().is_none() {
        return false;
    }
    reader.into_dimensions().is_ok()
}

/// Walk `root` recursively and return every file that classifies as an
/// image, in lexicographic order per directory.
///
/// Entries that cannot be read (permissions, dangling symlinks) are logged
/// at warn and skipped; they never abort the scan.
pub fn scan(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            if is_image(path) {
                log::debug!("Found {}", path.display());
                true
            } else {
                log::debug!("Not an image, ignoring: {}", path.display());
                false
            }
        })
        .collect()
}
