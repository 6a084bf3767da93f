// photom/src/processors/mod.rs
mod batch;
mod compressor;
mod metadata;
mod renamer;
mod resizer;
mod scanner;

pub use batch::{run_downsize, run_rename, BatchRunner};
pub use compressor::{Compressor, DEFAULT_JPEG_QUALITY};
pub use metadata::{creation_time, EXIF_DATETIME_FORMAT};
pub use renamer::{RenamePlan, Renamer, DEFAULT_NAME_FORMAT};
pub use resizer::{target_dimensions, Downsizer, ImageRecord, ResizePlan};
pub use scanner::{is_image, scan};

pub mod prelude {
    pub use super::{
        creation_time, is_image, run_downsize, run_rename, scan, BatchRunner, Compressor,
        Downsizer, Renamer,
    };
}
