// photom/src/processors/compressor.rs
use crate::core::{PhotomError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat};
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::webp::WebP;
use img_parts::ImageEXIF;
use oxipng::{optimize_from_memory, Options};
use std::fs;
use std::io::Cursor;
use std::path::Path;

pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Encodes processed images back to disk in their source format, carrying
/// the source's raw EXIF blob into the output unmodified.
#[derive(Debug)]
pub struct Compressor {
    quality: u8,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// Formats this compressor can re-encode with metadata intact.
    pub fn is_writable(format: ImageFormat) -> bool {
        matches!(
            format,
            ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP
        )
    }

    pub fn ensure_writable(format: ImageFormat) -> Result<()> {
        if Self::is_writable(format) {
            Ok(())
        } else {
            Err(PhotomError::UnsupportedFormat(format!("{:?}", format)))
        }
    }

    /// Pull the raw EXIF blob out of an encoded image, if any.
    pub fn extract_exif(data: &[u8], format: ImageFormat) -> Option<Vec<u8>> {
        match format {
            ImageFormat::Jpeg => Jpeg::from_bytes(data.to_vec().into())
                .ok()?
                .exif()
                .map(|exif| exif.to_vec()),
            ImageFormat::Png => Png::from_bytes(data.to_vec().into())
                .ok()?
                .exif()
                .map(|exif| exif.to_vec()),
            ImageFormat::WebP => WebP::from_bytes(data.to_vec().into())
                .ok()?
                .exif()
                .map(|exif| exif.to_vec()),
            _ => None,
        }
    }

    /// Encode `image` as `format`, splice `exif` back in, and write the
    /// result to `path`.
    pub fn save(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: ImageFormat,
        exif: Option<&[u8]>,
    ) -> Result<()> {
        Self::ensure_writable(format)?;

        let mut data = self.encode(image, format)?;
        if let Some(exif) = exif {
            data = embed_exif(data, format, exif)?;
        }

        fs::write(path, &data)?;
        log::debug!("Saved {} ({} bytes)", path.display(), data.len());
        Ok(())
    }

    fn encode(&self, image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());

        match format {
            ImageFormat::Jpeg => {
                let rgb = image.to_rgb8();
                let mut encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
                encoder.encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )?;
            }
            ImageFormat::Png => {
                image.write_to(&mut buffer, ImageFormat::Png)?;
                let optimized = optimize_from_memory(buffer.get_ref(), &Options::default())
                    .map_err(|err| {
                        PhotomError::ProcessingError(format!("PNG optimization failed: {}", err))
                    })?;
                return Ok(optimized);
            }
            ImageFormat::WebP => {
                image.write_to(&mut buffer, ImageFormat::WebP)?;
            }
            other => {
                return Err(PhotomError::UnsupportedFormat(format!("{:?}", other)));
            }
        }

        Ok(buffer.into_inner())
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

fn embed_exif(data: Vec<u8>, format: ImageFormat, exif: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let mut jpeg = Jpeg::from_bytes(data.into()).map_err(|err| {
                PhotomError::ProcessingError(format!("JPEG re-parse failed: {}", err))
            })?;
            jpeg.set_exif(Some(exif.to_vec().into()));
            jpeg.encoder().write_to(&mut output).map_err(|err| {
                PhotomError::ProcessingError(format!("JPEG write failed: {}", err))
            })?;
        }
        ImageFormat::Png => {
            let mut png = Png::from_bytes(data.into()).map_err(|err| {
                PhotomError::ProcessingError(format!("PNG re-parse failed: {}", err))
            })?;
            png.set_exif(Some(exif.to_vec().into()));
            png.encoder().write_to(&mut output).map_err(|err| {
                PhotomError::ProcessingError(format!("PNG write failed: {}", err))
            })?;
        }
        ImageFormat::WebP => {
            let mut webp = WebP::from_bytes(data.into()).map_err(|err| {
                PhotomError::ProcessingError(format!("WebP re-parse failed: {}", err))
            })?;
            webp.set_exif(Some(exif.to_vec().into()));
            webp.encoder().write_to(&mut output).map_err(|err| {
                PhotomError::ProcessingError(format!("WebP write failed: {}", err))
            })?;
        }
        other => {
            return Err(PhotomError::UnsupportedFormat(format!("{:?}", other)));
        }
    }
    Ok(output)
}
