// photom/src/testing.rs
//! Test support: synthesized photo fixtures.
//!
//! The suite needs images carrying specific EXIF datetime tags. Rather than
//! shipping binary fixtures, these helpers encode a small gradient image and
//! splice in a hand-built little-endian TIFF block as the EXIF payload:
//! `DateTime` lives in IFD0, `DateTimeOriginal`/`DateTimeDigitized` in the
//! Exif sub-IFD reached through the 0x8769 pointer.

use image::{ImageFormat, Rgb, RgbImage};
use img_parts::jpeg::Jpeg;
use img_parts::ImageEXIF;
use std::io::Cursor;
use std::path::Path;

/// Canonical fixture instants, shared across the suite.
pub const DATETIME_ORIGINAL_VALUE: &str = "2017:05:28 06:00:49";
pub const DATETIME_VALUE: &str = "2017:07:02 16:54:00";

const TAG_DATETIME: u16 = 0x0132;
const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_DATETIME_ORIGINAL: u16 = 0x9003;
const TAG_DATETIME_DIGITIZED: u16 = 0x9004;

const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;

/// Build a minimal EXIF (TIFF) block holding the given datetime tags.
///
/// Values must be longer than four bytes (they are stored through offsets,
/// never inline), which every datetime string is.
pub fn build_exif(
    datetime: Option<&str>,
    datetime_original: Option<&str>,
    datetime_digitized: Option<&str>,
) -> Vec<u8> {
    let ifd0_values: Vec<(u16, &str)> =
        datetime.map(|v| (TAG_DATETIME, v)).into_iter().collect();
    let exif_values: Vec<(u16, &str)> = datetime_original
        .map(|v| (TAG_DATETIME_ORIGINAL, v))
        .into_iter()
        .chain(datetime_digitized.map(|v| (TAG_DATETIME_DIGITIZED, v)))
        .collect();

    let ifd0_entries = ifd0_values.len() + usize::from(!exif_values.is_empty());
    let ifd0_offset = 8u32;
    let ifd0_len = 2 + 12 * ifd0_entries + 4;
    let exif_ifd_offset = ifd0_offset + ifd0_len as u32;
    let exif_ifd_len = if exif_values.is_empty() {
        0
    } else {
        2 + 12 * exif_values.len() + 4
    };
    let data_base = exif_ifd_offset + exif_ifd_len as u32;

    // Lay out the value area first so every entry knows its offset.
    let mut tail = Vec::new();
    let mut offsets = Vec::new();
    for (_, value) in ifd0_values.iter().chain(exif_values.iter()) {
        debug_assert!(value.len() + 1 > 4);
        offsets.push(data_base + tail.len() as u32);
        tail.extend_from_slice(value.as_bytes());
        tail.push(0);
        if tail.len() % 2 == 1 {
            tail.push(0);
        }
    }

    let mut exif = Vec::new();
    exif.extend_from_slice(b"II");
    exif.extend_from_slice(&42u16.to_le_bytes());
    exif.extend_from_slice(&ifd0_offset.to_le_bytes());

    let mut next_offset = offsets.iter().copied();

    exif.extend_from_slice(&(ifd0_entries as u16).to_le_bytes());
    for (tag, value) in &ifd0_values {
        push_entry(
            &mut exif,
            *tag,
            TYPE_ASCII,
            value.len() as u32 + 1,
            next_offset.next().unwrap(),
        );
    }
    if !exif_values.is_empty() {
        push_entry(&mut exif, TAG_EXIF_IFD, TYPE_LONG, 1, exif_ifd_offset);
    }
    exif.extend_from_slice(&0u32.to_le_bytes());

    if !exif_values.is_empty() {
        exif.extend_from_slice(&(exif_values.len() as u16).to_le_bytes());
        for (tag, value) in &exif_values {
            push_entry(
                &mut exif,
                *tag,
                TYPE_ASCII,
                value.len() as u32 + 1,
                next_offset.next().unwrap(),
            );
        }
        exif.extend_from_slice(&0u32.to_le_bytes());
    }

    exif.extend_from_slice(&tail);
    exif
}

fn push_entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
    buf.extend_from_slice(&tag.to_le_bytes());
    buf.extend_from_slice(&kind.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf.extend_from_slice(&value.to_le_bytes());
}

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 7) % 256) as u8,
            ((y * 5) % 256) as u8,
            ((x + y) % 256) as u8,
        ])
    })
}

/// Encode a gradient JPEG at `path`, with the given EXIF block if any.
pub fn write_jpeg(path: &Path, width: u32, height: u32, exif: Option<Vec<u8>>) {
    let mut data = Vec::new();
    gradient(width, height)
        .write_to(&mut Cursor::new(&mut data), ImageFormat::Jpeg)
        .unwrap();

    let data = match exif {
        None => data,
        Some(exif) => {
            let mut jpeg = Jpeg::from_bytes(data.into()).unwrap();
            jpeg.set_exif(Some(exif.into()));
            let mut out = Vec::new();
            jpeg.encoder().write_to(&mut out).unwrap();
            out
        }
    };

    std::fs::write(path, &data).unwrap();
}

/// JPEG with `DateTimeOriginal` and a *differing* `DateTime`, so precedence
/// is observable.
pub fn jpeg_with_datetime_original(path: &Path) {
    write_jpeg(
        path,
        32,
        24,
        Some(build_exif(
            Some(DATETIME_VALUE),
            Some(DATETIME_ORIGINAL_VALUE),
            None,
        )),
    );
}

/// JPEG with only the `DateTime` tag.
pub fn jpeg_with_datetime(path: &Path) {
    write_jpeg(path, 32, 24, Some(build_exif(Some(DATETIME_VALUE), None, None)));
}

/// JPEG with no EXIF at all.
pub fn jpeg_no_datetime(path: &Path) {
    write_jpeg(path, 32, 24, None);
}

/// Larger JPEG with no EXIF, for downsize assertions.
pub fn jpeg_no_datetime_large(path: &Path) {
    write_jpeg(path, 256, 192, None);
}

/// A PNG cut off halfway: the header still probes (so it classifies as an
/// image) but a full decode fails.
pub fn truncated_png(path: &Path) {
    let mut data = Vec::new();
    gradient(256, 192)
        .write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
        .unwrap();
    data.truncate(data.len() / 2);
    std::fs::write(path, &data).unwrap();
}

/// A BMP: decodable, but outside the writable output set.
pub fn bmp_image(path: &Path) {
    gradient(64, 48).save_with_format(path, ImageFormat::Bmp).unwrap();
}
