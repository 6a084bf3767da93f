// photom/src/processors/metadata.rs
use crate::core::{PhotomError, Result};
use chrono::NaiveDateTime;
use exif::{Field, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Textual pattern EXIF uses for its datetime tags.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

// Precedence order. The first tag present wins; later tags are not
// consulted even if the winner fails to parse.
const CREATION_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Return the creation instant recorded in a photo's EXIF tags.
///
/// Tries `DateTimeOriginal`, then `DateTimeDigitized`, then `DateTime`.
/// A missing EXIF segment, absence of all three tags, or an unparsable
/// value in the winning tag yields [`PhotomError::DatetimeNotFound`];
/// a default is never fabricated. The source file is not modified.
pub fn creation_time(path: &Path) -> Result<NaiveDateTime> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(&file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => {
            return Err(PhotomError::DatetimeNotFound(path.to_path_buf()));
        }
        Err(err) => {
            return Err(PhotomError::ProcessingError(format!(
                "EXIF read error for {}: {}",
                path.display(),
                err
            )));
        }
    };

    for tag in CREATION_TAGS {
        if let Some(field) = exif.get_field(tag, In::PRIMARY) {
            return parse_datetime_field(path, tag, field);
        }
    }

    Err(PhotomError::DatetimeNotFound(path.to_path_buf()))
}

fn parse_datetime_field(path: &Path, tag: Tag, field: &Field) -> Result<NaiveDateTime> {
    let text = match field.value {
        Value::Ascii(ref values) if !values.is_empty() => {
            String::from_utf8_lossy(&values[0]).into_owned()
        }
        _ => return Err(PhotomError::DatetimeNotFound(path.to_path_buf())),
    };
    let text = text.trim_end_matches('\0').trim();

    log::debug!("Found {}: {:?} in {}", tag, text, path.display());

    NaiveDateTime::parse_from_str(text, EXIF_DATETIME_FORMAT)
        .map_err(|_| PhotomError::DatetimeNotFound(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn fails_without_any_datetime_tag() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("no_datetime.jpg");
        testing::jpeg_no_datetime(&path);

        let err = creation_time(&path).unwrap_err();
        assert!(matches!(err, PhotomError::DatetimeNotFound(_)));
    }

    #[test]
    fn reads_datetime_original() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("with_original.jpg");
        testing::jpeg_with_datetime_original(&path);

        let actual = creation_time(&path).unwrap();
        assert_eq!(actual, datetime(2017, 5, 28, 6, 0, 49));
    }

    #[test]
    fn falls_back_to_datetime() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("with_datetime.jpg");
        testing::jpeg_with_datetime(&path);

        let actual = creation_time(&path).unwrap();
        assert_eq!(actual, datetime(2017, 7, 2, 16, 54, 0));
    }

    #[test]
    fn original_wins_over_differing_datetime() {
        // jpeg_with_datetime_original carries both tags with different
        // values; DateTimeOriginal must win.
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("both.jpg");
        testing::jpeg_with_datetime_original(&path);

        let actual = creation_time(&path).unwrap();
        assert_eq!(actual, datetime(2017, 5, 28, 6, 0, 49));
    }

    #[test]
    fn digitized_wins_over_datetime() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("digitized.jpg");
        let exif = testing::build_exif(
            Some(testing::DATETIME_VALUE),
            None,
            Some("2016:01:02 03:04:05"),
        );
        testing::write_jpeg(&path, 32, 24, Some(exif));

        let actual = creation_time(&path).unwrap();
        assert_eq!(actual, datetime(2016, 1, 2, 3, 4, 5));
    }

    #[test]
    fn unparsable_winning_tag_is_absence() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("garbled.jpg");
        let exif = testing::build_exif(Some("not a datetime"), None, None);
        testing::write_jpeg(&path, 32, 24, Some(exif));

        let err = creation_time(&path).unwrap_err();
        assert!(matches!(err, PhotomError::DatetimeNotFound(_)));
    }
}
