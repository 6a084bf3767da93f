use assert_fs::prelude::*;
use assert_fs::TempDir;
use photom::testing;
use photom::{creation_time, run_downsize, run_rename, ConflictPolicy, RunOptions};
use std::fs;
use std::path::Path;

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn rename_names_photos_after_their_creation_date() {
    let temp_dir = TempDir::new().unwrap();
    testing::jpeg_with_datetime_original(temp_dir.child("a.jpg").path());
    testing::jpeg_with_datetime(temp_dir.child("b.jpg").path());
    testing::jpeg_no_datetime(temp_dir.child("c.jpg").path());

    let summary = run_rename(temp_dir.path(), &RunOptions::default()).unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        listing(temp_dir.path()),
        vec![
            "2017-05-28T06:00:49.jpg".to_string(),
            "2017-07-02T16:54:00.jpg".to_string(),
            "c.jpg".to_string(),
        ]
    );
}

#[test]
fn rerunning_rename_is_a_no_op() {
    let temp_dir = TempDir::new().unwrap();
    testing::jpeg_with_datetime_original(temp_dir.child("a.jpg").path());
    testing::jpeg_no_datetime(temp_dir.child("c.jpg").path());

    run_rename(temp_dir.path(), &RunOptions::default()).unwrap();
    let names_after_first = listing(temp_dir.path());

    let second = run_rename(temp_dir.path(), &RunOptions::default()).unwrap();

    assert_eq!(second.succeeded, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(second.failed, 0);
    assert_eq!(listing(temp_dir.path()), names_after_first);
}

#[test]
fn downsize_mirrors_the_source_tree() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.child("source");
    source.create_dir_all().unwrap();
    source.child("trip").create_dir_all().unwrap();

    testing::jpeg_no_datetime_large(source.child("big.jpg").path());
    testing::jpeg_no_datetime_large(source.child("trip").child("nested.jpg").path());

    let out = temp_dir.child("out");
    let summary = run_downsize(source.path(), out.path(), 1, &RunOptions::default()).unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert!(out.child("big.jpg").path().exists());
    assert!(out.child("trip").child("nested.jpg").path().exists());

    let in_size = fs::metadata(source.child("big.jpg").path()).unwrap().len();
    let out_size = fs::metadata(out.child("big.jpg").path()).unwrap().len();
    assert!(out_size < in_size);
}

#[test]
fn downsize_carries_exif_into_the_output() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.child("source");
    source.create_dir_all().unwrap();

    let tagged = source.child("tagged.jpg");
    testing::write_jpeg(
        tagged.path(),
        256,
        192,
        Some(testing::build_exif(
            None,
            Some(testing::DATETIME_ORIGINAL_VALUE),
            None,
        )),
    );

    let out = temp_dir.child("out");
    run_downsize(source.path(), out.path(), 1, &RunOptions::default()).unwrap();

    let taken = creation_time(out.child("tagged.jpg").path()).unwrap();
    assert_eq!(
        taken.format("%Y:%m:%d %H:%M:%S").to_string(),
        testing::DATETIME_ORIGINAL_VALUE
    );
}

#[test]
fn dry_run_plans_without_touching_anything() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.child("source");
    source.create_dir_all().unwrap();
    testing::jpeg_with_datetime_original(source.child("a.jpg").path());
    testing::jpeg_no_datetime_large(source.child("big.jpg").path());

    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };

    let rename_summary = run_rename(source.path(), &options).unwrap();
    let out = temp_dir.child("out");
    let downsize_summary = run_downsize(source.path(), out.path(), 1, &options).unwrap();

    // Plans were computed for every unit...
    assert_eq!(rename_summary.succeeded, 1);
    assert_eq!(downsize_summary.succeeded, 2);
    // ...but nothing on disk changed.
    assert_eq!(listing(source.path()), vec!["a.jpg", "big.jpg"]);
    assert!(!out.path().exists());
}

#[test]
fn downsize_overwrite_replaces_previous_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.child("source");
    source.create_dir_all().unwrap();
    testing::jpeg_no_datetime_large(source.child("big.jpg").path());

    let out = temp_dir.child("out");
    out.create_dir_all().unwrap();
    fs::write(out.child("big.jpg").path(), b"stale output").unwrap();

    let rejected = run_downsize(source.path(), out.path(), 1, &RunOptions::default()).unwrap();
    assert_eq!(rejected.failed, 1);
    assert_eq!(
        fs::read(out.child("big.jpg").path()).unwrap(),
        b"stale output"
    );

    let options = RunOptions {
        conflict_policy: ConflictPolicy::Overwrite,
        ..RunOptions::default()
    };
    let replaced = run_downsize(source.path(), out.path(), 1, &options).unwrap();
    assert_eq!(replaced.succeeded, 1);
    assert_ne!(
        fs::read(out.child("big.jpg").path()).unwrap(),
        b"stale output"
    );
}

#[test]
fn single_photo_can_be_renamed() {
    let temp_dir = TempDir::new().unwrap();
    let photo = temp_dir.child("holiday.jpg");
    testing::jpeg_with_datetime_original(photo.path());

    let summary = run_rename(photo.path(), &RunOptions::default()).unwrap();

    assert_eq!(summary.succeeded, 1);
    assert!(!photo.path().exists());
    assert!(temp_dir.child("2017-05-28T06:00:49.jpg").path().exists());
}
