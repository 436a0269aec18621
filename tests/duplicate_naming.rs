use assert_fs::TempDir;
use assert_fs::prelude::*;

use webfm::fs_ops::{unique_directory_path, unique_file_path};

#[test]
fn no_collision_returns_requested_name() {
    let temp = TempDir::new().unwrap();
    assert_eq!(unique_file_path(temp.path(), "file.txt"), temp.child("file.txt").path());
}

#[test]
fn skips_every_taken_suffix() {
    let temp = TempDir::new().unwrap();
    temp.child("a.txt").write_str("0").unwrap();
    temp.child("a-1.txt").write_str("1").unwrap();
    assert_eq!(unique_file_path(temp.path(), "a.txt"), temp.child("a-2.txt").path());
}

#[test]
fn directory_named_like_file_counts_as_taken() {
    let temp = TempDir::new().unwrap();
    temp.child("report.pdf").create_dir_all().unwrap();
    assert_eq!(
        unique_file_path(temp.path(), "report.pdf"),
        temp.child("report-1.pdf").path()
    );
}

#[test]
fn extensionless_file_gets_plain_suffix() {
    let temp = TempDir::new().unwrap();
    temp.child("Makefile").touch().unwrap();
    assert_eq!(unique_file_path(temp.path(), "Makefile"), temp.child("Makefile-1").path());
}

#[test]
fn directories_use_parenthesized_counter() {
    let temp = TempDir::new().unwrap();
    temp.child("docs").create_dir_all().unwrap();
    assert_eq!(unique_directory_path(temp.path(), "docs"), temp.child("docs_(1)").path());

    temp.child("docs_(1)").create_dir_all().unwrap();
    temp.child("docs_(2)").write_str("file in the way").unwrap();
    assert_eq!(unique_directory_path(temp.path(), "docs"), temp.child("docs_(3)").path());
}
