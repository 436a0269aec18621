mod common;

use std::fs;
use std::io;

use common::{Fixture, names};
use webfm::codec::encode;

#[test]
fn first_list_provisions_empty_default_root() {
    let fx = Fixture::new();
    assert!(!fx.default_root().exists());

    let entries = fx.fm.list("", None).unwrap();
    assert!(entries.is_empty());
    assert!(fx.default_root().is_dir());
}

#[test]
fn list_orders_directories_first_then_names() {
    let fx = Fixture::new();
    fx.write("docs/b.txt", b"bb");
    fx.write("docs/A.txt", b"a");
    fx.mkdir("docs/zeta");
    fx.mkdir("docs/Alpha");

    let entries = fx.fm.list(&encode("docs"), None).unwrap();
    let order: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(order, ["Alpha", "zeta", "A.txt", "b.txt"]);

    let alpha = &entries[0];
    assert!(alpha.is_directory);
    assert_eq!(alpha.size, 0);
    assert_eq!(alpha.relative_path, "docs/Alpha");
    assert!(alpha.url.is_none());

    let b = &entries[3];
    assert_eq!(b.size, 2);
    assert_eq!(b.url.as_deref(), Some("/UserFiles/docs/b.txt"));
}

#[test]
fn list_of_escaping_path_shows_root() {
    let fx = Fixture::new();
    fx.write("top.txt", b"x");

    let entries = fx.fm.list("../../..", None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].relative_path, "top.txt");
}

#[test]
fn create_folder_uses_leaf_only() {
    let fx = Fixture::new();
    fx.fm.create_folder("", "../../outside/new", None).unwrap();
    assert!(fx.default_root().join("new").is_dir());
    assert!(!fx.web.join("outside").exists());

    // blank names are ignored, existing folders are fine
    fx.fm.create_folder("", "   ", None).unwrap();
    fx.fm.create_folder("", "new", None).unwrap();
}

#[test]
fn rename_of_missing_file_reports_false() {
    let fx = Fixture::new();
    let done = fx.fm.rename("reports/q1.txt", "q1-final.txt", false, None).unwrap();
    assert!(!done);
    assert!(!fx.default_root().join("reports/q1-final.txt").exists());
}

#[test]
fn rename_file_and_directory() {
    let fx = Fixture::new();
    fx.write("reports/q1.txt", b"q1");
    assert!(fx.fm.rename("reports/q1.txt", "sub/q1-final.txt", false, None).unwrap());
    assert_eq!(fs::read(fx.default_root().join("reports/q1-final.txt")).unwrap(), b"q1");

    assert!(fx.fm.rename("reports", "archive", true, None).unwrap());
    assert!(fx.default_root().join("archive/q1-final.txt").is_file());

    // kind mismatch counts as missing
    assert!(!fx.fm.rename("archive", "x", false, None).unwrap());
}

#[test]
fn rename_never_overwrites() {
    let fx = Fixture::new();
    fx.write("a.txt", b"a");
    fx.write("b.txt", b"b");
    let err = fx.fm.rename("a.txt", "b.txt", false, None).unwrap_err();
    assert_eq!(err.io_kind(), Some(io::ErrorKind::AlreadyExists));
    assert_eq!(fs::read(fx.default_root().join("b.txt")).unwrap(), b"b");
}

#[test]
fn delete_reports_found_and_spares_root() {
    let fx = Fixture::new();
    fx.write("docs/a.txt", b"a");

    assert!(fx.fm.delete("docs/a.txt", false, None).unwrap());
    assert!(!fx.fm.delete("docs/a.txt", false, None).unwrap());
    assert!(fx.fm.delete("docs", true, None).unwrap());
    assert!(!fx.default_root().join("docs").exists());

    assert!(!fx.fm.delete("", true, None).unwrap());
    assert!(!fx.fm.delete("../..", true, None).unwrap());
    assert!(fx.default_root().is_dir());
}

#[test]
fn delete_multiple_skips_missing_entries() {
    let fx = Fixture::new();
    fx.write("present.txt", b"p");
    fx.write("keep.txt", b"k");
    fx.mkdir("olddir/nested");

    fx.fm
        .delete_multiple("", &names(&["missing.txt", "present.txt"]), &names(&["olddir", ".."]), None)
        .unwrap();

    assert!(!fx.default_root().join("present.txt").exists());
    assert!(!fx.default_root().join("olddir").exists());
    assert!(fx.default_root().join("keep.txt").exists());
    assert!(fx.default_root().is_dir());
}

#[test]
fn delete_multiple_uses_leaf_names_under_base() {
    let fx = Fixture::new();
    fx.write("a/x.txt", b"1");
    fx.write("x.txt", b"2");

    fx.fm.delete_multiple("a", &names(&["../x.txt"]), &[], None).unwrap();
    assert!(!fx.default_root().join("a/x.txt").exists());
    assert!(fx.default_root().join("x.txt").exists());
}

#[test]
fn upload_never_overwrites() {
    let fx = Fixture::new();
    fx.write("in/a.txt", b"old");

    fx.fm.upload("in", None, &b"new"[..], "C:\\Users\\me\\a.txt").unwrap();
    fx.fm.upload("in", None, &b"newer"[..], "a.txt").unwrap();
    fx.fm.upload("in", None, &b"ignored"[..], "  ").unwrap();

    let dir = fx.default_root().join("in");
    assert_eq!(fs::read(dir.join("a.txt")).unwrap(), b"old");
    assert_eq!(fs::read(dir.join("a-1.txt")).unwrap(), b"new");
    assert_eq!(fs::read(dir.join("a-2.txt")).unwrap(), b"newer");
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 3);
}

#[test]
fn save_text_and_read_path() {
    let fx = Fixture::new();
    assert!(fx.fm.save_text("notes", "todo.md", "first", None).unwrap());
    assert!(fx.fm.save_text("notes", "todo.md", "second", None).unwrap());
    assert!(!fx.fm.save_text("notes", "", "x", None).unwrap());

    let path = fx.fm.read_path("notes", "todo.md", None).unwrap().unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "second");
    assert!(fx.fm.read_path("notes", "nope.md", None).unwrap().is_none());
    assert!(fx.fm.read_path("", "notes", None).unwrap().is_none());
}

#[test]
fn parent_and_file_url() {
    let fx = Fixture::new();
    assert_eq!(fx.fm.parent(&encode("docs/2024/q1")), "docs/2024");
    assert_eq!(fx.fm.parent("docs"), "");
    assert_eq!(
        fx.fm.file_url("docs", "a b.txt", None).unwrap().as_deref(),
        Some("/UserFiles/docs/a b.txt")
    );
    assert_eq!(fx.fm.file_url("docs", "", None).unwrap(), None);
}

#[test]
fn selected_root_and_web_root_alias() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.web.join("media")).unwrap();
    fs::write(fx.web.join("media/pic.png"), b"png").unwrap();

    let entries = fx.fm.list("", Some(&encode("media"))).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].url.as_deref(), Some("/media/pic.png"));

    let entries = fx.fm.list("media", Some("wwwroot")).unwrap();
    assert_eq!(entries[0].url.as_deref(), Some("/media/pic.png"));

    // unknown root falls back to the default root
    fx.fm.create_folder("", "here", Some("no/such/root")).unwrap();
    assert!(fx.default_root().join("here").is_dir());
}
