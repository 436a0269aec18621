use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn webfm(web_root: &Path, args: &[&str]) -> Output {
    let me = assert_cmd::cargo::cargo_bin!("webfm");
    Command::new(me)
        .env("WEBFM_CONFIG", web_root.join("no-such-config.xml"))
        .arg("--web-root")
        .arg(web_root)
        .args(args)
        .output()
        .expect("spawn binary")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

#[test]
fn encode_and_decode_round_trip() {
    let td = tempdir().unwrap();
    let out = webfm(td.path(), &["encode", "docs/2024"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "b64:ZG9jcy8yMDI0");

    let out = webfm(td.path(), &["decode", "b64:ZG9jcy8yMDI0"]);
    assert_eq!(stdout(&out), "docs/2024");
}

#[test]
fn list_on_fresh_root_prints_empty_json_array() {
    let td = tempdir().unwrap();
    let out = webfm(td.path(), &["list"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(stdout(&out), "[]");
    assert!(td.path().join("UserFiles").is_dir());
}

#[test]
fn mkdir_save_and_list() {
    let td = tempdir().unwrap();
    assert!(webfm(td.path(), &["mkdir", "", "reports"]).status.success());
    assert!(webfm(td.path(), &["save-text", "reports", "q1.txt", "hello"]).status.success());

    let out = webfm(td.path(), &["list", "reports"]);
    assert!(out.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let first = &entries[0];
    assert_eq!(first["name"], "q1.txt");
    assert_eq!(first["relativePath"], "reports/q1.txt");
    assert_eq!(first["isDirectory"], false);
    assert_eq!(first["size"], 5);
    assert_eq!(first["url"], "/UserFiles/reports/q1.txt");
}

#[test]
fn rename_of_missing_file_is_skipped_not_failed() {
    let td = tempdir().unwrap();
    let out = webfm(td.path(), &["rename", "reports/q1.txt", "q1-final.txt"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("skipped"));
}

#[test]
fn zip_prints_archive_name() {
    let td = tempdir().unwrap();
    let root = td.path().join("UserFiles");
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("docs/a.txt"), b"a").unwrap();

    let out = webfm(td.path(), &["zip", "", "--dir", "docs"]);
    assert!(out.status.success());
    let name = stdout(&out);
    assert!(root.join(&name).is_file(), "missing archive {name}");

    let out = webfm(td.path(), &["unzip", "", &name]);
    assert!(out.status.success());
    let extracted = root.join(name.trim_end_matches(".zip")).join("docs/a.txt");
    assert!(extracted.is_file());
}

#[test]
fn upload_copies_local_file() {
    let td = tempdir().unwrap();
    let src = td.path().join("local.bin");
    fs::write(&src, [1u8, 2, 3]).unwrap();
    let web = td.path().join("www");

    let out = webfm(&web, &["upload", "in", src.to_str().unwrap()]);
    assert!(out.status.success());
    assert_eq!(fs::read(web.join("UserFiles/in/local.bin")).unwrap(), [1, 2, 3]);
}

#[test]
fn web_root_that_is_a_file_fails() {
    let td = tempdir().unwrap();
    let file = td.path().join("file");
    fs::write(&file, b"x").unwrap();
    let out = webfm(&file, &["list"]);
    assert!(!out.status.success());
}
