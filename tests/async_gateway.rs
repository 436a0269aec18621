use std::fs;
use std::sync::Arc;

use webfm::{AsyncFileManager, Config};

fn manager() -> (tempfile::TempDir, AsyncFileManager) {
    let td = tempfile::tempdir().unwrap();
    let cfg = Config::new(td.path()).validated().unwrap();
    (td, AsyncFileManager::new(Arc::new(cfg)))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_operations_complete_independently() {
    let (_td, fm) = manager();

    let mut handles = Vec::new();
    for i in 0..16 {
        let fm = fm.clone();
        handles.push(tokio::spawn(async move {
            fm.create_folder(String::new(), format!("dir{i}"), None).await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let entries = fm.list(String::new(), None).await.unwrap();
    assert_eq!(entries.len(), 16);
    assert!(entries.iter().all(|e| e.is_directory));
}

#[tokio::test]
async fn async_upload_and_zip() {
    let (_td, fm) = manager();
    fm.upload("docs".into(), None, std::io::Cursor::new(b"abc".to_vec()), "a.txt".into())
        .await
        .unwrap();

    let name = fm
        .create_zip(String::new(), vec![], vec!["docs".into()], None)
        .await
        .unwrap();
    assert!(fm.extract_zip(String::new(), name.clone(), None).await.unwrap());

    let root = fm.blocking().config().web_root.join("UserFiles");
    let extracted = root.join(name.trim_end_matches(".zip")).join("docs/a.txt");
    assert_eq!(fs::read(extracted).unwrap(), b"abc");
}

#[tokio::test]
async fn async_rename_and_delete_report_missing() {
    let (_td, fm) = manager();
    assert!(!fm.rename("nope.txt".into(), "x.txt".into(), false, None).await.unwrap());
    assert!(!fm.delete("nope.txt".into(), false, None).await.unwrap());
    assert!(fm.read_path(String::new(), "nope.txt".into(), None).await.unwrap().is_none());
}
