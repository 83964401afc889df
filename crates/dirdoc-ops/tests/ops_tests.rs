use dirdoc_core::{ErrorKind, Platform};
use dirdoc_ops::{FileOperation, OperationExecutor};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_execute_all_preserves_submission_order() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("taken"), "x").unwrap();

    let ops = vec![
        FileOperation::create_file(root.join("a")),
        FileOperation::create_file(root.join("taken")),
        FileOperation::create_directory(root.join("c")),
        FileOperation::create_file(root.join("missing/d")),
    ];

    let executor = OperationExecutor::new(Platform::posix());
    let report = executor.execute_all(ops.clone()).await;

    let kinds: Vec<_> = report
        .outcomes()
        .map(|(_, r)| r.as_ref().err().map(|e| e.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            None,
            Some(ErrorKind::AlreadyExists),
            None,
            Some(ErrorKind::NotFound)
        ]
    );
    let submitted: Vec<_> = report.outcomes().map(|(op, _)| op.clone()).collect();
    assert_eq!(submitted, ops);
    assert_eq!(report.conflicts().count(), 1);
}

#[tokio::test]
async fn test_copy_conflict_then_overwrite() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&dst).unwrap();
    fs::write(src.join("a.txt"), "new").unwrap();
    fs::write(dst.join("a.txt"), "old").unwrap();

    let executor = OperationExecutor::new(Platform::posix());
    let err = executor
        .copy(src.join("a.txt"), dst.join("a.txt"), false, false)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "old");

    executor
        .copy(src.join("a.txt"), dst.join("a.txt"), true, false)
        .await
        .unwrap();
    assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "new");
}

#[tokio::test]
async fn test_merge_copy_keeps_unrelated_entries() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("a/photos");
    let dst = temp.path().join("b/photos");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&dst).unwrap();
    fs::write(src.join("new.jpg"), "1").unwrap();
    fs::write(dst.join("old.jpg"), "2").unwrap();

    let executor = OperationExecutor::new(Platform::posix());
    executor.copy(&src, &dst, true, true).await.unwrap();

    assert!(dst.join("new.jpg").exists());
    assert!(dst.join("old.jpg").exists());
    assert!(src.join("new.jpg").exists());
}

#[tokio::test]
async fn test_move_and_delete() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("file.txt");
    let dst = temp.path().join("moved.txt");
    fs::write(&src, "content").unwrap();

    let executor = OperationExecutor::new(Platform::posix());
    executor.rename(&src, &dst, false).await.unwrap();
    assert!(!src.exists());

    executor.delete(&dst, false).await.unwrap();
    assert!(!dst.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_conflict_is_reported() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("target");
    let link = temp.path().join("link");
    fs::write(&target, "x").unwrap();
    fs::write(&link, "occupied").unwrap();

    let executor = OperationExecutor::new(Platform::posix());
    let err = executor.symlink(&target, &link).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(err.message.starts_with(&format!(
        "Could not create symbolic link {} pointing to {}: ",
        link.display(),
        target.display()
    )));
}
