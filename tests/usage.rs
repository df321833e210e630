//! End-to-end tests for image store usage reporting.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use similar_asserts::assert_eq;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use imagefs::{
    scan, DiskUsage, EngineConfig, SystemClock, UsageError, UsageReporter, IMAGE_SUBDIR,
};

/// Engine data root with a populated image store:
///
/// ```text
/// <root>/image/
/// +-- manifest            (100 bytes)
/// +-- layers/
///     +-- base            (50 bytes)
/// ```
fn populated_store() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join(IMAGE_SUBDIR);
    fs::create_dir(&image).unwrap();
    fs::write(image.join("manifest"), vec![0u8; 100]).unwrap();
    fs::create_dir(image.join("layers")).unwrap();
    fs::write(image.join("layers/base"), vec![0u8; 50]).unwrap();
    dir
}

fn reporter_for(root: &Path) -> UsageReporter<EngineConfig, SystemClock> {
    UsageReporter::new(EngineConfig::with_data_root(root), SystemClock)
}

#[test]
fn scan_counts_files_and_directories() {
    // N regular files of known sizes plus D directories; the walk must
    // return inodes = N + D and bytes = sum of sizes.
    let dir = tempfile::tempdir().unwrap();
    let sizes = [3u64, 17, 256, 0, 4096];
    for (i, size) in sizes.iter().enumerate() {
        let sub = dir.path().join(format!("d{i}"));
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("f"), vec![0u8; *size as usize]).unwrap();
    }

    let usage = scan(dir.path(), &CancellationToken::new()).unwrap();
    assert_eq!(usage.bytes, sizes.iter().sum::<u64>());
    // root + 5 subdirectories + 5 files
    assert_eq!(usage.inodes, 11);
}

#[test]
fn scan_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let usage = scan(dir.path(), &CancellationToken::new()).unwrap();
    assert_eq!(usage, DiskUsage { bytes: 0, inodes: 1 });
}

#[test]
fn report_nested_tree() {
    let store = populated_store();
    let response = reporter_for(store.path())
        .image_fs_info(&CancellationToken::new())
        .unwrap();

    assert_eq!(response.image_filesystems.len(), 1);
    let usage = &response.image_filesystems[0];
    // image/ + manifest + layers/ + base
    assert_eq!(usage.inodes_used, 4);
    assert_eq!(usage.used_bytes, 150);
    assert_eq!(usage.fs_id.mountpoint, store.path());
}

#[test]
fn report_is_idempotent_without_mutation() {
    let store = populated_store();
    let reporter = reporter_for(store.path());
    let cancel = CancellationToken::new();

    let first = reporter.image_fs_info(&cancel).unwrap();
    let second = reporter.image_fs_info(&cancel).unwrap();

    let a = &first.image_filesystems[0];
    let b = &second.image_filesystems[0];
    assert_eq!(a.used_bytes, b.used_bytes);
    assert_eq!(a.inodes_used, b.inodes_used);
    assert!(b.timestamp >= a.timestamp);
}

#[test]
fn report_fresh_store_is_zero_usage() {
    // Data root exists but nothing has been pulled yet: no image/
    // subdirectory. This reports empty rather than failing.
    let dir = tempfile::tempdir().unwrap();
    let response = reporter_for(dir.path())
        .image_fs_info(&CancellationToken::new())
        .unwrap();

    let usage = &response.image_filesystems[0];
    assert_eq!(usage.used_bytes, 0);
    assert_eq!(usage.inodes_used, 0);
    assert_eq!(usage.fs_id.mountpoint, dir.path());
}

#[test]
fn report_missing_data_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent");

    let err = reporter_for(&missing)
        .image_fs_info(&CancellationToken::new())
        .unwrap_err();
    assert!(matches!(err, UsageError::Traversal { .. }));
}

#[cfg(unix)]
#[test]
fn report_unreadable_subdirectory_fails() {
    use std::os::unix::fs::PermissionsExt;

    let store = populated_store();
    let locked = store.path().join(IMAGE_SUBDIR).join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged processes ignore permission bits; nothing to test then.
    if fs::read_dir(&locked).is_ok() {
        return;
    }

    let err = reporter_for(store.path())
        .image_fs_info(&CancellationToken::new())
        .unwrap_err();
    match err {
        UsageError::Traversal { path, source } => {
            assert_eq!(path, locked);
            assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected traversal error, got {other:?}"),
    }

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn cancellation_aborts_within_bounded_delay() {
    // A wide tree that would take a while to enumerate; with the token
    // already cancelled the scan must abort at its first checkpoint and
    // return no counts at all.
    let store = populated_store();
    let image = store.path().join(IMAGE_SUBDIR);
    for i in 0..200 {
        fs::write(image.join(format!("blob{i}")), vec![0u8; 8]).unwrap();
    }

    let cancel = CancellationToken::new();
    cancel.cancel();

    let start = Instant::now();
    let err = reporter_for(store.path()).image_fs_info(&cancel).unwrap_err();
    assert!(matches!(err, UsageError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn response_serializes_with_wire_names() {
    let store = populated_store();
    let response = reporter_for(store.path())
        .image_fs_info(&CancellationToken::new())
        .unwrap();

    let json = serde_json::to_value(&response).unwrap();
    let entry = &json["imageFilesystems"][0];
    assert_eq!(entry["usedBytes"], 150);
    assert_eq!(entry["inodesUsed"], 4);
    assert!(entry["timestamp"].as_i64().unwrap() > 0);
}
