//! Tests for the lock store.

use std::fs;

use tempfile::TempDir;

use super::*;

#[test]
fn test_acquire_exists_release() {
    let dir = TempDir::new().unwrap();
    let store = LockStore::new(LockMode::enabled(dir.path())).unwrap();

    assert!(!store.exists("backup"));
    store.acquire("backup").unwrap();
    assert!(store.exists("backup"));
    assert!(dir.path().join("backup.lock").exists());

    store.release("backup").unwrap();
    assert!(!store.exists("backup"));
    assert!(!dir.path().join("backup.lock").exists());
}

#[test]
fn test_release_of_missing_marker_fails() {
    let dir = TempDir::new().unwrap();
    let store = LockStore::new(LockMode::enabled(dir.path())).unwrap();

    let err = store.release("never-acquired").unwrap_err();
    assert!(matches!(err, SchedulerError::Filesystem { .. }));
}

#[test]
fn test_markers_are_per_label() {
    let dir = TempDir::new().unwrap();
    let store = LockStore::new(LockMode::enabled(dir.path())).unwrap();

    store.acquire("one").unwrap();
    assert!(store.exists("one"));
    assert!(!store.exists("two"));
}

#[test]
fn test_disabled_mode_is_a_no_op() {
    let store = LockStore::new(LockMode::Disabled).unwrap();

    assert!(!store.is_enabled());
    assert!(!store.exists("anything"));
    store.acquire("anything").unwrap();
    assert!(!store.exists("anything"));
    store.release("anything").unwrap();
}

#[test]
fn test_new_creates_the_lock_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("locks").join("deep");
    let store = LockStore::new(LockMode::enabled(&nested)).unwrap();

    assert!(nested.is_dir());
    assert!(store.is_enabled());
}

#[test]
fn test_new_fails_on_unwritable_directory() {
    // A regular file where the directory should be makes creation fail.
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"occupied").unwrap();

    let err = LockStore::new(LockMode::enabled(&blocker)).unwrap_err();
    assert!(matches!(err, SchedulerError::Filesystem { .. }));
}
