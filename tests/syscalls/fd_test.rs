/*!
 * File Descriptor Tests
 * Open file handles, the descriptor table and file data paths
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use trapgate_kernel::{FileSystem, MemFs, SyscallExecutor, UserProcess};

fn setup_test_env() -> (SyscallExecutor, Arc<MemFs>, UserProcess) {
    let fs = Arc::new(MemFs::new());
    let executor = SyscallExecutor::builder()
        .with_filesystem(fs.clone())
        .build();
    let up = UserProcess::boot(&executor, "fdtest");
    (executor, fs, up)
}

#[test]
fn test_open_returns_increasing_handles() {
    let (_, _, up) = setup_test_env();
    assert!(up.create("data", 0).unwrap());

    let handles: Vec<i32> = (0..5).map(|_| up.open("data").unwrap()).collect();
    assert_eq!(handles, vec![2, 3, 4, 5, 6]);
}

#[test]
fn test_closed_handle_never_reused() {
    let (_, _, up) = setup_test_env();
    up.create("data", 0).unwrap();

    let first = up.open("data").unwrap();
    let second = up.open("data").unwrap();
    up.close(first).unwrap();
    up.close(second).unwrap();

    let third = up.open("data").unwrap();
    assert!(third > second);
    assert_eq!(up.tell(first).unwrap(), -1);
}

#[test]
fn test_handles_are_per_process() {
    let (executor, _, a) = setup_test_env();
    let b = UserProcess::boot(&executor, "other");
    a.create("shared", 0).unwrap();

    assert_eq!(a.open("shared").unwrap(), 2);
    assert_eq!(b.open("shared").unwrap(), 2);
    a.close(2).unwrap();
    assert_eq!(b.tell(2).unwrap(), 0);
}

#[test]
fn test_create_write_seek_read_round_trip() {
    let (_, fs, up) = setup_test_env();
    assert!(up.create("notes", 0).unwrap());

    let fd = up.open("notes").unwrap();
    assert_eq!(up.write(fd, b"the quick brown fox").unwrap(), 19);
    assert_eq!(up.tell(fd).unwrap(), 19);
    assert_eq!(up.filesize(fd).unwrap(), 19);

    up.seek(fd, 0).unwrap();
    let (count, data) = up.read(fd, 64).unwrap();
    assert_eq!(count, 19);
    assert_eq!(data, b"the quick brown fox".to_vec());
    up.close(fd).unwrap();

    assert_eq!(fs.contents("notes").unwrap(), b"the quick brown fox".to_vec());
}

#[test]
fn test_seek_then_partial_read() {
    let (_, _, up) = setup_test_env();
    up.create("alpha", 0).unwrap();
    let fd = up.open("alpha").unwrap();
    up.write(fd, b"abcdefghij").unwrap();

    up.seek(fd, 6).unwrap();
    assert_eq!(up.tell(fd).unwrap(), 6);
    let (count, data) = up.read(fd, 10).unwrap();
    assert_eq!(count, 4);
    assert_eq!(data, b"ghij".to_vec());

    up.seek(fd, 100).unwrap();
    assert_eq!(up.read(fd, 4).unwrap().0, 0);
}

#[test]
fn test_create_with_initial_size() {
    let (_, _, up) = setup_test_env();
    assert!(up.create("sized", 128).unwrap());
    let fd = up.open("sized").unwrap();
    assert_eq!(up.filesize(fd).unwrap(), 128);
}

#[test]
fn test_create_existing_and_remove() {
    let (_, fs, up) = setup_test_env();
    assert!(up.create("once", 0).unwrap());
    assert!(!up.create("once", 0).unwrap());

    assert!(up.remove("once").unwrap());
    assert!(!up.remove("once").unwrap());
    assert!(!fs.contains("once"));
    assert_eq!(up.open("once").unwrap(), -1);
}

#[test]
fn test_open_failures_return_minus_one() {
    let (_, _, up) = setup_test_env();
    assert_eq!(up.open("missing").unwrap(), -1);
    assert_eq!(up.open("").unwrap(), -1);
    assert!(!up.create("", 0).unwrap());
    assert!(up.process().is_alive());
}

#[test]
fn test_unknown_fd_sentinels() {
    let (_, _, up) = setup_test_env();
    assert_eq!(up.filesize(42).unwrap(), -1);
    assert_eq!(up.tell(42).unwrap(), -1);
    assert_eq!(up.read(42, 8).unwrap().0, -1);
    assert_eq!(up.write(42, b"x").unwrap(), -1);

    // Void calls on a stale handle are silent no-ops
    up.seek(42, 3).unwrap();
    up.close(42).unwrap();
    assert!(up.process().is_alive());
}

#[test]
fn test_close_all_releases_every_handle() {
    let (_, _, up) = setup_test_env();
    up.create("f", 0).unwrap();
    let handles: Vec<i32> = (0..3).map(|_| up.open("f").unwrap()).collect();

    up.close(-1).unwrap();
    assert!(up.process().files().is_empty());
    for fd in handles {
        assert_eq!(up.filesize(fd).unwrap(), -1);
    }

    // Counter keeps running after a bulk close
    assert_eq!(up.open("f").unwrap(), 5);
}

#[test]
fn test_removed_file_stays_usable_until_closed() {
    let (_, fs, up) = setup_test_env();
    up.create("tmp", 0).unwrap();
    let fd = up.open("tmp").unwrap();
    assert!(up.remove("tmp").unwrap());

    assert_eq!(up.write(fd, b"still here").unwrap(), 10);
    assert_eq!(fs.bytes_used(), 10);
    up.close(fd).unwrap();
    assert_eq!(fs.bytes_used(), 0);
}

#[test]
fn test_exit_closes_open_files() {
    let (_, fs, up) = setup_test_env();
    up.create("tmp", 0).unwrap();
    let fd = up.open("tmp").unwrap();
    up.remove("tmp").unwrap();
    up.write(fd, b"orphaned").unwrap();
    assert_eq!(fs.bytes_used(), 8);

    up.exit(0);
    assert_eq!(fs.bytes_used(), 0);
}

#[test]
fn test_capacity_limits_write_count() {
    let fs = Arc::new(MemFs::with_capacity(6));
    let executor = SyscallExecutor::builder().with_filesystem(fs.clone()).build();
    let up = UserProcess::boot(&executor, "full");

    up.create("f", 0).unwrap();
    let fd = up.open("f").unwrap();
    assert_eq!(up.write(fd, b"0123456789").unwrap(), 6);
    assert_eq!(fs.file_count(), 1);
    assert!(fs.open("f").is_some());
}
