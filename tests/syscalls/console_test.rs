/*!
 * Console Stream Tests
 * Reads from handle 0 and writes to handle 1
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use trapgate_kernel::{BufferConsole, SyscallExecutor, UserProcess};

fn setup_test_env(input: &[u8]) -> (Arc<BufferConsole>, UserProcess) {
    let console = Arc::new(BufferConsole::with_input(input));
    let executor = SyscallExecutor::builder()
        .with_console(console.clone())
        .build();
    let up = UserProcess::boot(&executor, "console");
    (console, up)
}

#[test]
fn test_write_to_stdout_outputs_buffer() {
    let (console, up) = setup_test_env(b"");
    assert_eq!(up.write(1, b"hello, world\n").unwrap(), 13);
    assert_eq!(console.output(), b"hello, world\n".to_vec());
}

#[test]
fn test_stdout_writes_are_whole_blocks() {
    let (console, up) = setup_test_env(b"");
    up.write(1, b"first ").unwrap();
    up.write(1, b"second").unwrap();
    assert_eq!(console.output_string(), "first second");
}

#[test]
fn test_empty_write_to_stdout() {
    let (console, up) = setup_test_env(b"");
    assert_eq!(up.write(1, b"").unwrap(), 0);
    assert!(console.output().is_empty());
}

#[test]
fn test_read_from_stdin_fills_buffer() {
    let (_, up) = setup_test_env(b"keyboard input");
    let (count, data) = up.read(0, 8).unwrap();
    assert_eq!(count, 8);
    assert_eq!(data, b"keyboard".to_vec());

    let (count, data) = up.read(0, 6).unwrap();
    assert_eq!(count, 6);
    assert_eq!(data, b" input".to_vec());
}

#[test]
fn test_stdin_read_waits_for_keystrokes() {
    let console = Arc::new(BufferConsole::new());
    let executor = SyscallExecutor::builder().with_console(console.clone()).build();
    let up = UserProcess::boot(&executor, "typist");

    let typist = {
        let console = console.clone();
        std::thread::spawn(move || {
            for byte in b"abc" {
                std::thread::sleep(std::time::Duration::from_millis(5));
                console.push_input(&[*byte]);
            }
        })
    };

    let (count, data) = up.read(0, 3).unwrap();
    typist.join().unwrap();
    assert_eq!(count, 3);
    assert_eq!(data, b"abc".to_vec());
}

#[test]
fn test_wrong_direction_on_console_handles() {
    let (console, up) = setup_test_env(b"unused");
    assert_eq!(up.write(0, b"nope").unwrap(), -1);
    assert_eq!(up.read(1, 4).unwrap().0, -1);
    assert!(console.output().is_empty());
}

#[test]
fn test_console_handles_are_not_files() {
    let (_, up) = setup_test_env(b"");
    assert_eq!(up.filesize(0).unwrap(), -1);
    assert_eq!(up.tell(1).unwrap(), -1);
    up.close(1).unwrap();
    assert_eq!(up.write(1, b"ok").unwrap(), 2);
}
