/*!
 * Console Device
 *
 * Byte-oriented keyboard input and display output. `putbuf` writes the whole
 * buffer as one unit, so output from concurrent processes never interleaves
 * within a single call.
 */

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use tracing::warn;

pub trait Console: Send + Sync {
    /// Next input byte, blocking until one is available
    fn getc(&self) -> u8;

    /// Write `buf` to the display in one piece
    fn putbuf(&self, buf: &[u8]);
}

#[derive(Default)]
struct InputQueue {
    bytes: VecDeque<u8>,
    closed: bool,
}

/// In-memory console for tests and the demo kernel
///
/// Input is scripted with `push_input`; once `close_input` is called and the
/// queue drains, `getc` yields NUL bytes instead of blocking.
#[derive(Default)]
pub struct BufferConsole {
    input: Mutex<InputQueue>,
    available: Condvar,
    output: Mutex<Vec<u8>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Console with `input` already queued and no more to come
    pub fn with_input(input: &[u8]) -> Self {
        let console = Self::new();
        console.push_input(input);
        console.close_input();
        console
    }

    pub fn push_input(&self, bytes: &[u8]) {
        self.input.lock().bytes.extend(bytes.iter().copied());
        self.available.notify_all();
    }

    pub fn close_input(&self) {
        self.input.lock().closed = true;
        self.available.notify_all();
    }

    /// Copy of everything written so far
    pub fn output(&self) -> Vec<u8> {
        self.output.lock().clone()
    }

    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.output.lock()).into_owned()
    }

    /// Drain the output buffer
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut *self.output.lock())
    }
}

impl Console for BufferConsole {
    fn getc(&self) -> u8 {
        let mut input = self.input.lock();
        loop {
            if let Some(byte) = input.bytes.pop_front() {
                return byte;
            }
            if input.closed {
                return 0;
            }
            self.available.wait(&mut input);
        }
    }

    fn putbuf(&self, buf: &[u8]) {
        self.output.lock().extend_from_slice(buf);
    }
}

/// Console on the host's standard streams
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn getc(&self) -> u8 {
        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(1) => byte[0],
            Ok(_) => 0,
            Err(e) => {
                warn!(error = %e, "console read failed");
                0
            }
        }
    }

    fn putbuf(&self, buf: &[u8]) {
        let mut out = io::stdout().lock();
        if let Err(e) = out.write_all(buf).and_then(|_| out.flush()) {
            warn!(error = %e, "console write failed");
        }
    }
}
