/*!
 * User Process Harness
 *
 * Plays the user side of the trap ABI for hosted programs: pushes the
 * syscall number and arguments onto the process's user stack, raises the
 * trap through the executor and hands back the return register. Strings and
 * buffers are staged in the data region with a bump allocator; each wrapper
 * releases its scratch space once the call returns.
 */

use super::layout::{map_user_image, USER_DATA_BASE, USER_DATA_END, USER_STACK_TOP};
use crate::core::limits::{MAX_SYSCALL_ARGS, WORD_SIZE};
use crate::core::types::{Address, ExitStatus, Fd, Pid, Word};
use crate::memory::{AddressSpace, PageTable, UserPtr};
use crate::process::Process;
use crate::syscalls::{SyscallExecutor, SyscallNumber, TrapFrame, TrapOutcome};
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// The calling process did not get control back
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trapped {
    #[error("process exited with status {0}")]
    Exited(ExitStatus),

    #[error("machine halted")]
    Halted,
}

/// Result of a call that may end the calling process
pub type UserResult<T> = Result<T, Trapped>;

/// Where the syscall frame is pushed: number plus the widest argument list
const FRAME_ESP: Address = USER_STACK_TOP - (1 + MAX_SYSCALL_ARGS) * WORD_SIZE;

/// User-mode view of one process
pub struct UserProcess {
    executor: SyscallExecutor,
    process: Arc<Process>,
    heap: Mutex<Address>,
}

impl UserProcess {
    /// Attach to a process whose image is already mapped
    pub fn attach(executor: SyscallExecutor, process: Arc<Process>) -> Self {
        Self {
            executor,
            process,
            heap: Mutex::new(USER_DATA_BASE),
        }
    }

    /// Create a parentless, already-loaded process named `name`
    pub fn boot(executor: &SyscallExecutor, name: &str) -> Self {
        let table = PageTable::new();
        map_user_image(&table);
        let process = executor
            .processes()
            .create_process(name, Arc::new(table), None);
        executor.complete_load(&process, true);
        debug!(pid = process.pid(), name, "booted user process");
        Self::attach(executor.clone(), process)
    }

    pub fn process(&self) -> &Arc<Process> {
        &self.process
    }

    pub fn pid(&self) -> Pid {
        self.process.pid()
    }

    pub fn executor(&self) -> &SyscallExecutor {
        &self.executor
    }

    // =========================================================================
    // Raw trap interface
    // =========================================================================

    /// Push `number` and `args` and trap
    pub fn syscall(&self, number: u32, args: &[Word]) -> UserResult<Word> {
        let mut words = [0 as Word; 1 + MAX_SYSCALL_ARGS];
        words[0] = number;
        for (slot, arg) in words[1..].iter_mut().zip(args) {
            *slot = *arg;
        }
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        if let Err(e) = self.process.address_space().write(FRAME_ESP, &bytes) {
            warn!(pid = self.pid(), error = %e, "could not push syscall frame");
        }
        self.syscall_at(FRAME_ESP)
    }

    /// Trap with an arbitrary stack pointer
    pub fn syscall_at(&self, esp: Address) -> UserResult<Word> {
        let mut frame = TrapFrame::new(esp);
        match self.executor.handle_trap(&self.process, &mut frame) {
            TrapOutcome::Resume => Ok(frame.eax),
            TrapOutcome::Terminated(status) => Err(Trapped::Exited(status)),
            TrapOutcome::Halted => Err(Trapped::Halted),
        }
    }

    fn call(&self, number: SyscallNumber, args: &[Word]) -> UserResult<i32> {
        self.syscall(number.into(), args).map(|eax| eax as i32)
    }

    // =========================================================================
    // User memory staging
    // =========================================================================

    /// Reserve `len` zeroed bytes in the data region
    ///
    /// Returns a null pointer once the region is exhausted.
    pub fn alloc(&self, len: usize) -> UserPtr {
        let mut heap = self.heap.lock();
        let base = *heap;
        let Some(end) = base.checked_add(len.max(1)).filter(|end| *end <= USER_DATA_END) else {
            warn!(pid = self.pid(), len, "user data region exhausted");
            return UserPtr::NULL;
        };
        *heap = (end + WORD_SIZE - 1) / WORD_SIZE * WORD_SIZE;
        drop(heap);

        if let Err(e) = self.process.address_space().write(base, &vec![0u8; len]) {
            warn!(pid = self.pid(), error = %e, "could not clear user buffer");
        }
        UserPtr::new(base)
    }

    /// Copy `bytes` into user memory
    pub fn stage(&self, bytes: &[u8]) -> UserPtr {
        let ptr = self.alloc(bytes.len());
        if !ptr.is_null() {
            if let Err(e) = self.process.address_space().write(ptr.addr(), bytes) {
                warn!(pid = self.pid(), error = %e, "could not stage user bytes");
            }
        }
        ptr
    }

    /// Copy `s` plus a NUL terminator into user memory
    pub fn stage_str(&self, s: &str) -> UserPtr {
        let mut bytes = Vec::with_capacity(s.len() + 1);
        bytes.extend_from_slice(s.as_bytes());
        bytes.push(0);
        self.stage(&bytes)
    }

    /// Read user memory from the kernel side
    pub fn peek(&self, ptr: UserPtr, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        if let Err(e) = self.process.address_space().read(ptr.addr(), &mut buf) {
            warn!(pid = self.pid(), error = %e, "could not read user memory");
        }
        buf
    }

    /// Run `f` and give back any data-region space it allocated
    fn scratch<T>(&self, f: impl FnOnce(&Self) -> T) -> T {
        let mark = *self.heap.lock();
        let result = f(self);
        *self.heap.lock() = mark;
        result
    }

    // =========================================================================
    // Syscall wrappers
    // =========================================================================

    pub fn halt(&self) -> Trapped {
        match self.call(SyscallNumber::Halt, &[]) {
            Err(trapped) => trapped,
            Ok(_) => Trapped::Halted,
        }
    }

    /// Exit with `status`; always reports how the process ended
    pub fn exit(&self, status: ExitStatus) -> Trapped {
        match self.call(SyscallNumber::Exit, &[status as Word]) {
            Err(trapped) => trapped,
            Ok(_) => Trapped::Exited(status),
        }
    }

    pub fn exec(&self, command_line: &str) -> UserResult<Pid> {
        self.scratch(|up| {
            let cmd = up.stage_str(command_line);
            up.call(SyscallNumber::Exec, &[cmd.addr() as Word])
        })
    }

    pub fn wait(&self, pid: Pid) -> UserResult<ExitStatus> {
        self.call(SyscallNumber::Wait, &[pid as Word])
    }

    pub fn create(&self, name: &str, initial_size: u32) -> UserResult<bool> {
        self.scratch(|up| {
            let name = up.stage_str(name);
            up.call(SyscallNumber::Create, &[name.addr() as Word, initial_size])
                .map(|r| r != 0)
        })
    }

    pub fn remove(&self, name: &str) -> UserResult<bool> {
        self.scratch(|up| {
            let name = up.stage_str(name);
            up.call(SyscallNumber::Remove, &[name.addr() as Word])
                .map(|r| r != 0)
        })
    }

    pub fn open(&self, name: &str) -> UserResult<Fd> {
        self.scratch(|up| {
            let name = up.stage_str(name);
            up.call(SyscallNumber::Open, &[name.addr() as Word])
        })
    }

    pub fn filesize(&self, fd: Fd) -> UserResult<i32> {
        self.call(SyscallNumber::Filesize, &[fd as Word])
    }

    /// Read up to `len` bytes; returns the syscall result and the bytes it
    /// reported as transferred
    pub fn read(&self, fd: Fd, len: usize) -> UserResult<(i32, Vec<u8>)> {
        self.scratch(|up| -> UserResult<(i32, Vec<u8>)> {
            let buf = up.alloc(len);
            let count = up.call(SyscallNumber::Read, &[fd as Word, buf.addr() as Word, len as Word])?;
            let got = usize::try_from(count).unwrap_or(0).min(len);
            Ok((count, up.peek(buf, got)))
        })
    }

    pub fn write(&self, fd: Fd, data: &[u8]) -> UserResult<i32> {
        self.scratch(|up| {
            let buf = up.stage(data);
            up.call(
                SyscallNumber::Write,
                &[fd as Word, buf.addr() as Word, data.len() as Word],
            )
        })
    }

    pub fn seek(&self, fd: Fd, position: u32) -> UserResult<()> {
        self.call(SyscallNumber::Seek, &[fd as Word, position]).map(|_| ())
    }

    pub fn tell(&self, fd: Fd) -> UserResult<i32> {
        self.call(SyscallNumber::Tell, &[fd as Word])
    }

    pub fn close(&self, fd: Fd) -> UserResult<()> {
        self.call(SyscallNumber::Close, &[fd as Word]).map(|_| ())
    }
}
