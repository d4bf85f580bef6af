/*!
 * Syscall Executor
 *
 * Entry point for the trap path. `handle_trap` validates the frame, decodes
 * the request, routes it through the handler registry and applies the
 * completion to the frame or the process.
 *
 * The executor is cheap to clone; every clone shares the same filesystem
 * gate, console, process table and loader.
 */

use super::frame::{TrapFrame, TrapOutcome};
use super::handler::{SyscallContext, SyscallHandlerRegistry};
use super::marshal::{ArgumentMarshaller, Decoded};
use super::types::{Completion, Syscall, SyscallError};
use crate::core::config::{KernelConfig, UnknownSyscallPolicy};
use crate::core::limits::EXIT_FAILURE;
use crate::core::types::ExitStatus;
use crate::devices::{BufferConsole, Console, PowerControl, PowerLatch};
use crate::memory::PointerValidator;
use crate::monitoring::span_syscall;
use crate::process::{Lifecycle, Process, ProcessLoader, ProcessManager, SpawnError};
use crate::user::ThreadLoader;
use crate::vfs::{FileSystem, Filesys, MemFs};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Syscall executor shared by every process thread
#[derive(Clone)]
pub struct SyscallExecutor {
    pub(super) config: KernelConfig,
    pub(super) validator: PointerValidator,
    pub(super) filesys: Filesys,
    pub(super) console: Arc<dyn Console>,
    pub(super) power: Arc<dyn PowerControl>,
    pub(super) lifecycle: Lifecycle,
    registry: SyscallHandlerRegistry,
}

/// Builder for SyscallExecutor
///
/// Every collaborator defaults to the in-memory reference implementation.
#[derive(Default)]
pub struct SyscallExecutorBuilder {
    config: Option<KernelConfig>,
    filesystem: Option<Arc<dyn FileSystem>>,
    console: Option<Arc<dyn Console>>,
    power: Option<Arc<dyn PowerControl>>,
    loader: Option<Arc<dyn ProcessLoader>>,
    registry: Option<SyscallHandlerRegistry>,
}

impl SyscallExecutorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: KernelConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_filesystem(mut self, filesystem: Arc<dyn FileSystem>) -> Self {
        self.filesystem = Some(filesystem);
        self
    }

    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = Some(console);
        self
    }

    pub fn with_power(mut self, power: Arc<dyn PowerControl>) -> Self {
        self.power = Some(power);
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn ProcessLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Replace the standard handler chain
    pub fn with_registry(mut self, registry: SyscallHandlerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> SyscallExecutor {
        let config = self.config.unwrap_or_default();
        let filesystem = self
            .filesystem
            .unwrap_or_else(|| Arc::new(MemFs::new()));
        let console = self
            .console
            .unwrap_or_else(|| Arc::new(BufferConsole::new()));
        let power = self.power.unwrap_or_else(|| Arc::new(PowerLatch::new()));
        let loader = self
            .loader
            .unwrap_or_else(|| Arc::new(ThreadLoader::new()));
        let registry = self
            .registry
            .unwrap_or_else(SyscallHandlerRegistry::standard);

        let filesys = Filesys::new(filesystem.clone());
        let lifecycle = Lifecycle::new(
            ProcessManager::new(),
            loader,
            console.clone(),
            filesys.clone(),
        );

        info!(
            fs = filesystem.name(),
            handlers = registry.handler_count(),
            user_limit = config.user_limit,
            "syscall executor built"
        );

        SyscallExecutor {
            validator: PointerValidator::new(config.user_limit),
            config,
            filesys,
            console,
            power,
            lifecycle,
            registry,
        }
    }
}

// ============================================================================
// Trap Path
// ============================================================================

impl SyscallExecutor {
    pub fn builder() -> SyscallExecutorBuilder {
        SyscallExecutorBuilder::new()
    }

    /// Serve one `int 0x30` from `process`
    ///
    /// The frame's return slot is written for value-returning calls only.
    /// A process that has already exited is reported as terminated without
    /// touching the frame.
    pub fn handle_trap(&self, process: &Arc<Process>, frame: &mut TrapFrame) -> TrapOutcome {
        if let Some(status) = process.exit_status() {
            return TrapOutcome::Terminated(status);
        }

        let space = process.address_space();
        if !self.validator.is_safe(frame.esp, space) {
            warn!(pid = process.pid(), esp = frame.esp, "bad stack pointer");
            return self.kill(process);
        }

        let decoded = match ArgumentMarshaller::new(&self.validator, space, frame.esp).decode() {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(pid = process.pid(), error = %e, "unreadable syscall frame");
                return self.kill(process);
            }
        };

        let syscall = match decoded {
            Decoded::Known(syscall) => syscall,
            Decoded::Unknown(raw) => {
                return self.unknown_syscall(process, frame, SyscallError::UnknownSyscall(raw))
            }
        };

        let span = span_syscall(syscall.name(), process.pid()).blocking(syscall.may_block());
        let _guard = span.enter();
        span.record_args_count(syscall.number().arity());

        let ctx = SyscallContext {
            executor: self,
            process,
        };
        let Some(result) = self.registry.dispatch(&ctx, &syscall) else {
            let raw = u32::from(syscall.number());
            return self.unknown_syscall(process, frame, SyscallError::UnknownSyscall(raw));
        };

        match result {
            Ok(Completion::Return(value)) => {
                span.record_return(value);
                frame.set_return(value);
                TrapOutcome::Resume
            }
            Ok(Completion::Void) => TrapOutcome::Resume,
            Ok(Completion::Exit(status)) => {
                self.terminate(process, status);
                TrapOutcome::Terminated(status)
            }
            Ok(Completion::Halt) => TrapOutcome::Halted,
            Err(e) if e.is_fatal() => {
                span.record_error(&e);
                warn!(pid = process.pid(), syscall = syscall.name(), error = %e, "terminating process");
                self.kill(process)
            }
            Err(e) => {
                span.record_error(&e);
                debug!(pid = process.pid(), syscall = syscall.name(), error = %e, "syscall failed");
                self.apply_failure(&syscall, frame);
                TrapOutcome::Resume
            }
        }
    }

    fn apply_failure(&self, syscall: &Syscall, frame: &mut TrapFrame) {
        if let Some(value) = syscall.failure_value() {
            frame.set_return(value);
        }
    }

    fn unknown_syscall(
        &self,
        process: &Process,
        frame: &mut TrapFrame,
        error: SyscallError,
    ) -> TrapOutcome {
        match self.config.unknown_syscall {
            UnknownSyscallPolicy::ReturnZero => {
                warn!(pid = process.pid(), error = %error, "ignoring syscall");
                frame.set_return(0);
                TrapOutcome::Resume
            }
            UnknownSyscallPolicy::Terminate => {
                warn!(pid = process.pid(), error = %error, "terminating process");
                self.kill(process)
            }
        }
    }

    fn kill(&self, process: &Process) -> TrapOutcome {
        self.terminate(process, EXIT_FAILURE);
        TrapOutcome::Terminated(EXIT_FAILURE)
    }
}

// ============================================================================
// Process Control
// ============================================================================

impl SyscallExecutor {
    /// Run exit processing for `process`; only the first call has effect
    pub fn terminate(&self, process: &Process, status: ExitStatus) {
        self.lifecycle.exit(process, status);
    }

    /// Child side of the exec handshake
    pub fn complete_load(&self, child: &Process, success: bool) {
        self.lifecycle.complete_load(child, success);
    }

    /// Start the first user process
    pub fn spawn_init(&self, command_line: &str) -> Result<Arc<Process>, SpawnError> {
        self.lifecycle.spawn_init(self, command_line)
    }

    pub fn processes(&self) -> &ProcessManager {
        self.lifecycle.processes()
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn validator(&self) -> &PointerValidator {
        &self.validator
    }

    pub fn filesys(&self) -> &Filesys {
        &self.filesys
    }

    pub fn console(&self) -> &Arc<dyn Console> {
        &self.console
    }
}
