/*!
 * Syscall Handler Trait
 * Defines the interface for syscall handlers and handler registration
 */

use super::executor::SyscallExecutor;
use super::types::{Completion, Syscall, SyscallResult};
use crate::process::Process;
use std::sync::Arc;

/// Everything a handler may touch while serving one trap
pub struct SyscallContext<'a> {
    pub executor: &'a SyscallExecutor,
    pub process: &'a Arc<Process>,
}

/// Trait for handling individual syscalls
/// Each syscall category (system, process, fs, fd) implements this
pub trait SyscallHandler: Send + Sync {
    /// Handle a syscall; `None` if this handler does not own it
    fn handle(&self, ctx: &SyscallContext<'_>, syscall: &Syscall) -> Option<SyscallResult<Completion>>;

    /// Get the name of this handler (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// Registry for syscall handlers
/// Dispatches syscalls to the first handler that claims them
#[derive(Clone)]
pub struct SyscallHandlerRegistry {
    handlers: Arc<Vec<Arc<dyn SyscallHandler>>>,
}

impl SyscallHandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Registry with every built-in category handler
    pub fn standard() -> Self {
        use super::handlers::{
            FileDescriptorHandler, FileSystemHandler, ProcessHandler, SystemHandler,
        };

        Self::new()
            .register(Arc::new(SystemHandler))
            .register(Arc::new(ProcessHandler))
            .register(Arc::new(FileSystemHandler))
            .register(Arc::new(FileDescriptorHandler))
    }

    /// Register a handler in the registry
    pub fn register(mut self, handler: Arc<dyn SyscallHandler>) -> Self {
        Arc::make_mut(&mut self.handlers).push(handler);
        self
    }

    /// Dispatch a syscall to the appropriate handler
    /// Returns None if no handler can handle this syscall
    pub fn dispatch(
        &self,
        ctx: &SyscallContext<'_>,
        syscall: &Syscall,
    ) -> Option<SyscallResult<Completion>> {
        self.handlers
            .iter()
            .find_map(|handler| handler.handle(ctx, syscall))
    }

    /// Names of registered handlers in dispatch order
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Get the number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for SyscallHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
