/*!
 * Monitoring
 * Structured logging and per-syscall tracing spans
 */

mod tracer;

pub use tracer::{init_tracing, next_trap_id, span_syscall, SyscallSpan, ENV_TRACE_JSON};
