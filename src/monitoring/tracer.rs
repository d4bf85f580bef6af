/*!
 * Syscall Tracing
 * Structured tracing for traps using the tracing crate
 *
 * Features:
 * - Per-trap sequence ids for correlating log lines
 * - JSON-formatted logs for structured parsing
 * - Slow-trap warnings, skipped for calls that sleep by design (exec, wait,
 *   console reads)
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, span, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::core::types::Pid;

/// Enables JSON log output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "TRAPGATE_TRACE_JSON";

/// Traps slower than this are reported at warn level
const SLOW_TRAP_MS: u128 = 10;

static NEXT_TRAP_ID: AtomicU64 = AtomicU64::new(1);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - TRAPGATE_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "structured tracing initialized");
    }
    installed
}

/// Next trap correlation id
pub fn next_trap_id() -> u64 {
    NEXT_TRAP_ID.fetch_add(1, Ordering::Relaxed)
}

/// Span covering one trap from decode to completion
pub struct SyscallSpan {
    span: Span,
    start: Instant,
    trap_id: u64,
    name: &'static str,
    blocking: bool,
}

impl SyscallSpan {
    pub fn new(name: &'static str, pid: Pid) -> Self {
        let trap_id = next_trap_id();
        let span = span!(
            Level::DEBUG,
            "syscall",
            trap_id,
            syscall = name,
            pid,
            args_count = tracing::field::Empty,
            return_value = tracing::field::Empty,
            error = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            trap_id,
            name,
            blocking: false,
        }
    }

    /// Mark the call as one that sleeps by design; it is never reported slow
    #[must_use]
    pub fn blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    fn is_slow(&self, elapsed: Duration) -> bool {
        !self.blocking && elapsed.as_millis() > SLOW_TRAP_MS
    }

    pub fn trap_id(&self) -> u64 {
        self.trap_id
    }

    pub fn record_args_count(&self, count: usize) {
        self.span.record("args_count", count);
    }

    pub fn record_return(&self, value: i32) {
        self.span.record("return_value", value);
    }

    pub fn record_error(&self, error: &dyn std::fmt::Display) {
        self.span.record("error", tracing::field::display(error));
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for SyscallSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration.as_micros() as u64);

        if self.is_slow(duration) {
            warn!(
                trap_id = self.trap_id,
                syscall = self.name,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow syscall"
            );
        } else {
            debug!(
                trap_id = self.trap_id,
                syscall = self.name,
                duration_us = duration.as_micros() as u64,
                blocking = self.blocking,
                "syscall completed"
            );
        }
    }
}

/// Convenience constructor used by the dispatcher
pub fn span_syscall(name: &'static str, pid: Pid) -> SyscallSpan {
    SyscallSpan::new(name, pid)
}
