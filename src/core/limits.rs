/*!
 * System Limits and Constants
 *
 * Centralized location for the ABI constants shared by the trap path,
 * the pointer validator and the process layer.
 */

use super::types::{Address, ExitStatus, Fd, Pid};

// =============================================================================
// TRAP ABI
// =============================================================================

/// Size of one stack slot in bytes (32-bit user ABI)
pub const WORD_SIZE: usize = 4;

/// Maximum number of argument words following the syscall number
pub const MAX_SYSCALL_ARGS: usize = 3;

// =============================================================================
// ADDRESS SPACE
// =============================================================================

/// Page size used by the address-space collaborator (4KB)
pub const PAGE_SIZE: usize = 4096;

/// First kernel virtual address; everything below is user-reachable
pub const PHYS_BASE: Address = 0xC000_0000;

/// Longest user string (path or command line) copied into the kernel,
/// including the terminating NUL
pub const MAX_USER_STRING: usize = PAGE_SIZE;

// =============================================================================
// FILE HANDLES
// =============================================================================

/// Console input pseudo-stream
pub const STDIN_FILENO: Fd = 0;

/// Console output pseudo-stream
pub const STDOUT_FILENO: Fd = 1;

/// First handle handed out by `open` (0 and 1 are reserved)
pub const FIRST_FILE_HANDLE: Fd = 2;

/// `close` argument that releases every handle of the caller
pub const CLOSE_ALL: Fd = -1;

// =============================================================================
// PROCESS
// =============================================================================

/// Status used for every kernel-initiated termination
pub const EXIT_FAILURE: ExitStatus = -1;

/// Returned by exec when no process could be started
pub const PID_ERROR: Pid = -1;

/// First pid handed out by the process table
pub const FIRST_PID: Pid = 1;
