/*!
 * Process Types
 * The kernel's view of a user process
 */

use super::fd_table::FdTable;
use super::relationship::ProcessRelationship;
use crate::core::types::{ExitStatus, Pid};
use crate::memory::AddressSpace;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Process creation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    #[error("Empty command line")]
    EmptyCommand,

    #[error("Thread creation failed: {0}")]
    ThreadCreation(String),

    #[error("Program load failed: {0}")]
    LoadFailed(String),
}

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created, waiting on its load result
    Loading,
    /// Program loaded and running
    Running,
    /// Exited; status recorded
    Terminated,
}

/// Snapshot of a process for listings and logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: Pid,
    pub name: String,
    pub state: ProcessState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Pid>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<Pid>,
    pub open_files: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_status: Option<ExitStatus>,
}

/// A user process as seen by the syscall layer
pub struct Process {
    pid: Pid,
    name: String,
    address_space: Arc<dyn AddressSpace>,
    files: Mutex<FdTable>,
    relationship: Arc<ProcessRelationship>,
    exit_reported: AtomicBool,
}

impl Process {
    pub(crate) fn new(
        pid: Pid,
        name: impl Into<String>,
        address_space: Arc<dyn AddressSpace>,
        relationship: Arc<ProcessRelationship>,
    ) -> Self {
        Self {
            pid,
            name: name.into(),
            address_space,
            files: Mutex::new(FdTable::new()),
            relationship,
            exit_reported: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Program name (first token of the command line)
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn address_space(&self) -> &dyn AddressSpace {
        self.address_space.as_ref()
    }

    /// Shared handle to the address space, for loaders that map the image
    pub fn address_space_arc(&self) -> Arc<dyn AddressSpace> {
        self.address_space.clone()
    }

    /// Lock the open file table
    ///
    /// Callers that also need the filesystem lock must take it first.
    pub fn files(&self) -> MutexGuard<'_, FdTable> {
        self.files.lock()
    }

    #[inline]
    pub fn relationship(&self) -> &Arc<ProcessRelationship> {
        &self.relationship
    }

    pub fn is_alive(&self) -> bool {
        self.relationship.is_alive()
    }

    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.relationship.exit_status()
    }

    pub fn state(&self) -> ProcessState {
        if !self.relationship.is_alive() {
            ProcessState::Terminated
        } else if self.relationship.load_success().is_some() {
            ProcessState::Running
        } else {
            ProcessState::Loading
        }
    }

    /// Claim the right to run exit processing; true exactly once
    pub(crate) fn begin_exit(&self) -> bool {
        !self.exit_reported.swap(true, Ordering::AcqRel)
    }

    pub fn info(&self) -> ProcessInfo {
        ProcessInfo {
            pid: self.pid,
            name: self.name.clone(),
            state: self.state(),
            parent: self.relationship.parent_pid(),
            children: self.relationship.child_pids(),
            open_files: self.files.lock().len(),
            exit_status: self.exit_status(),
        }
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid)
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}
