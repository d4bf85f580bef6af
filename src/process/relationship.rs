/*!
 * Process Relationship Records
 *
 * Parent/child bookkeeping used by exec and wait. Each process owns its
 * record; the parent's child list holds `Arc` references to child records
 * and a child only keeps a `Weak` link upward, so there is no ownership cycle.
 *
 * A child's record carries two one-shot signals:
 * - `load`: posted once by the child on its startup path with the load
 *   result, consumed once by the parent blocked in exec
 * - `exit`: posted once at exit with the final status, consumed once by the
 *   parent's wait
 */

use crate::core::sync::{OneShot, PostResult};
use crate::core::types::{ExitStatus, Pid};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Relationship record for one process
#[derive(Debug)]
pub struct ProcessRelationship {
    pid: Pid,
    parent: Option<Weak<ProcessRelationship>>,
    children: Mutex<Vec<Arc<ProcessRelationship>>>,
    is_alive: AtomicBool,
    load: OneShot<bool>,
    exit: OneShot<ExitStatus>,
}

impl ProcessRelationship {
    /// Record for a process with no parent (the initial process)
    pub fn root(pid: Pid) -> Arc<Self> {
        Arc::new(Self::with_parent(pid, None))
    }

    /// Record for a child of `parent`, registered in the parent's child list
    pub fn child_of(pid: Pid, parent: &Arc<ProcessRelationship>) -> Arc<Self> {
        let child = Arc::new(Self::with_parent(pid, Some(Arc::downgrade(parent))));
        parent.children.lock().push(child.clone());
        child
    }

    fn with_parent(pid: Pid, parent: Option<Weak<ProcessRelationship>>) -> Self {
        Self {
            pid,
            parent,
            children: Mutex::new(Vec::new()),
            is_alive: AtomicBool::new(true),
            load: OneShot::new(),
            exit: OneShot::new(),
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.is_alive.load(Ordering::Acquire)
    }

    /// Pid of the parent if its record still exists
    pub fn parent_pid(&self) -> Option<Pid> {
        self.parent.as_ref()?.upgrade().map(|p| p.pid)
    }

    /// Whether a living parent can still observe this process's exit
    pub fn parent_alive(&self) -> bool {
        self.parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map_or(false, |parent| parent.is_alive())
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Locate a direct, not-yet-reaped child by pid
    pub fn find_child(&self, pid: Pid) -> Option<Arc<ProcessRelationship>> {
        self.children.lock().iter().find(|c| c.pid == pid).cloned()
    }

    /// Drop a child from the list; it can no longer be waited on
    pub fn reap_child(&self, pid: Pid) -> Option<Arc<ProcessRelationship>> {
        let mut children = self.children.lock();
        let index = children.iter().position(|c| c.pid == pid)?;
        Some(children.remove(index))
    }

    /// Pids of un-reaped children in creation order
    pub fn child_pids(&self) -> Vec<Pid> {
        self.children.lock().iter().map(|c| c.pid).collect()
    }

    // =========================================================================
    // Load handshake
    // =========================================================================

    /// Child side: report whether the program image loaded
    pub fn complete_load(&self, success: bool) -> PostResult {
        self.load.post(success)
    }

    /// Parent side: block until the child reports its load result
    ///
    /// `None` if the result was already consumed by an earlier exec.
    pub fn await_load(&self) -> Option<bool> {
        self.load.wait()
    }

    /// Load result if already reported
    pub fn load_success(&self) -> Option<bool> {
        self.load.peek()
    }

    // =========================================================================
    // Exit handshake
    // =========================================================================

    /// Mark the process dead and publish its status
    ///
    /// Returns whether a living parent can observe the status. The status is
    /// recorded either way.
    pub fn record_exit(&self, status: ExitStatus) -> bool {
        let observed = self.parent_alive();
        self.is_alive.store(false, Ordering::Release);
        self.exit.post(status);
        observed
    }

    /// Block until the process exits and consume its status
    ///
    /// `None` if the status was already consumed.
    pub fn await_exit(&self) -> Option<ExitStatus> {
        self.exit.wait()
    }

    /// Final status once the process is no longer alive
    pub fn exit_status(&self) -> Option<ExitStatus> {
        if self.is_alive() {
            None
        } else {
            self.exit.peek()
        }
    }
}
