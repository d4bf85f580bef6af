/*!
 * Process Management
 * Pid allocation and the table of live processes
 */

use super::relationship::ProcessRelationship;
use super::types::{Process, ProcessInfo};
use crate::core::limits::FIRST_PID;
use crate::core::types::Pid;
use crate::memory::AddressSpace;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Table of live processes, shared by every clone
#[derive(Clone)]
pub struct ProcessManager {
    processes: Arc<DashMap<Pid, Arc<Process>>>,
    next_pid: Arc<AtomicI32>,
}

impl ProcessManager {
    pub fn new() -> Self {
        Self {
            processes: Arc::new(DashMap::new()),
            next_pid: Arc::new(AtomicI32::new(FIRST_PID)),
        }
    }

    /// Allocate a pid and register a new process
    ///
    /// With a parent, the new process is recorded as its child before it can
    /// run, so a wait issued right after exec always finds it.
    pub fn create_process(
        &self,
        name: &str,
        address_space: Arc<dyn AddressSpace>,
        parent: Option<&Process>,
    ) -> Arc<Process> {
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let relationship = match parent {
            Some(parent) => ProcessRelationship::child_of(pid, parent.relationship()),
            None => ProcessRelationship::root(pid),
        };

        let process = Arc::new(Process::new(pid, name, address_space, relationship));
        self.processes.insert(pid, process.clone());
        debug!(
            pid,
            name,
            parent = parent.map(Process::pid),
            "process created"
        );
        process
    }

    pub fn get_process(&self, pid: Pid) -> Option<Arc<Process>> {
        self.processes.get(&pid).map(|entry| entry.value().clone())
    }

    /// Drop a process from the table; its relationship record lives on in
    /// the parent's child list until reaped
    pub fn remove_process(&self, pid: Pid) -> Option<Arc<Process>> {
        self.processes.remove(&pid).map(|(_, process)| process)
    }

    /// Snapshot of every live process, ordered by pid
    pub fn list_processes(&self) -> Vec<ProcessInfo> {
        let mut list: Vec<ProcessInfo> = self
            .processes
            .iter()
            .map(|entry| entry.value().info())
            .collect();
        list.sort_by_key(|info| info.pid);
        list
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

impl Default for ProcessManager {
    fn default() -> Self {
        Self::new()
    }
}
