//! Job ledger
//!
//! The ledger owns every process control block for the whole run. Queues and
//! the running slot refer to processes by [`Pid`] only, so a state change made
//! here is immediately visible everywhere.

use crate::SimulationError;
use core_types::{Pid, ProcessControlBlock, ProcessState};
use std::collections::HashMap;

/// Authoritative collection of all processes, in input order
#[derive(Debug, Clone, Default)]
pub struct JobLedger {
    entries: Vec<ProcessControlBlock>,
    index: HashMap<Pid, usize>,
}

impl JobLedger {
    /// Builds a ledger, rejecting duplicate pids
    pub fn new(processes: Vec<ProcessControlBlock>) -> Result<Self, SimulationError> {
        let mut index = HashMap::with_capacity(processes.len());
        for (position, pcb) in processes.iter().enumerate() {
            if index.insert(pcb.pid, position).is_some() {
                return Err(SimulationError::DuplicatePid(pcb.pid));
            }
        }
        Ok(Self {
            entries: processes,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a process
    pub fn get(&self, pid: Pid) -> Option<&ProcessControlBlock> {
        self.index.get(&pid).map(|&i| &self.entries[i])
    }

    /// Returns a process the engine knows is present
    ///
    /// # Panics
    ///
    /// Panics if `pid` is not in the ledger; queues only ever hold ledger pids.
    pub(crate) fn pcb(&self, pid: Pid) -> &ProcessControlBlock {
        &self.entries[self.index[&pid]]
    }

    pub(crate) fn pcb_mut(&mut self, pid: Pid) -> &mut ProcessControlBlock {
        &mut self.entries[self.index[&pid]]
    }

    pub(crate) fn at_mut(&mut self, position: usize) -> &mut ProcessControlBlock {
        &mut self.entries[position]
    }

    /// Iterates in input order
    pub fn iter(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        self.entries.iter()
    }

    /// Counts processes in `state`
    pub fn count_in(&self, state: ProcessState) -> usize {
        self.entries.iter().filter(|p| p.state() == state).count()
    }

    /// True once every process is TERMINATED (vacuously true when empty)
    pub fn all_terminated(&self) -> bool {
        self.entries.iter().all(|p| p.is_terminated())
    }

    /// Copies out every process control block
    pub fn snapshot(&self) -> Vec<ProcessControlBlock> {
        self.entries.clone()
    }
}
