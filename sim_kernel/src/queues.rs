//! Ready and wait queues
//!
//! Both queues hold pids in insertion order. Neither is kept sorted; the
//! ready queue is ordered by the scheduling policy only when a dispatch
//! decision is made.

use crate::ledger::JobLedger;
use core_types::{Pid, ProcessControlBlock};
use policy::SchedulingPolicy;

/// Processes waiting for the CPU
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    queue: Vec<Pid>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn enqueue(&mut self, pid: Pid) {
        self.queue.push(pid);
    }

    /// Orders the queue with `policy` and removes the front
    pub(crate) fn dequeue_next(
        &mut self,
        policy: &dyn SchedulingPolicy,
        ledger: &JobLedger,
    ) -> Option<Pid> {
        if self.queue.is_empty() {
            return None;
        }
        let mut ordered: Vec<&ProcessControlBlock> =
            self.queue.iter().map(|pid| ledger.pcb(*pid)).collect();
        policy.order(&mut ordered);
        self.queue = ordered.iter().map(|pcb| pcb.pid).collect();
        Some(self.queue.remove(0))
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn pids(&self) -> &[Pid] {
        &self.queue
    }
}

/// Processes servicing I/O
#[derive(Debug, Clone, Default)]
pub struct WaitQueue {
    queue: Vec<Pid>,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn enqueue(&mut self, pid: Pid) {
        self.queue.push(pid);
    }

    /// Removes and returns every pid for which `done` is true
    ///
    /// `done` is called exactly once per queued pid, in queue order. Pids that
    /// stay keep their relative order.
    pub(crate) fn drain_completed<F>(&mut self, mut done: F) -> Vec<Pid>
    where
        F: FnMut(Pid) -> bool,
    {
        let (completed, waiting): (Vec<Pid>, Vec<Pid>) =
            self.queue.drain(..).partition(|pid| done(*pid));
        self.queue = waiting;
        completed
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn pids(&self) -> &[Pid] {
        &self.queue
    }
}
