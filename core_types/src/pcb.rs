//! Process control block

use crate::{MemoryUnits, PartitionId, Pid, ProcessState, Tick};
use serde::{Deserialize, Serialize};

/// Identity and runtime state of one simulated process
///
/// The descriptive fields are fixed at construction. Runtime counters and the
/// lifecycle state only change through the methods below, which keep the
/// counters non-negative and reject edges the state machine does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessControlBlock {
    pub pid: Pid,
    pub arrival_time: Tick,
    /// Lower value means higher scheduling priority
    pub priority: i32,
    /// Total CPU ticks needed (burst time)
    pub processing_time: u64,
    /// CPU ticks between I/O requests, 0 disables I/O
    pub io_frequency: u64,
    /// Ticks needed to service one I/O request
    pub io_duration: u64,
    /// Footprint requested from the admission oracle
    pub memory_size: MemoryUnits,
    remaining_time: u64,
    remaining_io_time: u64,
    partition: Option<PartitionId>,
    state: ProcessState,
}

impl ProcessControlBlock {
    /// Creates a NEW process with its full burst remaining
    pub fn new(
        pid: Pid,
        arrival_time: Tick,
        priority: i32,
        processing_time: u64,
        io_frequency: u64,
        io_duration: u64,
    ) -> Self {
        Self {
            pid,
            arrival_time,
            priority,
            processing_time,
            io_frequency,
            io_duration,
            memory_size: MemoryUnits::zero(),
            remaining_time: processing_time,
            remaining_io_time: 0,
            partition: None,
            state: ProcessState::New,
        }
    }

    /// Builder: sets the memory footprint
    pub fn with_memory_size(mut self, size: MemoryUnits) -> Self {
        self.memory_size = size;
        self
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn remaining_time(&self) -> u64 {
        self.remaining_time
    }

    pub fn remaining_io_time(&self) -> u64 {
        self.remaining_io_time
    }

    pub fn partition(&self) -> Option<PartitionId> {
        self.partition
    }

    /// CPU ticks consumed so far
    pub fn time_processed(&self) -> u64 {
        self.processing_time.saturating_sub(self.remaining_time)
    }

    pub fn is_terminated(&self) -> bool {
        self.state.is_terminal()
    }

    /// Moves the process along one state-machine edge
    ///
    /// # Panics
    ///
    /// Panics if the edge is not part of the lifecycle. Such a call is an
    /// engine bug, never a consequence of input data.
    pub fn transition(&mut self, next: ProcessState) -> ProcessState {
        let previous = self.state;
        assert!(
            previous.can_transition_to(next),
            "invalid transition for pid {}: {} -> {}",
            self.pid,
            previous,
            next
        );
        self.state = next;
        previous
    }

    /// Consumes one tick of CPU and returns the remaining burst
    pub fn execute_tick(&mut self) -> u64 {
        self.assert_state(ProcessState::Running);
        self.remaining_time = self.remaining_time.saturating_sub(1);
        self.remaining_time
    }

    /// Checks whether the CPU time consumed so far lands on an I/O boundary
    pub fn io_due(&self) -> bool {
        let processed = self.time_processed();
        self.io_frequency > 0 && processed > 0 && processed % self.io_frequency == 0
    }

    /// Arms the I/O countdown; call right after entering WAITING
    pub fn begin_io(&mut self) {
        self.assert_state(ProcessState::Waiting);
        self.remaining_io_time = self.io_duration;
    }

    /// Services one tick of I/O and returns the remaining I/O time
    pub fn service_io_tick(&mut self) -> u64 {
        self.assert_state(ProcessState::Waiting);
        self.remaining_io_time = self.remaining_io_time.saturating_sub(1);
        self.remaining_io_time
    }

    /// Records the partition granted by the admission oracle
    pub fn assign_partition(&mut self, partition: PartitionId) {
        self.partition = Some(partition);
    }

    /// Forgets the partition; returns what was held
    pub fn clear_partition(&mut self) -> Option<PartitionId> {
        self.partition.take()
    }

    fn assert_state(&self, expected: ProcessState) {
        assert_eq!(
            self.state, expected,
            "pid {} used in state {}, expected {}",
            self.pid, self.state, expected
        );
    }
}
