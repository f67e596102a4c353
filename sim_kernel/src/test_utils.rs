//! Test utilities for engine scenarios
//!
//! This module provides a process builder and an invariant checker for unit
//! and integration tests.

use crate::Simulation;
use core_types::{MemoryUnits, Pid, ProcessControlBlock, ProcessState, Tick, Transition};
use std::collections::HashSet;

/// Builder for process control blocks
///
/// Defaults: arrival 0, priority 1, burst 1, no I/O, zero memory.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    pid: u32,
    arrival: u64,
    priority: i32,
    burst: u64,
    io_frequency: u64,
    io_duration: u64,
    memory: u64,
}

impl ProcessBuilder {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            arrival: 0,
            priority: 1,
            burst: 1,
            io_frequency: 0,
            io_duration: 0,
            memory: 0,
        }
    }

    pub fn arrival(mut self, tick: u64) -> Self {
        self.arrival = tick;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn burst(mut self, ticks: u64) -> Self {
        self.burst = ticks;
        self
    }

    pub fn io(mut self, frequency: u64, duration: u64) -> Self {
        self.io_frequency = frequency;
        self.io_duration = duration;
        self
    }

    pub fn memory(mut self, units: u64) -> Self {
        self.memory = units;
        self
    }

    pub fn build(self) -> ProcessControlBlock {
        ProcessControlBlock::new(
            Pid::new(self.pid),
            Tick::new(self.arrival),
            self.priority,
            self.burst,
            self.io_frequency,
            self.io_duration,
        )
        .with_memory_size(MemoryUnits::new(self.memory))
    }
}

/// Checks the structural invariants that must hold between ticks
///
/// - the running slot, ready queue and wait queue are pairwise disjoint
/// - every queued pid has the matching state in the ledger
/// - the per-state census adds up to the number of processes
pub fn check_invariants(sim: &Simulation) -> Result<(), String> {
    let ledger = sim.ledger();
    let mut seen = HashSet::new();

    if let Some(pid) = sim.running() {
        seen.insert(pid);
        expect_state(sim, pid, ProcessState::Running)?;
    }
    for &pid in sim.ready_queue().pids() {
        if !seen.insert(pid) {
            return Err(format!("pid {} held by more than one owner", pid));
        }
        expect_state(sim, pid, ProcessState::Ready)?;
    }
    for &pid in sim.wait_queue().pids() {
        if !seen.insert(pid) {
            return Err(format!("pid {} held by more than one owner", pid));
        }
        expect_state(sim, pid, ProcessState::Waiting)?;
    }

    let census = sim.census();
    if census.running > 1 {
        return Err(format!("{} processes running", census.running));
    }
    if census.ready != sim.ready_queue().len() || census.waiting != sim.wait_queue().len() {
        return Err(format!("queue sizes disagree with ledger: {:?}", census));
    }
    if census.total() != ledger.len() {
        return Err(format!(
            "census {} does not match {} processes",
            census.total(),
            ledger.len()
        ));
    }
    Ok(())
}

fn expect_state(sim: &Simulation, pid: Pid, expected: ProcessState) -> Result<(), String> {
    match sim.ledger().get(pid) {
        Some(pcb) if pcb.state() == expected => Ok(()),
        Some(pcb) => Err(format!(
            "pid {} is {} in the ledger but queued as {}",
            pid,
            pcb.state(),
            expected
        )),
        None => Err(format!("pid {} is not in the ledger", pid)),
    }
}

/// Renders transitions as `(tick, pid, to)` triples for compact assertions
pub fn timeline(transitions: &[Transition]) -> Vec<(u64, u32, ProcessState)> {
    transitions
        .iter()
        .map(|t| (t.tick.as_u64(), t.pid.as_u32(), t.to))
        .collect()
}
