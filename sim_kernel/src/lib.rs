//! # Simulated Kernel
//!
//! This crate provides the single-core scheduling engine.
//!
//! ## Purpose
//!
//! The engine replays how a scheduler admits, dispatches, parks for I/O and
//! retires a fixed set of processes, one logical tick at a time:
//! - Runs under `cargo test`
//! - Deterministic (controlled time, no real concurrency)
//! - Inspectable (ledger, queues and running slot are all readable between ticks)
//!
//! ## Tick phases
//!
//! Each call to [`Simulation::step`] runs four phases in a fixed order:
//!
//! 1. **Admission**: arrived NEW processes ask the memory oracle for room
//! 2. **Dispatch**: an idle CPU takes the policy's first READY process
//! 3. **I/O**: every WAITING process counts down; finished ones become READY
//! 4. **Execution**: the running process consumes one tick, then terminates
//!    or leaves for I/O
//!
//! Admission, dispatch and I/O transitions are stamped with the current tick.
//! Execution transitions are stamped with the next tick boundary, the instant
//! the unit of work completed.

pub mod config;
pub mod ledger;
pub mod outcome;
pub mod queues;
pub mod test_utils;

pub use config::{MemoryModel, SimulationConfig};
pub use ledger::JobLedger;
pub use outcome::{MemorySnapshot, ProcessStats, SimulationOutcome, SimulationStats};
pub use queues::{ReadyQueue, WaitQueue};

use core_types::{Pid, ProcessControlBlock, ProcessState, Tick, Transition};
use policy::SchedulingPolicy;
use resources::{MemoryAdmission, ResourceError};
use services_logger::{LogEntry, LogLevel, LogSink, NullLogSink};
use thiserror::Error;

/// Engine errors
///
/// Invalid state transitions are not represented here: they are engine bugs
/// and panic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("Duplicate pid in input: {0}")]
    DuplicatePid(Pid),

    #[error("Tick limit {limit} reached with {unfinished} unfinished processes")]
    TickLimitExceeded { limit: u64, unfinished: usize },

    #[error("Memory configuration error: {0}")]
    Memory(#[from] ResourceError),
}

/// Number of processes in each lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    pub new: usize,
    pub ready: usize,
    pub running: usize,
    pub waiting: usize,
    pub terminated: usize,
}

impl Census {
    pub fn total(&self) -> usize {
        self.new + self.ready + self.running + self.waiting + self.terminated
    }
}

/// Single-core scheduling simulation
pub struct Simulation {
    config: SimulationConfig,
    ledger: JobLedger,
    ready_queue: ReadyQueue,
    wait_queue: WaitQueue,
    running: Option<Pid>,
    policy: Box<dyn SchedulingPolicy>,
    memory: Box<dyn MemoryAdmission>,
    logger: Box<dyn LogSink>,
    clock: Tick,
    transitions: Vec<Transition>,
    memory_snapshots: Vec<MemorySnapshot>,
}

impl Simulation {
    /// Creates a simulation with the policy and memory model named by `config`
    pub fn new(
        processes: Vec<ProcessControlBlock>,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        let ledger = JobLedger::new(processes)?;
        let memory = config.build_memory()?;
        let policy = config.build_policy();

        Ok(Self {
            config,
            ledger,
            ready_queue: ReadyQueue::new(),
            wait_queue: WaitQueue::new(),
            running: None,
            policy,
            memory,
            logger: Box::new(NullLogSink),
            clock: Tick::ZERO,
            transitions: Vec::new(),
            memory_snapshots: Vec::new(),
        })
    }

    /// Replaces the scheduling policy
    pub fn with_policy(mut self, policy: Box<dyn SchedulingPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the memory admission oracle
    pub fn with_memory(mut self, memory: Box<dyn MemoryAdmission>) -> Self {
        self.memory = memory;
        self
    }

    /// Installs a log sink
    pub fn with_logger(mut self, logger: Box<dyn LogSink>) -> Self {
        self.logger = logger;
        self
    }

    pub fn now(&self) -> Tick {
        self.clock
    }

    pub fn ledger(&self) -> &JobLedger {
        &self.ledger
    }

    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready_queue
    }

    pub fn wait_queue(&self) -> &WaitQueue {
        &self.wait_queue
    }

    /// Pid occupying the CPU, `None` when idle
    pub fn running(&self) -> Option<Pid> {
        self.running
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn memory_snapshots(&self) -> &[MemorySnapshot] {
        &self.memory_snapshots
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// True once every process is TERMINATED; an empty input is finished at once
    pub fn is_finished(&self) -> bool {
        self.ledger.all_terminated()
    }

    /// Counts processes per state
    pub fn census(&self) -> Census {
        Census {
            new: self.ledger.count_in(ProcessState::New),
            ready: self.ledger.count_in(ProcessState::Ready),
            running: self.ledger.count_in(ProcessState::Running),
            waiting: self.ledger.count_in(ProcessState::Waiting),
            terminated: self.ledger.count_in(ProcessState::Terminated),
        }
    }

    /// Runs ticks until every process has terminated
    ///
    /// With `max_ticks` unset a process the oracle never admits keeps the
    /// run going forever.
    pub fn run(&mut self) -> Result<SimulationOutcome, SimulationError> {
        self.log(
            LogEntry::new(LogLevel::Info, "simulation started")
                .at(self.clock)
                .with_field("processes", self.ledger.len())
                .with_field("policy", self.policy.name()),
        );

        while !self.is_finished() {
            if let Some(limit) = self.config.max_ticks {
                if self.clock.as_u64() >= limit {
                    let unfinished = self.ledger.len() - self.census().terminated;
                    self.log(
                        LogEntry::new(LogLevel::Error, "tick limit reached")
                            .at(self.clock)
                            .with_field("unfinished", unfinished),
                    );
                    return Err(SimulationError::TickLimitExceeded { limit, unfinished });
                }
            }
            self.step();
        }

        self.log(
            LogEntry::new(LogLevel::Info, "simulation finished")
                .at(self.clock)
                .with_field("transitions", self.transitions.len()),
        );
        Ok(self.outcome())
    }

    /// Executes exactly one tick
    pub fn step(&mut self) {
        let now = self.clock;
        self.admit_arrivals(now);
        self.dispatch(now);
        self.service_io(now);
        self.execute(now);
        self.clock = now.next();
    }

    /// Builds the result of the run so far
    pub fn outcome(&self) -> SimulationOutcome {
        let processes = self.ledger.snapshot();
        let stats = SimulationStats::from_log(&processes, &self.transitions, self.clock);
        SimulationOutcome {
            transitions: self.transitions.clone(),
            memory_snapshots: self.memory_snapshots.clone(),
            final_tick: self.clock,
            processes,
            stats,
        }
    }

    fn admit_arrivals(&mut self, now: Tick) {
        for position in 0..self.ledger.len() {
            let pcb = self.ledger.at_mut(position);
            if pcb.state() != ProcessState::New || pcb.arrival_time > now {
                continue;
            }

            let pid = pcb.pid;
            if self.memory.try_admit(pcb) {
                let from = pcb.transition(ProcessState::Ready);
                self.ready_queue.enqueue(pid);
                self.record(now, pid, from, ProcessState::Ready);
                self.memory_snapshots.push(MemorySnapshot {
                    tick: now,
                    pid,
                    status: self.memory.status(),
                });
            } else if self.logger.enabled(LogLevel::Debug) {
                let size = pcb.memory_size.0;
                self.log(
                    LogEntry::new(LogLevel::Debug, "admission deferred")
                        .at(now)
                        .with_source(pid)
                        .with_field("memory_size", size),
                );
            }
        }
    }

    fn dispatch(&mut self, now: Tick) {
        if self.running.is_some() {
            return;
        }
        let Some(pid) = self
            .ready_queue
            .dequeue_next(self.policy.as_ref(), &self.ledger)
        else {
            return;
        };

        let from = self.ledger.pcb_mut(pid).transition(ProcessState::Running);
        self.running = Some(pid);
        self.record(now, pid, from, ProcessState::Running);
    }

    fn service_io(&mut self, now: Tick) {
        let ledger = &mut self.ledger;
        let completed = self
            .wait_queue
            .drain_completed(|pid| ledger.pcb_mut(pid).service_io_tick() == 0);

        for pid in completed {
            let from = self.ledger.pcb_mut(pid).transition(ProcessState::Ready);
            self.ready_queue.enqueue(pid);
            self.record(now, pid, from, ProcessState::Ready);
        }
    }

    fn execute(&mut self, now: Tick) {
        let Some(pid) = self.running else {
            return;
        };
        let boundary = now.next();
        let pcb = self.ledger.pcb_mut(pid);

        if pcb.execute_tick() == 0 {
            let from = pcb.transition(ProcessState::Terminated);
            self.memory.release(pcb);
            self.running = None;
            self.record(boundary, pid, from, ProcessState::Terminated);
        } else if pcb.io_due() {
            let from = pcb.transition(ProcessState::Waiting);
            pcb.begin_io();
            self.wait_queue.enqueue(pid);
            self.running = None;
            self.record(boundary, pid, from, ProcessState::Waiting);
        }
    }

    fn record(&mut self, tick: Tick, pid: Pid, from: ProcessState, to: ProcessState) {
        self.transitions.push(Transition::new(tick, pid, from, to));
        if self.logger.enabled(LogLevel::Debug) {
            self.log(
                LogEntry::new(LogLevel::Debug, "transition")
                    .at(tick)
                    .with_source(pid)
                    .with_field("from", from)
                    .with_field("to", to),
            );
        }
    }

    fn log(&mut self, entry: LogEntry) {
        if self.logger.enabled(entry.level) {
            self.logger.log(entry);
        }
    }
}
