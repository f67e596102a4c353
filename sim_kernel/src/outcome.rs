//! Simulation results and derived statistics

use core_types::{Pid, ProcessControlBlock, ProcessState, Tick, Transition};
use resources::MemoryStatus;
use serde::Serialize;
use std::collections::HashMap;

/// Memory accounting right after a process was admitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    pub tick: Tick,
    /// The process whose admission triggered the snapshot
    pub pid: Pid,
    pub status: MemoryStatus,
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize)]
pub struct SimulationOutcome {
    /// Transition log, in the order entries were produced
    pub transitions: Vec<Transition>,
    pub memory_snapshots: Vec<MemorySnapshot>,
    /// Clock value when the run stopped
    pub final_tick: Tick,
    /// Final process control blocks, in input order
    pub processes: Vec<ProcessControlBlock>,
    pub stats: SimulationStats,
}

/// Per-process timing derived from the transition log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub pid: Pid,
    pub arrival_time: Tick,
    pub first_dispatch: Option<Tick>,
    pub completion: Option<Tick>,
    /// Ticks spent in READY
    pub ready_wait: u64,
}

impl ProcessStats {
    /// Completion minus arrival
    pub fn turnaround(&self) -> Option<u64> {
        self.completion.map(|t| t.since(self.arrival_time))
    }

    /// First dispatch minus arrival
    pub fn response(&self) -> Option<u64> {
        self.first_dispatch.map(|t| t.since(self.arrival_time))
    }
}

/// Aggregate timing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStats {
    pub per_process: Vec<ProcessStats>,
    pub completed: usize,
    pub average_turnaround: f64,
    pub average_response: f64,
    pub average_wait: f64,
    /// Completed processes per tick
    pub throughput: f64,
}

impl SimulationStats {
    /// Replays the transition log against the process list
    pub fn from_log(
        processes: &[ProcessControlBlock],
        transitions: &[Transition],
        final_tick: Tick,
    ) -> Self {
        let mut per_process: Vec<ProcessStats> = processes
            .iter()
            .map(|p| ProcessStats {
                pid: p.pid,
                arrival_time: p.arrival_time,
                first_dispatch: None,
                completion: None,
                ready_wait: 0,
            })
            .collect();
        let position: HashMap<Pid, usize> = per_process
            .iter()
            .enumerate()
            .map(|(i, s)| (s.pid, i))
            .collect();
        let mut ready_since: HashMap<Pid, Tick> = HashMap::new();

        for transition in transitions {
            let Some(&i) = position.get(&transition.pid) else {
                continue;
            };
            let stats = &mut per_process[i];

            if transition.from == ProcessState::Ready {
                if let Some(since) = ready_since.remove(&transition.pid) {
                    stats.ready_wait += transition.tick.since(since);
                }
            }

            match transition.to {
                ProcessState::Ready => {
                    ready_since.insert(transition.pid, transition.tick);
                }
                ProcessState::Running => {
                    stats.first_dispatch.get_or_insert(transition.tick);
                }
                ProcessState::Terminated => stats.completion = Some(transition.tick),
                _ => {}
            }
        }

        let finished: Vec<&ProcessStats> =
            per_process.iter().filter(|s| s.completion.is_some()).collect();
        let completed = finished.len();
        let average = |values: Vec<u64>| -> f64 {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<u64>() as f64 / values.len() as f64
            }
        };
        let average_turnaround = average(finished.iter().filter_map(|s| s.turnaround()).collect());
        let average_response = average(finished.iter().filter_map(|s| s.response()).collect());
        let average_wait = average(finished.iter().map(|s| s.ready_wait).collect());
        let throughput = if final_tick.as_u64() == 0 {
            0.0
        } else {
            completed as f64 / final_tick.as_u64() as f64
        };

        Self {
            per_process,
            completed,
            average_turnaround,
            average_response,
            average_wait,
            throughput,
        }
    }
}
