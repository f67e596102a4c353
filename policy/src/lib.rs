//! # Scheduling Policy Framework
//!
//! This crate provides pluggable ready-queue ordering policies.
//!
//! ## Philosophy
//!
//! - **Mechanism not policy**: The engine owns the queues; a policy only says
//!   which process goes first
//! - **Pure**: A policy sees the queue contents and nothing else, never the
//!   simulation clock
//! - **Deterministic**: Ordering uses a stable sort, so processes the policy
//!   considers equal keep their ready-queue insertion order
//! - **Pluggable**: The engine holds a `Box<dyn SchedulingPolicy>`
//!
//! ## Core Concepts
//!
//! - `SchedulingPolicy`: Trait for ordering ready processes
//! - `PriorityPolicy`: Priority ascending, FCFS tie-break
//! - `FcfsPolicy`: Arrival time ascending
//! - `PolicyKind`: Serializable selector used by configuration

use core::cmp::Ordering;
use core_types::ProcessControlBlock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ready-queue ordering strategy
pub trait SchedulingPolicy {
    /// Compares two ready processes; `Less` means `a` is dispatched first
    fn compare(&self, a: &ProcessControlBlock, b: &ProcessControlBlock) -> Ordering;

    /// Returns the name of this policy (for logging)
    fn name(&self) -> &str;

    /// Orders a queue in dispatch order
    fn order(&self, queue: &mut [&ProcessControlBlock]) {
        queue.sort_by(|a, b| self.compare(a, b));
    }
}

/// External priority with first-come-first-served tie-break
///
/// Lower priority numbers win. Equal priorities are ordered by arrival time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityPolicy;

impl SchedulingPolicy for PriorityPolicy {
    fn compare(&self, a: &ProcessControlBlock, b: &ProcessControlBlock) -> Ordering {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.arrival_time.cmp(&b.arrival_time))
    }

    fn name(&self) -> &str {
        "PriorityPolicy"
    }
}

/// First-come-first-served
///
/// Earlier arrival wins; priority is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct FcfsPolicy;

impl SchedulingPolicy for FcfsPolicy {
    fn compare(&self, a: &ProcessControlBlock, b: &ProcessControlBlock) -> Ordering {
        a.arrival_time.cmp(&b.arrival_time)
    }

    fn name(&self) -> &str {
        "FcfsPolicy"
    }
}

/// Policy selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// [`PriorityPolicy`]
    #[default]
    Priority,
    /// [`FcfsPolicy`]
    Fcfs,
}

impl PolicyKind {
    /// Builds the policy this kind names
    pub fn build(&self) -> Box<dyn SchedulingPolicy> {
        match self {
            PolicyKind::Priority => Box::new(PriorityPolicy),
            PolicyKind::Fcfs => Box::new(FcfsPolicy),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Priority => write!(f, "priority"),
            PolicyKind::Fcfs => write!(f, "fcfs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Pid, Tick};

    fn process(pid: u32, arrival: u64, priority: i32) -> ProcessControlBlock {
        ProcessControlBlock::new(Pid::new(pid), Tick::new(arrival), priority, 5, 0, 0)
    }

    fn pids(queue: &[&ProcessControlBlock]) -> Vec<u32> {
        queue.iter().map(|p| p.pid.as_u32()).collect()
    }

    #[test]
    fn test_priority_lower_number_wins() {
        let a = process(1, 0, 2);
        let b = process(2, 0, 1);
        let mut queue = vec![&a, &b];
        PriorityPolicy.order(&mut queue);
        assert_eq!(pids(&queue), vec![2, 1]);
    }

    #[test]
    fn test_priority_ties_break_by_arrival() {
        let late = process(1, 5, 3);
        let early = process(2, 1, 3);
        let mut queue = vec![&late, &early];
        PriorityPolicy.order(&mut queue);
        assert_eq!(pids(&queue), vec![2, 1]);
    }

    #[test]
    fn test_priority_full_ties_keep_insertion_order() {
        let a = process(9, 0, 1);
        let b = process(3, 0, 1);
        let mut queue = vec![&a, &b];
        PriorityPolicy.order(&mut queue);
        assert_eq!(pids(&queue), vec![9, 3]);
    }

    #[test]
    fn test_fcfs_ignores_priority() {
        let urgent_late = process(1, 4, 0);
        let lazy_early = process(2, 1, 9);
        let mut queue = vec![&urgent_late, &lazy_early];
        FcfsPolicy.order(&mut queue);
        assert_eq!(pids(&queue), vec![2, 1]);
    }

    #[test]
    fn test_fcfs_is_ascending() {
        let a = process(1, 3, 1);
        let b = process(2, 0, 1);
        let c = process(3, 7, 1);
        let mut queue = vec![&a, &b, &c];
        FcfsPolicy.order(&mut queue);
        assert_eq!(pids(&queue), vec![2, 1, 3]);
    }

    #[test]
    fn test_policy_kind_builds_named_policy() {
        assert_eq!(PolicyKind::Priority.build().name(), "PriorityPolicy");
        assert_eq!(PolicyKind::Fcfs.build().name(), "FcfsPolicy");
        assert_eq!(PolicyKind::default(), PolicyKind::Priority);
    }

    #[test]
    fn test_policy_kind_serde() {
        let kind: PolicyKind = serde_json::from_str("\"fcfs\"").unwrap();
        assert_eq!(kind, PolicyKind::Fcfs);
        assert_eq!(serde_json::to_string(&PolicyKind::Priority).unwrap(), "\"priority\"");
    }
}
