//! # Resources
//!
//! This crate provides the memory admission oracle for the scheduling simulator.
//!
//! ## Philosophy
//!
//! - **Admission is a question, not a side effect on the engine**: the engine
//!   asks [`MemoryAdmission::try_admit`] and only acts on the answer
//! - **Accounting is private**: the oracle owns its bookkeeping; callers see it
//!   only through [`MemoryStatus`] snapshots
//! - **Deterministic**: the same requests in the same order yield the same
//!   partition assignments
//!
//! ## Core Concepts
//!
//! - `MemoryAdmission`: Oracle contract used by the engine
//! - `PartitionedMemory`: Fixed partition table, one process per partition
//! - `UnboundedMemory`: Admits everything
//! - `MemoryStatus`: Snapshot of used, free and usable memory
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Virtual memory or paging
//! - Dynamic partition splitting or compaction
//! - A general allocator

use core_types::{MemoryUnits, PartitionId, Pid, ProcessControlBlock};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Partition sizes used when no table is configured, largest first
pub const DEFAULT_PARTITIONS: [u64; 6] = [40, 25, 15, 10, 8, 2];

/// Errors raised while building an oracle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("Partition table is empty")]
    EmptyPartitionTable,

    #[error("Partition {0} has zero size")]
    ZeroSizedPartition(u32),
}

/// Memory admission oracle
///
/// Decides whether a NEW process may enter the ready queue and frees its
/// reservation once it terminates.
pub trait MemoryAdmission {
    /// Attempts to reserve memory for `pcb`
    ///
    /// Returns false when nothing fits; the caller retries on a later tick.
    fn try_admit(&mut self, pcb: &mut ProcessControlBlock) -> bool;

    /// Frees the reservation held by `pcb`
    fn release(&mut self, pcb: &mut ProcessControlBlock);

    /// Snapshot of the current accounting
    fn status(&self) -> MemoryStatus;
}

/// Occupancy of one partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionStatus {
    pub number: PartitionId,
    pub size: MemoryUnits,
    pub occupant: Option<Pid>,
}

/// Snapshot of oracle accounting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStatus {
    /// Sum of all partition sizes
    pub total: MemoryUnits,
    /// Sum of admitted process footprints
    pub used: MemoryUnits,
    /// `total - used`
    pub free: MemoryUnits,
    /// Sum of sizes of partitions nobody occupies
    pub usable: MemoryUnits,
    pub partitions: Vec<PartitionStatus>,
}

impl fmt::Display for MemoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MemoryStatus[used={}, free={}, usable={}]",
            self.used.0, self.free.0, self.usable.0
        )
    }
}

#[derive(Debug, Clone)]
struct Partition {
    number: PartitionId,
    size: MemoryUnits,
    occupant: Option<(Pid, MemoryUnits)>,
}

/// Fixed-partition memory
///
/// Each partition hosts at most one process. Admission scans from the last
/// (smallest in the default table) partition toward the first and takes the
/// first free partition large enough.
#[derive(Debug, Clone)]
pub struct PartitionedMemory {
    partitions: Vec<Partition>,
}

impl PartitionedMemory {
    /// Creates the default six-partition table
    pub fn new() -> Self {
        Self::build(&DEFAULT_PARTITIONS)
    }

    /// Creates a table from sizes, numbered 1.. in the given order
    pub fn with_sizes(sizes: &[u64]) -> Result<Self, ResourceError> {
        if sizes.is_empty() {
            return Err(ResourceError::EmptyPartitionTable);
        }
        if let Some(index) = sizes.iter().position(|size| *size == 0) {
            return Err(ResourceError::ZeroSizedPartition(index as u32 + 1));
        }
        Ok(Self::build(sizes))
    }

    fn build(sizes: &[u64]) -> Self {
        Self {
            partitions: sizes
                .iter()
                .enumerate()
                .map(|(index, size)| Partition {
                    number: PartitionId(index as u32 + 1),
                    size: MemoryUnits::new(*size),
                    occupant: None,
                })
                .collect(),
        }
    }

    /// Returns the number of partitions
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

impl Default for PartitionedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAdmission for PartitionedMemory {
    fn try_admit(&mut self, pcb: &mut ProcessControlBlock) -> bool {
        let slot = self
            .partitions
            .iter_mut()
            .rev()
            .find(|p| p.occupant.is_none() && pcb.memory_size <= p.size);

        match slot {
            Some(partition) => {
                partition.occupant = Some((pcb.pid, pcb.memory_size));
                pcb.assign_partition(partition.number);
                true
            }
            None => false,
        }
    }

    fn release(&mut self, pcb: &mut ProcessControlBlock) {
        let Some(number) = pcb.clear_partition() else {
            return;
        };
        if let Some(partition) = self.partitions.iter_mut().find(|p| p.number == number) {
            if matches!(partition.occupant, Some((owner, _)) if owner == pcb.pid) {
                partition.occupant = None;
            }
        }
    }

    fn status(&self) -> MemoryStatus {
        let total = self
            .partitions
            .iter()
            .fold(MemoryUnits::zero(), |acc, p| acc.saturating_add(p.size));
        let used = self
            .partitions
            .iter()
            .filter_map(|p| p.occupant.map(|(_, size)| size))
            .fold(MemoryUnits::zero(), |acc, size| acc.saturating_add(size));
        let usable = self
            .partitions
            .iter()
            .filter(|p| p.occupant.is_none())
            .fold(MemoryUnits::zero(), |acc, p| acc.saturating_add(p.size));

        MemoryStatus {
            total,
            used,
            free: total.saturating_sub(used),
            usable,
            partitions: self
                .partitions
                .iter()
                .map(|p| PartitionStatus {
                    number: p.number,
                    size: p.size,
                    occupant: p.occupant.map(|(pid, _)| pid),
                })
                .collect(),
        }
    }
}

/// Oracle that admits every process
///
/// Tracks the footprint of admitted processes so status snapshots stay
/// meaningful, but never refuses.
#[derive(Debug, Clone, Default)]
pub struct UnboundedMemory {
    admitted: Vec<(Pid, MemoryUnits)>,
}

impl UnboundedMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryAdmission for UnboundedMemory {
    fn try_admit(&mut self, pcb: &mut ProcessControlBlock) -> bool {
        self.admitted.push((pcb.pid, pcb.memory_size));
        true
    }

    fn release(&mut self, pcb: &mut ProcessControlBlock) {
        self.admitted.retain(|(pid, _)| *pid != pcb.pid);
    }

    fn status(&self) -> MemoryStatus {
        let used = self
            .admitted
            .iter()
            .fold(MemoryUnits::zero(), |acc, (_, size)| acc.saturating_add(*size));
        MemoryStatus {
            total: used,
            used,
            free: MemoryUnits::zero(),
            usable: MemoryUnits::zero(),
            partitions: Vec::new(),
        }
    }
}
