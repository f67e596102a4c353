//! Simulation configuration

use policy::{PolicyKind, SchedulingPolicy};
use resources::{
    MemoryAdmission, PartitionedMemory, ResourceError, UnboundedMemory, DEFAULT_PARTITIONS,
};
use serde::{Deserialize, Serialize};

/// Which admission oracle the engine consults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryModel {
    /// Fixed partition table, one process per partition
    #[default]
    Partitioned,
    /// Every process is admitted on arrival
    Unbounded,
}

/// Engine configuration
///
/// Every field has a default, so a partial JSON document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Ready-queue ordering
    pub policy: PolicyKind,
    /// Admission oracle
    pub memory_model: MemoryModel,
    /// Partition sizes for [`MemoryModel::Partitioned`], in partition order
    pub partitions: Vec<u64>,
    /// Stop with an error once the clock reaches this tick (None = never)
    pub max_ticks: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Priority,
            memory_model: MemoryModel::Partitioned,
            partitions: DEFAULT_PARTITIONS.to_vec(),
            max_ticks: None,
        }
    }
}

impl SimulationConfig {
    /// Builds the admission oracle described by this configuration
    pub fn build_memory(&self) -> Result<Box<dyn MemoryAdmission>, ResourceError> {
        Ok(match self.memory_model {
            MemoryModel::Partitioned => Box::new(PartitionedMemory::with_sizes(&self.partitions)?),
            MemoryModel::Unbounded => Box::new(UnboundedMemory::new()),
        })
    }

    /// Builds the scheduling policy described by this configuration
    pub fn build_policy(&self) -> Box<dyn SchedulingPolicy> {
        self.policy.build()
    }
}
