//! # Core Types
//!
//! This crate defines the fundamental types shared by the scheduling simulator.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Process identity, time and memory are distinct
//!   newtypes and cannot be confused.
//! - **State machines are closed**: A process can only move along the edges
//!   declared by [`ProcessState::can_transition_to`].
//! - **Logical time only**: A [`Tick`] is a discrete simulation step, never
//!   wall-clock time.
//!
//! ## Key Types
//!
//! - [`Pid`]: Identifier of a simulated process
//! - [`Tick`]: Discrete unit of simulated time
//! - [`MemoryUnits`]: Abstract memory footprint
//! - [`ProcessState`]: Process lifecycle states
//! - [`ProcessControlBlock`]: Identity and runtime state of one process
//! - [`Transition`]: One logged state change

pub mod ids;
pub mod pcb;
pub mod state;
pub mod transition;

pub use ids::{MemoryUnits, PartitionId, Pid, Tick};
pub use pcb::ProcessControlBlock;
pub use state::ProcessState;
pub use transition::Transition;
