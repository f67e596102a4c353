//! # Scheduling Simulator Host
//!
//! This crate provides the host side of the scheduling simulator.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The engine never touches files or terminals
//! - **Fail fast on input**: A malformed record stops the run; nothing is
//!   silently defaulted
//! - **Output is a rendering of the log**: Reports are built from the
//!   transition log after the run, in log order
//!
//! ## Responsibilities
//!
//! The host:
//! - Parses the process list from the input file
//! - Loads optional JSON configuration
//! - Runs the simulation
//! - Writes `execution.txt` and `memory_status.txt`

pub mod input;
pub mod report;
pub mod runtime;

pub use input::{parse_processes, InputError};
pub use report::{format_execution, format_memory_status, format_summary};
pub use runtime::{HostConfig, HostError, HostRuntime, RunSummary, CONFIG_ENV_VAR};
