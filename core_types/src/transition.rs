//! Logged state changes

use crate::{Pid, ProcessState, Tick};
use serde::{Deserialize, Serialize};

/// One entry of the transition log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Tick boundary at which the change is reported
    pub tick: Tick,
    pub pid: Pid,
    pub from: ProcessState,
    pub to: ProcessState,
}

impl Transition {
    pub fn new(tick: Tick, pid: Pid, from: ProcessState, to: ProcessState) -> Self {
        Self {
            tick,
            pid,
            from,
            to,
        }
    }
}
