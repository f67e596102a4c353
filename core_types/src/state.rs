//! Process lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a simulated process
///
/// ```text
/// New -> Ready -> Running -> Terminated
///          ^         |
///          |         v
///          +---- Waiting
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Not yet admitted (no memory assigned)
    #[default]
    New,
    /// Admitted and waiting for the CPU
    Ready,
    /// Occupying the CPU
    Running,
    /// Servicing an I/O request
    Waiting,
    /// Finished; never changes again
    Terminated,
}

impl ProcessState {
    /// Checks whether moving from `self` to `next` is a valid edge
    pub fn can_transition_to(&self, next: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, next),
            (New, Ready)
                | (Ready, Running)
                | (Running, Waiting)
                | (Running, Terminated)
                | (Waiting, Ready)
        )
    }

    /// Checks if the state is final
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessState::Terminated)
    }

    /// Name used in execution reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::New => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Waiting => "WAITING",
            ProcessState::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
