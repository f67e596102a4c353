//! Report rendering
//!
//! Pure string builders; writing files is the runtime's job.

use core_types::Transition;
use resources::MemoryStatus;
use sim_kernel::{MemorySnapshot, SimulationStats};
use std::fmt::Write;

const TABLE_WIDTH: usize = 48;

fn border() -> String {
    format!("+{}+\n", "-".repeat(TABLE_WIDTH))
}

/// Header of the execution table
pub fn execution_header() -> String {
    let mut out = border();
    out.push_str(&format!(
        "|{:>18} |{:>3} |{:>10} |{:>10} |\n",
        "Time of Transition", "PID", "Old State", "New State"
    ));
    out.push_str(&border());
    out
}

/// One execution table row
pub fn execution_row(transition: &Transition) -> String {
    format!(
        "|{:>18} |{:>3} |{:>10} |{:>10} |\n",
        transition.tick, transition.pid, transition.from, transition.to
    )
}

/// Footer of the execution table
pub fn execution_footer() -> String {
    border()
}

/// Full `execution.txt` contents
pub fn format_execution(transitions: &[Transition]) -> String {
    let mut out = execution_header();
    for transition in transitions {
        out.push_str(&execution_row(transition));
    }
    out.push_str(&execution_footer());
    out
}

fn partition_list(status: &MemoryStatus) -> String {
    status
        .partitions
        .iter()
        .map(|p| match p.occupant {
            Some(pid) => format!("{}({}):{}", p.number.0, p.size.0, pid),
            None => format!("{}({}):free", p.number.0, p.size.0),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full `memory_status.txt` contents, one block per admission
pub fn format_memory_status(snapshots: &[MemorySnapshot]) -> String {
    let mut out = String::new();
    for snapshot in snapshots {
        let status = &snapshot.status;
        let _ = writeln!(out, "t={} admitted pid={}", snapshot.tick, snapshot.pid);
        let _ = writeln!(out, "  total memory used: {}", status.used.0);
        let _ = writeln!(out, "  total free memory: {}", status.free.0);
        let _ = writeln!(out, "  usable free memory: {}", status.usable.0);
        let _ = writeln!(out, "  partitions: [{}]", partition_list(status));
    }
    out
}

/// Human-readable run statistics
pub fn format_summary(stats: &SimulationStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "completed processes: {}", stats.completed);
    let _ = writeln!(out, "average turnaround: {:.2}", stats.average_turnaround);
    let _ = writeln!(out, "average response: {:.2}", stats.average_response);
    let _ = writeln!(out, "average ready wait: {:.2}", stats.average_wait);
    let _ = writeln!(out, "throughput: {:.4} processes/tick", stats.throughput);
    out
}
