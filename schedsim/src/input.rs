//! # Input Parser
//!
//! Reads the process list.
//!
//! ## Format
//!
//! One process per line, fields separated by `", "`:
//!
//! ```text
//! pid, arrival_time, priority, processing_time, io_frequency, io_duration[, memory_size]
//! ```
//!
//! - The first six fields are required
//! - `memory_size` is optional; without it the process asks for zero units
//! - Empty lines and lines starting with `#` are skipped
//! - The separator is exact: `1,0,1` or `1 , 0` is a parse error

use core_types::{MemoryUnits, Pid, ProcessControlBlock, Tick};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

const REQUIRED_FIELDS: usize = 6;
const MAX_FIELDS: usize = 7;
const FIELD_SEPARATOR: &str = ", ";

/// Input error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Unable to open file: {path}")]
    Open { path: String, message: String },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Reads and parses a process file
pub fn load_processes(path: impl AsRef<Path>) -> Result<Vec<ProcessControlBlock>, InputError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| InputError::Open {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    let text = String::from_utf8(bytes).map_err(|err| {
        let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
        InputError::Parse {
            line: valid.iter().filter(|b| **b == b'\n').count() + 1,
            message: "invalid UTF-8".to_string(),
        }
    })?;
    parse_processes(&text)
}

/// Parses process records from text
pub fn parse_processes(text: &str) -> Result<Vec<ProcessControlBlock>, InputError> {
    let mut processes = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        processes.push(parse_line(line, line_num + 1)?);
    }

    Ok(processes)
}

fn parse_line(line: &str, line_num: usize) -> Result<ProcessControlBlock, InputError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if !(REQUIRED_FIELDS..=MAX_FIELDS).contains(&fields.len()) {
        return Err(InputError::Parse {
            line: line_num,
            message: format!(
                "expected {} or {} fields, found {}",
                REQUIRED_FIELDS,
                MAX_FIELDS,
                fields.len()
            ),
        });
    }

    let pid: u32 = field(&fields, 0, "pid", line_num)?;
    let arrival: u64 = field(&fields, 1, "arrival_time", line_num)?;
    let priority: i32 = field(&fields, 2, "priority", line_num)?;
    let processing: u64 = field(&fields, 3, "processing_time", line_num)?;
    let io_frequency: u64 = field(&fields, 4, "io_frequency", line_num)?;
    let io_duration: u64 = field(&fields, 5, "io_duration", line_num)?;
    let memory: u64 = if fields.len() == MAX_FIELDS {
        field(&fields, 6, "memory_size", line_num)?
    } else {
        0
    };

    Ok(ProcessControlBlock::new(
        Pid::new(pid),
        Tick::new(arrival),
        priority,
        processing,
        io_frequency,
        io_duration,
    )
    .with_memory_size(MemoryUnits::new(memory)))
}

fn field<T: FromStr>(
    fields: &[&str],
    index: usize,
    name: &str,
    line_num: usize,
) -> Result<T, InputError> {
    fields[index].parse().map_err(|_| InputError::Parse {
        line: line_num,
        message: format!("invalid {}: {:?}", name, fields[index]),
    })
}
