//! Integration tests for the schedsim host

use policy::PolicyKind;
use schedsim::{HostConfig, HostError, HostRuntime, InputError, CONFIG_ENV_VAR};
use services_logger::{LogLevel, MemoryLogSink};
use sim_kernel::{MemoryModel, SimulationError};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const TWO_JOBS: &str = "\
# pid, arrival, priority, processing, io_frequency, io_duration
1, 0, 2, 5, 0, 0
2, 0, 1, 3, 0, 0
";

fn write_input(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("jobs.txt");
    fs::write(&path, text).unwrap();
    path
}

fn config_in(dir: &Path) -> HostConfig {
    HostConfig {
        output_dir: dir.join("out"),
        ..HostConfig::default()
    }
}

#[test]
fn test_execution_report_written() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), TWO_JOBS);

    let runtime = HostRuntime::new(config_in(dir.path())).with_logger(MemoryLogSink::new());
    let summary = runtime.run_file(&input).unwrap();

    let report = fs::read_to_string(&summary.execution_path).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    let border = format!("+{}+", "-".repeat(48));
    assert_eq!(lines[0], border);
    assert_eq!(lines[1], "|Time of Transition |PID | Old State | New State |");
    assert_eq!(lines[2], border);
    assert_eq!(lines[3], "|                 0 |  1 |       NEW |     READY |");
    assert_eq!(lines[4], "|                 0 |  2 |       NEW |     READY |");
    assert_eq!(lines[5], "|                 0 |  2 |     READY |   RUNNING |");
    assert_eq!(lines[6], "|                 3 |  2 |   RUNNING |TERMINATED |");
    assert_eq!(lines[7], "|                 3 |  1 |     READY |   RUNNING |");
    assert_eq!(lines[8], "|                 8 |  1 |   RUNNING |TERMINATED |");
    assert_eq!(lines[9], border);
    assert_eq!(lines.len(), 10);
}

#[test]
fn test_memory_report_written() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "7, 1, 1, 2, 0, 0, 12\n");

    let runtime = HostRuntime::new(config_in(dir.path())).with_logger(MemoryLogSink::new());
    let summary = runtime.run_file(&input).unwrap();

    let text = fs::read_to_string(&summary.memory_path).unwrap();
    assert!(text.starts_with("t=1 admitted pid=7\n"));
    assert!(text.contains("total memory used: 12"));
    // Smallest fitting partition from the end of the table is the 15-unit one
    assert!(text.contains("3(15):7"));
    assert_eq!(summary.outcome.memory_snapshots.len(), 1);
}

#[test]
fn test_summary_logged() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), TWO_JOBS);
    let sink = MemoryLogSink::new();

    HostRuntime::new(config_in(dir.path()))
        .with_logger(sink.clone())
        .run_file(&input)
        .unwrap();

    let messages: Vec<String> = sink
        .entries_at_least(LogLevel::Info)
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert!(messages.iter().any(|m| m == "simulation started"));
    assert!(messages.iter().any(|m| m == "simulation finished"));
    assert!(messages.iter().any(|m| m == "completed processes: 2"));
}

#[test]
fn test_config_file_selects_fcfs() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{ "simulation": { "policy": "fcfs", "memory_model": "unbounded" } }"#,
    )
    .unwrap();

    let mut config = HostConfig::load_from_path(&config_path).unwrap();
    assert_eq!(config.simulation.policy, PolicyKind::Fcfs);
    assert_eq!(config.simulation.memory_model, MemoryModel::Unbounded);
    config.output_dir = dir.path().to_path_buf();

    let input = write_input(
        dir.path(),
        "1, 0, 5, 3, 0, 0\n2, 2, 1, 2, 0, 0\n3, 1, 9, 2, 0, 0\n",
    );
    let summary = HostRuntime::new(config)
        .with_logger(MemoryLogSink::new())
        .run_file(&input)
        .unwrap();

    let running: Vec<u32> = summary
        .outcome
        .transitions
        .iter()
        .filter(|t| t.to == core_types::ProcessState::Running)
        .map(|t| t.pid.as_u32())
        .collect();
    assert_eq!(running, vec![1, 3, 2]);
    assert!(summary.outcome.memory_snapshots.iter().all(|s| s.status.partitions.is_empty()));
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let runtime = HostRuntime::new(config_in(dir.path())).with_logger(MemoryLogSink::new());

    let err = runtime.run_file(dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, HostError::Input(InputError::Open { .. })));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_malformed_input_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "1, 0, 1, 4, 0, 0\n2, zero, 1, 4, 0, 0\n");
    let runtime = HostRuntime::new(config_in(dir.path())).with_logger(MemoryLogSink::new());

    let err = runtime.run_file(&input).unwrap_err();
    assert!(matches!(err, HostError::Input(InputError::Parse { line: 2, .. })));
}

#[test]
fn test_tick_limit_reported() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "1, 0, 1, 2, 0, 0, 50\n");
    let mut config = config_in(dir.path());
    config.simulation.max_ticks = Some(10);

    let err = HostRuntime::new(config)
        .with_logger(MemoryLogSink::new())
        .run_file(&input)
        .unwrap_err();
    assert!(matches!(
        err,
        HostError::Simulation(SimulationError::TickLimitExceeded {
            limit: 10,
            unfinished: 1
        })
    ));
}

#[test]
fn test_empty_input_writes_empty_table() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "# nothing to run\n\n");
    let runtime = HostRuntime::new(config_in(dir.path())).with_logger(MemoryLogSink::new());

    let summary = runtime.run_file(&input).unwrap();
    assert!(summary.outcome.transitions.is_empty());
    let report = fs::read_to_string(&summary.execution_path).unwrap();
    assert_eq!(report.lines().count(), 4);
    assert_eq!(fs::read_to_string(&summary.memory_path).unwrap(), "");
}

#[test]
fn test_cli_rejects_wrong_argument_count() {
    let output = Command::new(env!("CARGO_BIN_EXE_schedsim"))
        .env_remove(CONFIG_ENV_VAR)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ERROR!"));
    assert!(stdout.contains("Expected 1 argument, received 0"));
}

#[test]
fn test_cli_reports_unopenable_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");
    let output = Command::new(env!("CARGO_BIN_EXE_schedsim"))
        .arg(&missing)
        .current_dir(dir.path())
        .env_remove(CONFIG_ENV_VAR)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&format!(
        "Error: Unable to open file: {}",
        missing.display()
    )));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_writes_reports_to_working_directory() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), TWO_JOBS);
    let status = Command::new(env!("CARGO_BIN_EXE_schedsim"))
        .arg(&input)
        .current_dir(dir.path())
        .env_remove(CONFIG_ENV_VAR)
        .status()
        .unwrap();

    assert!(status.success());
    assert!(dir.path().join("execution.txt").exists());
    assert!(dir.path().join("memory_status.txt").exists());
}
