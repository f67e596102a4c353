//! # Host Runtime
//!
//! Ties input parsing, the simulation engine and report writing together.

use crate::input::{load_processes, InputError};
use crate::report::{format_execution, format_memory_status, format_summary};
use serde::{Deserialize, Serialize};
use services_logger::{LogEntry, LogLevel, LogSink, StderrLogSink};
use sim_kernel::{Simulation, SimulationConfig, SimulationError, SimulationOutcome};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV_VAR: &str = "SCHEDSIM_CONFIG";

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Unable to write {path}: {message}")]
    Output { path: String, message: String },
}

/// Host runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Engine settings
    pub simulation: SimulationConfig,
    /// Directory the reports are written into
    pub output_dir: PathBuf,
    pub execution_file: String,
    pub memory_file: String,
    /// Minimum level rendered to stderr
    pub log_level: LogLevel,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            output_dir: PathBuf::from("."),
            execution_file: "execution.txt".to_string(),
            memory_file: "memory_status.txt".to_string(),
            log_level: LogLevel::default(),
        }
    }
}

impl HostConfig {
    /// Reads a JSON config file; missing fields take their defaults
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|err| HostError::Config(format!("{}: {}", path.display(), err)))?;
        serde_json::from_str(&data)
            .map_err(|err| HostError::Config(format!("{}: {}", path.display(), err)))
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or defaults when unset
    pub fn from_env() -> Result<Self, HostError> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load_from_path(PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn execution_path(&self) -> PathBuf {
        self.output_dir.join(&self.execution_file)
    }

    pub fn memory_path(&self) -> PathBuf {
        self.output_dir.join(&self.memory_file)
    }
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: SimulationOutcome,
    pub execution_path: PathBuf,
    pub memory_path: PathBuf,
}

type SinkFactory = Box<dyn Fn() -> Box<dyn LogSink>>;

/// Host runtime
pub struct HostRuntime {
    config: HostConfig,
    /// Builds one sink per run so the engine and the host share a target
    sinks: SinkFactory,
}

impl HostRuntime {
    /// Creates a runtime that logs to stderr at the configured level
    pub fn new(config: HostConfig) -> Self {
        let level = config.log_level;
        Self {
            config,
            sinks: Box::new(move || -> Box<dyn LogSink> { Box::new(StderrLogSink::new(level)) }),
        }
    }

    /// Routes engine and host logs to clones of `logger`
    pub fn with_logger<L>(mut self, logger: L) -> Self
    where
        L: LogSink + Clone + 'static,
    {
        self.sinks = Box::new(move || -> Box<dyn LogSink> { Box::new(logger.clone()) });
        self
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Parses `input`, runs it to completion and writes both reports
    pub fn run_file(&self, input: impl AsRef<Path>) -> Result<RunSummary, HostError> {
        let processes = load_processes(input)?;
        let mut simulation = Simulation::new(processes, self.config.simulation.clone())?
            .with_logger((self.sinks)());
        let outcome = simulation.run()?;

        let execution_path = self.config.execution_path();
        let memory_path = self.config.memory_path();
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|err| output_error(&self.config.output_dir, err))?;
        fs::write(&execution_path, format_execution(&outcome.transitions))
            .map_err(|err| output_error(&execution_path, err))?;
        fs::write(&memory_path, format_memory_status(&outcome.memory_snapshots))
            .map_err(|err| output_error(&memory_path, err))?;

        let mut logger = (self.sinks)();
        if logger.enabled(LogLevel::Info) {
            for line in format_summary(&outcome.stats).lines() {
                logger.log(LogEntry::new(LogLevel::Info, line).at(outcome.final_tick));
            }
        }

        Ok(RunSummary {
            outcome,
            execution_path,
            memory_path,
        })
    }
}

fn output_error(path: &Path, err: std::io::Error) -> HostError {
    HostError::Output {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
