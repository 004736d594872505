//! Export configuration, validation, and error types.
//!
//! [`ExportConfig`] is built once per simulation and handed to
//! [`VisualizationAdaptor::new`](crate::VisualizationAdaptor::new), which
//! calls [`validate()`](ExportConfig::validate) before touching the disk.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use lumen_projection::ProjectionMode;

// ── StateCommand ──────────────────────────────────────────────────

/// External program that turns an export into a viewer state file.
///
/// Run after the metadata sidecar is written, with the sidecar's path
/// appended as the final argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateCommand {
    /// Executable to run.
    pub program: PathBuf,
    /// Arguments placed before the sidecar path.
    pub args: Vec<String>,
}

impl StateCommand {
    /// A command with no leading arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one leading argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

// ── ExportConfig ──────────────────────────────────────────────────

/// Configuration for a [`VisualizationAdaptor`](crate::VisualizationAdaptor).
#[derive(Clone, Debug)]
pub struct ExportConfig {
    /// Simulation name recorded in the metadata sidecar.
    pub simulation_name: String,
    /// Directory receiving pieces, indices and the sidecar.
    pub output_dir: PathBuf,
    /// Export every `export_interval` steps. Default: 1. Must be non-zero.
    pub export_interval: u64,
    /// Simulated time per step. Frame time is `step * time_step`.
    /// Default: 0.01. Must be finite and positive.
    pub time_step: f64,
    /// Number of workers per grid. `None` = auto-detect from
    /// `available_parallelism`; explicit values are clamped to `[1, 64]`.
    pub worker_count: Option<usize>,
    /// Projection mode used for attributes added by name.
    pub mode: ProjectionMode,
    /// Write piece and index files. Default: true.
    pub export_files: bool,
    /// Run the [`StateCommand`] on [`finish`](crate::VisualizationAdaptor::finish).
    /// Default: false.
    pub generate_state: bool,
    /// Program used when `generate_state` is set.
    pub state_command: Option<StateCommand>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            simulation_name: "simulation".to_string(),
            output_dir: PathBuf::from("output"),
            export_interval: 1,
            time_step: 0.01,
            worker_count: None,
            mode: ProjectionMode::default(),
            export_files: true,
            generate_state: false,
            state_command: None,
        }
    }
}

impl ExportConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation_name.is_empty() {
            return Err(ConfigError::EmptySimulationName);
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }
        if self.export_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(ConfigError::InvalidTimeStep {
                value: self.time_step,
            });
        }
        if self.generate_state {
            if !self.export_files {
                return Err(ConfigError::StateWithoutExport);
            }
            match &self.state_command {
                None => return Err(ConfigError::MissingStateCommand),
                Some(cmd) if cmd.program.as_os_str().is_empty() => {
                    return Err(ConfigError::MissingStateCommand)
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 64),
        }
    }

    /// Whether `step` is an export step.
    pub fn is_export_step(&self, step: u64) -> bool {
        step % self.export_interval == 0
    }

    /// Simulated time at `step`.
    pub fn time_at(&self, step: u64) -> f64 {
        self.time_step * step as f64
    }
}

// ── ConfigError ───────────────────────────────────────────────────

/// Errors detected during [`ExportConfig::validate()`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// `simulation_name` is empty.
    EmptySimulationName,
    /// `output_dir` is empty.
    EmptyOutputDir,
    /// `export_interval` is zero.
    ZeroInterval,
    /// `time_step` is NaN, infinite, zero, or negative.
    InvalidTimeStep {
        /// The invalid value.
        value: f64,
    },
    /// `generate_state` is set without a usable `state_command`.
    MissingStateCommand,
    /// `generate_state` is set but `export_files` is not.
    StateWithoutExport,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySimulationName => write!(f, "simulation_name must not be empty"),
            Self::EmptyOutputDir => write!(f, "output_dir must not be empty"),
            Self::ZeroInterval => write!(f, "export_interval must be at least 1"),
            Self::InvalidTimeStep { value } => {
                write!(f, "time_step must be finite and positive, got {value}")
            }
            Self::MissingStateCommand => {
                write!(f, "generate_state requires a state_command with a program")
            }
            Self::StateWithoutExport => write!(f, "generate_state requires export_files"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ExportConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_interval_rejected() {
        let cfg = ExportConfig {
            export_interval: 0,
            ..ExportConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn bad_time_steps_rejected() {
        for value in [0.0, -1.0, f64::INFINITY] {
            let cfg = ExportConfig {
                time_step: value,
                ..ExportConfig::default()
            };
            assert_eq!(cfg.validate(), Err(ConfigError::InvalidTimeStep { value }));
        }
        let cfg = ExportConfig {
            time_step: f64::NAN,
            ..ExportConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidTimeStep { .. })
        ));
    }

    #[test]
    fn empty_names_rejected() {
        let cfg = ExportConfig {
            simulation_name: String::new(),
            ..ExportConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptySimulationName));
        let cfg = ExportConfig {
            output_dir: PathBuf::new(),
            ..ExportConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyOutputDir));
    }

    #[test]
    fn state_generation_needs_command_and_export() {
        let mut cfg = ExportConfig {
            generate_state: true,
            ..ExportConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::MissingStateCommand));

        cfg.state_command = Some(StateCommand::new(""));
        assert_eq!(cfg.validate(), Err(ConfigError::MissingStateCommand));

        cfg.state_command = Some(StateCommand::new("pvbatch").arg("generate_state.py"));
        assert!(cfg.validate().is_ok());

        cfg.export_files = false;
        assert_eq!(cfg.validate(), Err(ConfigError::StateWithoutExport));
    }

    #[test]
    fn worker_count_clamped() {
        let mut cfg = ExportConfig {
            worker_count: Some(0),
            ..ExportConfig::default()
        };
        assert_eq!(cfg.resolved_worker_count(), 1);
        cfg.worker_count = Some(500);
        assert_eq!(cfg.resolved_worker_count(), 64);
        cfg.worker_count = Some(6);
        assert_eq!(cfg.resolved_worker_count(), 6);
        cfg.worker_count = None;
        let auto = cfg.resolved_worker_count();
        assert!((1..=64).contains(&auto));
    }

    #[test]
    fn export_steps_and_time() {
        let cfg = ExportConfig {
            export_interval: 5,
            time_step: 0.5,
            ..ExportConfig::default()
        };
        assert!(cfg.is_export_step(0));
        assert!(!cfg.is_export_step(3));
        assert!(cfg.is_export_step(10));
        assert_eq!(cfg.time_at(10), 5.0);
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            ConfigError::InvalidTimeStep { value: -1.0 }.to_string(),
            "time_step must be finite and positive, got -1"
        );
        assert_eq!(
            ConfigError::ZeroInterval.to_string(),
            "export_interval must be at least 1"
        );
    }
}
