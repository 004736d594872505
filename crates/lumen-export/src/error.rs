//! Error types for the export pipeline.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use lumen_core::{AttributeId, ProjectionError};

use crate::config::ConfigError;

/// Errors from building grids, exporting frames, or finishing a run.
///
/// I/O and state-generation failures are fatal to the run: the adaptor
/// logs them at `error` level and hands them back to the caller.
#[derive(Debug)]
pub enum ExportError {
    /// Configuration failed validation.
    Config(ConfigError),
    /// A projection rejected a refresh or column definition.
    Projection(ProjectionError),
    /// A file or directory operation failed.
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Serializing a piece or the metadata sidecar failed.
    Json {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// A piece index did not contain the placeholder piece entry.
    PlaceholderMissing {
        /// Index file being patched.
        path: PathBuf,
        /// The entry that was searched for.
        placeholder: String,
    },
    /// The external state generator could not be run or failed.
    StateGenerationFailed {
        /// The command line, for the log.
        command: String,
        /// What went wrong.
        reason: String,
    },
    /// A grid with this name is already registered.
    DuplicateGrid {
        /// Grid name.
        name: String,
    },
    /// A grid already has a column with this name.
    DuplicateColumn {
        /// Grid name.
        grid: String,
        /// Column name.
        column: String,
    },
    /// A column selection names an attribute the grid does not have.
    UnknownAttribute {
        /// Grid name.
        grid: String,
        /// The unregistered ID.
        attribute: AttributeId,
    },
    /// A worker thread panicked during a fork-join pass.
    WorkerPanicked {
        /// Grid being processed.
        grid: String,
    },
    /// The in-situ processor has been shut down.
    ProcessorShutDown,
    /// The in-situ processor reported a failure.
    Processor {
        /// Description from the processor.
        reason: String,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Projection(e) => write!(f, "projection: {e}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "serializing {}: {source}", path.display())
            }
            Self::PlaceholderMissing { path, placeholder } => {
                write!(f, "{}: placeholder {placeholder} not found", path.display())
            }
            Self::StateGenerationFailed { command, reason } => {
                write!(f, "state generation failed ({reason}): {command}")
            }
            Self::DuplicateGrid { name } => write!(f, "grid '{name}' already registered"),
            Self::DuplicateColumn { grid, column } => {
                write!(f, "grid '{grid}' already has a column '{column}'")
            }
            Self::UnknownAttribute { grid, attribute } => {
                write!(f, "grid '{grid}' has no attribute {attribute}")
            }
            Self::WorkerPanicked { grid } => write!(f, "worker panicked while processing grid '{grid}'"),
            Self::ProcessorShutDown => write!(f, "in-situ processor has been shut down"),
            Self::Processor { reason } => write!(f, "in-situ processor: {reason}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Projection(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for ExportError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ProjectionError> for ExportError {
    fn from(e: ProjectionError) -> Self {
        Self::Projection(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_are_chained() {
        let err = ExportError::from(ConfigError::ZeroInterval);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "config: export_interval must be at least 1");

        let err = ExportError::io("out/a.json", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "out/a.json: gone");
        assert!(err.source().is_some());

        assert!(ExportError::ProcessorShutDown.source().is_none());
    }

    #[test]
    fn projection_errors_convert() {
        let err: ExportError = ProjectionError::NoWorkers.into();
        assert!(matches!(err, ExportError::Projection(ProjectionError::NoWorkers)));
    }
}
