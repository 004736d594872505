//! Running the external viewer-state generator.

use std::path::Path;
use std::process::Command;

use tracing::{error, info};

use crate::config::StateCommand;
use crate::error::ExportError;

impl StateCommand {
    /// The full command line for `sidecar`, for logs and errors.
    pub fn command_line(&self, sidecar: &Path) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line.push(' ');
        line.push_str(&sidecar.display().to_string());
        line
    }

    /// Run the command with `sidecar` appended and wait for it.
    ///
    /// # Errors
    ///
    /// [`ExportError::StateGenerationFailed`] if the program cannot be
    /// spawned or exits unsuccessfully.
    pub fn run(&self, sidecar: &Path) -> Result<(), ExportError> {
        let command = self.command_line(sidecar);
        info!(%command, "generating viewer state");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(sidecar)
            .status()
            .map_err(|e| {
                error!(%command, error = %e, "state generator could not be started");
                ExportError::StateGenerationFailed {
                    command: command.clone(),
                    reason: e.to_string(),
                }
            })?;
        if !status.success() {
            error!(%command, %status, "state generator failed");
            return Err(ExportError::StateGenerationFailed {
                command,
                reason: status.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn command_line_appends_sidecar() {
        let cmd = StateCommand::new("pvbatch").arg("generate_state.py");
        assert_eq!(
            cmd.command_line(Path::new("out/simulation_info.json")),
            "pvbatch generate_state.py out/simulation_info.json"
        );
    }

    #[test]
    fn successful_command() {
        let dir = tempfile::tempdir().unwrap();
        let sidecar = dir.path().join("simulation_info.json");
        std::fs::write(&sidecar, "{}").unwrap();
        StateCommand::new("test").arg("-f").run(&sidecar).unwrap();
    }

    #[test]
    fn non_zero_exit_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("simulation_info.json");
        let err = StateCommand::new("test").arg("-f").run(&missing).unwrap_err();
        match err {
            ExportError::StateGenerationFailed { command, .. } => {
                assert!(command.ends_with("simulation_info.json"));
            }
            other => panic!("expected StateGenerationFailed, got {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_fatal() {
        let err = StateCommand::new("/nonexistent/lumen-state-generator")
            .run(Path::new("simulation_info.json"))
            .unwrap_err();
        assert!(matches!(err, ExportError::StateGenerationFailed { .. }));
    }
}
