use std::path::Path;
use std::process::Command;
use tracing::error;

use crate::code_generation::core::dependency_resolver::PackageManager;
use crate::shared::error::PipelineError;

/// `go get -u` through the go binary on PATH
pub struct GoToolchain {
    program: String,
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::with_program("go")
    }
}

impl GoToolchain {
    /// Use a specific go executable
    pub fn with_program(program: &str) -> Self {
        Self { program: program.to_string() }
    }

    fn command(&self, module: &str, working_dir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.arg("get").arg("-u").arg(module).current_dir(working_dir);
        command
    }
}

impl PackageManager for GoToolchain {
    fn fetch(&self, module: &str, working_dir: &Path) -> Result<(), PipelineError> {
        let output = self
            .command(module, working_dir)
            .output()
            .map_err(|e| {
                error!("Failed to execute {} for {:?}: {}", self.program, module, e);
                PipelineError::Process {
                    module: module.to_string(),
                    reason: format!("failed to execute {}: {}", self.program, e),
                    stderr: String::new(),
                }
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        error!("{} get -u {:?} failed: {}", self.program, module, output.status);
        Err(PipelineError::Process {
            module: module.to_string(),
            reason: output.status.to_string(),
            stderr,
        })
    }
}
