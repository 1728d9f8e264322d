use std::fs;
use std::path::Path;
use tracing::debug;

use crate::shared::error::PipelineError;

/// Error action reported when the project root cannot be created
pub const CREATE_PROJECT_DIR: &str = "creating project directory";

/// Writes generated files into the project directory.
///
/// Nothing written here is cleaned up on a later failure.
pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Create the project root. Fails if anything already exists at `path`.
    pub fn create_project_dir<P: AsRef<Path>>(path: P) -> Result<(), PipelineError> {
        let path = path.as_ref();
        fs::create_dir(path)
            .map_err(|e| PipelineError::io(CREATE_PROJECT_DIR, path, e))?;
        debug!("Created project directory {}", path.display());
        Ok(())
    }

    /// Write `content` to `path`, creating parent directories and replacing any existing file
    pub fn write<P: AsRef<Path>>(path: P, content: &str) -> Result<(), PipelineError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| PipelineError::io("creating directory", parent, e))?;
        }

        fs::write(path, content).map_err(|e| PipelineError::io("writing", path, e))?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}
