use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use tracing::debug;

use crate::user_config::models::{Credential, KraitConfig};

/// File name of the per-user config, placed in the home directory
pub const CONFIG_FILE_NAME: &str = ".krait.yaml";

/// Reads and writes the single-file user configuration
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at ~/.krait.yaml
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().context("Error finding home directory")?;
        Ok(Self::at(home.join(CONFIG_FILE_NAME)))
    }

    /// Store at an explicit path
    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config. A missing or empty file yields the default config.
    pub fn load(&self) -> Result<KraitConfig> {
        if !self.path.exists() {
            debug!("No config file at {}", self.path.display());
            return Ok(KraitConfig::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file: {}", self.path.display()))?;

        if content.trim().is_empty() {
            return Ok(KraitConfig::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", self.path.display()))
    }

    /// Credential for the generation service, empty when not set
    pub fn credential(&self) -> Result<Credential> {
        Ok(self.load()?.credential())
    }

    /// Store the key, creating the file if needed and keeping any other settings
    pub fn set_key(&self, key: &str) -> Result<()> {
        let mut config = self.load()?;
        config.set_openai_key(key);

        let content = serde_yaml::to_string(&config)
            .context("Failed to serialize config")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Error writing config file: {}", self.path.display()))?;

        debug!("Saved key to {}", self.path.display());
        Ok(())
    }
}

/// Line printed by `view`
pub fn describe_key(key: Option<&str>) -> String {
    match key {
        Some(key) => format!("OpenAI API key: {}", key),
        None => "OpenAI API key not set".to_string(),
    }
}
