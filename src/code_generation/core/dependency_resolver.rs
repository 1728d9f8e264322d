use std::path::Path;
use regex::Regex;
use tracing::{debug, error, info};

use crate::shared::error::PipelineError;

/// Pattern a module path must match in strict mode
const MODULE_PATH_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9._~+/-]*(@[A-Za-z0-9._+-]+)?$";

/// Module identifiers in the order the service listed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleList {
    entries: Vec<String>,
}

impl ModuleList {
    /// Split on every literal comma. No trimming, no de-duplication, and
    /// empty entries are kept.
    pub fn parse(raw: &str) -> Self {
        Self {
            entries: raw.split(',').map(str::to_string).collect(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reject the list if any entry is not a usable module path.
    /// Every malformed entry is reported, not just the first.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let re = Regex::new(MODULE_PATH_PATTERN)
            .map_err(|e| PipelineError::Parse(format!("invalid module pattern: {}", e)))?;

        let malformed: Vec<String> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !re.is_match(entry))
            .map(|(i, entry)| format!("entry {} {:?}", i, entry))
            .collect();

        if malformed.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Parse(malformed.join(", ")))
        }
    }
}

/// What to do with entries that are not valid module paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModulePolicy {
    /// Hand every entry to the package manager unchanged
    #[default]
    PassThrough,
    /// Fail before fetching anything if any entry is malformed
    Strict,
}

/// Fetches a single module into a project
pub trait PackageManager {
    /// Fetch or update `module`, running inside `working_dir`
    fn fetch(&self, module: &str, working_dir: &Path) -> Result<(), PipelineError>;
}

/// Installs a module list one entry at a time
pub struct DependencyResolver<'a> {
    packages: &'a dyn PackageManager,
    policy: ModulePolicy,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(packages: &'a dyn PackageManager, policy: ModulePolicy) -> Self {
        Self { packages, policy }
    }

    /// Fetch each module in order from `project_root`, stopping at the first
    /// failure. Modules fetched before the failure stay installed.
    /// Returns how many modules were fetched.
    pub fn resolve(&self, modules: &ModuleList, project_root: &Path) -> Result<usize, PipelineError> {
        if self.policy == ModulePolicy::Strict {
            modules.validate()?;
        }

        for (installed, module) in modules.entries().iter().enumerate() {
            debug!("Fetching module {:?} in {}", module, project_root.display());
            if let Err(e) = self.packages.fetch(module, project_root) {
                error!("Stopped after {} of {} modules", installed, modules.len());
                return Err(e);
            }
        }

        info!("Fetched {} modules", modules.len());
        Ok(modules.len())
    }
}
