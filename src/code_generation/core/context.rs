use std::fmt;

use crate::code_generation::core::dependency_resolver::ModuleList;

/// Name and description of the tool being generated.
///
/// `name` is used as the project directory, the Go module path and the
/// cobra `Use` string, so every stage must see the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    name: String,
    description: String,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            description: description.into().trim().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Outputs of the stages completed so far.
///
/// Each stage consumes the context and returns it with its own output
/// appended; earlier entries are never replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationContext {
    root_source: Option<String>,
    manifest: Option<String>,
    modules: Option<ModuleList>,
    installed: usize,
}

impl GenerationContext {
    pub fn with_root_source(self, root_source: String) -> Self {
        Self { root_source: Some(root_source), ..self }
    }

    pub fn with_manifest(self, manifest: String) -> Self {
        Self { manifest: Some(manifest), ..self }
    }

    pub fn with_modules(self, modules: ModuleList, installed: usize) -> Self {
        Self { modules: Some(modules), installed, ..self }
    }

    pub fn root_source(&self) -> Option<&str> {
        self.root_source.as_deref()
    }

    pub fn manifest(&self) -> Option<&str> {
        self.manifest.as_deref()
    }

    pub fn modules(&self) -> Option<&ModuleList> {
        self.modules.as_ref()
    }

    /// Number of modules fetched by the package manager
    pub fn installed(&self) -> usize {
        self.installed
    }
}

/// Progress of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    RootGenerated,
    ModGenerated,
    ModulesResolved,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Init => "init",
            Self::RootGenerated => "root generated",
            Self::ModGenerated => "manifest generated",
            Self::ModulesResolved => "modules resolved",
            Self::Done => "done",
        };
        f.write_str(label)
    }
}
