use askama::Template;

use crate::code_generation::core::context::ToolSpec;
use crate::shared::error::PipelineError;

#[derive(Template)]
#[template(path = "root_prompt.txt")]
struct RootPrompt<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Template)]
#[template(path = "manifest_prompt.txt")]
struct ManifestPrompt<'a> {
    name: &'a str,
    root_source: &'a str,
}

#[derive(Template)]
#[template(path = "modules_prompt.txt")]
struct ModulesPrompt<'a> {
    manifest: &'a str,
}

/// Builds the request sent to the service at each stage.
///
/// Later prompts inline the previous stage's reply unmodified; the service
/// sees no other history.
pub struct PromptTemplates;

impl PromptTemplates {
    /// Prompt for cmd/root.go
    pub fn root(spec: &ToolSpec) -> Result<String, PipelineError> {
        RootPrompt {
            name: spec.name(),
            description: spec.description(),
        }
        .render()
        .map_err(|source| PipelineError::Template { template: "root prompt", source })
    }

    /// Prompt for go.mod, built from the generated root file
    pub fn manifest(name: &str, root_source: &str) -> Result<String, PipelineError> {
        ManifestPrompt { name, root_source }
            .render()
            .map_err(|source| PipelineError::Template { template: "manifest prompt", source })
    }

    /// Prompt asking for the comma-separated module list of a go.mod
    pub fn modules(manifest: &str) -> Result<String, PipelineError> {
        ModulesPrompt { manifest }
            .render()
            .map_err(|source| PipelineError::Template { template: "modules prompt", source })
    }
}
