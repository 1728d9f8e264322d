use askama::Template;

use crate::shared::error::PipelineError;

/// Entry point, relative to the project root
pub const MAIN_FILE: &str = "main.go";
/// Root cobra command, relative to the project root
pub const ROOT_COMMAND_FILE: &str = "cmd/root.go";
/// Module manifest, relative to the project root
pub const MANIFEST_FILE: &str = "go.mod";

#[derive(Template)]
#[template(path = "main_go.txt")]
struct MainGo<'a> {
    name: &'a str,
}

/// main.go for a tool whose module path is `name`
pub fn main_go_content(name: &str) -> Result<String, PipelineError> {
    MainGo { name }
        .render()
        .map_err(|source| PipelineError::Template { template: "main.go", source })
}
