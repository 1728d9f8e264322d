pub mod artifact_writer;
pub mod context;
pub mod dependency_resolver;
pub mod pipeline;

#[cfg(test)]
pub mod test_support;

pub use context::{PipelineState, ToolSpec};
pub use dependency_resolver::ModulePolicy;
pub use pipeline::{Pipeline, PipelineAborted};
