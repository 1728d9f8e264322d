//! Error types raised while generating a tool.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single pipeline stage
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("OpenAI API key not set")]
    MissingCredential,

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("generating {artifact}: {source}")]
    Service {
        artifact: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("malformed module list: {0}")]
    Parse(String),

    #[error("getting go package '{module}': {reason}\nStandard Error: {stderr}")]
    Process {
        module: String,
        reason: String,
        stderr: String,
    },

    #[error("rendering {template}: {source}")]
    Template {
        template: &'static str,
        #[source]
        source: askama::Error,
    },

    #[error("stage ran without {0} in its context")]
    OutOfOrder(&'static str),
}

impl PipelineError {
    /// Wrap an IO error with the action and path that produced it
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Failure talking to the text-generation service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("service returned an empty reply")]
    EmptyReply,
}

impl ServiceError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidResponse(_) | Self::EmptyReply => false,
        }
    }
}
