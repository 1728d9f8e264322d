//! In-memory stand-ins for the service and the package manager.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::code_generation::core::dependency_resolver::PackageManager;
use crate::code_generation::service::TextGenerator;
use crate::shared::error::{PipelineError, ServiceError};
use crate::user_config::Credential;

/// Replies with queued responses in order and records every prompt
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: RefCell<VecDeque<Result<String, ServiceError>>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(replies: &[&str]) -> Self {
        let generator = Self::default();
        for reply in replies {
            generator.push(Ok(reply.to_string()));
        }
        generator
    }

    pub fn push(&self, reply: Result<String, ServiceError>) {
        self.replies.borrow_mut().push_back(reply);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, prompt: &str, _credential: &Credential) -> Result<String, ServiceError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Transport("no scripted reply".to_string())))
    }
}

/// Records fetch calls; optionally fails on one module
#[derive(Default)]
pub struct RecordingPackageManager {
    fail_on: Option<String>,
    calls: RefCell<Vec<(String, PathBuf)>>,
    installed: RefCell<Vec<String>>,
}

impl RecordingPackageManager {
    pub fn failing_on(module: &str) -> Self {
        Self {
            fail_on: Some(module.to_string()),
            ..Self::default()
        }
    }

    /// Every module passed to `fetch`, including the one that failed
    pub fn fetched(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn working_dirs(&self) -> Vec<PathBuf> {
        self.calls.borrow().iter().map(|(_, dir)| dir.clone()).collect()
    }

    /// Modules whose fetch succeeded
    pub fn installed(&self) -> Vec<String> {
        self.installed.borrow().clone()
    }
}

impl PackageManager for RecordingPackageManager {
    fn fetch(&self, module: &str, working_dir: &Path) -> Result<(), PipelineError> {
        self.calls
            .borrow_mut()
            .push((module.to_string(), working_dir.to_path_buf()));

        if self.fail_on.as_deref() == Some(module) {
            return Err(PipelineError::Process {
                module: module.to_string(),
                reason: "exit status: 1".to_string(),
                stderr: format!("go: malformed module path {:?}\n", module),
            });
        }

        self.installed.borrow_mut().push(module.to_string());
        Ok(())
    }
}
