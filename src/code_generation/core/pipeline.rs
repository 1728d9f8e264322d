use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::code_generation::core::artifact_writer::ArtifactWriter;
use crate::code_generation::core::context::{GenerationContext, PipelineState, ToolSpec};
use crate::code_generation::core::dependency_resolver::{
    DependencyResolver, ModuleList, ModulePolicy, PackageManager,
};
use crate::code_generation::language::go::layout::{
    main_go_content, MAIN_FILE, MANIFEST_FILE, ROOT_COMMAND_FILE,
};
use crate::code_generation::prompts::PromptTemplates;
use crate::code_generation::service::TextGenerator;
use crate::shared::error::{PipelineError, ServiceError};
use crate::user_config::Credential;

/// One step of the chain: takes the context so far, returns it extended
type StageFn = fn(&Pipeline<'_>, GenerationContext) -> Result<GenerationContext, PipelineError>;

/// Stages in execution order, each paired with the state it leads to
const STAGES: [(PipelineState, StageFn); 4] = [
    (PipelineState::RootGenerated, generate_root),
    (PipelineState::ModGenerated, generate_manifest),
    (PipelineState::ModulesResolved, resolve_modules),
    (PipelineState::Done, finish),
];

/// A run that stopped early. Files written before the failure are left in place.
#[derive(Debug)]
pub struct PipelineAborted {
    /// Last state reached before the failing stage
    pub reached: PipelineState,
    pub error: PipelineError,
}

impl fmt::Display for PipelineAborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for PipelineAborted {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Generates a Go CLI project by chaining service calls.
pub struct Pipeline<'a> {
    spec: ToolSpec,
    project_root: PathBuf,
    credential: Credential,
    generator: &'a dyn TextGenerator,
    packages: &'a dyn PackageManager,
    module_policy: ModulePolicy,
}

impl<'a> Pipeline<'a> {
    /// The project is created at `<workspace>/<spec.name>`
    pub fn new<P: AsRef<Path>>(
        spec: ToolSpec,
        workspace: P,
        credential: Credential,
        generator: &'a dyn TextGenerator,
        packages: &'a dyn PackageManager,
    ) -> Self {
        let project_root = workspace.as_ref().join(spec.name());
        Self {
            spec,
            project_root,
            credential,
            generator,
            packages,
            module_policy: ModulePolicy::default(),
        }
    }

    pub fn with_module_policy(mut self, policy: ModulePolicy) -> Self {
        self.module_policy = policy;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    #[cfg(test)]
    pub fn run(&self) -> Result<GenerationContext, PipelineAborted> {
        self.run_observed(&mut |_| {})
    }

    /// Run every stage in order, calling `on_state` after each one succeeds
    pub fn run_observed(
        &self,
        on_state: &mut dyn FnMut(PipelineState),
    ) -> Result<GenerationContext, PipelineAborted> {
        let mut reached = PipelineState::Init;
        let mut context = GenerationContext::default();

        for (next, stage) in STAGES {
            debug!("Pipeline {} -> {}", reached, next);
            context = stage(self, context).map_err(|error| PipelineAborted { reached, error })?;
            reached = next;
            on_state(reached);
        }

        Ok(context)
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.project_root.join(relative)
    }

    /// Call the service, treating an empty reply as a failure
    fn ask(&self, artifact: &'static str, prompt: &str) -> Result<String, PipelineError> {
        let reply = self
            .generator
            .generate(prompt, &self.credential)
            .map_err(|source| PipelineError::Service { artifact, source })?;

        if reply.is_empty() {
            return Err(PipelineError::Service {
                artifact,
                source: ServiceError::EmptyReply,
            });
        }
        Ok(reply)
    }
}

/// Init -> RootGenerated: project directory, main.go and cmd/root.go
fn generate_root(
    pipeline: &Pipeline<'_>,
    context: GenerationContext,
) -> Result<GenerationContext, PipelineError> {
    if pipeline.credential.is_empty() {
        return Err(PipelineError::MissingCredential);
    }

    ArtifactWriter::create_project_dir(&pipeline.project_root)?;
    ArtifactWriter::write(pipeline.path(MAIN_FILE), &main_go_content(pipeline.spec.name())?)?;

    let prompt = PromptTemplates::root(&pipeline.spec)?;
    let root_source = pipeline.ask(ROOT_COMMAND_FILE, &prompt)?;
    ArtifactWriter::write(pipeline.path(ROOT_COMMAND_FILE), &root_source)?;

    info!("Generated {}", ROOT_COMMAND_FILE);
    Ok(context.with_root_source(root_source))
}

/// RootGenerated -> ModGenerated: go.mod derived from cmd/root.go
fn generate_manifest(
    pipeline: &Pipeline<'_>,
    context: GenerationContext,
) -> Result<GenerationContext, PipelineError> {
    let root_source = context
        .root_source()
        .ok_or(PipelineError::OutOfOrder(ROOT_COMMAND_FILE))?;

    let prompt = PromptTemplates::manifest(pipeline.spec.name(), root_source)?;
    let manifest = pipeline.ask(MANIFEST_FILE, &prompt)?;
    ArtifactWriter::write(pipeline.path(MANIFEST_FILE), &manifest)?;

    info!("Generated {}", MANIFEST_FILE);
    Ok(context.with_manifest(manifest))
}

/// ModGenerated -> ModulesResolved: list modules from go.mod and fetch them
fn resolve_modules(
    pipeline: &Pipeline<'_>,
    context: GenerationContext,
) -> Result<GenerationContext, PipelineError> {
    let manifest = context
        .manifest()
        .ok_or(PipelineError::OutOfOrder(MANIFEST_FILE))?;

    let prompt = PromptTemplates::modules(manifest)?;
    let modules = ModuleList::parse(&pipeline.ask("module list", &prompt)?);
    debug!("Service listed {} modules", modules.len());

    let installed = DependencyResolver::new(pipeline.packages, pipeline.module_policy)
        .resolve(&modules, &pipeline.project_root)?;

    Ok(context.with_modules(modules, installed))
}

/// ModulesResolved -> Done
fn finish(
    pipeline: &Pipeline<'_>,
    context: GenerationContext,
) -> Result<GenerationContext, PipelineError> {
    info!("Project ready at {}", pipeline.project_root.display());
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_generation::core::test_support::{RecordingPackageManager, ScriptedGenerator};
    use std::fs;
    use tempfile::TempDir;

    const ROOT_GO: &str = "package cmd\n\nimport \"github.com/spf13/cobra\"\n\nvar rootCmd = &cobra.Command{Use: \"wordcount\"}\n";
    const GO_MOD: &str = "module wordcount\n\ngo 1.21\n\nrequire github.com/spf13/cobra v1.8.0\n";

    fn spec() -> ToolSpec {
        ToolSpec::new("wordcount", "count words in files")
    }

    #[test]
    fn test_successful_run_creates_project() {
        let temp_dir = TempDir::new().unwrap();
        let generator = ScriptedGenerator::replying(&[ROOT_GO, GO_MOD, "github.com/spf13/cobra"]);
        let packages = RecordingPackageManager::default();

        let pipeline = Pipeline::new(spec(), temp_dir.path(), Credential::new("k"), &generator, &packages);
        let context = pipeline.run().unwrap();

        let root = temp_dir.path().join("wordcount");
        let main_go = fs::read_to_string(root.join("main.go")).unwrap();
        assert!(main_go.contains("import \"wordcount/cmd\""));
        assert_eq!(fs::read_to_string(root.join("cmd/root.go")).unwrap(), ROOT_GO);
        assert_eq!(fs::read_to_string(root.join("go.mod")).unwrap(), GO_MOD);

        assert_eq!(packages.fetched(), vec!["github.com/spf13/cobra"]);
        assert_eq!(packages.working_dirs(), vec![root.clone()]);
        assert_eq!(context.installed(), 1);
        assert_eq!(pipeline.project_root(), root.as_path());
    }

    #[test]
    fn test_prompts_chain_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let generator = ScriptedGenerator::replying(&[ROOT_GO, GO_MOD, "github.com/spf13/cobra"]);
        let packages = RecordingPackageManager::default();

        Pipeline::new(spec(), temp_dir.path(), Credential::new("k"), &generator, &packages)
            .run()
            .unwrap();

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("count words in files"));
        assert!(prompts[1].contains(ROOT_GO));
        assert!(prompts[1].contains("The module name must be wordcount."));
        assert!(prompts[2].contains(GO_MOD));
    }

    #[test]
    fn test_observer_sees_every_state_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let generator = ScriptedGenerator::replying(&[ROOT_GO, GO_MOD, "a,b"]);
        let packages = RecordingPackageManager::default();
        let mut states = Vec::new();

        Pipeline::new(spec(), temp_dir.path(), Credential::new("k"), &generator, &packages)
            .run_observed(&mut |state| states.push(state))
            .unwrap();

        assert_eq!(
            states,
            vec![
                PipelineState::RootGenerated,
                PipelineState::ModGenerated,
                PipelineState::ModulesResolved,
                PipelineState::Done,
            ]
        );
    }

    #[test]
    fn test_missing_credential_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let generator = ScriptedGenerator::replying(&[ROOT_GO]);
        let packages = RecordingPackageManager::default();

        let aborted = Pipeline::new(spec(), temp_dir.path(), Credential::default(), &generator, &packages)
            .run()
            .unwrap_err();

        assert!(matches!(aborted.error, PipelineError::MissingCredential));
        assert_eq!(aborted.reached, PipelineState::Init);
        assert!(generator.prompts().is_empty());
        assert!(!temp_dir.path().join("wordcount").exists());
    }

    #[test]
    fn test_existing_project_directory_aborts_before_service_call() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("wordcount")).unwrap();
        let generator = ScriptedGenerator::replying(&[ROOT_GO]);
        let packages = RecordingPackageManager::default();

        let aborted = Pipeline::new(spec(), temp_dir.path(), Credential::new("k"), &generator, &packages)
            .run()
            .unwrap_err();

        assert!(matches!(aborted.error, PipelineError::Io { .. }));
        assert!(generator.prompts().is_empty());
    }

    #[test]
    fn test_empty_root_reply_writes_no_root_file() {
        let temp_dir = TempDir::new().unwrap();
        let generator = ScriptedGenerator::replying(&[""]);
        let packages = RecordingPackageManager::default();

        let aborted = Pipeline::new(spec(), temp_dir.path(), Credential::new("k"), &generator, &packages)
            .run()
            .unwrap_err();

        let root = temp_dir.path().join("wordcount");
        assert!(matches!(
            aborted.error,
            PipelineError::Service { source: ServiceError::EmptyReply, .. }
        ));
        assert_eq!(aborted.reached, PipelineState::Init);
        // main.go is written before the service is asked for anything
        assert!(root.join("main.go").exists());
        assert!(!root.join("cmd/root.go").exists());
        assert_eq!(generator.prompts().len(), 1);
    }

    #[test]
    fn test_empty_manifest_reply_skips_later_stages() {
        let temp_dir = TempDir::new().unwrap();
        let generator = ScriptedGenerator::replying(&[ROOT_GO, ""]);
        let packages = RecordingPackageManager::default();

        let aborted = Pipeline::new(spec(), temp_dir.path(), Credential::new("k"), &generator, &packages)
            .run()
            .unwrap_err();

        let root = temp_dir.path().join("wordcount");
        assert_eq!(aborted.reached, PipelineState::RootGenerated);
        assert!(root.join("cmd/root.go").exists());
        assert!(!root.join("go.mod").exists());
        assert_eq!(generator.prompts().len(), 2);
        assert!(packages.fetched().is_empty());
    }

    #[test]
    fn test_service_error_aborts_stage() {
        let temp_dir = TempDir::new().unwrap();
        let generator = ScriptedGenerator::replying(&[ROOT_GO, GO_MOD]);
        generator.push(Err(ServiceError::Status { status: 500, body: "oops".to_string() }));
        let packages = RecordingPackageManager::default();

        let aborted = Pipeline::new(spec(), temp_dir.path(), Credential::new("k"), &generator, &packages)
            .run()
            .unwrap_err();

        assert_eq!(aborted.reached, PipelineState::ModGenerated);
        assert!(aborted.to_string().contains("generating module list"));
        assert!(packages.fetched().is_empty());
    }

    #[test]
    fn test_failed_module_keeps_earlier_installs() {
        let temp_dir = TempDir::new().unwrap();
        let generator = ScriptedGenerator::replying(&[ROOT_GO, GO_MOD, "a,b,c"]);
        let packages = RecordingPackageManager::failing_on("b");

        let aborted = Pipeline::new(spec(), temp_dir.path(), Credential::new("k"), &generator, &packages)
            .run()
            .unwrap_err();

        assert_eq!(aborted.reached, PipelineState::ModGenerated);
        assert!(matches!(aborted.error, PipelineError::Process { .. }));
        assert_eq!(packages.installed(), vec!["a"]);
        assert_eq!(packages.fetched(), vec!["a", "b"]);
        // generated files stay on disk
        assert!(temp_dir.path().join("wordcount/go.mod").exists());
    }

    #[test]
    fn test_trailing_comma_reaches_package_manager() {
        let temp_dir = TempDir::new().unwrap();
        let generator = ScriptedGenerator::replying(&[ROOT_GO, GO_MOD, "github.com/spf13/cobra,"]);
        let packages = RecordingPackageManager::failing_on("");

        let aborted = Pipeline::new(spec(), temp_dir.path(), Credential::new("k"), &generator, &packages)
            .run()
            .unwrap_err();

        assert!(matches!(aborted.error, PipelineError::Process { ref module, .. } if module.is_empty()));
        assert_eq!(packages.fetched(), vec!["github.com/spf13/cobra", ""]);
    }

    #[test]
    fn test_strict_policy_rejects_malformed_list() {
        let temp_dir = TempDir::new().unwrap();
        let generator = ScriptedGenerator::replying(&[ROOT_GO, GO_MOD, "github.com/spf13/cobra,"]);
        let packages = RecordingPackageManager::default();

        let aborted = Pipeline::new(spec(), temp_dir.path(), Credential::new("k"), &generator, &packages)
            .with_module_policy(ModulePolicy::Strict)
            .run()
            .unwrap_err();

        assert!(matches!(aborted.error, PipelineError::Parse(_)));
        assert!(packages.fetched().is_empty());
    }

    #[test]
    fn test_out_of_order_stage_is_rejected() {
        let generator = ScriptedGenerator::default();
        let packages = RecordingPackageManager::default();
        let pipeline = Pipeline::new(spec(), ".", Credential::new("k"), &generator, &packages);

        let err = generate_manifest(&pipeline, GenerationContext::default()).unwrap_err();
        assert!(matches!(err, PipelineError::OutOfOrder("cmd/root.go")));
        assert!(generator.prompts().is_empty());
    }
}
