use std::env;
use std::path::Path;
use std::time::Duration;
use clap::{Arg, ArgAction, ArgMatches, Command};
use anyhow::{Context, Result};
use inquire::validator::Validation;
use inquire::Text;

use crate::code_generation::core::artifact_writer::CREATE_PROJECT_DIR;
use crate::code_generation::core::{ModulePolicy, Pipeline, PipelineAborted, PipelineState, ToolSpec};
use crate::code_generation::language::go::layout::{MAIN_FILE, MANIFEST_FILE, ROOT_COMMAND_FILE};
use crate::code_generation::language::go::GoToolchain;
use crate::code_generation::service::{OpenAiClient, ServicePolicy};
use crate::shared::error::PipelineError;
use crate::user_config::ConfigStore;

pub fn spec() -> Command {
    Command::new("generate")
        .about("Generate a CLI tool")
        .long_about(
            "Generate a new Go command-line tool from a name and a short description.\n\
            \n\
            Steps:\n\
            1. Create <name>/main.go\n\
            2. Ask the model for <name>/cmd/root.go\n\
            3. Ask the model for <name>/go.mod based on root.go\n\
            4. Ask the model which modules go.mod needs and run 'go get -u' for each\n\
            \n\
            The first failing step stops the run. Files already written are kept, \
            so remove the directory before running again.\n\
            \n\
            Prerequisites:\n\
            • An OpenAI API key (set with 'krait set -k <key>')\n\
            • The go toolchain on PATH"
        )
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .help("Tool name; prompted for when omitted")
                .value_name("NAME")
        )
        .arg(
            Arg::new("description")
                .short('d')
                .long("description")
                .help("What the tool should do; prompted for when omitted")
                .value_name("TEXT")
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Give up on a model request after this many seconds (default: wait forever)")
                .value_name("SECS")
                .value_parser(clap::value_parser!(u64).range(1..))
        )
        .arg(
            Arg::new("retries")
                .long("retries")
                .help("Retry a failed model request this many times")
                .value_name("N")
                .value_parser(clap::value_parser!(u32))
                .default_value("0")
        )
        .arg(
            Arg::new("strict-modules")
                .long("strict-modules")
                .help("Refuse to install anything if the model's module list is malformed")
                .action(ArgAction::SetTrue)
        )
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    let store = ConfigStore::default_location()?;
    let credential = store.credential()?;

    if credential.is_empty() {
        println!("{}", PipelineError::MissingCredential);
        return Ok(());
    }

    let name = match matches.get_one::<String>("name") {
        Some(name) => {
            if let Err(reason) = check_tool_name(name) {
                println!("Error: {}", reason);
                return Ok(());
            }
            name.clone()
        }
        None => Text::new("Enter the name of your tool:")
            .with_validator(validate_tool_name)
            .prompt()
            .context("Failed to get tool name")?,
    };

    let description = match matches.get_one::<String>("description") {
        Some(description) => description.clone(),
        None => Text::new("Enter a brief description of your tool:")
            .prompt()
            .context("Failed to get tool description")?,
    };

    let tool = ToolSpec::new(name, description);
    let policy = service_policy(matches);
    let module_policy = if matches.get_flag("strict-modules") {
        ModulePolicy::Strict
    } else {
        ModulePolicy::PassThrough
    };

    let workspace = env::current_dir().context("Failed to read current directory")?;
    let client = OpenAiClient::new(policy);
    let toolchain = GoToolchain::default();

    let pipeline = Pipeline::new(tool.clone(), &workspace, credential, &client, &toolchain)
        .with_module_policy(module_policy);

    println!("Generating {} ...", tool.name());
    let result = pipeline.run_observed(&mut |state| {
        if let Some(line) = progress_line(state) {
            println!("  ✓ {}", line);
        }
    });

    match result {
        Ok(context) => {
            println!(
                "[Success] {} is ready in {} ({} modules installed).",
                tool.name(),
                pipeline.project_root().display(),
                context.installed()
            );
            if let Some(modules) = context.modules() {
                for module in modules.entries() {
                    println!("  - {}", module);
                }
            }
        }
        Err(aborted) => {
            println!("Error: {}", aborted);
            if let Some(hint) = cleanup_hint(&aborted, pipeline.project_root()) {
                println!("{}", hint);
            }
        }
    }

    Ok(())
}

/// Progress line for a reached state
fn progress_line(state: PipelineState) -> Option<String> {
    match state {
        PipelineState::RootGenerated => Some(format!("Created {} and {}", MAIN_FILE, ROOT_COMMAND_FILE)),
        PipelineState::ModGenerated => Some(format!("Created {}", MANIFEST_FILE)),
        PipelineState::ModulesResolved => Some("Installed modules".to_string()),
        PipelineState::Init | PipelineState::Done => None,
    }
}

/// What the operator has to deal with after an aborted run, if anything
fn cleanup_hint(aborted: &PipelineAborted, project_root: &Path) -> Option<String> {
    let root = project_root.display();
    match (aborted.reached, &aborted.error) {
        // nothing was created by this run
        (_, PipelineError::MissingCredential) => None,
        (PipelineState::Init, PipelineError::Io { action: CREATE_PROJECT_DIR, .. }) => None,
        (PipelineState::Init | PipelineState::RootGenerated, _) => Some(format!(
            "Generation stopped; {} is incomplete. Remove it before running again.",
            root
        )),
        (PipelineState::ModGenerated, PipelineError::Process { module, .. }) => Some(format!(
            "All files in {} were written; '{}' and the modules listed after it were not installed.",
            root, module
        )),
        (PipelineState::ModGenerated, _) => Some(format!(
            "All files in {} were written; no modules were installed.",
            root
        )),
        (PipelineState::ModulesResolved | PipelineState::Done, _) => None,
    }
}

fn service_policy(matches: &ArgMatches) -> ServicePolicy {
    let timeout = matches.get_one::<u64>("timeout").map(|secs| Duration::from_secs(*secs));
    let retries = matches.get_one::<u32>("retries").copied().unwrap_or(0);
    ServicePolicy::default().with_timeout(timeout).with_retries(retries)
}

/// The name becomes a directory and a Go module path, so it must be one token
fn check_tool_name(input: &str) -> Result<(), &'static str> {
    let name = input.trim();
    if name.is_empty() {
        Err("Tool name cannot be empty")
    } else if name.chars().any(char::is_whitespace) {
        Err("Tool name cannot contain spaces")
    } else {
        Ok(())
    }
}

fn validate_tool_name(input: &str) -> Result<Validation, inquire::error::CustomUserError> {
    match check_tool_name(input) {
        Ok(()) => Ok(Validation::Valid),
        Err(reason) => Ok(Validation::Invalid(reason.into())),
    }
}
