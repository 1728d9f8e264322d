use clap::{Command, Arg, ValueEnum};
use clap_complete::{generate, Generator, Shell};
use anyhow::{Context, Result};
use std::io;

use crate::cli::build_cli;

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::PowerShell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

pub fn spec() -> Command {
    Command::new("completion")
        .about("Generate shell completion scripts")
        .long_about(
            "Generate shell completion scripts for krait.\n\n\
            Installation examples:\n  \
            Bash:       krait completion bash > /usr/local/etc/bash_completion.d/krait\n  \
            Zsh:        krait completion zsh > ~/.zsh/completion/_krait\n  \
            Fish:       krait completion fish > ~/.config/fish/completions/krait.fish\n  \
            PowerShell: krait completion powershell > krait.ps1"
        )
        .arg(
            Arg::new("shell")
                .help("Shell type to generate completion for")
                .value_parser(clap::value_parser!(CompletionShell))
                .required(true)
        )
}

pub fn action(matches: &clap::ArgMatches) -> Result<()> {
    let shell = matches.get_one::<CompletionShell>("shell")
        .context("Shell argument is required")?;

    let mut cmd = build_cli();
    let bin_name = cmd.get_name().to_string();

    let shell_type: Shell = shell.clone().into();
    print_completions(shell_type, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command, bin_name: String, out: &mut dyn io::Write) {
    generate(gen, cmd, bin_name, out);
}
