pub mod command;

use clap::{Arg, ArgAction, Command};

/// Full command tree, shared by main and the completion generator
pub fn build_cli() -> Command {
    let version = env!("CARGO_PKG_VERSION");

    Command::new("krait")
        .about(format!("Krait v{} - Generate Go command-line tools with OpenAI", version))
        .long_about(
            "Krait scaffolds a new Go command-line tool. It asks an OpenAI model for a \
            cobra root command, a go.mod consistent with it and the list of modules to \
            install, writes the project to a new directory and runs 'go get' for each module."
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show debug logs on stderr")
                .action(ArgAction::SetTrue)
                .global(true)
        )
        .subcommand(command::generate::spec())
        .subcommand(command::set::spec())
        .subcommand(command::view::spec())
        .subcommand(command::completion::spec())
        .version(version)
}
