mod cli;
mod code_generation;
mod shared;
mod user_config;

use crate::cli::{build_cli, command};

fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();

    shared::logging::init(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("generate", sub_matches)) => {
            command::generate::action(sub_matches)
        }
        Some(("set", sub_matches)) => {
            command::set::action(sub_matches)
        }
        Some(("view", _)) => {
            command::view::action()
        }
        Some(("completion", sub_matches)) => {
            command::completion::action(sub_matches)
        }
        _ => unreachable!()
    }
}
