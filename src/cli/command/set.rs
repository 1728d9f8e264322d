use clap::{Arg, ArgMatches, Command};
use anyhow::Result;

use crate::user_config::ConfigStore;

pub fn spec() -> Command {
    Command::new("set")
        .about("Set the OpenAI API key with flag -k")
        .long_about(
            "Store the OpenAI API key in ~/.krait.yaml under openai.key. \
            The file is created if it does not exist; other settings in it are kept."
        )
        .arg(
            Arg::new("key")
                .short('k')
                .long("key")
                .help("OpenAI API key")
                .value_name("KEY")
        )
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    let key = matches.get_one::<String>("key").map(String::as_str).unwrap_or_default();

    if key.is_empty() {
        println!("Error: OpenAI API key is required");
        return Ok(());
    }

    let store = ConfigStore::default_location()?;
    store.set_key(key)?;

    println!("✓ OpenAI API key has been set and saved to {}", store.path().display());
    Ok(())
}
