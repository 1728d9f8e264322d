use clap::Command;
use anyhow::Result;

use crate::user_config::store::describe_key;
use crate::user_config::ConfigStore;

pub fn spec() -> Command {
    Command::new("view").about("View the OpenAI API key")
}

pub fn action() -> Result<()> {
    let config = ConfigStore::default_location()?.load()?;
    println!("{}", describe_key(config.openai_key()));
    Ok(())
}
