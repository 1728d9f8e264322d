pub mod core;
pub mod language;
pub mod prompts;
pub mod service;
