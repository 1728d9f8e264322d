pub mod templates;

pub use templates::PromptTemplates;
