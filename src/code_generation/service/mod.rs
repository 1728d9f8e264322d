pub mod client;
pub mod policy;

pub use client::{OpenAiClient, TextGenerator};
pub use policy::ServicePolicy;
