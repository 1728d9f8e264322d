pub mod models;
pub mod store;

pub use models::Credential;
pub use store::ConfigStore;
