pub mod layout;
pub mod toolchain;

pub use toolchain::GoToolchain;
