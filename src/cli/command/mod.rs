pub mod completion;
pub mod generate;
pub mod set;
pub mod view;
