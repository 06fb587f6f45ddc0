// Shared modules
pub(crate) mod cli;
pub(crate) mod settings;

// Entry points
pub mod run;
