//! A single-user contact book persisted to a local JSON file.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod prelude;
pub mod storage;

pub use cli::run_app;
