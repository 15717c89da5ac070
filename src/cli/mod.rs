pub mod command;
pub mod display;
pub mod menu;
pub mod prompt;
pub mod run;

pub use menu::{Menu, Screen};
pub use run::{execute, run_app};
