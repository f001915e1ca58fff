//! Command implementations for the Steg CLI.

mod config;
mod run;
mod serve;
mod tools;

pub use config::run_config;
pub use run::run_task;
pub use serve::run_serve;
pub use tools::run_tools;
