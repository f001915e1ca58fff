//! CLI module for Steg.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Steg - plan-and-execute agent service
///
/// Takes a free-text task, plans it into a few tool-bound steps, executes
/// them, and returns a synthesized answer. The name "Steg" comes from the
/// Norwegian word for "step."
#[derive(Parser, Debug)]
#[command(name = "steg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server (and the built-in web UI)
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a single task from the terminal
    Run {
        /// The task to plan and execute
        task: String,

        /// Print the raw outcome as JSON instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// List the registered tools
    Tools,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration
    Show,

    /// Open the configuration file in $EDITOR
    Edit,

    /// Print the configuration file path
    Path,
}
