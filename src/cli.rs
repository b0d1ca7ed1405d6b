//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the taskmill engine.

use clap::{Parser, Subcommand};

/// taskmill - Asynchronous task execution engine
///
/// Queues computational tasks, executes them one at a time on a single
/// executor loop, and tracks their lifecycle from submission to completion.
#[derive(Parser, Debug)]
#[command(name = "taskmill")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TASKMILL_CONFIG")]
    pub config: Option<String>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the engine
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the engine with the interactive console
    Run,

    /// Run a scripted demo (schedules sample tasks and prints the report)
    Demo {
        /// Fibonacci index for the demo task
        #[arg(long, default_value = "6")]
        fibonacci: i64,

        /// Factorial base for the demo task
        #[arg(long, default_value = "5")]
        factorial: i64,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate,
}
