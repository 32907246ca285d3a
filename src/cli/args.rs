use clap::{Parser, Subcommand, ValueEnum};
use crate::domain::config::OutputMode;
use std::path::PathBuf;

/// Command line arguments for havoc
#[derive(Parser, Debug)]
#[command(
    name = "havoc",
    version = env!("CARGO_PKG_VERSION"),
    about = "havoc CLI - administrative shell for the ./havoc control plane",
    long_about = "An interactive shell for managing tasks, task types, users, workspace files, portgroups and domains on a ./havoc deployment."
)]
pub struct Args {
    /// Use a specific profile from your credential file
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Configuration file path (defaults to ~/.havoc/config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format, overriding the profile's setting
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute (defaults to the interactive shell)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive shell
    Shell,
    /// Run a single shell command, e.g. `havoc run get_task --task_name=t1`
    Run {
        /// Command name followed by its --key=value arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,
    },
    /// List the commands the shell accepts
    Commands,
    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the selected profile with its secret masked
    Show,
    /// Write a template configuration file
    Init,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tables
    Table,
    /// Single-line JSON
    Json,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => Self::Table,
            OutputFormat::Json => Self::Json,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
