//! havoc CLI Library
//!
//! Administrative shell for the ./havoc control plane: parses
//! `--key=value` command input against per-command schemas, dispatches
//! commands to the remote API and filters queued task results.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::domain::error::{HavocError, HavocResult};
pub use crate::domain::config::{HavocConfig, OutputMode, ProfileConfig, TokenizerMode};
pub use crate::core::args::{parse, ArgValue, ArgumentParser, ArgumentSet, ParameterSchema};
pub use crate::core::command::{CommandDispatcher, CommandRegistry, RemoteClient, RemoteOperation};
pub use crate::core::results::{filter, FilterCriteria, RemoteResponse};
