// CLI module - Command line interface
pub mod args;
pub mod commands;
pub mod editor;
pub mod output;
pub mod shell;

pub use args::{Args, Command, OutputFormat};
pub use commands::execute_command;
pub use output::{ConsoleWriter, OutputWriter};
pub use editor::{CommandHelper, LineEditor};
pub use shell::{LineSource, ReadLine, Shell};
