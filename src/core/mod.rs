// Core module - argument parsing, result filtering and command dispatch
pub mod args;
pub mod command;
pub mod results;
