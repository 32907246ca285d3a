// Args module - command argument schemas and parsing
pub mod parser;
pub mod schema;

pub use parser::{parse, tokenize, ArgumentParser};
pub use schema::{ArgValue, ArgumentSet, ParameterSchema};
