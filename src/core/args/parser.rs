//! Line-oriented `--key=value` argument parsing.
//!
//! Parsing is purely syntactic. Tokens that are malformed or name a
//! parameter the command does not declare are dropped without error;
//! whether the resulting arguments are sufficient is for the remote service
//! to decide.

use crate::core::args::schema::{ArgumentSet, ParameterSchema};
use crate::domain::config::TokenizerMode;
use tracing::trace;

const DELIMITER: &str = "--";

/// Parses raw operator input against a command's schema
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentParser {
    mode: TokenizerMode,
}

impl ArgumentParser {
    pub fn new(mode: TokenizerMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> TokenizerMode {
        self.mode
    }

    /// Fill an argument set from `input`.
    ///
    /// Every schema key is present in the result. Keys not mentioned keep
    /// their default; when a key appears more than once the last one wins.
    pub fn parse(&self, schema: &ParameterSchema, input: &str) -> ArgumentSet {
        let mut args = schema.defaults();

        for token in tokenize(input, self.mode) {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            if schema.contains(key) {
                args.supply(key, value.trim());
            } else {
                trace!("Ignoring unrecognized argument '{}'", key);
            }
        }

        args
    }
}

/// Parse `input` with the legacy tokenizer
pub fn parse(schema: &ParameterSchema, input: &str) -> ArgumentSet {
    ArgumentParser::default().parse(schema, input)
}

/// Split raw input into tokens.
///
/// Legacy mode splits on every `--`, so a value containing `--` is cut
/// short. Strict mode only starts a token at a `--` that begins the input
/// or follows whitespace and is immediately followed by `identifier=`.
/// Text before the first such boundary is discarded in strict mode.
pub fn tokenize(input: &str, mode: TokenizerMode) -> Vec<&str> {
    match mode {
        TokenizerMode::Legacy => input.split(DELIMITER).collect(),
        TokenizerMode::Strict => strict_tokens(input),
    }
}

fn strict_tokens(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut starts = Vec::new();
    let mut i = 0;

    while i + 1 < bytes.len() {
        let at_boundary = i == 0 || bytes[i - 1].is_ascii_whitespace();
        if at_boundary && bytes[i] == b'-' && bytes[i + 1] == b'-' && is_assignment(&input[i + 2..]) {
            starts.push(i + DELIMITER.len());
            i += DELIMITER.len();
        } else {
            i += 1;
        }
    }

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts
                .get(n + 1)
                .map(|next| next - DELIMITER.len())
                .unwrap_or(input.len());
            &input[start..end]
        })
        .collect()
}

/// `identifier=` at the start of `rest`
fn is_assignment(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    for c in chars {
        if c == '=' {
            return true;
        }
        if !(c.is_ascii_alphanumeric() || c == '_') {
            return false;
        }
    }
    false
}
