//! rustyline-backed input for the interactive shell.

use crate::cli::shell::{LineSource, ReadLine};
use crate::core::command::CommandRegistry;
use crate::domain::error::{HavocError, HavocResult};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Words the shell handles itself
const BUILTINS: [&str; 2] = ["help", "exit"];

/// Tab completion of command names and their `--param=` flags
pub struct CommandHelper {
    registry: CommandRegistry,
}

impl CommandHelper {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    /// Start of the word under the cursor and its completions
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let head = &line[..pos];
        let start = head.rfind(char::is_whitespace).map(|i| i + 1).unwrap_or(0);
        let word = &head[start..];
        let tokens: Vec<&str> = head[..start].split_whitespace().collect();

        let candidates = match tokens.as_slice() {
            [] | ["help"] | ["?"] => self
                .registry
                .names()
                .chain(BUILTINS)
                .filter(|name| name.starts_with(word))
                .map(str::to_string)
                .collect(),
            [command, ..] => match self.registry.get(command) {
                Some(spec) => spec
                    .params
                    .iter()
                    .map(|param| format!("--{}=", param.name))
                    .filter(|flag| flag.starts_with(word))
                    .collect(),
                None => Vec::new(),
            },
        };
        (start, candidates)
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = self.candidates(line, pos);
        let pairs = candidates
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

impl Helper for CommandHelper {}

/// Terminal line editor with history and completion
pub struct LineEditor {
    editor: Editor<CommandHelper, DefaultHistory>,
    history_path: Option<PathBuf>,
}

impl LineEditor {
    pub fn new(registry: CommandRegistry, history_path: Option<PathBuf>) -> HavocResult<Self> {
        let mut editor = Editor::new().map_err(terminal_error)?;
        editor.set_helper(Some(CommandHelper::new(registry)));

        if let Some(path) = &history_path {
            if let Err(e) = editor.load_history(path) {
                debug!("No shell history loaded from {}: {}", path.display(), e);
            }
        }

        Ok(Self { editor, history_path })
    }
}

impl LineSource for LineEditor {
    fn read_line(&mut self, prompt: &str) -> HavocResult<ReadLine> {
        let editor = &mut self.editor;
        match tokio::task::block_in_place(|| editor.readline(prompt)) {
            Ok(line) => Ok(ReadLine::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadLine::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadLine::Eof),
            Err(e) => Err(terminal_error(e)),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            debug!("History entry dropped: {}", e);
        }
    }

    fn close(&mut self) {
        if let Some(path) = &self.history_path {
            if let Err(e) = self.editor.save_history(path) {
                warn!("Failed to save shell history to {}: {}", path.display(), e);
            }
        }
    }
}

fn terminal_error(err: ReadlineError) -> HavocError {
    HavocError::Terminal(err.to_string())
}
