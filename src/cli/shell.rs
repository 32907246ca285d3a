//! Interactive read-dispatch-render loop.

use crate::cli::output::OutputWriter;
use crate::core::command::{split_command, CommandDispatcher, RemoteClient};
use crate::domain::error::{HavocError, HavocResult};
use tracing::debug;

pub const PROMPT: &str = "havoc> ";
pub const INTRO: &str = "havoc CLI - Type ? to list commands";

const BANNER: &str = r"         _ _         _    _  _____   ______
        / | |      \| |  | |/ ___ \ / _____)
       / /| |__  /  \ |  | | |   | | /
      / / |  __)/ /\ \ \/ /| |   | | |
     / /  | |  / |__| \  / | |___| | \_____
  ()/_/   |_| / ______|\/   \_____/ \______)";

/// What the loop does after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellControl {
    Continue,
    Exit,
}

/// One read from the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLine {
    Line(String),
    /// Ctrl-C: the pending line is dropped
    Interrupted,
    /// Ctrl-D or end of input
    Eof,
}

/// Where the shell gets its input
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> HavocResult<ReadLine>;

    fn add_history(&mut self, _line: &str) {}

    /// Called once when the loop ends
    fn close(&mut self) {}
}

pub struct Shell<C, W> {
    dispatcher: CommandDispatcher<C>,
    writer: W,
}

impl<C: RemoteClient, W: OutputWriter> Shell<C, W> {
    pub fn new(dispatcher: CommandDispatcher<C>, writer: W) -> Self {
        Self { dispatcher, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Read lines from `input` until an exit command or end of input
    pub async fn run<L: LineSource>(&mut self, input: &mut L) -> HavocResult<()> {
        self.writer.write_text(BANNER)?;
        self.writer.write_text(INTRO)?;

        let result = self.read_loop(input).await;
        input.close();
        result
    }

    async fn read_loop<L: LineSource>(&mut self, input: &mut L) -> HavocResult<()> {
        loop {
            let line = match input.read_line(PROMPT)? {
                ReadLine::Line(line) => line,
                ReadLine::Interrupted => continue,
                ReadLine::Eof => {
                    self.writer.write_text("Bye")?;
                    return Ok(());
                }
            };

            let trimmed = line.trim();
            if !trimmed.is_empty() {
                input.add_history(trimmed);
            }
            if self.handle_line(trimmed).await? == ShellControl::Exit {
                return Ok(());
            }
        }
    }

    /// Process a single line. Command failures are rendered, not returned;
    /// `Err` means output itself failed.
    pub async fn handle_line(&mut self, line: &str) -> HavocResult<ShellControl> {
        match self.execute_line(line).await {
            Err(HavocError::Output(message)) => Err(HavocError::Output(message)),
            Err(e) => {
                self.writer.write_error(&e.to_string())?;
                Ok(ShellControl::Continue)
            }
            control => control,
        }
    }

    /// Process a single line and return command failures to the caller
    pub async fn execute_line(&mut self, line: &str) -> HavocResult<ShellControl> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ShellControl::Continue);
        }

        let (name, rest) = match line.strip_prefix('?') {
            Some(topic) => ("help", topic.trim()),
            None => split_command(line),
        };

        match name {
            "exit" | "x" | "q" => {
                self.writer.write_text("Bye")?;
                return Ok(ShellControl::Exit);
            }
            "help" => self.help(rest.trim())?,
            _ => {
                debug!("Executing '{}'", name);
                let dispatched = self.dispatcher.execute(line).await?;
                self.writer
                    .write_response(&dispatched.command, &dispatched.response)?;
            }
        }

        Ok(ShellControl::Continue)
    }

    fn help(&mut self, topic: &str) -> HavocResult<()> {
        if topic.is_empty() {
            let registry = self.dispatcher.registry();
            let width = registry.names().map(str::len).max().unwrap_or(0);
            let mut text = String::from("\nDocumented commands (type help <topic>):\n");
            for spec in registry.iter() {
                text.push_str(&format!("  {:width$}  {}\n", spec.name, spec.summary, width = width));
            }
            text.push_str(&format!("  {:width$}  {}\n", "exit", "Exit the application. Shorthand: x q Ctrl-D.", width = width));
            self.writer.write_text(&text)?;
            return Ok(());
        }

        match self.dispatcher.registry().get(topic) {
            Some(spec) => {
                let text = spec.help_text();
                self.writer.write_text(&text)?;
            }
            None if matches!(topic, "exit" | "x" | "q") => {
                self.writer.write_text("\nExit the application. Shorthand: x q Ctrl-D.\n")?;
            }
            None => self.writer.write_text(&format!("*** No help on {}", topic))?,
        }
        Ok(())
    }
}
