use crate::core::results::RemoteResponse;
use crate::domain::config::OutputMode;
use serde_json::{Map, Value};
use std::io::{self, Stderr, Stdout, Write};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Output writer trait for rendered command results
pub trait OutputWriter {
    /// Render a command's response in the configured mode
    fn write_response(&mut self, command: &str, response: &RemoteResponse) -> Result<(), OutputError>;
    fn write_message(&mut self, message: &str) -> Result<(), OutputError>;
    fn write_error(&mut self, error: &str) -> Result<(), OutputError>;
    /// Plain text, independent of the output mode
    fn write_text(&mut self, text: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::HavocError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
pub struct ConsoleWriter<O = Stdout, E = Stderr> {
    mode: OutputMode,
    out: O,
    err: E,
}

impl ConsoleWriter {
    pub fn new(mode: OutputMode) -> Self {
        Self::with_writers(mode, io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleWriter<O, E> {
    pub fn with_writers(mode: OutputMode, out: O, err: E) -> Self {
        Self { mode, out, err }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> OutputWriter for ConsoleWriter<O, E> {
    fn write_response(&mut self, command: &str, response: &RemoteResponse) -> Result<(), OutputError> {
        match self.mode {
            OutputMode::Json => {
                let mut wrapped = Map::new();
                wrapped.insert(command.to_string(), Value::Object(response.fields().clone()));
                writeln!(self.out, "{}", serde_json::to_string(&wrapped)?)?;
            }
            OutputMode::Table => {
                for table in render_tables(response.fields()) {
                    writeln!(self.out, "{}:", command)?;
                    writeln!(self.out, "{}\n", table)?;
                }
            }
        }
        Ok(())
    }

    fn write_message(&mut self, message: &str) -> Result<(), OutputError> {
        match self.mode {
            OutputMode::Json => {
                let output = serde_json::json!({ "message": message });
                writeln!(self.out, "{}", serde_json::to_string(&output)?)?;
            }
            OutputMode::Table => writeln!(self.out, "{}", message)?,
        }
        Ok(())
    }

    fn write_error(&mut self, error: &str) -> Result<(), OutputError> {
        match self.mode {
            OutputMode::Json => {
                let output = serde_json::json!({ "error": error });
                writeln!(self.err, "{}", serde_json::to_string(&output)?)?;
            }
            OutputMode::Table => writeln!(self.err, "Error: {}", error)?,
        }
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), OutputError> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }
}

/// Tables for a response, in field order.
///
/// Scalar fields share one summary table, placed where the first scalar
/// appears. Each object becomes a one-row table and each non-empty array
/// of objects a table with one row per element.
pub fn render_tables(fields: &Map<String, Value>) -> Vec<String> {
    let mut tables = Vec::new();
    let mut summary = Map::new();
    let mut summary_slot = None;

    for (name, value) in fields {
        match value {
            Value::Object(object) => tables.push(rows_table(&[object])),
            Value::Array(items) if is_object_list(items) => {
                let rows: Vec<&Map<String, Value>> = items.iter().filter_map(Value::as_object).collect();
                tables.push(rows_table(&rows));
            }
            _ => {
                summary_slot.get_or_insert(tables.len());
                summary.insert(name.clone(), value.clone());
            }
        }
    }

    if let Some(slot) = summary_slot {
        tables.insert(slot, rows_table(&[&summary]));
    }
    tables
}

fn is_object_list(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_object)
}

fn rows_table(rows: &[&Map<String, Value>]) -> String {
    let mut headers: Vec<&String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.contains(&key) {
                headers.push(key);
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|header| header.to_string()));
    for row in rows {
        builder.push_record(
            headers
                .iter()
                .map(|header| row.get(header.as_str()).map(cell).unwrap_or_default()),
        );
    }

    let mut table = builder.build();
    table.with(Style::ascii());
    table.to_string()
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> RemoteResponse {
        RemoteResponse::from_value(value).unwrap()
    }

    fn render(mode: OutputMode, command: &str, value: Value) -> (String, String) {
        let mut writer = ConsoleWriter::with_writers(mode, Vec::new(), Vec::new());
        writer.write_response(command, &response(value)).unwrap();
        let (out, err) = writer.into_writers();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_json_mode_wraps_in_command() {
        let (out, _) = render(OutputMode::Json, "get_task", json!({"task_name": "t1", "task_status": "idle"}));
        assert_eq!(out, "{\"get_task\":{\"task_name\":\"t1\",\"task_status\":\"idle\"}}\n");
    }

    #[test]
    fn test_table_mode_renders_objects_and_lists() {
        let (out, _) = render(
            OutputMode::Table,
            "get_task_results",
            json!({
                "task_name": "t1",
                "queue": [
                    {"instruct_command": "ls", "instruct_instance": "a"},
                    {"instruct_command": "pwd", "instruct_instance": "b", "extra": 1},
                ],
                "task": {"status": "running"},
            }),
        );

        assert_eq!(out.matches("get_task_results:").count(), 3);
        assert!(out.contains("task_name"));
        assert!(out.contains("instruct_command"));
        assert!(out.contains("pwd"));
        assert!(out.contains("extra"));
        assert!(out.contains("running"));
        assert!(out.find("t1").unwrap() < out.find("pwd").unwrap());
    }

    #[test]
    fn test_render_tables_groups_scalars() {
        let fields = response(json!({
            "outcome": "success",
            "tasks": [],
            "count": 0,
        }))
        .into_fields();

        let tables = render_tables(&fields);
        assert_eq!(tables.len(), 1);
        assert!(tables[0].contains("outcome"));
        assert!(tables[0].contains("[]"));
        assert!(tables[0].contains("count"));
    }

    #[test]
    fn test_errors_go_to_error_stream() {
        let mut writer = ConsoleWriter::with_writers(OutputMode::Table, Vec::new(), Vec::new());
        writer.write_error("connection refused").unwrap();
        let (out, err) = writer.into_writers();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "Error: connection refused\n");

        let mut writer = ConsoleWriter::with_writers(OutputMode::Json, Vec::new(), Vec::new());
        writer.write_error("connection refused").unwrap();
        let (_, err) = writer.into_writers();
        assert_eq!(String::from_utf8(err).unwrap(), "{\"error\":\"connection refused\"}\n");
    }
}
