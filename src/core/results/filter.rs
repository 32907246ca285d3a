use crate::core::args::ArgumentSet;
use crate::core::results::response::{RemoteResponse, ResultEntry, QUEUE_FIELD};
use serde_json::Value;
use tracing::debug;

pub const INSTRUCT_COMMAND: &str = "instruct_command";
pub const INSTRUCT_INSTANCE: &str = "instruct_instance";

/// Optional predicates narrowing a queued result set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub instruct_command: Option<String>,
    pub instruct_instance: Option<String>,
}

impl FilterCriteria {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by instruction command
    pub fn with_command(mut self, command: &str) -> Self {
        self.instruct_command = Some(command.to_string());
        self
    }

    /// Filter by instruction instance
    pub fn with_instance(mut self, instance: &str) -> Self {
        self.instruct_instance = Some(instance.to_string());
        self
    }

    /// Criteria taken from a command's arguments. Empty values do not
    /// constrain the result.
    pub fn from_args(args: &ArgumentSet) -> Self {
        Self {
            instruct_command: args.non_empty(INSTRUCT_COMMAND).map(str::to_string),
            instruct_instance: args.non_empty(INSTRUCT_INSTANCE).map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.instruct_command.is_none() && self.instruct_instance.is_none()
    }

    /// Whether an entry satisfies every present criterion
    pub fn matches(&self, entry: &ResultEntry) -> bool {
        field_matches(entry, INSTRUCT_COMMAND, self.instruct_command.as_deref())
            && field_matches(entry, INSTRUCT_INSTANCE, self.instruct_instance.as_deref())
    }
}

fn field_matches(entry: &ResultEntry, field: &str, expected: Option<&str>) -> bool {
    match expected {
        None => true,
        Some(expected) => entry.get(field).and_then(Value::as_str) == Some(expected),
    }
}

/// Narrow the response's queue to entries matching `criteria`.
///
/// Responses without a queue, and empty criteria, pass through unchanged.
/// Surviving entries keep their relative order and are never modified.
pub fn filter(mut response: RemoteResponse, criteria: &FilterCriteria) -> RemoteResponse {
    if criteria.is_empty() {
        return response;
    }

    if let Some(Value::Array(queue)) = response.get_mut(QUEUE_FIELD) {
        let before = queue.len();
        queue.retain(|entry| entry.as_object().is_some_and(|entry| criteria.matches(entry)));
        debug!("Filtered queue from {} to {} entries", before, queue.len());
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::args::{parse, ParameterSchema};
    use serde_json::json;

    fn queued(entries: Value) -> RemoteResponse {
        RemoteResponse::from_value(json!({
            "task_name": "nmap01",
            "queue": entries,
        }))
        .unwrap()
    }

    fn sample() -> RemoteResponse {
        queued(json!([
            {"instruct_command": "ls", "instruct_instance": "a", "seq": 1},
            {"instruct_command": "pwd", "instruct_instance": "a", "seq": 2},
            {"instruct_command": "ls", "instruct_instance": "b", "seq": 3},
        ]))
    }

    fn seqs(response: &RemoteResponse) -> Vec<i64> {
        response
            .queue()
            .unwrap()
            .iter()
            .map(|entry| entry["seq"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_no_criteria_is_identity() {
        let response = sample();
        assert_eq!(filter(response.clone(), &FilterCriteria::new()), response);
    }

    #[test]
    fn test_command_only() {
        let result = filter(sample(), &FilterCriteria::new().with_command("ls"));
        assert_eq!(seqs(&result), vec![1, 3]);
        assert_eq!(result.get("task_name"), Some(&json!("nmap01")));
    }

    #[test]
    fn test_instance_only() {
        let result = filter(sample(), &FilterCriteria::new().with_instance("a"));
        assert_eq!(seqs(&result), vec![1, 2]);
    }

    #[test]
    fn test_both_use_and_semantics() {
        let criteria = FilterCriteria::new().with_command("ls").with_instance("b");
        assert_eq!(seqs(&filter(sample(), &criteria)), vec![3]);

        let criteria = FilterCriteria::new().with_command("pwd").with_instance("b");
        assert!(filter(sample(), &criteria).queue().unwrap().is_empty());
    }

    #[test]
    fn test_response_without_queue_passes_through() {
        let response = RemoteResponse::from_value(json!({"outcome": "failed", "message": "no such task"})).unwrap();
        let criteria = FilterCriteria::new().with_command("ls");
        assert_eq!(filter(response.clone(), &criteria), response);
    }

    #[test]
    fn test_non_array_queue_passes_through() {
        let response = RemoteResponse::from_value(json!({"queue": "pending"})).unwrap();
        let criteria = FilterCriteria::new().with_instance("a");
        assert_eq!(filter(response.clone(), &criteria), response);
    }

    #[test]
    fn test_entries_missing_fields_do_not_match() {
        let response = queued(json!([
            {"instruct_instance": "a", "seq": 1},
            {"instruct_command": 7, "instruct_instance": "a", "seq": 2},
            "not an object",
            {"instruct_command": "ls", "instruct_instance": "a", "seq": 4},
        ]));
        let result = filter(response, &FilterCriteria::new().with_command("ls"));
        assert_eq!(seqs(&result), vec![4]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let criteria = FilterCriteria::new().with_command("ls");
        let once = filter(sample(), &criteria);
        assert_eq!(filter(once.clone(), &criteria), once);
    }

    #[test]
    fn test_criteria_from_args_ignores_empty_values() {
        let schema = ParameterSchema::new()
            .param("task_name")
            .param(INSTRUCT_COMMAND)
            .param(INSTRUCT_INSTANCE);

        let args = parse(&schema, "--task_name=t --instruct_command=ls --instruct_instance=");
        let criteria = FilterCriteria::from_args(&args);
        assert_eq!(criteria, FilterCriteria::new().with_command("ls"));

        assert!(FilterCriteria::from_args(&schema.defaults()).is_empty());
    }
}
