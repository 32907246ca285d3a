use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding queued instruction results
pub const QUEUE_FIELD: &str = "queue";

/// One queued item: an object tagged with `instruct_command` and
/// `instruct_instance`, plus arbitrary other fields
pub type ResultEntry = Map<String, Value>;

/// Response returned by the remote service: a JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteResponse {
    fields: Map<String, Value>,
}

impl RemoteResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret a JSON value as a response; only objects qualify
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub(crate) fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    pub fn insert(&mut self, field: &str, value: Value) -> Option<Value> {
        self.fields.insert(field.to_string(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Queued entries, when the response carries a queue
    pub fn queue(&self) -> Option<&Vec<Value>> {
        self.fields.get(QUEUE_FIELD).and_then(Value::as_array)
    }

    pub fn has_queue(&self) -> bool {
        self.fields.contains_key(QUEUE_FIELD)
    }
}

impl From<Map<String, Value>> for RemoteResponse {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
