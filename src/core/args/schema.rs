use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Ordered declaration of the parameters a command recognizes, with their
/// defaults. An empty default means the parameter is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    params: IndexMap<String, String>,
}

impl ParameterSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter with an empty default
    pub fn param(self, name: &str) -> Self {
        self.param_with_default(name, "")
    }

    /// Declare a parameter with an explicit default
    pub fn param_with_default(mut self, name: &str, default: &str) -> Self {
        self.params.insert(name.to_string(), default.to_string());
        self
    }

    /// Check whether `name` is a declared parameter
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Default value of a parameter
    pub fn default_of(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Argument set holding every default
    pub fn defaults(&self) -> ArgumentSet {
        ArgumentSet {
            values: self
                .params
                .iter()
                .map(|(name, default)| (name.clone(), ArgValue::Default(default.clone())))
                .collect(),
        }
    }
}

/// A resolved parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Never mentioned in the input; holds the schema default
    Default(String),
    /// Given by the operator, possibly as an empty string
    Supplied(String),
}

impl ArgValue {
    pub fn as_str(&self) -> &str {
        match self {
            ArgValue::Default(value) | ArgValue::Supplied(value) => value,
        }
    }

    pub fn is_supplied(&self) -> bool {
        matches!(self, ArgValue::Supplied(_))
    }
}

/// Arguments for one command invocation. Always holds exactly the keys of
/// the schema it was built from, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSet {
    values: IndexMap<String, ArgValue>,
}

impl ArgumentSet {
    /// Value for a parameter, as sent to the remote service
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(ArgValue::as_str)
    }

    /// Value for a parameter, keeping the supplied/default distinction
    pub fn value(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Non-empty value for a parameter, if any
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    /// Record an operator-supplied value. Names outside the schema are ignored.
    pub(crate) fn supply(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = ArgValue::Supplied(value.to_string());
        }
    }

    /// Drop a parameter that is only meaningful locally, returning its value
    pub fn take(&mut self, name: &str) -> Option<ArgValue> {
        self.values.shift_remove(name)
    }

    /// Add a parameter that is produced locally rather than parsed
    pub fn insert(&mut self, name: &str, value: String) {
        self.values.insert(name.to_string(), ArgValue::Supplied(value));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Wire form: every key as a plain string
    pub fn to_params(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.as_str().to_string())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_preserves_declaration_order() {
        let schema = ParameterSchema::new()
            .param("task_name")
            .param("task_type")
            .param_with_default("instruct_instance", "havoc");

        let names: Vec<&str> = schema.names().collect();
        assert_eq!(names, vec!["task_name", "task_type", "instruct_instance"]);
        assert_eq!(schema.default_of("instruct_instance"), Some("havoc"));
        assert_eq!(schema.default_of("missing"), None);
    }

    #[test]
    fn test_defaults_cover_every_key() {
        let schema = ParameterSchema::new().param("a").param_with_default("b", "x");
        let args = schema.defaults();

        assert_eq!(args.len(), 2);
        assert_eq!(args.value("a"), Some(&ArgValue::Default(String::new())));
        assert_eq!(args.get("b"), Some("x"));
    }

    #[test]
    fn test_supply_ignores_unknown_names() {
        let schema = ParameterSchema::new().param("a");
        let mut args = schema.defaults();
        args.supply("b", "value");
        args.supply("a", "");

        assert_eq!(args.len(), 1);
        assert!(args.value("a").unwrap().is_supplied());
        assert_eq!(args.non_empty("a"), None);
    }

    #[test]
    fn test_to_params_sends_strings() {
        let schema = ParameterSchema::new().param("user_id").param("admin");
        let mut args = schema.defaults();
        args.supply("user_id", "alice");

        let params = args.to_params();
        assert_eq!(params.get("user_id"), Some(&Value::from("alice")));
        assert_eq!(params.get("admin"), Some(&Value::from("")));
    }
}
