use anyhow::{Context, Result};
use azmon_errors::ConfigError;
use azmon_options::ApplicationInsightsOptions;
use serde::Serialize;
use serde_json::{Map, Value};

/// Raw options from a single source, before being converted to the
/// strongly-typed [`ApplicationInsightsOptions`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsBuilder {
    data: Map<String, Value>,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from any serializable options value.
    pub fn from_serializable<T: Serialize>(config: &T) -> Result<Self> {
        let value = serde_json::to_value(config).context("Failed to serialize options")?;
        Ok(Self::from_value(value, "options")?)
    }

    /// Create a builder from a raw JSON value, which must be an object.
    pub fn from_value(value: Value, source_name: &str) -> Result<Self, ConfigError> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(ConfigError::ParsingError {
                source_name: source_name.to_string(),
                message: format!("expected an object, found {}", type_name(&other)),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Merge another builder into this one, with the other taking precedence.
    ///
    /// Nested objects are merged key by key. `null` is dropped at every depth
    /// and never replaces a value.
    pub fn merge(&mut self, other: OptionsBuilder) {
        merge_objects(&mut self.data, other.data);
    }

    /// Convert the merged raw data into [`ApplicationInsightsOptions`].
    pub fn build(&self) -> Result<ApplicationInsightsOptions> {
        serde_json::from_value(Value::Object(self.data.clone()))
            .context("Failed to deserialize options from merged sources")
    }
}

fn merge_objects(target: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match value {
            Value::Null => {}
            Value::Object(nested) => match target.get_mut(&key) {
                Some(Value::Object(existing)) => merge_objects(existing, nested),
                _ => {
                    // Merge into an empty object so nested nulls are dropped too
                    let mut fresh = Map::new();
                    merge_objects(&mut fresh, nested);
                    target.insert(key, Value::Object(fresh));
                }
            },
            value => {
                target.insert(key, value);
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
