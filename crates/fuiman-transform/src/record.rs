//! Nested user records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A nested user record as sent to `/user-import`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Map<String, Value>);

impl UserRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks up a nested value by path, e.g. `["personal", "lastName"]`.
    pub fn pointer(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(*first)?, |value, key| value.get(key))
    }

    pub fn username(&self) -> Option<&str> {
        self.get("username").and_then(Value::as_str)
    }

    pub fn external_system_id(&self) -> Option<&str> {
        self.get("externalSystemId").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Removes nulls, empty objects and empty lists, bottom-up.
///
/// Returns `None` when the value itself is empty after pruning.
pub fn prune(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let pruned: Map<String, Value> = map
                .into_iter()
                .filter_map(|(key, child)| prune(child).map(|child| (key, child)))
                .collect();
            (!pruned.is_empty()).then_some(Value::Object(pruned))
        }
        Value::Array(items) => {
            let pruned: Vec<Value> = items.into_iter().filter_map(prune).collect();
            (!pruned.is_empty()).then_some(Value::Array(pruned))
        }
        scalar => Some(scalar),
    }
}
