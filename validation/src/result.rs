use crate::props::{check_props, PropType, TypeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;


/// Outcome of a single validation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(default)]
    pub result: bool,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            result: true,
            ..Self::default()
        }
    }

    pub fn failure(messages: Vec<String>) -> Self {
        Self {
            result: false,
            messages,
            value: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

/// Builds a [`ValidationResult`] from untyped overrides, enforcing that
/// `result` is a boolean and `messages` an array of strings.
pub fn to_validation_result(overrides: &Value) -> Result<ValidationResult, TypeError> {
    check_props(
        overrides,
        &[(PropType::Bool, "result"), (PropType::StringArray, "messages")],
    )?;

    let mut result = ValidationResult::default();
    if let Some(flag) = overrides.get("result").and_then(Value::as_bool) {
        result.result = flag;
    }
    if let Some(messages) = overrides.get("messages").and_then(Value::as_array) {
        result.messages = messages
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }
    result.value = overrides.get("value").filter(|v| !v.is_null()).cloned();

    Ok(result)
}
