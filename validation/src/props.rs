//! Declared-type checks for properties of untyped (JSON-like) input.
//!
//! A missing or `null` property always passes: defaults fill it in later.
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_and_null_properties_pass() {
        let target = json!({ "secret": null });
        check_props(&target, &[(PropType::String, "secret"), (PropType::String, "response")])
            .expect("absent and null properties should pass");
    }

    #[test]
    fn wrong_type_is_reported_with_property_name() {
        let target = json!({ "secret": false });
        let err = check_props(&target, &[(PropType::String, "secret")])
            .expect_err("a boolean secret should fail");

        assert_eq!(err.property, "secret");
        assert_eq!(err.expected, PropType::String);
        assert_eq!(err.found, "boolean");
    }

    #[test]
    fn string_array_rejects_mixed_entries() {
        assert!(PropType::StringArray.matches(&json!(["a", "b"])));
        assert!(!PropType::StringArray.matches(&json!(["a", 1])));
        assert!(PropType::Array.matches(&json!(["a", 1])));
    }

    #[test]
    fn non_object_target_fails() {
        let err = check_props(&json!("nope"), &[(PropType::String, "secret")])
            .expect_err("a string target should fail");
        assert_eq!(err.expected, PropType::Object);
    }

    #[test]
    fn map_entries_are_checked_by_name() {
        let target = json!({ "headers": { "Accept": "text/plain", "X-Retries": 3 } });
        let err = check_entries(&target, "headers", PropType::String)
            .expect_err("a numeric header should fail");

        assert_eq!(err.property, "headers.X-Retries");
        assert_eq!(err.found, "number");

        check_entries(&json!({ "headers": null }), "headers", PropType::String)
            .expect("null maps pass");
        check_entries(&json!({ "headers": "nope" }), "headers", PropType::String)
            .expect("non-object maps are left to check_prop");
    }

    #[test]
    fn nested_error_prefixes_parent() {
        let err = check_prop(&json!({ "host": 1 }), "host", PropType::String)
            .expect_err("numeric host should fail")
            .nested("requestOptions");
        assert_eq!(err.property, "requestOptions.host");
        assert_eq!(err.to_string(), "property `requestOptions.host` expected string, found number");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropType {
    Bool,
    Number,
    String,
    Object,
    Array,
    /// An array whose entries are all strings.
    StringArray,
}

impl PropType {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Bool => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::String => value.is_string(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::StringArray => value
                .as_array()
                .map_or(false, |entries| entries.iter().all(Value::is_string)),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Object => "object",
            Self::Array => "array",
            Self::StringArray => "array of strings",
        }
    }
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A property held a value of a different type than the one declared for it.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeError {
    pub property: String,
    pub expected: PropType,
    pub found: &'static str,
}

impl TypeError {
    /// Qualifies the property name with the name of the object containing it.
    pub fn nested(mut self, parent: &str) -> Self {
        self.property = if self.property.is_empty() {
            parent.to_string()
        } else {
            format!("{}.{}", parent, self.property)
        };
        self
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property.is_empty() {
            write!(f, "expected {}, found {}", self.expected, self.found)
        } else {
            write!(
                f,
                "property `{}` expected {}, found {}",
                self.property, self.expected, self.found
            )
        }
    }
}

impl Error for TypeError {}

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Checks a single property of `target`, which must itself be an object or `null`.
pub fn check_prop(target: &Value, property: &str, expected: PropType) -> Result<(), TypeError> {
    let object = match target {
        Value::Null => return Ok(()),
        Value::Object(object) => object,
        other => {
            return Err(TypeError {
                property: String::new(),
                expected: PropType::Object,
                found: type_name(other),
            })
        }
    };

    match object.get(property) {
        None | Some(Value::Null) => Ok(()),
        Some(value) if expected.matches(value) => Ok(()),
        Some(value) => Err(TypeError {
            property: property.to_string(),
            expected,
            found: type_name(value),
        }),
    }
}

pub fn check_props(target: &Value, declared: &[(PropType, &str)]) -> Result<(), TypeError> {
    declared
        .iter()
        .try_for_each(|(expected, property)| check_prop(target, property, *expected))
}

/// Checks that every entry of the object held in `property` has the
/// `expected` type. Errors name the entry as `property.key`. A property that
/// is missing or not an object passes; declare it with [`check_prop`].
pub fn check_entries(target: &Value, property: &str, expected: PropType) -> Result<(), TypeError> {
    let entries = match target.get(property) {
        Some(Value::Object(entries)) => entries,
        _ => return Ok(()),
    };

    match entries.iter().find(|(_, value)| !expected.matches(value)) {
        Some((key, value)) => Err(TypeError {
            property: format!("{}.{}", property, key),
            expected,
            found: type_name(value),
        }),
        None => Ok(()),
    }
}
