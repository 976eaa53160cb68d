use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;


/// Body returned by the siteverify endpoint.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteVerifyResponse {
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub success: bool,
    #[serde(default)]
    pub challenge_ts: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "error-codes", deserialize_with = "deserialize_error_codes")]
    pub error_codes: Vec<String>,
}

fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(entries) => !entries.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorCodes {
    One(String),
    Many(Vec<String>),
}

fn deserialize_error_codes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<ErrorCodes>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(ErrorCodes::One(code)) => vec![code],
        Some(ErrorCodes::Many(codes)) => codes,
    })
}
