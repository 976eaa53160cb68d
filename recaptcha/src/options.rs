use crate::error::{ConfigError, Error};
use crate::{
    BAD_REQUEST, INVALID_INPUT_RESPONSE, INVALID_INPUT_SECRET, MISSING_INPUT_RESPONSE,
    MISSING_INPUT_SECRET, UNKNOWN_ERROR,
};
use log::warn;
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use validation::props::{check_entries, check_props, type_name};
use validation::{
    to_validation_options, MessageTemplate, MessageTemplates, Merge, PartialValidationOptions,
    PropType, TypeError, ValidationOptions,
};


pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_HOST: &str = "www.google.com";
pub const DEFAULT_PATH: &str = "/recaptcha/api/siteverify";
pub const DEFAULT_METHOD: &str = "POST";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_CONTENT_LENGTH: &str = "Content-Length";

/// Where and how the verification request is sent.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestOptions {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    /// Serialized form body; set by the request handler just before sending.
    pub body: Option<String>,
    pub timeout: Duration,
}

impl RequestOptions {
    pub fn url(&self) -> Result<Url, Error> {
        let authority = match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        };
        format!("{}://{}{}", self.scheme, authority, self.path)
            .parse::<Url>()
            .map_err(|err| Error::InvalidRequest(err.to_string()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PartialRequestOptions {
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    /// Milliseconds in configuration files.
    #[serde(default, deserialize_with = "deserialize_millis")]
    pub timeout: Option<Duration>,
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
}

impl Merge for PartialRequestOptions {
    fn merge(&mut self, other: Self) {
        self.scheme.merge(other.scheme);
        self.host.merge(other.host);
        self.port.merge(other.port);
        self.path.merge(other.path);
        self.method.merge(other.method);
        self.headers.merge(other.headers);
        self.body.merge(other.body);
        self.timeout.merge(other.timeout);
    }
}

impl From<RequestOptions> for PartialRequestOptions {
    fn from(options: RequestOptions) -> Self {
        Self {
            scheme: Some(options.scheme),
            host: Some(options.host),
            port: options.port,
            path: Some(options.path),
            method: Some(options.method),
            headers: Some(options.headers),
            body: options.body,
            timeout: Some(options.timeout),
        }
    }
}

/// Fully populated options for the reCAPTCHA validator.
#[derive(Clone, Debug, PartialEq)]
pub struct ReCaptchaValidatorOptions {
    pub request_options: RequestOptions,
    pub validation: ValidationOptions,
}

/// Caller overrides for [`ReCaptchaValidatorOptions`], as read from
/// configuration (`requestOptions`, `messageTemplates`, `valueObscured`).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialReCaptchaValidatorOptions {
    #[serde(default)]
    pub request_options: Option<PartialRequestOptions>,
    #[serde(flatten)]
    pub validation: PartialValidationOptions,
}

impl Merge for PartialReCaptchaValidatorOptions {
    fn merge(&mut self, other: Self) {
        self.request_options.merge(other.request_options);
        self.validation.merge(other.validation);
    }
}

impl From<ReCaptchaValidatorOptions> for PartialReCaptchaValidatorOptions {
    fn from(options: ReCaptchaValidatorOptions) -> Self {
        Self {
            request_options: Some(options.request_options.into()),
            validation: options.validation.into(),
        }
    }
}

fn default_message_templates() -> MessageTemplates {
    [
        (MISSING_INPUT_SECRET, "The secret parameter is missing."),
        (INVALID_INPUT_SECRET, "The secret parameter is invalid or malformed."),
        (MISSING_INPUT_RESPONSE, "The response parameter is missing."),
        (INVALID_INPUT_RESPONSE, "The response parameter is invalid or malformed."),
        (BAD_REQUEST, "Bad request"),
        (UNKNOWN_ERROR, "Unknown error."),
    ]
    .iter()
    .map(|(code, text)| (code.to_string(), MessageTemplate::from(*text)))
    .collect()
}

fn default_request_options() -> PartialRequestOptions {
    let mut headers = BTreeMap::new();
    headers.insert(
        HEADER_CONTENT_TYPE.to_string(),
        mime::APPLICATION_WWW_FORM_URLENCODED.to_string(),
    );

    PartialRequestOptions {
        scheme: Some(DEFAULT_SCHEME.to_string()),
        host: Some(DEFAULT_HOST.to_string()),
        port: None,
        path: Some(DEFAULT_PATH.to_string()),
        method: Some(DEFAULT_METHOD.to_string()),
        headers: Some(headers),
        body: None,
        timeout: Some(DEFAULT_TIMEOUT),
    }
}

/// Merges `options` over the siteverify defaults.
///
/// Message templates and headers merge key by key, so overriding one template
/// keeps the defaults for every other error code.
pub fn to_recaptcha_validator_options<P>(options: P) -> ReCaptchaValidatorOptions
where
    P: Into<PartialReCaptchaValidatorOptions>,
{
    let mut request = default_request_options();
    let overrides = options.into();
    request.merge(overrides.request_options.unwrap_or_default());

    let validation = to_validation_options(vec![
        PartialValidationOptions {
            message_templates: Some(default_message_templates()),
            ..PartialValidationOptions::default()
        },
        overrides.validation,
    ]);

    ReCaptchaValidatorOptions {
        request_options: RequestOptions {
            scheme: request.scheme.unwrap_or_else(|| DEFAULT_SCHEME.to_string()),
            host: request.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: request.port,
            path: request.path.unwrap_or_else(|| DEFAULT_PATH.to_string()),
            method: request.method.unwrap_or_else(|| DEFAULT_METHOD.to_string()),
            headers: request.headers.unwrap_or_default(),
            body: request.body,
            timeout: request.timeout.unwrap_or(DEFAULT_TIMEOUT),
        },
        validation,
    }
}

const OPTION_KEYS: &[&str] = &["requestOptions", "messageTemplates", "valueObscured"];
const REQUEST_OPTION_KEYS: &[&str] = &[
    "scheme", "host", "port", "path", "method", "headers", "body", "timeout",
];

fn unknown_keys<'a>(input: &'a Value, known: &[&str]) -> Vec<&'a str> {
    input.as_object().map_or_else(Vec::new, |fields| {
        fields
            .keys()
            .map(String::as_str)
            .filter(|key| !known.contains(key))
            .collect()
    })
}

/// Option names in `input` that nothing reads, such as misspelled keys.
fn ignored_options(input: &Value) -> Vec<String> {
    let mut ignored: Vec<String> = unknown_keys(input, OPTION_KEYS)
        .into_iter()
        .map(str::to_string)
        .collect();
    if let Some(request) = input.get("requestOptions") {
        ignored.extend(
            unknown_keys(request, REQUEST_OPTION_KEYS)
                .into_iter()
                .map(|key| format!("requestOptions.{}", key)),
        );
    }
    ignored
}

/// Each template is a string or a `{ render = "..." }` table.
fn check_message_templates(input: &Value) -> Result<(), TypeError> {
    let templates = match input.get("messageTemplates") {
        Some(Value::Object(templates)) => templates,
        _ => return Ok(()),
    };

    for (code, template) in templates {
        let err = match template {
            Value::String(_) => continue,
            Value::Object(table) => match table.get("render") {
                Some(Value::String(_)) => continue,
                Some(render) => TypeError {
                    property: format!("{}.render", code),
                    expected: PropType::String,
                    found: type_name(render),
                },
                None => TypeError {
                    property: code.clone(),
                    expected: PropType::String,
                    found: type_name(template),
                },
            },
            other => TypeError {
                property: code.clone(),
                expected: PropType::String,
                found: type_name(other),
            },
        };
        return Err(err.nested("messageTemplates"));
    }
    Ok(())
}

/// Type-checks untyped options, then normalizes them. Unknown keys are
/// logged and otherwise ignored.
pub fn options_from_json(input: &Value) -> Result<ReCaptchaValidatorOptions, ConfigError> {
    for key in ignored_options(input) {
        warn!("ignoring unknown reCAPTCHA option `{}`", key);
    }

    check_props(
        input,
        &[
            (PropType::Object, "requestOptions"),
            (PropType::Object, "messageTemplates"),
            (PropType::Bool, "valueObscured"),
        ],
    )?;

    if let Some(request) = input.get("requestOptions") {
        check_props(
            request,
            &[
                (PropType::String, "scheme"),
                (PropType::String, "host"),
                (PropType::Number, "port"),
                (PropType::String, "path"),
                (PropType::String, "method"),
                (PropType::Object, "headers"),
                (PropType::String, "body"),
                (PropType::Number, "timeout"),
            ],
        )
        .and_then(|_| check_entries(request, "headers", PropType::String))
        .map_err(|err| err.nested("requestOptions"))?;
    }
    check_message_templates(input)?;

    let partial = match input {
        Value::Null => PartialReCaptchaValidatorOptions::default(),
        input => PartialReCaptchaValidatorOptions::deserialize(input)?,
    };

    Ok(to_recaptcha_validator_options(partial))
}

pub fn options_from_toml(input: &str) -> Result<ReCaptchaValidatorOptions, ConfigError> {
    let value: Value = toml::from_str(input)?;
    options_from_json(&value)
}
