use crate::error::Error;
use crate::options::{
    to_recaptcha_validator_options, PartialReCaptchaValidatorOptions, ReCaptchaValidatorOptions,
    HEADER_CONTENT_LENGTH, HEADER_CONTENT_TYPE,
};
use crate::response::SiteVerifyResponse;
use crate::transport::Transport;
use crate::value::ReCaptchaTestValue;
use crate::{
    FIELD_REMOTEIP, FIELD_RESPONSE, FIELD_SECRET, MISSING_INPUT_RESPONSE, MISSING_INPUT_SECRET,
    UNKNOWN_ERROR,
};
use log::{debug, warn};
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;
use validation::{get_error_message_by_key, ValidationResult};


/// Why a verification did not succeed.
#[derive(Debug)]
pub enum Cause {
    /// `secret` and/or `response` were empty; nothing was sent.
    MissingInput,
    /// siteverify answered with `success: false`. Holds the lower-cased error
    /// codes that have a message template.
    Service(Vec<String>),
    Transport(Error),
}

/// A failed verification: the validation result handed to callers together
/// with what caused it.
#[derive(Debug)]
pub struct Rejection {
    pub result: ValidationResult,
    pub cause: Cause,
}

impl Rejection {
    fn missing_input(messages: Vec<String>) -> Self {
        Self {
            result: ValidationResult::failure(messages),
            cause: Cause::MissingInput,
        }
    }

    fn service(messages: Vec<String>, codes: Vec<String>) -> Self {
        Self {
            result: ValidationResult::failure(messages),
            cause: Cause::Service(codes),
        }
    }

    fn transport(err: Error) -> Self {
        warn!("reCAPTCHA verification failed: {}", err);
        Self {
            result: ValidationResult::failure(vec![err.to_string()]),
            cause: Cause::Transport(err),
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.result.messages
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reCAPTCHA verification failed: {}", self.result.messages.join(" "))
    }
}

impl StdError for Rejection {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.cause {
            Cause::Transport(err) => Some(err),
            _ => None,
        }
    }
}

fn message(options: &ReCaptchaValidatorOptions, code: &str, shown: &Value) -> String {
    get_error_message_by_key(&options.validation, code, shown).unwrap_or_else(|| code.to_string())
}

/// URL-encodes `secret`, `remoteip` and `response`, in that order. An absent
/// `remoteip` is sent empty.
pub(crate) fn serialize_form(value: &ReCaptchaTestValue) -> String {
    [
        (FIELD_SECRET, value.secret()),
        (FIELD_REMOTEIP, value.remoteip()),
        (FIELD_RESPONSE, value.response()),
    ]
    .iter()
    .map(|(name, field)| format!("{}={}", name, urlencoding::encode(field)))
    .collect::<Vec<_>>()
    .join("&")
}

/// Verifies `value` against siteverify using already normalized `options`.
///
/// Resolves only when siteverify reports success. Missing fields reject
/// without sending anything; service failures and transport errors reject
/// with the messages describing them.
pub async fn make_recaptcha_request<T>(
    transport: &T,
    mut options: ReCaptchaValidatorOptions,
    value: &ReCaptchaTestValue,
) -> Result<ValidationResult, Rejection>
where
    T: Transport + ?Sized,
{
    let shown = value.template_value();
    let mut messages = Vec::new();
    if value.secret().is_empty() {
        messages.push(message(&options, MISSING_INPUT_SECRET, &shown));
    }
    if value.response().is_empty() {
        messages.push(message(&options, MISSING_INPUT_RESPONSE, &shown));
    }
    if !messages.is_empty() {
        debug!("not contacting siteverify: {} required field(s) missing", messages.len());
        return Err(Rejection::missing_input(messages));
    }

    let body = serialize_form(value);
    let request = &mut options.request_options;
    request.headers.retain(|name, _| {
        !name.eq_ignore_ascii_case(HEADER_CONTENT_TYPE)
            && !name.eq_ignore_ascii_case(HEADER_CONTENT_LENGTH)
    });
    request.headers.insert(
        HEADER_CONTENT_TYPE.to_string(),
        mime::APPLICATION_WWW_FORM_URLENCODED.to_string(),
    );
    request
        .headers
        .insert(HEADER_CONTENT_LENGTH.to_string(), body.len().to_string());
    request.body = Some(body);

    debug!("sending verification request to {}{}", request.host, request.path);
    let raw = match tokio::time::timeout(request.timeout, transport.send(request)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(err)) => return Err(Rejection::transport(err)),
        Err(_) => return Err(Rejection::transport(Error::Timeout(request.timeout))),
    };

    let response: SiteVerifyResponse =
        serde_json::from_str(&raw).map_err(|err| Rejection::transport(err.into()))?;

    if response.success {
        debug!("siteverify accepted the response token");
        return Ok(ValidationResult::success());
    }

    let templates = &options.validation.message_templates;
    let codes: Vec<String> = response
        .error_codes
        .iter()
        .map(|code| code.to_lowercase())
        .filter(|code| templates.contains_key(code))
        .collect();

    let messages = if codes.is_empty() {
        vec![message(&options, UNKNOWN_ERROR, &shown)]
    } else {
        codes.iter().map(|code| message(&options, code, &shown)).collect()
    };

    debug!("siteverify rejected the response token: {:?}", response.error_codes);
    Err(Rejection::service(messages, codes))
}

/// Normalizes `options` over the defaults and verifies `value`.
pub async fn recaptcha_validator<T, P>(
    transport: &T,
    options: P,
    value: ReCaptchaTestValue,
) -> Result<ValidationResult, Rejection>
where
    T: Transport + ?Sized,
    P: Into<PartialReCaptchaValidatorOptions>,
{
    make_recaptcha_request(transport, to_recaptcha_validator_options(options), &value).await
}

/// [`recaptcha_validator`] taking the value before the options.
pub async fn recaptcha_validator_v2<T, P>(
    transport: &T,
    value: ReCaptchaTestValue,
    options: P,
) -> Result<ValidationResult, Rejection>
where
    T: Transport + ?Sized,
    P: Into<PartialReCaptchaValidatorOptions>,
{
    recaptcha_validator(transport, options, value).await
}
