use crate::{FIELD_REMOTEIP, FIELD_RESPONSE, FIELD_SECRET};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use validation::props::check_props;
use validation::{default_value_obscurator, PropType, TypeError};


/// The value checked against siteverify.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReCaptchaTestValue {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub remoteip: Option<String>,
}

impl ReCaptchaTestValue {
    pub fn new<S: Into<String>, R: Into<String>>(secret: S, response: R) -> Self {
        Self {
            secret: Some(secret.into()),
            response: Some(response.into()),
            remoteip: None,
        }
    }

    pub fn with_remoteip<S: Into<String>>(mut self, remoteip: S) -> Self {
        self.remoteip = Some(remoteip.into());
        self
    }

    pub(crate) fn secret(&self) -> &str {
        self.secret.as_deref().unwrap_or_default()
    }

    pub(crate) fn response(&self) -> &str {
        self.response.as_deref().unwrap_or_default()
    }

    pub(crate) fn remoteip(&self) -> &str {
        self.remoteip.as_deref().unwrap_or_default()
    }

    /// The value as shown to message templates. The secret is always masked.
    pub(crate) fn template_value(&self) -> Value {
        let mut fields = Map::new();
        fields.insert(
            FIELD_SECRET.to_string(),
            self.secret.as_deref().map(default_value_obscurator).into(),
        );
        fields.insert(FIELD_RESPONSE.to_string(), self.response.clone().into());
        fields.insert(FIELD_REMOTEIP.to_string(), self.remoteip.clone().into());
        Value::Object(fields)
    }
}

impl fmt::Debug for ReCaptchaTestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReCaptchaTestValue")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("response", &self.response)
            .field("remoteip", &self.remoteip)
            .finish()
    }
}

/// Builds a test value from untyped input. Present fields must be strings.
pub fn to_recaptcha_test_value(input: &Value) -> Result<ReCaptchaTestValue, TypeError> {
    check_props(
        input,
        &[
            (PropType::String, FIELD_SECRET),
            (PropType::String, FIELD_REMOTEIP),
            (PropType::String, FIELD_RESPONSE),
        ],
    )?;

    let field = |name: &str| input.get(name).and_then(Value::as_str).map(str::to_string);

    Ok(ReCaptchaTestValue {
        secret: field(FIELD_SECRET),
        response: field(FIELD_RESPONSE),
        remoteip: field(FIELD_REMOTEIP),
    })
}
