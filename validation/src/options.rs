use crate::merge::Merge;
use crate::message::MessageTemplate;
use lazy_static::lazy_static;
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;


pub type Obscurator = Arc<dyn Fn(&str) -> String + Send + Sync>;

pub type MessageTemplates = BTreeMap<String, MessageTemplate>;

lazy_static! {
    static ref DEFAULT_OBSCURATOR: Obscurator = Arc::new(default_value_obscurator);
}

/// Replaces every character of `value` with `*`.
pub fn default_value_obscurator(value: &str) -> String {
    "*".repeat(value.chars().count())
}

/// Options shared by every validator: how to turn an error code into a
/// message, and whether the tested value may appear in that message as-is.
#[derive(Clone)]
pub struct ValidationOptions {
    pub message_templates: MessageTemplates,
    pub value_obscured: bool,
    pub value_obscurator: Obscurator,
}

impl ValidationOptions {
    /// Returns the value as it should be shown to message templates. When
    /// obscuring, every string inside `value` goes through the obscurator.
    pub fn obscure<'a>(&self, value: &'a Value) -> Cow<'a, Value> {
        if self.value_obscured {
            Cow::Owned(self.obscure_strings(value))
        } else {
            Cow::Borrowed(value)
        }
    }

    fn obscure_strings(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String((self.value_obscurator)(text)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.obscure_strings(item)).collect())
            }
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, field)| (name.clone(), self.obscure_strings(field)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    pub fn apply(&mut self, partial: PartialValidationOptions) {
        if let Some(templates) = partial.message_templates {
            self.message_templates.merge(templates);
        }
        if let Some(obscured) = partial.value_obscured {
            self.value_obscured = obscured;
        }
        if let Some(obscurator) = partial.value_obscurator {
            self.value_obscurator = obscurator;
        }
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            message_templates: MessageTemplates::new(),
            value_obscured: false,
            value_obscurator: DEFAULT_OBSCURATOR.clone(),
        }
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("message_templates", &self.message_templates)
            .field("value_obscured", &self.value_obscured)
            .finish()
    }
}

impl PartialEq for ValidationOptions {
    fn eq(&self, other: &Self) -> bool {
        self.message_templates == other.message_templates
            && self.value_obscured == other.value_obscured
            && Arc::ptr_eq(&self.value_obscurator, &other.value_obscurator)
    }
}

/// Caller-supplied overrides for [`ValidationOptions`]. Every field is
/// optional; absent fields keep whatever they are merged over.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialValidationOptions {
    #[serde(default)]
    pub message_templates: Option<MessageTemplates>,
    #[serde(default)]
    pub value_obscured: Option<bool>,
    #[serde(skip)]
    pub value_obscurator: Option<Obscurator>,
}

impl Merge for PartialValidationOptions {
    fn merge(&mut self, other: Self) {
        self.message_templates.merge(other.message_templates);
        self.value_obscured.merge(other.value_obscured);
        self.value_obscurator.merge(other.value_obscurator);
    }
}

impl fmt::Debug for PartialValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialValidationOptions")
            .field("message_templates", &self.message_templates)
            .field("value_obscured", &self.value_obscured)
            .field("value_obscurator", &self.value_obscurator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl From<ValidationOptions> for PartialValidationOptions {
    fn from(options: ValidationOptions) -> Self {
        Self {
            message_templates: Some(options.message_templates),
            value_obscured: Some(options.value_obscured),
            value_obscurator: Some(options.value_obscurator),
        }
    }
}

/// Folds `partials` over the defaults, later partials taking precedence.
pub fn to_validation_options<I>(partials: I) -> ValidationOptions
where
    I: IntoIterator<Item = PartialValidationOptions>,
{
    partials
        .into_iter()
        .fold(ValidationOptions::default(), |mut options, partial| {
            options.apply(partial);
            options
        })
}
