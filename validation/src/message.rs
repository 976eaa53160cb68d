use crate::merge::Merge;
use crate::options::ValidationOptions;
use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tera::{Context, Tera};


pub type TemplateFn = Arc<dyn Fn(&Value, &ValidationOptions) -> String + Send + Sync>;

/// How a message is produced for an error code.
///
/// In configuration files a template is either a plain string or a table of
/// the form `{ render = "..." }`, which is rendered with Tera and has the
/// (possibly obscured) value available as `value`.
#[derive(Clone)]
pub enum MessageTemplate {
    Literal(String),
    Render(String),
    Func(TemplateFn),
}

impl MessageTemplate {
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Value, &ValidationOptions) -> String + Send + Sync + 'static,
    {
        Self::Func(Arc::new(f))
    }

    fn resolve(&self, value: &Value, options: &ValidationOptions) -> Option<String> {
        match self {
            Self::Literal(text) if text.is_empty() => None,
            Self::Literal(text) => Some(text.clone()),
            Self::Render(source) => Some(render(source, value)),
            Self::Func(f) => Some(f(value, options)),
        }
    }
}

fn render(source: &str, value: &Value) -> String {
    let mut context = Context::new();
    context.insert("value", value);
    match Tera::one_off(source, &context, false) {
        Ok(text) => text,
        Err(err) => {
            warn!("could not render message template: {}", err);
            source.to_string()
        }
    }
}

impl From<&str> for MessageTemplate {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_string())
    }
}

impl From<String> for MessageTemplate {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl Merge for MessageTemplate {
    fn merge(&mut self, other: Self) {
        *self = other;
    }
}

impl fmt::Debug for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Render(source) => f.debug_tuple("Render").field(source).finish(),
            Self::Func(_) => f.write_str("Func(<fn>)"),
        }
    }
}

impl PartialEq for MessageTemplate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Render(a), Self::Render(b)) => a == b,
            (Self::Func(a), Self::Func(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateRepr {
    Literal(String),
    Render { render: String },
}

impl<'de> Deserialize<'de> for MessageTemplate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match TemplateRepr::deserialize(deserializer)? {
            TemplateRepr::Literal(text) => Self::Literal(text),
            TemplateRepr::Render { render } => Self::Render(render),
        })
    }
}

/// Either an error code to look up in the message templates, or a function
/// producing the message itself.
pub enum MessageKey<'a> {
    Code(&'a str),
    Func(&'a dyn Fn(&Value, &ValidationOptions) -> String),
}

impl<'a> From<&'a str> for MessageKey<'a> {
    fn from(code: &'a str) -> Self {
        Self::Code(code)
    }
}

impl<'a> From<&'a String> for MessageKey<'a> {
    fn from(code: &'a String) -> Self {
        Self::Code(code.as_str())
    }
}

/// Resolves the message for `key`, handing templates the value obscured
/// according to `options`. Returns `None` when no template is registered
/// for the code.
pub fn get_error_message_by_key<'a, K>(
    options: &ValidationOptions,
    key: K,
    value: &Value,
) -> Option<String>
where
    K: Into<MessageKey<'a>>,
{
    let value = options.obscure(value);
    match key.into() {
        MessageKey::Func(f) => Some(f(&value, options)),
        MessageKey::Code(code) => options.message_templates.get(code)?.resolve(&value, options),
    }
}
