use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;
use validation::TypeError;

#[cfg(test)]
mod tests {
    use super::*;
    use validation::PropType;

    #[test]
    fn timeout_message_names_duration() {
        let err = Error::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "no response from siteverify within 1500ms");
    }

    #[test]
    fn config_type_error_keeps_source() {
        let err = ConfigError::from(TypeError {
            property: "requestOptions".to_string(),
            expected: PropType::Object,
            found: "string",
        });
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "invalid options: property `requestOptions` expected object, found string"
        );
    }
}

/// Failures while talking to the siteverify endpoint or reading its answer.
#[derive(Debug)]
pub enum Error {
    /// The configured request options do not describe a valid request.
    InvalidRequest(String),
    Reqwest(reqwest::Error),
    Timeout(Duration),
    /// The response body was not the JSON document siteverify returns.
    Parse(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest(msg) => write!(f, "invalid request options: {}", msg),
            Self::Reqwest(err) => write!(f, "request to siteverify failed: {}", err),
            Self::Timeout(after) => write!(
                f,
                "no response from siteverify within {}ms",
                after.as_millis()
            ),
            Self::Parse(err) => write!(f, "malformed siteverify response: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Reqwest(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Reqwest(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Validator options or a test value could not be built from caller input.
#[derive(Debug)]
pub enum ConfigError {
    Type(TypeError),
    Parse(serde_json::Error),
    Toml(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(err) => write!(f, "invalid options: {}", err),
            Self::Parse(err) => write!(f, "invalid options: {}", err),
            Self::Toml(err) => write!(f, "invalid options file: {}", err),
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Type(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Toml(err) => Some(err),
        }
    }
}

impl From<TypeError> for ConfigError {
    fn from(err: TypeError) -> Self {
        Self::Type(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err)
    }
}
