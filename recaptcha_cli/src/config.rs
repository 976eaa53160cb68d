use recaptcha::ConfigError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_FULL_TOML: &str = r#"
secret = "6LeIxAcTAAAAAGG-vFI1TnRWxMZNFuojJ4WifJWe"

[logger]
type = "File"
file = "/var/log/recaptcha.log"
level = "debug"

[recaptcha]
valueObscured = true

[recaptcha.requestOptions]
host = "www.recaptcha.net"
timeout = 3000

[recaptcha.messageTemplates]
"invalid-input-response" = { render = "Token {{ value.response }} was not accepted." }
"#;

    #[test]
    fn test_config_full_toml() {
        let conf: Config = toml::from_str(CONFIG_FULL_TOML).unwrap();
        assert_eq!(
            conf.secret.as_deref(),
            Some("6LeIxAcTAAAAAGG-vFI1TnRWxMZNFuojJ4WifJWe")
        );
        assert_eq!(
            conf.logger.output,
            Logger::File {
                file: PathBuf::from("/var/log/recaptcha.log")
            }
        );
        assert_eq!(conf.logger.level, "debug");

        let options = conf.validator_options().unwrap();
        assert_eq!(options.request_options.host, "www.recaptcha.net");
        assert!(options.validation.value_obscured);
    }

    const CONFIG_STDOUT_TOML: &str = r#"
[logger]
type = "Stdout"
"#;

    #[test]
    fn test_config_logger_defaults_level() {
        let conf: Config = toml::from_str(CONFIG_STDOUT_TOML).unwrap();
        assert_eq!(conf.logger.output, Logger::Stdout);
        assert_eq!(conf.logger.level, "warn");
        assert_eq!(conf.secret, None);
        assert_eq!(conf.recaptcha, Value::Null);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let conf: Config = toml::from_str("").unwrap();
        assert_eq!(conf.logger.output, Logger::Stderr);

        let options = conf.validator_options().unwrap();
        assert_eq!(options.request_options.host, recaptcha::DEFAULT_HOST);
    }

    #[test]
    fn test_mistyped_options_are_rejected() {
        let conf: Config = toml::from_str(
            r#"
[recaptcha]
requestOptions = "www.google.com"
"#,
        )
        .unwrap();

        match conf.validator_options() {
            Err(Error::Options(ConfigError::Type(err))) => {
                assert_eq!(err.property, "requestOptions")
            }
            other => panic!("expected a type error, got {:?}", other.map(|_| ())),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Read(PathBuf, io::Error),
    Open(PathBuf, io::Error),
    Toml(toml::de::Error),
    Options(ConfigError),
    Level(String),
    Logger(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(path, err) => write!(f, "could not read {}: {}", path.display(), err),
            Self::Open(path, err) => {
                write!(f, "could not open log file {}: {}", path.display(), err)
            }
            Self::Toml(err) => write!(f, "invalid config file: {}", err),
            Self::Options(err) => write!(f, "{}", err),
            Self::Level(level) => write!(f, "unknown log level `{}`", level),
            Self::Logger(msg) => write!(f, "could not set up logging: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Options(err)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logger: LoggerConfig,
    #[serde(default)]
    pub secret: Option<String>,
    /// Validator options, checked and normalized by [`Config::validator_options`].
    #[serde(default)]
    pub recaptcha: Value,
}

#[derive(Debug, Deserialize)]
pub struct LoggerConfig {
    #[serde(flatten)]
    pub output: Logger,
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            output: Logger::Stderr,
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Logger {
    File { file: PathBuf },
    Stdout,
    Stderr,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|err| Error::Read(path.to_path_buf(), err))?;
        Ok(toml::from_str(&text)?)
    }

    pub fn validator_options(&self) -> Result<recaptcha::ReCaptchaValidatorOptions, Error> {
        Ok(recaptcha::options_from_json(&self.recaptcha)?)
    }
}
