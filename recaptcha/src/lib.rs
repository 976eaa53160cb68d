//! # reCAPTCHA
//!
//! Server-side verification of reCAPTCHA v2 response tokens against Google's
//! `siteverify` endpoint.
//!
//! Options are normalized over the endpoint defaults with
//! [`to_recaptcha_validator_options`], then [`make_recaptcha_request`] checks
//! the test value, posts it, and maps the returned `error-codes` to messages.
//!
//! ```no_run
//! # async fn run() {
//! let captcha = recaptcha::ReCaptcha::new("my-secret".to_string());
//! match captcha.verify("token-from-the-form", None).await {
//!     Ok(_) => println!("human"),
//!     Err(rejection) => println!("{}", rejection.messages().join("\n")),
//! }
//! # }
//! ```

#![warn(clippy::all)]
#![warn(clippy::correctness)]
#![warn(clippy::style)]
#![warn(clippy::complexity)]
#![warn(clippy::perf)]

mod client;
mod error;
mod options;
mod request;
mod response;
mod transport;
mod value;

pub use crate::client::{verify, ReCaptcha};
pub use crate::error::{ConfigError, Error};
pub use crate::options::{
    options_from_json, options_from_toml, to_recaptcha_validator_options,
    PartialReCaptchaValidatorOptions, PartialRequestOptions, ReCaptchaValidatorOptions,
    RequestOptions, DEFAULT_HOST, DEFAULT_METHOD, DEFAULT_PATH, DEFAULT_TIMEOUT,
};
pub use crate::request::{
    make_recaptcha_request, recaptcha_validator, recaptcha_validator_v2, Cause, Rejection,
};
pub use crate::response::SiteVerifyResponse;
pub use crate::transport::{HttpsTransport, Transport};
pub use crate::value::{to_recaptcha_test_value, ReCaptchaTestValue};
pub use validation::{ValidationOptions, ValidationResult};

pub const MISSING_INPUT_SECRET: &str = "missing-input-secret";
pub const INVALID_INPUT_SECRET: &str = "invalid-input-secret";
pub const MISSING_INPUT_RESPONSE: &str = "missing-input-response";
pub const INVALID_INPUT_RESPONSE: &str = "invalid-input-response";
pub const BAD_REQUEST: &str = "bad-request";
/// Reported locally when siteverify fails without a recognized error code.
pub const UNKNOWN_ERROR: &str = "unknown-error";

pub const FIELD_SECRET: &str = "secret";
pub const FIELD_RESPONSE: &str = "response";
pub const FIELD_REMOTEIP: &str = "remoteip";
pub const VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
