use crate::options::{
    to_recaptcha_validator_options, PartialReCaptchaValidatorOptions, ReCaptchaValidatorOptions,
};
use crate::request::{make_recaptcha_request, Rejection};
use crate::transport::{HttpsTransport, Transport};
use crate::value::ReCaptchaTestValue;
use validation::ValidationResult;


/// A reusable verifier bound to one secret key.
pub struct ReCaptcha<T = HttpsTransport> {
    transport: T,
    secret: String,
    options: ReCaptchaValidatorOptions,
}

impl ReCaptcha {
    pub fn new(secret: String) -> ReCaptcha {
        Self::with_transport(secret, HttpsTransport::new())
    }
}

impl<T: Transport> ReCaptcha<T> {
    pub fn with_transport(secret: String, transport: T) -> Self {
        Self {
            transport,
            secret,
            options: to_recaptcha_validator_options(PartialReCaptchaValidatorOptions::default()),
        }
    }

    /// Replaces the options with `options` merged over the defaults.
    pub fn configure<P>(mut self, options: P) -> Self
    where
        P: Into<PartialReCaptchaValidatorOptions>,
    {
        self.options = to_recaptcha_validator_options(options);
        self
    }

    pub fn options(&self) -> &ReCaptchaValidatorOptions {
        &self.options
    }

    pub async fn verify(
        &self,
        response: &str,
        remoteip: Option<&str>,
    ) -> Result<ValidationResult, Rejection> {
        let value = ReCaptchaTestValue {
            secret: Some(self.secret.clone()),
            response: Some(response.to_string()),
            remoteip: remoteip.map(str::to_string),
        };
        make_recaptcha_request(&self.transport, self.options.clone(), &value).await
    }
}

/// Verifies a single token with default options.
pub async fn verify(secret: &str, token: &str) -> Result<ValidationResult, Rejection> {
    let captcha = ReCaptcha::new(secret.to_string());
    captcha.verify(token, None).await
}
