use crate::error::Error;
use crate::options::RequestOptions;
use async_trait::async_trait;
use reqwest::Method;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{to_recaptcha_validator_options, PartialReCaptchaValidatorOptions};

    fn request() -> RequestOptions {
        to_recaptcha_validator_options(PartialReCaptchaValidatorOptions::default()).request_options
    }

    #[tokio::test]
    async fn invalid_method_is_rejected_before_sending() {
        let mut request = request();
        request.method = "NOT A METHOD".to_string();

        let err = HttpsTransport::new()
            .send(&request)
            .await
            .expect_err("an invalid method should fail");
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn invalid_host_is_rejected_before_sending() {
        let mut request = request();
        request.host = "exa mple.org".to_string();

        let err = HttpsTransport::new()
            .send(&request)
            .await
            .expect_err("an invalid host should fail");
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}

/// Sends a fully prepared verification request and returns the complete
/// response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestOptions) -> Result<String, Error>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Clone, Debug, Default)]
pub struct HttpsTransport {
    client: reqwest::Client,
}

impl HttpsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpsTransport {
    async fn send(&self, request: &RequestOptions) -> Result<String, Error> {
        let url = request.url()?;
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|err| Error::InvalidRequest(err.to_string()))?;

        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let body = builder.send().await?.text().await?;
        Ok(body)
    }
}
