use recaptcha::{
    make_recaptcha_request, options_from_json, Cause, Error, HttpsTransport, ReCaptchaTestValue,
    ReCaptchaValidatorOptions, ValidationResult, DEFAULT_PATH,
};
use serde_json::json;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn local_options(addr: SocketAddr) -> ReCaptchaValidatorOptions {
    options_from_json(&json!({
        "requestOptions": {
            "scheme": "http",
            "host": addr.ip().to_string(),
            "port": addr.port(),
            "timeout": 5000,
        }
    }))
    .expect("local options should normalize")
}

/// A siteverify stand-in that answers form posts with `reply`, exactly once.
async fn siteverify(reply: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DEFAULT_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn posts_form_and_resolves_on_success() {
    let server = siteverify(json!({ "success": true, "hostname": "localhost" })).await;
    let value = ReCaptchaTestValue::new("s3cret", "tok en").with_remoteip("127.0.0.1");

    let result =
        make_recaptcha_request(&HttpsTransport::new(), local_options(*server.address()), &value)
            .await
            .expect("siteverify success should resolve");
    assert_eq!(result, ValidationResult::success());

    let requests = server
        .received_requests()
        .await
        .expect("request recording should be enabled");
    assert_eq!(requests.len(), 1);

    let body = String::from_utf8(requests[0].body.clone()).expect("form body should be utf-8");
    assert_eq!(body, "secret=s3cret&remoteip=127.0.0.1&response=tok%20en");
    assert_eq!(
        requests[0]
            .headers
            .get("content-length")
            .and_then(|len| len.to_str().ok()),
        Some(body.len().to_string().as_str())
    );
}

#[tokio::test]
async fn maps_service_error_codes() {
    let server = siteverify(json!({
        "success": false,
        "error-codes": ["invalid-input-response"],
    }))
    .await;

    let rejection = make_recaptcha_request(
        &HttpsTransport::new(),
        local_options(*server.address()),
        &ReCaptchaTestValue::new("s3cret", "token"),
    )
    .await
    .expect_err("siteverify failure should reject");

    assert_eq!(
        rejection.messages(),
        &["The response parameter is invalid or malformed.".to_string()]
    );
    assert!(matches!(rejection.cause, Cause::Service(_)));
}

#[tokio::test]
async fn missing_fields_never_reach_siteverify() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let rejection = make_recaptcha_request(
        &HttpsTransport::new(),
        local_options(*server.address()),
        &ReCaptchaTestValue::default(),
    )
    .await
    .expect_err("missing fields should reject");

    assert!(matches!(rejection.cause, Cause::MissingInput));
}

#[tokio::test]
async fn connection_failure_is_a_transport_rejection() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("binding a local port should not fail");
        listener.local_addr().expect("listener should have an address")
    };

    let rejection = make_recaptcha_request(
        &HttpsTransport::new(),
        local_options(addr),
        &ReCaptchaTestValue::new("s3cret", "token"),
    )
    .await
    .expect_err("a refused connection should reject");

    assert!(!rejection.result.result);
    assert_eq!(rejection.messages().len(), 1);
    assert!(matches!(rejection.cause, Cause::Transport(Error::Reqwest(_))));
}
