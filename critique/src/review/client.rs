//! HTTP implementation of the review service.
//!
//! `POST {endpoint}` with `{"code": ..., "model": ...}` and a bearer token. The
//! response body is returned as raw JSON; its shape is left to the normalizer.
//! Only transport problems, non-2xx statuses, non-JSON bodies and explicit
//! `{"error": ...}` envelopes count as failures.

use std::time::Duration;

use async_trait::async_trait;
use critique_core::error::ServiceError;
use critique_core::service::ReviewService;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Longest error body kept for display.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct ReviewBody<'a> {
    code: &'a str,
    model: &'a str,
}

#[derive(Clone)]
pub struct HttpReviewService {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpReviewService {
    /// Builds a client with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the TLS backend cannot be initialised.
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("critique/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, endpoint, api_key })
    }
}

#[async_trait]
impl ReviewService for HttpReviewService {
    async fn submit_for_review(&self, code: &str, model_id: &str) -> Result<Value, ServiceError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&ReviewBody { code, model: model_id });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Transport("request timed out".to_owned())
            } else {
                ServiceError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        debug!(status = status.as_u16(), bytes = text.len(), "review service responded");

        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY),
            });
        }

        let body: Value =
            serde_json::from_str(&text).map_err(|e| ServiceError::Decode(e.to_string()))?;
        if let Some(message) = error_envelope(&body) {
            return Err(ServiceError::Envelope(message));
        }
        Ok(body)
    }
}

/// Extracts the message of an `{"error": ...}` envelope, if `body` is one.
fn error_envelope(body: &Value) -> Option<String> {
    let error = body.as_object()?.get("error")?;
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => Some(
            obj.get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| error.to_string()),
        ),
        other => Some(other.to_string()),
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn service(server: &MockServer, key: Option<&str>) -> HttpReviewService {
        HttpReviewService::new(
            format!("{}/review", server.uri()),
            key.map(str::to_owned),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn posts_code_and_model_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/review"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({"code": "x = 1", "model": "gpt-4o"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"quality_score": 91})))
            .expect(1)
            .mount(&server)
            .await;

        let raw = service(&server, Some("sk-test"))
            .submit_for_review("x = 1", "gpt-4o")
            .await
            .unwrap();
        assert_eq!(raw, json!({"quality_score": 91}));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = service(&server, None)
            .submit_for_review("x", "gpt-4o")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Status { status: 503, body: "overloaded".to_owned() }
        );
    }

    #[tokio::test]
    async fn error_envelope_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"error": {"message": "model overloaded"}})),
            )
            .mount(&server)
            .await;

        let err = service(&server, None)
            .submit_for_review("x", "gpt-4o")
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Envelope("model overloaded".to_owned()));
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = service(&server, None)
            .submit_for_review("x", "gpt-4o")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
    }

    #[tokio::test]
    async fn odd_but_valid_shapes_pass_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
            .mount(&server)
            .await;

        let raw = service(&server, None)
            .submit_for_review("x", "gpt-4o")
            .await
            .unwrap();
        assert_eq!(raw, json!([1, 2, 3]));
    }

    #[test]
    fn envelope_detection() {
        assert_eq!(error_envelope(&json!({"error": null, "quality_score": 1})), None);
        assert_eq!(error_envelope(&json!({"error": false})), None);
        assert_eq!(error_envelope(&json!({"error": "quota"})), Some("quota".to_owned()));
        assert_eq!(error_envelope(&json!({"error": 429})), Some("429".to_owned()));
        assert_eq!(error_envelope(&json!("error")), None);
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé…");
        assert_eq!(truncate("ok", 10), "ok");
    }
}
