use skillbox_core::{SkillboxError, SkillboxResult};
use std::time::Duration;
use tracing::{debug, info, warn};

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Thin JSON-over-HTTP client shared by the skill executors.
///
/// One call is one GET. Query values are never logged since they may carry
/// API keys.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
}

impl RemoteClient {
    /// Builds the client with a bounded redirect policy.
    pub fn new() -> SkillboxResult<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| SkillboxError::Unexpected(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Issues a GET to `url` and decodes the JSON body.
    ///
    /// Non-2xx answers become [`SkillboxError::RemoteService`] with the
    /// upstream status and the body's `error` (or `message`) field. Timeouts
    /// and connection failures carry no status.
    pub async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> SkillboxResult<serde_json::Value> {
        info!(url = %url, timeout_ms = timeout.as_millis() as u64, "Remote GET");

        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, timeout = e.is_timeout(), "Remote request failed");
                SkillboxError::remote_transport(e.without_url())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SkillboxError::remote_transport(e.without_url()))?;

        if body.len() > MAX_RESPONSE_SIZE {
            return Err(SkillboxError::RemoteService {
                status: Some(status.as_u16()),
                message: format!(
                    "Response too large: {} bytes (max: {MAX_RESPONSE_SIZE} bytes)",
                    body.len()
                ),
            });
        }

        if !status.is_success() {
            let detail = error_detail(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), detail = %detail, "Remote service error");
            return Err(SkillboxError::remote_status(status.as_u16(), detail));
        }

        debug!(url = %url, size = body.len(), "Remote response received");
        serde_json::from_slice(&body).map_err(|e| SkillboxError::RemoteService {
            status: Some(status.as_u16()),
            message: format!("Invalid JSON response: {e}"),
        })
    }
}

/// Error text from an upstream error body, e.g. `{"error": "Missing 'name' parameter"}`.
fn error_detail(body: &[u8]) -> Option<String> {
    let json: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_error_detail_fields() {
        assert_eq!(
            error_detail(br#"{"error":"Missing 'name' parameter"}"#).as_deref(),
            Some("Missing 'name' parameter")
        );
        assert_eq!(
            error_detail(br#"{"cod":"401","message":"Invalid API key"}"#).as_deref(),
            Some("Invalid API key")
        );
        assert_eq!(error_detail(b"<html>"), None);
        assert_eq!(error_detail(br#"{"error":42}"#), None);
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .and(query_param("name", "Jane"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = RemoteClient::new().unwrap();
        let body = client
            .get_json(
                &format!("{}/lookup", server.uri()),
                &[("name", "Jane".to_string())],
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_get_json_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({"error": "Missing 'name' parameter"})),
            )
            .mount(&server)
            .await;

        let client = RemoteClient::new().unwrap();
        let err = client
            .get_json(&server.uri(), &[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(
            err.to_string(),
            "Request failed with status code 422: Missing 'name' parameter"
        );
    }

    #[tokio::test]
    async fn test_get_json_non_json_error_uses_reason() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let client = RemoteClient::new().unwrap();
        let err = client
            .get_json(&server.uri(), &[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Request failed with status code 503: Service Unavailable"
        );
    }

    #[tokio::test]
    async fn test_get_json_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = RemoteClient::new().unwrap();
        let err = client
            .get_json(&server.uri(), &[], Duration::from_millis(50))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "RemoteServiceError");
        assert_eq!(err.status(), None);
    }
}
