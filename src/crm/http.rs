//! Low-level CRM POST helper: lazy URL construction, the shared retry
//! envelope, and the failure classification every CRM operation maps into
//! its own `err(code, …)`. Grounded in `_crm_http.py` (lazy `crm_url`) and
//! `http_retry.py` (`_is_retryable`).

use crate::retry::{is_retryable_status, is_retryable_transport_error, retry_with_backoff, RetryPolicy};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CrmConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry_policy: RetryPolicy,
}

impl CrmConfig {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrmHttpError {
    #[error("timeout or network error calling CRM")]
    Network,
    #[error("CRM responded with HTTP {0}")]
    Status(StatusCode),
    #[error("CRM response was not valid JSON: {0}")]
    Parse(String),
    #[error("CRM response was not a JSON object")]
    NotAnObject,
}

fn is_retryable(error: &CrmHttpError) -> bool {
    match error {
        CrmHttpError::Network => true,
        CrmHttpError::Status(status) => is_retryable_status(*status),
        CrmHttpError::Parse(_) | CrmHttpError::NotAnObject => false,
    }
}

/// POSTs `payload` to `path` under `config.base_url`, retried per
/// `config.retry_policy`. Returns the parsed JSON object on success.
pub async fn post_json<T: Serialize>(
    client: &Client,
    config: &CrmConfig,
    path: &str,
    payload: &T,
    label: &str,
) -> Result<Value, CrmHttpError> {
    let url = config.url(path);
    retry_with_backoff(config.retry_policy, label, is_retryable, || async {
        let response = client
            .post(&url)
            .json(payload)
            .timeout(config.timeout)
            .send()
            .await
            .map_err(|e| {
                if is_retryable_transport_error(&e) {
                    CrmHttpError::Network
                } else {
                    CrmHttpError::Status(e.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrmHttpError::Status(status));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| CrmHttpError::Parse(e.to_string()))?;

        if !value.is_object() {
            return Err(CrmHttpError::NotAnObject);
        }
        Ok(value)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> CrmConfig {
        CrmConfig {
            base_url,
            timeout: Duration::from_secs(5),
            retry_policy: RetryPolicy::new(3, 0.001, 0.002),
        }
    }

    #[tokio::test]
    async fn retries_on_500_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/x"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let client = Client::new();
        let config = test_config(server.uri());
        let result = post_json(&client, &config, "/x", &json!({}), "test").await;
        assert_eq!(result.unwrap()["success"], true);
    }

    #[tokio::test]
    async fn does_not_retry_on_400() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/x"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let config = test_config(server.uri());
        let result = post_json(&client, &config, "/x", &json!({}), "test").await;
        assert!(matches!(result, Err(CrmHttpError::Status(StatusCode::BAD_REQUEST))));
    }
}
