use crate::core::command::{RemoteClient, RemoteOperation};
use crate::core::results::RemoteResponse;
use crate::domain::config::ProfileConfig;
use crate::domain::error::{HavocError, HavocResult};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use sha2::Sha256;
use std::time::Duration;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

const ACTION_FIELD: &str = "action";

/// HTTPS client for the control plane API
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    secret: String,
    region: String,
}

impl HttpClient {
    /// Create a client for the API served at `https://<api_domain_name>`
    pub fn new(profile: &ProfileConfig) -> HavocResult<Self> {
        let base_url = format!("https://{}", profile.api_domain_name);
        Self::with_base_url(profile, &base_url)
    }

    /// Create a client for an explicit base URL
    pub fn with_base_url(profile: &ProfileConfig, base_url: &str) -> HavocResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(profile.timeout_ms))
            .user_agent(concat!("havoc-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: profile.api_key.clone(),
            secret: profile.secret.clone(),
            region: profile.api_region.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, operation: RemoteOperation) -> String {
        format!("{}/{}", self.base_url, operation.resource)
    }
}

#[async_trait]
impl RemoteClient for HttpClient {
    async fn call(
        &self,
        operation: RemoteOperation,
        params: Map<String, Value>,
    ) -> HavocResult<RemoteResponse> {
        let body = request_body(operation, params)?;
        let date = chrono::Utc::now().format("%Y%m%d").to_string();
        let signature = sign(&self.secret, &string_to_sign(operation, &date, &self.region, &body))?;

        debug!("POST {} ({})", self.endpoint(operation), operation);
        let response = self
            .http
            .post(self.endpoint(operation))
            .header(CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key)
            .header("x-sig-date", &date)
            .header("x-signature", signature)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            warn!("{} returned HTTP {}", operation, status);
        }

        serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(RemoteResponse::from_value)
            .ok_or_else(|| HavocError::Remote {
                message: format!("Unexpected response (HTTP {}): {}", status, text),
            })
    }
}

/// JSON request body: the action followed by the command's parameters
pub fn request_body(operation: RemoteOperation, params: Map<String, Value>) -> HavocResult<String> {
    let mut payload = Map::new();
    payload.insert(ACTION_FIELD.to_string(), Value::String(operation.action.to_string()));
    payload.extend(params);
    Ok(serde_json::to_string(&payload)?)
}

/// Canonical text covered by the request signature
pub fn string_to_sign(operation: RemoteOperation, date: &str, region: &str, body: &str) -> String {
    format!("{}\n{}\n{}\n{}\n{}", operation.resource, operation.action, date, region, body)
}

/// Hex encoded HMAC-SHA256 of `message` keyed with `secret`
pub fn sign(secret: &str, message: &str) -> HavocResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| HavocError::Config {
        message: format!("Invalid signing secret: {}", e),
    })?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const OP: RemoteOperation = RemoteOperation {
        resource: "task-control",
        action: "get",
    };

    #[test]
    fn test_request_body_starts_with_action() {
        let mut params = Map::new();
        params.insert("task_name".to_string(), json!("t1"));
        let body = request_body(OP, params).unwrap();
        assert_eq!(body, r#"{"action":"get","task_name":"t1"}"#);
    }

    #[test]
    fn test_signature_is_deterministic_hex() {
        let message = string_to_sign(OP, "20260101", "us-east-1", "{}");
        assert_eq!(message, "task-control\nget\n20260101\nus-east-1\n{}");

        let first = sign("secret", &message).unwrap();
        let second = sign("secret", &message).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert_ne!(first, sign("other", &message).unwrap());
    }

    #[test]
    fn test_endpoint_uses_resource() {
        let client = HttpClient::with_base_url(&ProfileConfig::template(), "http://127.0.0.1:9/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
        assert_eq!(client.endpoint(OP), "http://127.0.0.1:9/task-control");

        let client = HttpClient::new(&ProfileConfig::template()).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
    }
}
