//! HTTP transport for the create-invitation endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ClientConfig, API_KEY_HEADER};
use crate::error::{WizarrError, WizarrResult};
use crate::models::InvitationRequest;

/// Performs a single create-invitation exchange.
///
/// Implementations make exactly one attempt per call; retries belong to the
/// caller.
#[async_trait]
pub trait InvitationTransport: Send + Sync {
    /// Create one invitation and return the API's JSON response untouched.
    async fn create_invitation(&self, request: &InvitationRequest) -> WizarrResult<Value>;

    /// Human-readable target, used in log lines.
    fn endpoint(&self) -> String;
}

/// `reqwest`-backed transport talking to a Wizarr server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: ClientConfig,
    http_client: Client,
}

impl HttpTransport {
    /// Build a transport with its own connection pool.
    pub fn new(config: ClientConfig) -> WizarrResult<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| WizarrError::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    async fn handle_error_response(&self, response: reqwest::Response) -> WizarrError {
        let status = response.status();

        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                warn!(retry_after_secs = ?retry_after, "Wizarr API rate limited");
                WizarrError::RateLimited {
                    retry_after_secs: retry_after,
                }
            }
            _ => WizarrError::Http {
                status: status.as_u16(),
                detail: error_detail(status, &body),
            },
        }
    }
}

/// Pick a readable message out of an error body.
///
/// Only used for the message text; classification never looks at it.
fn error_detail(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        ["error", "message", "detail"]
            .iter()
            .find_map(|key| json.get(*key).and_then(Value::as_str).map(str::to_string))
    });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
        None => body.trim().to_string(),
    }
}

#[async_trait]
impl InvitationTransport for HttpTransport {
    async fn create_invitation(&self, request: &InvitationRequest) -> WizarrResult<Value> {
        let url = self.config.invitations_url();
        debug!(url = %url, "POST invitation");

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        debug!(url = %url, status = %status, "Received invitation response");

        if !status.is_success() {
            return Err(self.handle_error_response(response).await);
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| WizarrError::ParseError(format!("Failed to parse response: {e}")))?;
        if !value.is_object() {
            return Err(WizarrError::ParseError(
                "expected a JSON object".to_string(),
            ));
        }
        Ok(value)
    }

    fn endpoint(&self) -> String {
        self.config.invitations_url()
    }
}
