use lectern_common::{LecternError, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP transport shared by the provider clients
///
/// Sends exactly one request per call, bounded by the configured deadline.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create new transport with a per-call deadline
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, timeout })
    }

    /// Per-call deadline
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start a POST request
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send a prepared request and decode the JSON reply
    pub async fn send_json<R: DeserializeOwned>(
        &self,
        provider: &'static str,
        request: RequestBuilder,
    ) -> Result<R> {
        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| map_send_error(provider, e, self.timeout))?;

            let status = response.status();
            debug!(provider, %status, "Received provider response");

            if !status.is_success() {
                // The body may echo request details; keep it out of the error
                let body = response.text().await.unwrap_or_default();
                debug!(provider, %status, body_len = body.len(), "Provider error body received");
                return Err(classify_status(provider, status, &body));
            }

            response.json::<R>().await.map_err(|e| {
                warn!(provider, error = %e.without_url(), "Failed to decode provider response");
                LecternError::model_unavailable(format!("{} returned an unreadable response", provider))
            })
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| LecternError::ModelTimeout(self.timeout.as_secs()))?
    }
}

/// Map transport failures onto the model error taxonomy
fn map_send_error(provider: &str, error: reqwest::Error, timeout: Duration) -> LecternError {
    if error.is_timeout() {
        warn!(provider, "Provider request timed out");
        return LecternError::ModelTimeout(timeout.as_secs());
    }

    let unreachable = error.is_connect();
    warn!(provider, error = %error.without_url(), "Provider request failed");
    if unreachable {
        LecternError::model_unavailable(format!("Cannot reach {}", provider))
    } else {
        LecternError::model_unavailable(format!("Request to {} failed", provider))
    }
}

/// Map a non-success status onto the model error taxonomy
pub(crate) fn classify_status(provider: &str, status: StatusCode, body: &str) -> LecternError {
    let quota = status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::PAYMENT_REQUIRED
        || body.contains("RESOURCE_EXHAUSTED");

    if quota {
        warn!(provider, %status, "Provider rate or quota limit reached");
        LecternError::quota_exceeded(format!("{} rate or quota limit reached (HTTP {})", provider, status.as_u16()))
    } else {
        warn!(provider, %status, "Provider returned an error status");
        LecternError::model_unavailable(format!("{} returned HTTP {}", provider, status.as_u16()))
    }
}
