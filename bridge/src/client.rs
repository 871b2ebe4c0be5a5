use async_trait::async_trait;
use serde_json::Value;
use thermostat_common::{extract_number, ActionRequest, STATUS_ERROR};
use tracing::{debug, warn};

use crate::error::Result;

/// One request/response exchange with the device. Implementations make a
/// single attempt per call: no retries, no backoff.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// `Ok(None)` means the device answered without a usable value.
    async fn fetch(&self, action: &str) -> Result<Option<f64>>;

    async fn push(&self, action: &str, value: f64) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct HttpDeviceClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDeviceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, request: &ActionRequest) -> Result<Vec<u8>> {
        let body = self
            .http
            .post(&self.base_url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl DeviceTransport for HttpDeviceClient {
    async fn fetch(&self, action: &str) -> Result<Option<f64>> {
        debug!(url = %self.base_url, action, "fetching from device");
        let body = self.post(&ActionRequest::fetch(action)).await?;
        let value = extract_number(&body, action);
        if value.is_none() {
            debug!(action, "device response carried no value");
        }
        Ok(value)
    }

    async fn push(&self, action: &str, value: f64) -> Result<()> {
        debug!(url = %self.base_url, action, value, "pushing to device");
        let body = self.post(&ActionRequest::push(action, value)).await?;
        if let Ok(response) = serde_json::from_slice::<Value>(&body) {
            if response.get("status").and_then(Value::as_str) == Some(STATUS_ERROR) {
                let error = match response.get("error") {
                    Some(Value::String(message)) => Some(message.clone()),
                    Some(other) => Some(other.to_string()),
                    None => None,
                };
                warn!(
                    action,
                    error = error.as_deref().unwrap_or("unspecified"),
                    "device reported an error for accepted write"
                );
            }
        }
        Ok(())
    }
}
