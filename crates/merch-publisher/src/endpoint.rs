//! Generic publishing endpoint: one JSON POST, response kept as text.

use std::time::Duration;

use merch_core::{MergedPayload, ProductStatus, PublishResult};
use reqwest::Client;

use crate::error::PublishError;

/// Publisher that POSTs the merged payload to a fixed URL.
///
/// Any response counts as delivery. The body is captured verbatim and, when
/// it is a JSON object carrying `product_id` or `id`, that value becomes the
/// external id.
pub struct EndpointPublisher {
    client: Client,
    url: String,
}

impl EndpointPublisher {
    /// # Errors
    ///
    /// - [`PublishError::InvalidBaseUrl`] if `url` does not parse.
    /// - [`PublishError::Transport`] if the `reqwest::Client` cannot be built.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PublishError> {
        reqwest::Url::parse(url).map_err(|e| PublishError::InvalidBaseUrl {
            base_url: url.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends `payload` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Transport`] if no response was received
    /// (connection refused, timeout, TLS failure).
    pub async fn publish(&self, payload: &MergedPayload) -> Result<PublishResult, PublishError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            tracing::info!(url = %self.url, status = status.as_u16(), "endpoint accepted payload");
        } else {
            tracing::warn!(
                url = %self.url,
                status = status.as_u16(),
                "endpoint answered with a non-success status; keeping response body"
            );
        }

        Ok(PublishResult {
            external_id: external_id_from(&body),
            status: ProductStatus::Draft,
            admin_url: None,
            response_body: Some(body),
        })
    }
}

/// Pulls `product_id` (or `id`) from a JSON object body.
///
/// Endpoints may echo diagnostic text before the JSON document, so the last
/// `{...}` span is tried when the whole body does not parse.
fn external_id_from(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .or_else(|| {
            let start = body.rfind("\n{").map_or_else(|| body.find('{'), |i| Some(i + 1))?;
            serde_json::from_str(body[start..].trim()).ok()
        })?;

    let object = value.as_object()?;
    let id = object.get("product_id").or_else(|| object.get("id"))?;
    match id {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
