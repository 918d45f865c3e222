use std::path::Path;

use merch_core::{MergedPayload, PublishResult};

use crate::endpoint::EndpointPublisher;
use crate::error::PublishError;
use crate::shopify::ShopifyAdminClient;

/// The publish target for a pipeline run.
pub enum Publisher {
    Endpoint(EndpointPublisher),
    Shopify(ShopifyAdminClient),
}

impl Publisher {
    /// Short name used in logs and run summaries.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Publisher::Endpoint(_) => "endpoint",
            Publisher::Shopify(_) => "shopify",
        }
    }

    /// Publishes `payload` once.
    ///
    /// The endpoint variant sends the whole merged payload. The Shopify
    /// variant creates a draft product from the product fields and attaches
    /// `image_path` when it exists.
    ///
    /// # Errors
    ///
    /// Propagates the variant's [`PublishError`].
    pub async fn publish(
        &self,
        payload: &MergedPayload,
        image_path: Option<&Path>,
    ) -> Result<PublishResult, PublishError> {
        match self {
            Publisher::Endpoint(endpoint) => endpoint.publish(payload).await,
            Publisher::Shopify(client) => client.create_product(&payload.product, image_path).await,
        }
    }

    /// Storefront root for commerce targets; `None` for the endpoint.
    #[must_use]
    pub fn store_url(&self) -> Option<String> {
        match self {
            Publisher::Endpoint(_) => None,
            Publisher::Shopify(client) => Some(client.store_url()),
        }
    }

    /// Whether [`Self::activate`] can move a result from draft to active.
    #[must_use]
    pub fn supports_status_change(&self) -> bool {
        matches!(self, Publisher::Shopify(_))
    }

    /// Flips the published record to active. Returns `false` when the target
    /// has no status change, the result carries no id, or the call fails.
    pub async fn activate(&self, result: &PublishResult) -> bool {
        match (self, result.external_id.as_deref()) {
            (Publisher::Shopify(client), Some(id)) => client.publish_product(id).await,
            _ => false,
        }
    }
}
