//! Publisher adapters for merged product payloads.
//!
//! Two targets share one capability: a generic JSON endpoint that accepts the
//! payload as-is, and the Shopify Admin REST API, which creates a draft
//! product, attaches the mockup image, and can later flip it to active.

pub mod endpoint;
pub mod error;
pub mod publisher;
pub mod shopify;

pub use endpoint::EndpointPublisher;
pub use error::PublishError;
pub use publisher::Publisher;
pub use shopify::{ProductSummary, ShopifyAdminClient};
