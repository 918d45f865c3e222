//! HTTP client for the Shopify Admin REST API.

mod types;

use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use merch_core::{AppConfig, ProductRecord, ProductStatus, PublishResult, ShopifyCredentials};
use reqwest::{Client, StatusCode};

use crate::error::PublishError;
use types::{
    ImageEnvelope, NewImage, NewImageEnvelope, NewOption, NewProduct, NewProductEnvelope,
    NewVariant, ProductEnvelope, ProductsResponse, StatusUpdate, StatusUpdateEnvelope,
};

pub use types::ProductSummary;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

const VENDOR: &str = "AI Merch Maker";
const PRODUCT_TYPE: &str = "T-Shirt";
const VARIANT_TITLE: &str = "Default Title";
const PRICE: &str = "19.99";
const COMPARE_AT_PRICE: &str = "24.99";
const INVENTORY_QUANTITY: u32 = 100;

/// Client for the subset of the Admin API the pipeline needs.
///
/// Credentials are resolved once, at construction. Nothing is retried: a
/// transport failure or non-success status is reported to the caller as-is.
pub struct ShopifyAdminClient {
    client: Client,
    /// `https://{shop}/admin/api/{version}` with no trailing slash.
    base_url: String,
    shop_domain: String,
    access_token: String,
}

impl ShopifyAdminClient {
    /// Creates a client for the store named in `config`.
    ///
    /// # Errors
    ///
    /// - [`PublishError::Config`] if the store URL or access token is missing
    ///   or still a placeholder. No request is attempted in that case.
    /// - [`PublishError::Transport`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, PublishError> {
        let credentials = config.shopify_credentials()?;
        let base_url = format!(
            "https://{}/admin/api/{}",
            credentials.shop_domain, credentials.api_version
        );
        Self::with_base_url(
            &credentials,
            config.request_timeout_secs,
            &config.user_agent,
            &base_url,
        )
    }

    /// Creates a client with a custom API base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// - [`PublishError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`PublishError::Transport`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        credentials: &ShopifyCredentials,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PublishError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| PublishError::InvalidBaseUrl {
            base_url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            shop_domain: credentials.shop_domain.clone(),
            access_token: credentials.access_token.clone(),
        })
    }

    #[must_use]
    pub fn shop_domain(&self) -> &str {
        &self.shop_domain
    }

    /// Admin page for a product, e.g. `https://shop.myshopify.com/admin/products/42`.
    #[must_use]
    pub fn admin_url(&self, product_id: &str) -> String {
        format!("https://{}/admin/products/{product_id}", self.shop_domain)
    }

    #[must_use]
    pub fn store_url(&self) -> String {
        format!("https://{}", self.shop_domain)
    }

    /// Lists up to `limit` products. Used as a connectivity self-test.
    ///
    /// Never fails: a transport error or non-200 response is logged and an
    /// empty list is returned.
    pub async fn list_products(&self, limit: u32) -> Vec<ProductSummary> {
        match self.fetch_products(limit).await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(
                    shop = %self.shop_domain,
                    error = %e,
                    "failed to list products"
                );
                Vec::new()
            }
        }
    }

    async fn fetch_products(&self, limit: u32) -> Result<Vec<ProductSummary>, PublishError> {
        let url = format!("{}/products.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await?;

        let body = expect_status(response, StatusCode::OK, "list products").await?;
        let parsed: ProductsResponse =
            serde_json::from_str(&body).map_err(|e| PublishError::Deserialize {
                context: format!("product list from {}", self.shop_domain),
                source: e,
            })?;
        Ok(parsed.products)
    }

    /// Creates a draft product from `record` and, when `image_path` points at
    /// an existing file, attaches it as the product image.
    ///
    /// Image attachment is best-effort: its failure is logged and the created
    /// product is still returned. A product created here is never deleted.
    ///
    /// # Errors
    ///
    /// - [`PublishError::Transport`] on network failure or timeout.
    /// - [`PublishError::Rejected`] if the create call does not return 201.
    /// - [`PublishError::Deserialize`] if the 201 body has no product id.
    pub async fn create_product(
        &self,
        record: &ProductRecord,
        image_path: Option<&Path>,
    ) -> Result<PublishResult, PublishError> {
        let title = record.title.as_str();
        let request = NewProductEnvelope {
            product: NewProduct {
                title,
                body_html: &record.description,
                vendor: VENDOR,
                product_type: PRODUCT_TYPE,
                tags: record.tags.join(", "),
                status: "draft",
                variants: [NewVariant {
                    option1: VARIANT_TITLE,
                    price: PRICE,
                    compare_at_price: COMPARE_AT_PRICE,
                    inventory_quantity: INVENTORY_QUANTITY,
                    inventory_management: "shopify",
                }],
                options: [NewOption {
                    name: "Title",
                    values: [VARIANT_TITLE],
                }],
            },
        };

        let url = format!("{}/products.json", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&request)
            .send()
            .await?;

        let body = expect_status(response, StatusCode::CREATED, "create product").await?;
        let created: ProductEnvelope =
            serde_json::from_str(&body).map_err(|e| PublishError::Deserialize {
                context: "created product".to_string(),
                source: e,
            })?;
        let product = created.product;
        let product_id = product.id.to_string();

        tracing::info!(
            product_id = %product_id,
            title = %product.title,
            price = product.variants.first().and_then(|v| v.price.as_deref()).unwrap_or(PRICE),
            "created draft product"
        );

        match image_path {
            Some(path) if path.is_file() => {
                let alt = format!("Mockup for {title}");
                match self.attach_image(&product_id, path, &alt).await {
                    Ok(image_id) => {
                        tracing::info!(product_id = %product_id, image_id, "attached mockup image");
                    }
                    Err(e) => {
                        tracing::warn!(
                            product_id = %product_id,
                            error = %e,
                            "image attachment failed; product was still created"
                        );
                    }
                }
            }
            Some(path) => {
                tracing::warn!(
                    product_id = %product_id,
                    path = %path.display(),
                    "mockup image not found; creating product without image"
                );
            }
            None => {}
        }

        let status = match product.status.as_deref() {
            Some("active") => ProductStatus::Active,
            _ => ProductStatus::Draft,
        };

        Ok(PublishResult {
            admin_url: Some(self.admin_url(&product_id)),
            external_id: Some(product_id),
            status,
            response_body: None,
        })
    }

    /// Uploads the file at `path` as a base64 image attachment.
    ///
    /// Returns the new image id.
    ///
    /// # Errors
    ///
    /// - [`PublishError::Image`] if the file cannot be read.
    /// - [`PublishError::Transport`] on network failure or timeout.
    /// - [`PublishError::Rejected`] if the upload does not return 201.
    /// - [`PublishError::Deserialize`] if the 201 body has no image id.
    pub async fn attach_image(
        &self,
        product_id: &str,
        path: &Path,
        alt: &str,
    ) -> Result<i64, PublishError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PublishError::Image {
                path: path.display().to_string(),
                source: e,
            })?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("mockup.png");

        let request = NewImageEnvelope {
            image: NewImage {
                product_id,
                attachment: base64::engine::general_purpose::STANDARD.encode(bytes),
                filename,
                alt,
            },
        };

        let url = format!("{}/images.json", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&request)
            .send()
            .await?;

        let body = expect_status(response, StatusCode::CREATED, "attach image").await?;
        let created: ImageEnvelope =
            serde_json::from_str(&body).map_err(|e| PublishError::Deserialize {
                context: format!("image for product {product_id}"),
                source: e,
            })?;
        Ok(created.image.id)
    }

    /// Moves a product from draft to active.
    ///
    /// Returns `false`, with the reason logged, on any transport failure or
    /// non-200 response.
    pub async fn publish_product(&self, product_id: &str) -> bool {
        match self.update_status(product_id).await {
            Ok(()) => {
                tracing::info!(product_id, "product published");
                true
            }
            Err(e) => {
                tracing::warn!(product_id, error = %e, "failed to publish product");
                false
            }
        }
    }

    async fn update_status(&self, product_id: &str) -> Result<(), PublishError> {
        let request = StatusUpdateEnvelope {
            product: StatusUpdate {
                id: product_id,
                status: "active",
            },
        };
        let url = format!("{}/products/{product_id}.json", self.base_url);
        let response = self
            .client
            .put(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&request)
            .send()
            .await?;

        expect_status(response, StatusCode::OK, "publish product").await?;
        Ok(())
    }
}

/// Reads the body and returns it when the status matches `expected`.
async fn expect_status(
    response: reqwest::Response,
    expected: StatusCode,
    operation: &'static str,
) -> Result<String, PublishError> {
    let status = response.status();
    let body = response.text().await?;
    if status != expected {
        return Err(PublishError::Rejected {
            operation,
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

#[cfg(test)]
#[path = "../shopify_test.rs"]
mod tests;
