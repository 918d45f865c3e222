//! Request and response bodies for the Shopify Admin REST endpoints we call.
//!
//! Only the fields the pipeline reads are modelled. Shopify returns numeric
//! ids; they are kept as `i64` here and stringified at the `PublishResult`
//! boundary.

use serde::{Deserialize, Serialize};

/// `GET /products.json` response.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductsResponse {
    pub products: Vec<ProductSummary>,
}

/// Minimal product view used by the connectivity self-test.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSummary {
    pub id: i64,
    pub title: String,
    /// Absent on some API versions; treated as unknown.
    #[serde(default)]
    pub status: Option<String>,
}

/// `POST /products.json` response (`201 Created`).
#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: CreatedProduct,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedProduct {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub variants: Vec<CreatedVariant>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedVariant {
    #[serde(default)]
    pub price: Option<String>,
}

/// `POST /images.json` response (`201 Created`).
#[derive(Debug, Deserialize)]
pub(crate) struct ImageEnvelope {
    pub image: CreatedImage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedImage {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewProductEnvelope<'a> {
    pub product: NewProduct<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewProduct<'a> {
    pub title: &'a str,
    pub body_html: &'a str,
    pub vendor: &'static str,
    pub product_type: &'static str,
    /// Comma-separated, the form the Admin API accepts on create.
    pub tags: String,
    pub status: &'static str,
    pub variants: [NewVariant; 1],
    pub options: [NewOption; 1],
}

#[derive(Debug, Serialize)]
pub(crate) struct NewVariant {
    pub option1: &'static str,
    pub price: &'static str,
    pub compare_at_price: &'static str,
    pub inventory_quantity: u32,
    pub inventory_management: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewOption {
    pub name: &'static str,
    pub values: [&'static str; 1],
}

#[derive(Debug, Serialize)]
pub(crate) struct NewImageEnvelope<'a> {
    pub image: NewImage<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewImage<'a> {
    pub product_id: &'a str,
    /// Base64-encoded file contents.
    pub attachment: String,
    pub filename: &'a str,
    pub alt: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdateEnvelope<'a> {
    pub product: StatusUpdate<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate<'a> {
    pub id: &'a str,
    pub status: &'static str,
}
