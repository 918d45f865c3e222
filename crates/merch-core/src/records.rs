//! Records handed between pipeline stages.
//!
//! ## Wire shapes
//!
//! ### `product.json`
//! Written by the content stage. Every field may be absent. A missing
//! `title` or `description` reads as empty and is filled in by the merger;
//! missing `tags` default to an empty list. `keywords` is optional and
//! omitted on output when absent.
//!
//! ### `mockup.json`
//! Written by the visual stage. All five fields are always present; paths are
//! whatever the renderer used, absolute or relative.
//!
//! ### Merged payload
//! Product fields at the top level, the mockup record nested verbatim under
//! `mockup`. The two records share no keys, so flattening never collides.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::artifacts::ArtifactStore;

/// Product copy produced by the content stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Insertion-ordered; duplicates are not removed.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

impl ProductRecord {
    /// The record substituted when the content artifact is missing or unreadable.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            title: "AI Generated T-Shirt".to_string(),
            description: "A unique AI-generated t-shirt design".to_string(),
            tags: strings(&["ai-generated", "creative", "modern"]),
            keywords: Some(strings(&[
                "ai-generated",
                "creative",
                "modern",
                "design",
                "fashion",
            ])),
        }
    }

    /// Sample record used by the platform demo instead of calling the AI API.
    #[must_use]
    pub fn demo_sample() -> Self {
        Self {
            title: "AI Generated Creative T-Shirt".to_string(),
            description: "A unique AI-generated t-shirt design featuring modern artistic \
                          elements and creative patterns. Perfect for those who appreciate \
                          innovative fashion and contemporary style."
                .to_string(),
            tags: strings(&["ai-generated", "creative", "modern", "artistic", "unique"]),
            keywords: Some(strings(&[
                "ai-generated",
                "creative",
                "modern",
                "artistic",
                "unique",
                "design",
                "fashion",
                "t-shirt",
            ])),
        }
    }
}

/// Metadata describing a rendered mockup image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockupRecord {
    /// Path or URL of the composited mockup.
    pub mockup_url: String,
    pub width: u32,
    pub height: u32,
    pub product_image: String,
    pub template: String,
}

impl MockupRecord {
    /// Side length used when no renderer reported real dimensions.
    pub const FALLBACK_SIZE: u32 = 2500;

    /// A record pointing at the store's conventional image locations.
    #[must_use]
    pub fn fallback(store: &ArtifactStore) -> Self {
        Self {
            mockup_url: store.mockup_image_path().display().to_string(),
            width: Self::FALLBACK_SIZE,
            height: Self::FALLBACK_SIZE,
            product_image: store.product_image_path().display().to_string(),
            template: store.template_path().display().to_string(),
        }
    }
}

/// Product and mockup records joined into the document that gets published.
///
/// Built once per run by the merger and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedPayload {
    #[serde(flatten)]
    pub product: ProductRecord,
    pub mockup: MockupRecord,
}

impl MergedPayload {
    #[must_use]
    pub fn new(product: ProductRecord, mockup: MockupRecord) -> Self {
        Self { product, mockup }
    }
}

/// Visibility of a product on the commerce platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Active,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Draft => write!(f, "draft"),
            ProductStatus::Active => write!(f, "active"),
        }
    }
}

/// What a publisher reports back after accepting a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    /// Platform identifier for the created record, when the target returned one.
    pub external_id: Option<String>,
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_url: Option<String>,
    /// Raw response body from targets that do not return structured data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

impl PublishResult {
    /// Returns the same result moved to [`ProductStatus::Active`].
    ///
    /// The external id is carried over untouched. There is no way back to
    /// draft.
    #[must_use]
    pub fn activated(self) -> Self {
        Self {
            status: ProductStatus::Active,
            ..self
        }
    }
}

/// A merged payload plus the commerce-platform result, written for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedPayload {
    #[serde(flatten)]
    pub payload: MergedPayload,
    pub shopify: PublishResult,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}
