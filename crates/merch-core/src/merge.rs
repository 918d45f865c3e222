//! Payload merger: joins the content and visual stage outputs.
//!
//! The lenient path never fails. A missing or unparsable record is replaced by
//! its fallback and the substitution is reported through [`RecordSource`], so
//! callers decide whether to log, record, or reject it.
//!
//! A product record that parses but leaves `title` or `description` blank
//! keeps its other fields; only the blank ones are taken from the fallback.
//! This is the one place product copy is defaulted, on both paths.

use std::path::Path;

use crate::artifacts::{ArtifactError, ArtifactStore};
use crate::records::{MergedPayload, MockupRecord, ProductRecord};

/// Where a merged record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    Artifact,
    Fallback { reason: String },
}

impl RecordSource {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, RecordSource::Fallback { .. })
    }
}

/// Result of a lenient merge.
#[derive(Debug, Clone)]
pub struct Merged {
    pub payload: MergedPayload,
    pub product_source: RecordSource,
    pub mockup_source: RecordSource,
}

/// Builds [`MergedPayload`]s, holding the fallback records to substitute.
#[derive(Debug, Clone)]
pub struct PayloadMerger {
    fallback_product: ProductRecord,
    fallback_mockup: MockupRecord,
}

impl PayloadMerger {
    #[must_use]
    pub fn new(fallback_product: ProductRecord, fallback_mockup: MockupRecord) -> Self {
        Self {
            fallback_product,
            fallback_mockup,
        }
    }

    /// Merger whose fallbacks point at the store's conventional files.
    #[must_use]
    pub fn for_store(store: &ArtifactStore) -> Self {
        Self::new(ProductRecord::fallback(), MockupRecord::fallback(store))
    }

    /// Reads both records, substituting fallbacks for any that are absent or
    /// unparsable.
    #[must_use]
    pub fn merge(&self, content_path: &Path, mockup_path: &Path) -> Merged {
        let (product, product_source) = load_or(content_path, &self.fallback_product);
        let (mockup, mockup_source) = load_or(mockup_path, &self.fallback_mockup);

        Merged {
            payload: MergedPayload::new(self.fill_blank_copy(product), mockup),
            product_source,
            mockup_source,
        }
    }

    /// Reads both records with no substitution.
    ///
    /// # Errors
    ///
    /// Returns the first [`ArtifactError`] encountered, content record first.
    pub fn merge_strict(
        &self,
        content_path: &Path,
        mockup_path: &Path,
    ) -> Result<MergedPayload, ArtifactError> {
        let product: ProductRecord = ArtifactStore::read_json(content_path)?;
        let mockup: MockupRecord = ArtifactStore::read_json(mockup_path)?;
        Ok(MergedPayload::new(self.fill_blank_copy(product), mockup))
    }

    fn fill_blank_copy(&self, mut product: ProductRecord) -> ProductRecord {
        if product.title.trim().is_empty() {
            tracing::debug!("product title missing, using fallback");
            product.title.clone_from(&self.fallback_product.title);
        }
        if product.description.trim().is_empty() {
            tracing::debug!("product description missing, using fallback");
            product
                .description
                .clone_from(&self.fallback_product.description);
        }
        product
    }
}

fn load_or<T>(path: &Path, fallback: &T) -> (T, RecordSource)
where
    T: serde::de::DeserializeOwned + Clone,
{
    match ArtifactStore::read_json::<T>(path) {
        Ok(record) => (record, RecordSource::Artifact),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "substituting fallback record");
            (
                fallback.clone(),
                RecordSource::Fallback {
                    reason: e.to_string(),
                },
            )
        }
    }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
