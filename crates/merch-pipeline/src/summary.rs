//! The run summary: one JSON document per pipeline execution.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use merch_core::ProductStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coordinator::ArtifactPolicy;
use crate::modes::RunMode;
use crate::stage::Stage;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded,
    Failed { stage: Stage, reason: String },
}

impl RunOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded)
    }
}

/// Durable audit record written to `runs/` at the end of every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub mode: RunMode,
    pub policy: ArtifactPolicy,
    /// `endpoint` or `shopify`.
    pub publisher: String,
    /// Storefront of the commerce platform the run published to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub content_path: PathBuf,
    pub mockup_path: PathBuf,
    pub image_path: PathBuf,
    /// Reason the default product record was used, if it was.
    pub product_fallback: Option<String>,
    /// Reason the default mockup record was used, if it was.
    pub mockup_fallback: Option<String>,
    pub stages_completed: Vec<Stage>,
    pub external_id: Option<String>,
    pub status: Option<ProductStatus>,
    pub admin_url: Option<String>,
    /// Final payload artifact written alongside this summary.
    pub payload_path: Option<PathBuf>,
    pub outcome: RunOutcome,
}

impl RunSummary {
    /// `run-<UTC start, compact ISO 8601>-<run id>.json`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "run-{}-{}.json",
            self.started_at.format("%Y%m%dT%H%M%SZ"),
            self.run_id
        )
    }
}
