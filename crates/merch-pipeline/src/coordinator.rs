//! The pipeline coordinator.
//!
//! A run walks [`Stage::ALL`] once. Content and Visual are external
//! generators whose only contract is the file they leave in the artifact
//! store; [`ArtifactPolicy`] decides whether a failed generator or a missing
//! file stops the run or falls through to the merger's defaults. From Merge
//! onwards every failure stops the run. Report always runs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use merch_core::{
    ArtifactError, ArtifactStore, MergedPayload, MockupRecord, PayloadMerger, ProductStatus,
    PublishResult, PublishedPayload,
};
use merch_publisher::Publisher;
use serde::{Deserialize, Serialize};
use tracing::Instrument as _;
use uuid::Uuid;

use crate::confirm::PublishConfirmation;
use crate::error::{StageError, StageFailure};
use crate::modes::RunMode;
use crate::stage::Stage;
use crate::stages::{ContentStage, VisualStage};
use crate::summary::{RunOutcome, RunSummary};

/// Final payload written when the target has no status model.
pub const FINAL_PAYLOAD_FILE: &str = "final_product_payload.json";
/// Final payload written after a commerce-platform publish.
pub const PUBLISHED_PAYLOAD_FILE: &str = "shopify_product_payload.json";

const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(300);

/// What to do when a generator stage fails or leaves no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactPolicy {
    /// Stop the run at that stage.
    Strict,
    /// Log a warning and let the merger substitute defaults.
    Lenient,
}

impl fmt::Display for ArtifactPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactPolicy::Strict => write!(f, "strict"),
            ArtifactPolicy::Lenient => write!(f, "lenient"),
        }
    }
}

/// Everything a finished run hands back to its caller.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    /// `None` when the summary could not be written.
    pub summary_path: Option<PathBuf>,
}

impl RunReport {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.summary.outcome.is_success()
    }

    /// One-line human-readable outcome.
    #[must_use]
    pub fn describe(&self) -> String {
        let summary = &self.summary;
        let mut line = match &summary.outcome {
            RunOutcome::Succeeded => match (&summary.external_id, summary.status) {
                (Some(id), Some(status)) => {
                    let mut text = format!(
                        "{} run {} succeeded: product {id} is {status}",
                        summary.mode, summary.run_id
                    );
                    if let Some(url) = &summary.admin_url {
                        text.push_str(&format!(" ({url})"));
                    }
                    if let Some(store) = &summary.store_url {
                        text.push_str(&format!(", storefront {store}"));
                    }
                    text
                }
                _ => format!(
                    "{} run {} succeeded: payload delivered via {}",
                    summary.mode, summary.run_id, summary.publisher
                ),
            },
            RunOutcome::Failed { stage, reason } => format!(
                "{} run {} stopped at the {stage} stage: {reason}",
                summary.mode, summary.run_id
            ),
        };
        match &self.summary_path {
            Some(path) => line.push_str(&format!("; summary at {}", path.display())),
            None => line.push_str("; run summary could not be written"),
        }
        line
    }
}

/// State accumulated while the stages run.
#[derive(Default)]
struct RunProgress {
    payload: Option<MergedPayload>,
    product_fallback: Option<String>,
    mockup_fallback: Option<String>,
    image_path: Option<PathBuf>,
    result: Option<PublishResult>,
    completed: Vec<Stage>,
}

/// Runs one pipeline variant: a mode, an artifact policy, two generator
/// stages and a publisher.
pub struct Coordinator {
    mode: RunMode,
    policy: ArtifactPolicy,
    store: ArtifactStore,
    merger: PayloadMerger,
    content: ContentStage,
    visual: VisualStage,
    publisher: Publisher,
    stage_timeout: Duration,
}

impl Coordinator {
    /// A coordinator with both generator stages skipped.
    #[must_use]
    pub fn new(
        mode: RunMode,
        policy: ArtifactPolicy,
        store: ArtifactStore,
        publisher: Publisher,
    ) -> Self {
        Self {
            mode,
            policy,
            merger: PayloadMerger::for_store(&store),
            store,
            content: ContentStage::Skipped,
            visual: VisualStage::Skipped,
            publisher,
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: ContentStage) -> Self {
        self.content = content;
        self
    }

    #[must_use]
    pub fn with_visual(mut self, visual: VisualStage) -> Self {
        self.visual = visual;
        self
    }

    #[must_use]
    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Executes the run once.
    ///
    /// Never returns an error: a failing stage ends the run with a
    /// stage-tagged [`RunOutcome::Failed`], and the summary is written in
    /// every case. `confirmation` is asked at most once, and only after a
    /// draft was created on a target that supports a status change.
    pub async fn run<C>(&self, confirmation: &mut C) -> RunReport
    where
        C: PublishConfirmation + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = tracing::info_span!(
            "pipeline_run",
            %run_id,
            mode = %self.mode,
            policy = %self.policy,
            publisher = self.publisher.kind(),
        );

        async {
            tracing::info!(
                content = self.content.kind(),
                visual = self.visual.kind(),
                "pipeline run started"
            );

            let mut progress = RunProgress::default();
            let mut outcome = match self.execute(&mut progress, confirmation).await {
                Ok(()) => RunOutcome::Succeeded,
                Err(failure) => {
                    tracing::error!(stage = %failure.stage, error = %failure.error, "pipeline run stopped");
                    RunOutcome::Failed {
                        stage: failure.stage,
                        reason: failure.error.to_string(),
                    }
                }
            };

            let payload_path = match self.write_final_payload(&progress) {
                Ok(path) => path,
                Err(e) => {
                    tracing::error!(error = %e, "failed to write final payload");
                    if outcome.is_success() {
                        outcome = RunOutcome::Failed {
                            stage: Stage::Report,
                            reason: e.to_string(),
                        };
                    }
                    None
                }
            };

            let mut summary = RunSummary {
                run_id,
                mode: self.mode,
                policy: self.policy,
                publisher: self.publisher.kind().to_string(),
                store_url: self.publisher.store_url(),
                started_at,
                finished_at: Utc::now(),
                content_path: self.store.product_record_path(),
                mockup_path: self.store.mockup_record_path(),
                image_path: progress
                    .image_path
                    .clone()
                    .unwrap_or_else(|| self.store.mockup_image_path()),
                product_fallback: progress.product_fallback.take(),
                mockup_fallback: progress.mockup_fallback.take(),
                stages_completed: progress.completed.clone(),
                external_id: progress.result.as_ref().and_then(|r| r.external_id.clone()),
                status: progress.result.as_ref().map(|r| r.status),
                admin_url: progress.result.as_ref().and_then(|r| r.admin_url.clone()),
                payload_path,
                outcome,
            };
            if summary.outcome.is_success() {
                summary.stages_completed.push(Stage::Report);
            }

            let summary_path = self.store.runs_dir().join(summary.file_name());
            let summary_path = match ArtifactStore::write_json(&summary_path, &summary) {
                Ok(()) => {
                    tracing::info!(path = %summary_path.display(), "run summary written");
                    Some(summary_path)
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to write run summary");
                    if summary.outcome.is_success() {
                        summary.outcome = RunOutcome::Failed {
                            stage: Stage::Report,
                            reason: e.to_string(),
                        };
                        summary.stages_completed.pop();
                    }
                    None
                }
            };

            let report = RunReport {
                summary,
                summary_path,
            };
            tracing::info!(succeeded = report.succeeded(), "{}", report.describe());
            report
        }
        .instrument(span)
        .await
    }

    async fn execute<C>(
        &self,
        progress: &mut RunProgress,
        confirmation: &mut C,
    ) -> Result<(), StageFailure>
    where
        C: PublishConfirmation + ?Sized,
    {
        self.store
            .ensure_root()
            .map_err(|e| StageFailure::new(Stage::Content, e))?;

        let outcome = self.content.run(&self.store, self.stage_timeout).await;
        self.settle(Stage::Content, outcome, &self.store.product_record_path())?;
        progress.completed.push(Stage::Content);

        let outcome = self.visual.run(&self.store, self.stage_timeout).await;
        self.settle(Stage::Visual, outcome, &self.store.mockup_record_path())?;
        progress.completed.push(Stage::Visual);

        let payload = self.merge(progress)?;
        progress.completed.push(Stage::Merge);

        let image_path = self.local_image_path(&payload.mockup);
        progress.image_path = Some(image_path.clone());
        let payload = progress.payload.insert(payload);
        let result = self
            .publisher
            .publish(payload, Some(&image_path))
            .await
            .map_err(|e| StageFailure::new(Stage::Publish, e))?;
        tracing::info!(
            external_id = result.external_id.as_deref().unwrap_or("-"),
            status = %result.status,
            "payload published"
        );
        progress.result = Some(result);
        progress.completed.push(Stage::Publish);

        if self.publisher.supports_status_change() {
            if let Some(result) = progress.result.take() {
                progress.result = Some(self.change_status(result, confirmation).await);
                progress.completed.push(Stage::PublishStatusChange);
            }
        }

        Ok(())
    }

    /// Applies the artifact policy to a generator stage's result.
    fn settle(
        &self,
        stage: Stage,
        outcome: Result<(), StageError>,
        expected: &Path,
    ) -> Result<(), StageFailure> {
        if let Err(e) = outcome {
            match self.policy {
                ArtifactPolicy::Strict => return Err(StageFailure::new(stage, e)),
                ArtifactPolicy::Lenient => {
                    tracing::warn!(%stage, error = %e, "stage failed; continuing with defaults");
                }
            }
        }

        if ArtifactStore::exists(expected) {
            tracing::info!(%stage, path = %expected.display(), "stage output present");
            return Ok(());
        }

        match self.policy {
            ArtifactPolicy::Strict => Err(StageFailure::new(
                stage,
                ArtifactError::Missing {
                    path: expected.display().to_string(),
                },
            )),
            ArtifactPolicy::Lenient => {
                tracing::warn!(
                    %stage,
                    path = %expected.display(),
                    "expected output missing; default record will be used"
                );
                Ok(())
            }
        }
    }

    fn merge(&self, progress: &mut RunProgress) -> Result<MergedPayload, StageFailure> {
        let content_path = self.store.product_record_path();
        let mockup_path = self.store.mockup_record_path();

        let payload = match self.policy {
            ArtifactPolicy::Strict => self
                .merger
                .merge_strict(&content_path, &mockup_path)
                .map_err(|e| StageFailure::new(Stage::Merge, e))?,
            ArtifactPolicy::Lenient => {
                let merged = self.merger.merge(&content_path, &mockup_path);
                if let merch_core::RecordSource::Fallback { reason } = merged.product_source {
                    tracing::warn!(%reason, "using default product record");
                    progress.product_fallback = Some(reason);
                }
                if let merch_core::RecordSource::Fallback { reason } = merged.mockup_source {
                    tracing::warn!(%reason, "using default mockup record");
                    progress.mockup_fallback = Some(reason);
                }
                merged.payload
            }
        };

        tracing::info!(
            title = %payload.product.title,
            tags = payload.product.tags.len(),
            "payload merged"
        );
        Ok(payload)
    }

    /// Asks for confirmation and, on yes, moves the draft to active.
    ///
    /// A declined or failed activation leaves the result as draft.
    async fn change_status<C>(&self, result: PublishResult, confirmation: &mut C) -> PublishResult
    where
        C: PublishConfirmation + ?Sized,
    {
        if result.status != ProductStatus::Draft {
            return result;
        }
        if !confirmation.confirm(&result) {
            tracing::info!("publish declined; product left as draft");
            return result;
        }
        if self.publisher.activate(&result).await {
            result.activated()
        } else {
            tracing::warn!("activation failed; product left as draft");
            result
        }
    }

    /// Resolves the mockup image to attach. Remote URLs fall back to the
    /// store's conventional `mockup.png`.
    fn local_image_path(&self, mockup: &MockupRecord) -> PathBuf {
        let url = mockup.mockup_url.as_str();
        if url.starts_with("http://") || url.starts_with("https://") || url.trim().is_empty() {
            return self.store.mockup_image_path();
        }
        let path = PathBuf::from(url);
        if path.is_absolute() {
            path
        } else {
            self.store.root().join(path)
        }
    }

    /// Writes the merged payload, with the platform result attached when
    /// there is one. Nothing is written when the run stopped before merging;
    /// a failed publish still leaves the bare payload behind.
    fn write_final_payload(&self, progress: &RunProgress) -> Result<Option<PathBuf>, ArtifactError> {
        let Some(payload) = &progress.payload else {
            return Ok(None);
        };

        let path = match &progress.result {
            Some(result) if self.publisher.supports_status_change() => {
                let path = self.store.path(PUBLISHED_PAYLOAD_FILE);
                let published = PublishedPayload {
                    payload: payload.clone(),
                    shopify: result.clone(),
                };
                ArtifactStore::write_json(&path, &published)?;
                path
            }
            _ => {
                let path = self.store.path(FINAL_PAYLOAD_FILE);
                ArtifactStore::write_json(&path, payload)?;
                path
            }
        };

        tracing::info!(path = %path.display(), "final payload written");
        Ok(Some(path))
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
