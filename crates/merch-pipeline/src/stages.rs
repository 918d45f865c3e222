//! The two generator stages the coordinator drives before merging.

use std::time::Duration;

use merch_content::OpenAiContentClient;
use merch_core::{AppConfig, ArtifactStore, ProductRecord};

use crate::command::StageCommand;
use crate::error::{PipelineError, StageError};

/// Produces `product.json` (and usually `generated_image.png`).
pub enum ContentStage {
    /// An external generator process.
    External(StageCommand),
    /// The built-in OpenAI client.
    OpenAi(OpenAiContentClient),
    /// Writes a fixed record. Used by the platform demo and offline tests.
    Fixed(ProductRecord),
    /// Leaves the artifact store untouched.
    Skipped,
}

impl ContentStage {
    /// Picks the content stage from configuration: an explicit command wins,
    /// then the OpenAI client when a real key is present, otherwise skipped.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::EmptyCommand`] if the configured command is blank.
    /// - [`PipelineError::Content`] if the OpenAI client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        if let Some(line) = config.content_command.as_deref() {
            let command = line.parse::<StageCommand>().map_err(|_| PipelineError::EmptyCommand {
                var: "MERCH_CONTENT_COMMAND",
            })?;
            return Ok(Self::External(command));
        }
        match config.openai_api_key.as_deref() {
            Some(key) if config.has_openai_credentials() => {
                let client = OpenAiContentClient::with_base_url(
                    key,
                    config.request_timeout_secs,
                    &config.user_agent,
                    &config.openai_base_url,
                )?;
                Ok(Self::OpenAi(client))
            }
            _ => Ok(Self::Skipped),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ContentStage::External(_) => "external",
            ContentStage::OpenAi(_) => "openai",
            ContentStage::Fixed(_) => "fixed",
            ContentStage::Skipped => "skipped",
        }
    }

    pub(crate) async fn run(
        &self,
        store: &ArtifactStore,
        timeout: Duration,
    ) -> Result<(), StageError> {
        match self {
            ContentStage::External(command) => command.run(store.root(), timeout).await,
            ContentStage::OpenAi(client) => {
                client.generate_into(store).await?;
                Ok(())
            }
            ContentStage::Fixed(record) => {
                ArtifactStore::write_json(&store.product_record_path(), record)?;
                Ok(())
            }
            ContentStage::Skipped => {
                tracing::info!("content stage skipped");
                Ok(())
            }
        }
    }
}

/// Produces `mockup.json` and `mockup.png`.
pub enum VisualStage {
    External(StageCommand),
    Skipped,
}

impl VisualStage {
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyCommand`] if the configured command is blank.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        match config.visual_command.as_deref() {
            Some(line) => {
                let command = line.parse::<StageCommand>().map_err(|_| PipelineError::EmptyCommand {
                    var: "MERCH_VISUAL_COMMAND",
                })?;
                Ok(Self::External(command))
            }
            None => Ok(Self::Skipped),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            VisualStage::External(_) => "external",
            VisualStage::Skipped => "skipped",
        }
    }

    pub(crate) async fn run(
        &self,
        store: &ArtifactStore,
        timeout: Duration,
    ) -> Result<(), StageError> {
        match self {
            VisualStage::External(command) => command.run(store.root(), timeout).await,
            VisualStage::Skipped => {
                tracing::info!("visual stage skipped");
                Ok(())
            }
        }
    }
}
