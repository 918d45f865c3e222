use merch_content::ContentError;
use merch_core::{ArtifactError, ConfigError};
use merch_publisher::PublishError;

use crate::stage::Stage;

/// Why a single stage did not complete.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(
        "`{program}` failed ({}): {stderr}",
        .code.map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"))
    )]
    Execution {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{program}` did not finish within {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// A stage-tagged failure: the run stopped at `stage` because of `error`.
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {error}")]
pub struct StageFailure {
    pub stage: Stage,
    #[source]
    pub error: StageError,
}

impl StageFailure {
    #[must_use]
    pub fn new(stage: Stage, error: impl Into<StageError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }
}

/// Errors that prevent a run from starting at all.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("publisher setup failed: {0}")]
    Publisher(#[from] PublishError),

    #[error("content client setup failed: {0}")]
    Content(#[from] ContentError),

    #[error("invalid stage command in {var}: command is empty")]
    EmptyCommand { var: &'static str },
}
