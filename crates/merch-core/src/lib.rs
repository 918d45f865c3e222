//! Shared data model, configuration, and artifact hand-off for the merch
//! publishing pipeline.

pub mod app_config;
pub mod artifacts;
pub mod config;
pub mod merge;
pub mod records;

use thiserror::Error;

pub use app_config::{AppConfig, ShopifyCredentials};
pub use artifacts::{ArtifactError, ArtifactStore};
pub use config::{load_app_config, load_app_config_from_env};
pub use merge::{Merged, PayloadMerger, RecordSource};
pub use records::{
    MergedPayload, MockupRecord, ProductRecord, ProductStatus, PublishResult, PublishedPayload,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("{var} still holds the placeholder value \"{value}\"; set real credentials in .env")]
    Placeholder { var: String, value: String },
}
