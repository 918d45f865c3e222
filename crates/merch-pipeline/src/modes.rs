//! One entry point per run mode. All three drive the same [`Coordinator`];
//! they differ only in which stages, policy and publisher they wire up.

use std::fmt;
use std::time::Duration;

use merch_core::{AppConfig, ArtifactStore, ProductRecord};
use merch_publisher::{
    EndpointPublisher, ProductSummary, PublishError, Publisher, ShopifyAdminClient,
};
use serde::{Deserialize, Serialize};

use crate::confirm::PublishConfirmation;
use crate::coordinator::{ArtifactPolicy, Coordinator, RunReport};
use crate::error::PipelineError;
use crate::stages::{ContentStage, VisualStage};

/// Products requested by the connectivity self-test.
const SELF_TEST_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Fixed sample product, published to the commerce platform.
    PlatformDemo,
    /// Configured generators, posted to the generic endpoint.
    Simulation,
    /// Configured generators, strict artifacts, commerce platform.
    FullPipeline,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::PlatformDemo => write!(f, "platform-demo"),
            RunMode::Simulation => write!(f, "simulation"),
            RunMode::FullPipeline => write!(f, "full-pipeline"),
        }
    }
}

/// Result of [`check_connection`].
#[derive(Debug, Clone)]
pub struct ConnectionReport {
    pub shop_domain: String,
    /// Empty both for an empty store and for a failed request; the failure
    /// reason is logged by the client.
    pub products: Vec<ProductSummary>,
}

/// Connectivity self-test against the commerce platform.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] if commerce credentials are missing or
/// placeholders. Request failures are not errors.
pub async fn check_connection(config: &AppConfig) -> Result<ConnectionReport, PipelineError> {
    let client = shopify_client(config)?;
    let products = self_test(&client).await;
    Ok(ConnectionReport {
        shop_domain: client.shop_domain().to_string(),
        products,
    })
}

/// Publishes the built-in sample product to the commerce platform.
///
/// The visual stage is skipped, so the default mockup record is used unless
/// a `mockup.json` is already in the store.
///
/// # Errors
///
/// Returns [`PipelineError`] only for configuration problems, before any
/// network activity. Stage failures are reported in the [`RunReport`].
pub async fn run_platform_demo<C>(
    config: &AppConfig,
    confirmation: &mut C,
) -> Result<RunReport, PipelineError>
where
    C: PublishConfirmation + ?Sized,
{
    let client = shopify_client(config)?;
    self_test(&client).await;

    let coordinator = Coordinator::new(
        RunMode::PlatformDemo,
        ArtifactPolicy::Lenient,
        ArtifactStore::new(&config.artifact_dir),
        Publisher::Shopify(client),
    )
    .with_content(ContentStage::Fixed(ProductRecord::demo_sample()))
    .with_stage_timeout(Duration::from_secs(config.stage_timeout_secs));

    Ok(coordinator.run(confirmation).await)
}

/// Runs the configured generators leniently and posts the payload to the
/// generic publishing endpoint. Works with no credentials at all.
///
/// # Errors
///
/// Returns [`PipelineError`] if a stage command is blank or a client cannot
/// be built.
pub async fn run_simulation<C>(
    config: &AppConfig,
    confirmation: &mut C,
) -> Result<RunReport, PipelineError>
where
    C: PublishConfirmation + ?Sized,
{
    let endpoint = EndpointPublisher::new(
        &config.publish_endpoint,
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    let coordinator = Coordinator::new(
        RunMode::Simulation,
        ArtifactPolicy::Lenient,
        ArtifactStore::new(&config.artifact_dir),
        Publisher::Endpoint(endpoint),
    )
    .with_content(ContentStage::from_config(config)?)
    .with_visual(VisualStage::from_config(config)?)
    .with_stage_timeout(Duration::from_secs(config.stage_timeout_secs));

    Ok(coordinator.run(confirmation).await)
}

/// Runs the configured generators strictly and publishes to the commerce
/// platform.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] if commerce credentials are missing or
/// placeholders, or another [`PipelineError`] if a stage cannot be built.
pub async fn run_full_pipeline<C>(
    config: &AppConfig,
    confirmation: &mut C,
) -> Result<RunReport, PipelineError>
where
    C: PublishConfirmation + ?Sized,
{
    let client = shopify_client(config)?;
    let content = ContentStage::from_config(config)?;
    let visual = VisualStage::from_config(config)?;
    self_test(&client).await;

    let coordinator = Coordinator::new(
        RunMode::FullPipeline,
        ArtifactPolicy::Strict,
        ArtifactStore::new(&config.artifact_dir),
        Publisher::Shopify(client),
    )
    .with_content(content)
    .with_visual(visual)
    .with_stage_timeout(Duration::from_secs(config.stage_timeout_secs));

    Ok(coordinator.run(confirmation).await)
}

/// Builds the commerce client, surfacing credential problems as
/// [`PipelineError::Config`].
fn shopify_client(config: &AppConfig) -> Result<ShopifyAdminClient, PipelineError> {
    ShopifyAdminClient::from_config(config).map_err(|e| match e {
        PublishError::Config(c) => PipelineError::Config(c),
        other => PipelineError::Publisher(other),
    })
}

async fn self_test(client: &ShopifyAdminClient) -> Vec<ProductSummary> {
    let products = client.list_products(SELF_TEST_LIMIT).await;
    tracing::info!(
        shop = client.shop_domain(),
        products = products.len(),
        "connection self-test finished"
    );
    products
}
