mod confirm;

use clap::{Parser, Subcommand};
use merch_core::AppConfig;
use merch_pipeline::{PublishConfirmation, RunReport};
use tracing_subscriber::EnvFilter;

use crate::confirm::StdinConfirmation;

#[derive(Debug, Parser)]
#[command(name = "merch")]
#[command(about = "Generate, render and publish a merch product")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List a few products to verify commerce credentials and connectivity
    Check,
    /// Publish the built-in sample product to the commerce platform
    Demo {
        /// Activate the created draft without asking
        #[arg(long)]
        yes: bool,
    },
    /// Run the configured stages offline and post to the generic endpoint
    Simulate,
    /// Run every stage strictly and publish to the commerce platform
    Run {
        /// Activate the created draft without asking
        #[arg(long)]
        yes: bool,
    },
}

/// Mode chosen when no subcommand is given.
fn detect_command(config: &AppConfig) -> Commands {
    if config.has_shopify_credentials() {
        Commands::Demo { yes: false }
    } else if config.has_openai_credentials() {
        Commands::Run { yes: false }
    } else {
        Commands::Simulate
    }
}

fn confirmation(yes: bool) -> Box<dyn PublishConfirmation> {
    if yes {
        Box::new(true)
    } else {
        Box::new(StdinConfirmation)
    }
}

fn finish(report: &RunReport) -> anyhow::Result<()> {
    println!("{}", report.describe());
    if report.succeeded() {
        Ok(())
    } else {
        anyhow::bail!("pipeline run failed")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = merch_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let command = match cli.command {
        Some(command) => command,
        None => {
            let detected = detect_command(&config);
            tracing::info!(?detected, "no command given; auto-detected mode");
            detected
        }
    };

    match command {
        Commands::Check => {
            let report = merch_pipeline::check_connection(&config).await?;
            println!(
                "connected to {}: {} product(s) listed",
                report.shop_domain,
                report.products.len()
            );
            for product in &report.products {
                println!(
                    "  {} {} [{}]",
                    product.id,
                    product.title,
                    product.status.as_deref().unwrap_or("unknown")
                );
            }
            Ok(())
        }
        Commands::Demo { yes } => {
            let mut confirm = confirmation(yes);
            let report = merch_pipeline::run_platform_demo(&config, confirm.as_mut()).await?;
            finish(&report)
        }
        Commands::Simulate => {
            let report = merch_pipeline::run_simulation(&config, &mut false).await?;
            finish(&report)
        }
        Commands::Run { yes } => {
            let mut confirm = confirmation(yes);
            let report = merch_pipeline::run_full_pipeline(&config, confirm.as_mut()).await?;
            finish(&report)
        }
    }
}
