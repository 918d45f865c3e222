use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional here. Commerce credentials are validated only
/// when a commerce publisher is built (see [`AppConfig::shopify_credentials`]),
/// so offline runs work with an empty environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be at least one second".to_string(),
            });
        }
        Ok(secs)
    };

    let log_level = or_default("MERCH_LOG_LEVEL", "info");
    let artifact_dir = PathBuf::from(or_default("MERCH_ARTIFACT_DIR", "./artifacts"));
    let request_timeout_secs = parse_secs("MERCH_REQUEST_TIMEOUT_SECS", "30")?;
    let stage_timeout_secs = parse_secs("MERCH_STAGE_TIMEOUT_SECS", "300")?;
    let user_agent = or_default("MERCH_USER_AGENT", "merchmaker/0.1 (publishing-pipeline)");
    let publish_endpoint = or_default(
        "MERCH_PUBLISH_ENDPOINT",
        "http://localhost:8000/publisher.php",
    );
    let content_command = optional("MERCH_CONTENT_COMMAND");
    let visual_command = optional("MERCH_VISUAL_COMMAND");

    let shopify_shop_url = optional("SHOPIFY_SHOP_URL");
    let shopify_access_token = optional("SHOPIFY_ACCESS_TOKEN");
    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2024-01");

    let openai_api_key = optional("OPENAI_API_KEY");
    let openai_base_url = or_default("OPENAI_BASE_URL", "https://api.openai.com/v1");

    Ok(AppConfig {
        log_level,
        artifact_dir,
        request_timeout_secs,
        stage_timeout_secs,
        user_agent,
        publish_endpoint,
        content_command,
        visual_command,
        shopify_shop_url,
        shopify_access_token,
        shopify_api_version,
        openai_api_key,
        openai_base_url,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
