use std::path::PathBuf;

use crate::ConfigError;

/// Values a store URL or token may start with when copied unedited from the
/// sample `.env`.
const PLACEHOLDER_PREFIX: &str = "your-";

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub artifact_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub stage_timeout_secs: u64,
    pub user_agent: String,
    pub publish_endpoint: String,
    pub content_command: Option<String>,
    pub visual_command: Option<String>,
    pub shopify_shop_url: Option<String>,
    pub shopify_access_token: Option<String>,
    pub shopify_api_version: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
}

/// Validated commerce-platform credentials.
#[derive(Clone)]
pub struct ShopifyCredentials {
    /// Bare host, e.g. `my-store.myshopify.com`: no scheme, no trailing slash.
    pub shop_domain: String,
    pub access_token: String,
    pub api_version: String,
}

impl AppConfig {
    /// Validates and returns the commerce-platform credentials.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingEnvVar`] if either value is unset or blank.
    /// - [`ConfigError::Placeholder`] if either value still holds a
    ///   `your-...` placeholder.
    pub fn shopify_credentials(&self) -> Result<ShopifyCredentials, ConfigError> {
        let shop_url = require_real("SHOPIFY_SHOP_URL", self.shopify_shop_url.as_deref())?;
        let access_token =
            require_real("SHOPIFY_ACCESS_TOKEN", self.shopify_access_token.as_deref())?;

        let shop_domain = shop_url
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string();

        Ok(ShopifyCredentials {
            shop_domain,
            access_token: access_token.trim().to_string(),
            api_version: self.shopify_api_version.clone(),
        })
    }

    /// `true` when commerce credentials are present and not placeholders.
    #[must_use]
    pub fn has_shopify_credentials(&self) -> bool {
        self.shopify_credentials().is_ok()
    }

    /// `true` when an AI API key is present and not a placeholder.
    #[must_use]
    pub fn has_openai_credentials(&self) -> bool {
        require_real("OPENAI_API_KEY", self.openai_api_key.as_deref()).is_ok()
    }
}

fn require_real<'a>(var: &str, value: Option<&'a str>) -> Result<&'a str, ConfigError> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))?;
    if value.trim().starts_with(PLACEHOLDER_PREFIX) {
        return Err(ConfigError::Placeholder {
            var: var.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value)
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("artifact_dir", &self.artifact_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("stage_timeout_secs", &self.stage_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("publish_endpoint", &self.publish_endpoint)
            .field("content_command", &self.content_command)
            .field("visual_command", &self.visual_command)
            .field("shopify_shop_url", &self.shopify_shop_url)
            .field(
                "shopify_access_token",
                &self.shopify_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("shopify_api_version", &self.shopify_api_version)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .finish()
    }
}

impl std::fmt::Debug for ShopifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyCredentials")
            .field("shop_domain", &self.shop_domain)
            .field("access_token", &"[redacted]")
            .field("api_version", &self.api_version)
            .finish()
    }
}
