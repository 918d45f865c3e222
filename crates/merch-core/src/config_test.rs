use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with real-looking commerce credentials.
fn shopify_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("SHOPIFY_SHOP_URL", "https://merch-lab.myshopify.com/");
    m.insert("SHOPIFY_ACCESS_TOKEN", "shpat_0123456789");
    m
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.artifact_dir, PathBuf::from("./artifacts"));
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.stage_timeout_secs, 300);
    assert_eq!(cfg.user_agent, "merchmaker/0.1 (publishing-pipeline)");
    assert_eq!(cfg.publish_endpoint, "http://localhost:8000/publisher.php");
    assert!(cfg.content_command.is_none());
    assert!(cfg.visual_command.is_none());
    assert!(cfg.shopify_shop_url.is_none());
    assert_eq!(cfg.shopify_api_version, "2024-01");
    assert!(cfg.openai_api_key.is_none());
    assert_eq!(cfg.openai_base_url, "https://api.openai.com/v1");
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("MERCH_REQUEST_TIMEOUT_SECS", "12");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 12);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("MERCH_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MERCH_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(MERCH_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn stage_timeout_rejects_zero() {
    let mut map = HashMap::new();
    map.insert("MERCH_STAGE_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MERCH_STAGE_TIMEOUT_SECS"),
        "expected InvalidEnvVar(MERCH_STAGE_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn blank_commands_are_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("MERCH_CONTENT_COMMAND", "   ");
    map.insert("MERCH_VISUAL_COMMAND", "node mockup_visualizer.js");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.content_command.is_none());
    assert_eq!(
        cfg.visual_command.as_deref(),
        Some("node mockup_visualizer.js")
    );
}

#[test]
fn shopify_credentials_strip_scheme_and_trailing_slash() {
    let map = shopify_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let creds = cfg.shopify_credentials().unwrap();
    assert_eq!(creds.shop_domain, "merch-lab.myshopify.com");
    assert_eq!(creds.access_token, "shpat_0123456789");
    assert_eq!(creds.api_version, "2024-01");
    assert!(cfg.has_shopify_credentials());
}

#[test]
fn shopify_credentials_missing_token() {
    let mut map = shopify_env();
    map.remove("SHOPIFY_ACCESS_TOKEN");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let result = cfg.shopify_credentials();
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPIFY_ACCESS_TOKEN"),
        "expected MissingEnvVar(SHOPIFY_ACCESS_TOKEN), got: {result:?}"
    );
}

#[test]
fn shopify_credentials_reject_placeholder_store() {
    let mut map = shopify_env();
    map.insert("SHOPIFY_SHOP_URL", "your-store.myshopify.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let result = cfg.shopify_credentials();
    assert!(
        matches!(result, Err(ConfigError::Placeholder { ref var, .. }) if var == "SHOPIFY_SHOP_URL"),
        "expected Placeholder(SHOPIFY_SHOP_URL), got: {result:?}"
    );
    assert!(!cfg.has_shopify_credentials());
}

#[test]
fn shopify_credentials_reject_placeholder_token() {
    let mut map = shopify_env();
    map.insert("SHOPIFY_ACCESS_TOKEN", "your-access-token");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(matches!(
        cfg.shopify_credentials(),
        Err(ConfigError::Placeholder { ref var, .. }) if var == "SHOPIFY_ACCESS_TOKEN"
    ));
}

#[test]
fn openai_placeholder_is_not_a_credential() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "your-openai-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.has_openai_credentials());

    map.insert("OPENAI_API_KEY", "sk-live");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.has_openai_credentials());
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = shopify_env();
    map.insert("OPENAI_API_KEY", "sk-secret-value");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("shpat_0123456789"));
    assert!(!rendered.contains("sk-secret-value"));
    assert!(rendered.contains("[redacted]"));
}
