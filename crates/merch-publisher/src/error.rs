use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("configuration error: {0}")]
    Config(#[from] merch_core::ConfigError),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{operation} rejected with HTTP {status}: {body}")]
    Rejected {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not read image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
