//! HTTP client for the OpenAI chat-completion and image-generation APIs.

use std::time::Duration;

use merch_core::{ArtifactStore, ProductRecord};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::parse::parse_product_record;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const CHAT_MODEL: &str = "gpt-3.5-turbo";
const CHAT_MAX_TOKENS: u32 = 300;
const CHAT_TEMPERATURE: f32 = 0.9;
const PRODUCT_PROMPT: &str = "Generate a creative product idea for a t-shirt. \
     Return a JSON with: title, description, and 5-10 tags.";

const IMAGE_MODEL: &str = "dall-e-3";
const IMAGE_SIZE: &str = "1024x1024";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

/// Content-stage client for OpenAI.
///
/// Use [`OpenAiContentClient::new`] for production or
/// [`OpenAiContentClient::with_base_url`] to point at a mock server in tests.
pub struct OpenAiContentClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiContentClient {
    /// # Errors
    ///
    /// Returns [`ContentError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ContentError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// - [`ContentError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`ContentError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ContentError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| ContentError::InvalidBaseUrl {
            base_url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Asks the chat model for a product idea and parses it.
    ///
    /// # Errors
    ///
    /// - [`ContentError::Http`] on network failure or timeout.
    /// - [`ContentError::Api`] on a non-2xx response.
    /// - [`ContentError::EmptyResponse`] if no choice carries content.
    /// - [`ContentError::MalformedRecord`] if the content is not a product record.
    pub async fn generate_product(&self) -> Result<ProductRecord, ContentError> {
        let request = ChatRequest {
            model: CHAT_MODEL,
            messages: [ChatMessage {
                role: "user",
                content: PRODUCT_PROMPT,
            }],
            max_tokens: CHAT_MAX_TOKENS,
            temperature: CHAT_TEMPERATURE,
        };

        let body = self
            .post_json("/chat/completions", &request, "chat completion")
            .await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ContentError::Deserialize {
                context: "chat completion",
                source: e,
            })?;

        let content = parsed
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ContentError::EmptyResponse("chat completion"))?;

        tracing::debug!(chars = content.len(), "received product copy");
        parse_product_record(&content)
    }

    /// Generates one image for `prompt` and downloads it.
    ///
    /// # Errors
    ///
    /// - [`ContentError::Http`] on network failure or timeout.
    /// - [`ContentError::Api`] on a non-2xx response from either call.
    /// - [`ContentError::EmptyResponse`] if no image URL is returned.
    pub async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ContentError> {
        let request = ImageRequest {
            model: IMAGE_MODEL,
            prompt,
            n: 1,
            size: IMAGE_SIZE,
        };

        let body = self
            .post_json("/images/generations", &request, "image generation")
            .await?;
        let parsed: ImageResponse =
            serde_json::from_str(&body).map_err(|e| ContentError::Deserialize {
                context: "image generation",
                source: e,
            })?;
        let url = parsed
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or(ContentError::EmptyResponse("image generation"))?;

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Api {
                operation: "image download",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Runs the whole content stage: product copy to `product.json`, artwork
    /// to `generated_image.png`.
    ///
    /// The product record is written before the image is requested, so a
    /// failed image call still leaves usable copy behind.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::generate_product`],
    /// [`Self::generate_image`], or the artifact writes.
    pub async fn generate_into(&self, store: &ArtifactStore) -> Result<ProductRecord, ContentError> {
        let record = self.generate_product().await?;
        ArtifactStore::write_json(&store.product_record_path(), &record)?;
        tracing::info!(title = %record.title, "product copy generated");

        let prompt = format!("A high-quality product image for: {}", record.title);
        let image = self.generate_image(&prompt).await?;
        ArtifactStore::write_bytes(&store.product_image_path(), &image)?;
        tracing::info!(bytes = image.len(), "product image generated");

        Ok(record)
    }

    async fn post_json<T: Serialize>(
        &self,
        endpoint: &str,
        request: &T,
        operation: &'static str,
    ) -> Result<String, ContentError> {
        let response = self
            .client
            .post(format!("{}{endpoint}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ContentError::Api {
                operation,
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
