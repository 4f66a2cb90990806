//! Thin HTTP client for an OpenAI-compatible image generation API.
//!
//! - `request_image_url` posts the styled prompt to `/images/generations`.
//! - `download_image` fetches the returned URL and decodes the bytes.
//! - `generate` runs both, in order. Nothing is retried.
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::buffer::GeneratedImage;
use crate::config::Config;
use crate::error::GenerationError;
use crate::generation::prompt::Prompt;

const CONTENT_POLICY_CODE: &str = "content_policy_violation";

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    code: Option<String>,
}

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    size: String,
    style_suffix: String,
}

impl ImageClient {
    pub fn new(config: &Config) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(GenerationError::Network)?;
        Ok(ImageClient {
            client,
            base_url: config.openai_api_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
            model: config.image_model.clone(),
            size: config.image_size.clone(),
            style_suffix: config.style_suffix.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate one coloring-page image for `prompt`.
    pub async fn generate(&self, prompt: &Prompt) -> Result<GeneratedImage, GenerationError> {
        let styled = prompt.styled(&self.style_suffix);
        let url = self.request_image_url(&styled).await?;
        let image = self.download_image(&url).await?;
        tracing::info!(width = image.width(), height = image.height(), "image generated");
        Ok(image)
    }

    /// Ask the provider for a single image and return its URL.
    pub async fn request_image_url(&self, styled_prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/images/generations", self.base_url);
        tracing::info!(model = %self.model, size = %self.size, prompt = %styled_prompt, "requesting image");

        let body = ImageRequest {
            model: &self.model,
            prompt: styled_prompt,
            n: 1,
            size: &self.size,
        };
        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.map_err(|e| {
            tracing::warn!("image request failed: {}", e);
            GenerationError::Network(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(GenerationError::Network)?;
        if !status.is_success() {
            let err = provider_error(status.as_u16(), &text);
            tracing::warn!(kind = err.kind(), "{}", err);
            return Err(err);
        }

        let parsed: ImageResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        let first = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::MalformedResponse("response contained no images".to_string()))?;
        if let Some(revised) = &first.revised_prompt {
            tracing::debug!("provider revised prompt: {}", revised);
        }
        let image_url = first
            .url
            .ok_or_else(|| GenerationError::MalformedResponse("image entry has no url".to_string()))?;
        tracing::debug!("image available at {}", image_url);
        Ok(image_url)
    }

    /// Fetch the bytes at `url` and decode them.
    pub async fn download_image(&self, url: &str) -> Result<GeneratedImage, GenerationError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!("image download failed: {}", e);
            GenerationError::Network(e)
        })?;
        if !response.status().is_success() {
            return Err(download_error(response.status().as_u16(), url));
        }
        let bytes = response.bytes().await.map_err(GenerationError::Network)?;
        tracing::debug!(bytes = bytes.len(), "downloaded image");
        GeneratedImage::from_bytes(&bytes).map_err(|e| {
            tracing::warn!("image decode failed: {}", e);
            GenerationError::Decode(e)
        })
    }
}

fn download_error(status: u16, url: &str) -> GenerationError {
    let err = GenerationError::Download { status, url: url.to_string() };
    tracing::warn!(kind = err.kind(), "{}", err);
    err
}

/// Classify a non-2xx body from the generation endpoint.
fn provider_error(status: u16, body: &str) -> GenerationError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) if env.error.code.as_deref() == Some(CONTENT_POLICY_CODE) => {
            GenerationError::Rejected { message: env.error.message }
        }
        Ok(env) => GenerationError::Provider { status, message: env.error.message },
        Err(_) => GenerationError::Provider {
            status,
            message: if body.trim().is_empty() { "empty response body".to_string() } else { body.trim().to_string() },
        },
    }
}
