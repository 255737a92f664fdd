//! llama.cpp server engine.
//!
//! Talks to a llama.cpp-compatible server (llama-server with a multimodal
//! projector loaded, LM Studio, etc.) over its OpenAI-style chat completions
//! endpoint, passing images as base64 data URIs.
//!
//! # Example
//!
//! ```rust,ignore
//! use analysis::config::LocalEngineConfig;
//! use analysis::local::{LlamaServerEngine, LocalBackend};
//!
//! let engine = LlamaServerEngine::new(LocalEngineConfig::default());
//! let backend = LocalBackend::new(engine);
//! ```

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::EncodedImage;
use crate::config::LocalEngineConfig;
use crate::local::VisionEngine;

/// Sampling temperature for structured JSON output.
const TEMPERATURE: f32 = 0.2;
/// Output token budget for one analysis response.
const MAX_TOKENS: u32 = 8192;

/// Client for a llama.cpp-compatible local inference server.
#[derive(Clone)]
pub struct LlamaServerEngine {
    config: LocalEngineConfig,
    client: Client,
}

impl LlamaServerEngine {
    /// Create a new engine client with the given configuration.
    pub fn new(config: LocalEngineConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Check if the server answers its health endpoint.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/health", self.config.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Data URI the OpenAI-style image part expects.
fn data_uri(image: &EncodedImage) -> String {
    format!("data:{};base64,{}", image.media_type, image.data)
}

#[async_trait]
impl VisionEngine for LlamaServerEngine {
    async fn is_available(&self) -> bool {
        self.check_health().await
    }

    async fn generate(&self, images: &[EncodedImage], prompt: &str) -> anyhow::Result<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let mut parts: Vec<ContentPart> = images
            .iter()
            .map(|image| ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: data_uri(image),
                },
            })
            .collect();
        parts.push(ContentPart::Text {
            text: prompt.to_string(),
        });

        let req_body = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: parts,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            stream: false,
        };

        debug!(
            url = %url,
            images = images.len(),
            "sending generation request to local server"
        );

        let response = self
            .client
            .post(&url)
            .json(&req_body)
            .send()
            .await
            .context("Failed to reach local inference server")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("local server error {status}: {error_text}");
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse local server response")?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .context("local server returned no choices")?;

        Ok(choice.message.content)
    }
}

// OpenAI-compatible chat completion types
#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    ImageUrl { image_url: ImageUrl },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}
