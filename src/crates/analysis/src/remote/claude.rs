//! Anthropic Claude vision backend.
//!
//! Sends the reference images plus the shared instruction prompt to the
//! Messages API and parses the reply into a [`Specification`].
//!
//! # Example
//!
//! ```rust,ignore
//! use analysis::remote::ClaudeBackend;
//! use analysis::{AnalysisBackend, EncodedImage};
//! use srefkit_core::StyleCode;
//!
//! let backend = ClaudeBackend::from_env()?;
//! let images = vec![EncodedImage::new(base64_data, "image/jpeg")];
//! let spec = backend.analyze(&images, &StyleCode::new("1234567890")).await?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use srefkit_core::{Specification, StyleCode};
use tracing::debug;

use crate::backend::{AnalysisBackend, BackendKind, EncodedImage};
use crate::config::RemoteConfig;
use crate::error::{AnalysisError, Result};
use crate::payload;
use crate::prompt::build_analysis_prompt;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude analysis backend.
#[derive(Clone)]
pub struct ClaudeBackend {
    config: RemoteConfig,
    client: Client,
}

impl ClaudeBackend {
    /// Create a new Claude backend with the given configuration.
    pub fn new(config: RemoteConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create a backend from the environment key variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(RemoteConfig::from_env()?))
    }

    /// Build the content blocks for one request: all images first, then the
    /// instruction prompt.
    fn build_content(&self, images: &[EncodedImage], style_code: &StyleCode) -> Vec<ContentBlock> {
        let mut content: Vec<ContentBlock> = images
            .iter()
            .map(|image| ContentBlock::Image {
                source: ImageSource {
                    source_type: "base64".to_string(),
                    media_type: image.media_type.clone(),
                    data: image.data.clone(),
                },
            })
            .collect();

        content.push(ContentBlock::Text {
            text: build_analysis_prompt(style_code.as_str(), images.len()),
        });

        content
    }
}

#[async_trait]
impl AnalysisBackend for ClaudeBackend {
    async fn analyze(
        &self,
        images: &[EncodedImage],
        style_code: &StyleCode,
    ) -> Result<Specification> {
        let url = format!("{}/v1/messages", self.config.base_url);

        let req_body = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_output_tokens,
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: self.build_content(images, style_code),
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&req_body)
            .send()
            .await
            .map_err(AnalysisError::HttpError)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(if status.as_u16() == 401 {
                AnalysisError::AuthenticationError(error_text)
            } else if status.as_u16() == 429 {
                AnalysisError::RateLimitExceeded(error_text)
            } else {
                AnalysisError::ProviderError(format!("Claude API error {status}: {error_text}"))
            });
        }

        let api_resp: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &api_resp.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "claude analysis complete"
            );
        }

        let text = api_resp
            .content
            .iter()
            .find_map(|block| block.text.as_deref())
            .ok_or_else(|| {
                AnalysisError::InvalidResponse("no text content in response".to_string())
            })?;

        payload::parse_specification(text)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }
}

// Anthropic Messages API types
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Image { source: ImageSource },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: String,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}
