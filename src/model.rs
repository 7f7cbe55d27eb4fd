//! Generative extraction service client.
//!
//! The pipeline depends on the `ExtractionModel` capability, not on a
//! concrete provider, so tests swap in mocks and deployments pick
//! their binding. The shipped binding speaks the OpenAI chat
//! completions API.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::ModelConfig;

/// Capability seam for the generative extraction service.
///
/// Pure request/response, no session state, no retries. Timeouts and
/// retry policy belong to the calling boundary.
#[async_trait]
pub trait ExtractionModel: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// OpenAI chat-completions binding.
pub struct OpenAiModel {
    client: Client,
    api_key: String,
    config: ModelConfig,
}

impl OpenAiModel {
    pub fn new(api_key: String, config: ModelConfig) -> Result<Self> {
        if api_key.is_empty() {
            return Err(anyhow!("OpenAI API key must not be empty"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    /// Create from `OPENAI_API_KEY` / `OPENAI_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;
        let mut config = ModelConfig::default();
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.model = model;
        }
        Self::new(api_key, config)
    }
}

#[async_trait]
impl ExtractionModel for OpenAiModel {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct OpenAiRequest {
            model: String,
            messages: Vec<OpenAiMessage>,
            max_tokens: u32,
            temperature: f32,
        }

        #[derive(Serialize, Deserialize)]
        struct OpenAiMessage {
            role: String,
            content: String,
        }

        #[derive(Deserialize)]
        struct OpenAiResponse {
            choices: Vec<OpenAiChoice>,
        }

        #[derive(Deserialize)]
        struct OpenAiChoice {
            message: OpenAiMessage,
        }

        let request = OpenAiRequest {
            model: self.config.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Calling OpenAI API with model: {}", self.config.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send OpenAI request")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI API error: {}", error_text));
        }

        let result: OpenAiResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        result
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| anyhow!("OpenAI response contained no choices"))
    }
}
