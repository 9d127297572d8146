//! Completion gateway: turns a validated generation request into source text
//! via an OpenRouter chat-completion call.
//!
//! The gateway is exposed as the narrow [`CompletionGateway`] capability so
//! callers (HTTP handler, session) can be exercised against a fake in tests.

use crate::config::Config;
use crate::generate::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

/// Sampling temperature for every generation request.
const TEMPERATURE: f32 = 0.7;

/// Upper bound on generated output length.
const MAX_TOKENS: u32 = 1000;

/// Application title sent in OpenRouter's attribution header.
const APP_TITLE: &str = "Code Copilot";

/// Any failure between the gateway and the upstream provider: network errors,
/// auth rejections, rate limits, malformed responses. Surfaced uniformly with
/// a human-readable detail string; never retried here.
#[derive(Debug, Clone, Error)]
#[error("{detail}")]
pub struct GenerationFailed {
    pub detail: String,
}

impl GenerationFailed {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// The one thing a completion backend can do.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn generate(&self, request: &GenerateRequest)
        -> Result<GenerateResponse, GenerationFailed>;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// Like [`Message`], but tolerates providers that omit `content` entirely.
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Gateway backed by OpenRouter's chat-completions endpoint.
pub struct OpenRouterGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    site_url: String,
}

impl OpenRouterGateway {
    pub fn new(api_key: String, base_url: String, model: String, site_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
            site_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.openrouter_api_key.clone(),
            config.openrouter_base_url.clone(),
            config.openrouter_model.clone(),
            config.site_url.clone(),
        )
    }

    /// System instruction naming the target language and constraining the
    /// output to raw code.
    fn system_prompt(request: &GenerateRequest) -> String {
        format!(
            "You are a code generation assistant. Generate clean, well-commented code in {}. \
             Only return the code without explanations, markdown formatting, or backticks.",
            request.language.label()
        )
    }
}

#[async_trait]
impl CompletionGateway for OpenRouterGateway {
    async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, GenerationFailed> {
        let chat_request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: Self::system_prompt(request),
                },
                Message {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        info!(
            language = request.language.code(),
            model = %self.model,
            prompt_chars = request.prompt.len(),
            "Requesting code generation"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", APP_TITLE)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!("Provider request failed: {}", e);
                GenerationFailed::new(format!("request to provider failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Provider returned {}: {}", status, body);
            return Err(GenerationFailed::new(format!(
                "provider error ({}): {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!("Failed to parse provider response: {}", e);
            GenerationFailed::new(format!("failed to parse provider response: {}", e))
        })?;

        // A response without content is normalized to an empty string, never
        // an error.
        let code = chat_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string();

        debug!(code_chars = code.len(), "Received generated code");

        Ok(GenerateResponse { code })
    }
}
