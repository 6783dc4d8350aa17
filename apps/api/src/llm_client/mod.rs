/// LLM Client — the single point of entry for completion calls.
///
/// Callers depend on the `CompletionClient` trait, never on the HTTP client directly,
/// so the analyzer can run against a stub in tests and without credentials in dev.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 400;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

/// A capability that turns a prompt into model-generated text.
///
/// `Ok(None)` means the call succeeded but the model produced no content.
/// Content is returned as generated; callers strip Markdown fences themselves.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<Option<String>, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// OpenAI-compatible chat completions client with retry on rate limits and 5xx.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            model,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    /// Builds a client from config, or `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, LlmError> {
        let Some(api_key) = config.openai_api_key.clone() else {
            return Ok(None);
        };
        Self::new(
            api_key,
            config.openai_model.clone(),
            &config.openai_base_url,
            Duration::from_secs(config.llm_timeout_secs),
        )
        .map(Some)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a raw call to the chat completions API, returning the full response object.
    /// Retries on 429, 5xx and transport errors with exponential backoff.
    pub async fn call(&self, system: &str, prompt: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let chat: ChatResponse = serde_json::from_str(&body)?;

            if let Some(usage) = &chat.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}, finish_reason={}",
                    usage.prompt_tokens,
                    usage.completion_tokens,
                    chat.choices
                        .first()
                        .and_then(|c| c.finish_reason.as_deref())
                        .unwrap_or("unknown")
                );
            }

            return Ok(chat);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<Option<String>, LlmError> {
        let response = self.call(system, prompt).await?;
        Ok(response.text().map(str::to_string))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
