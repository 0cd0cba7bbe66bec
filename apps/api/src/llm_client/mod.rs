/// LLM Client: the single point of entry for all chat-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
/// The parser and optimizer depend on the `ChatProvider` trait; `LlmClient` is the
/// network-backed implementation.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
pub mod retry;
pub mod schema;

pub use retry::RetryPolicy;
pub use schema::{ResponseFormat, StructuredOutput};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

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

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM refused the request: {0}")]
    Refusal(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

/// Message content is either a plain string or a list of multimodal parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// The plain-text content, if this message is not multimodal.
    #[cfg(test)]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Parts(_) => None,
        }
    }
}

/// A single chat-completion call. Serializes directly as the request body.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            response_format: None,
        }
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: CompletionMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// A structured completion: the raw assistant content plus its validated form.
#[derive(Debug, Clone)]
pub struct ParsedMessage<T> {
    pub content: String,
    pub parsed: T,
}

// ────────────────────────────────────────────────────────────────────────────
// Provider seam
// ────────────────────────────────────────────────────────────────────────────

/// A chat-completion backend. Carried as `Arc<dyn ChatProvider>` so tests can
/// script responses without a network.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionMessage, LlmError>;
}

/// Requests a completion constrained to `T`'s schema and validates the answer against it.
pub async fn structured_chat_completion<T: StructuredOutput>(
    provider: &dyn ChatProvider,
    mut request: CompletionRequest,
) -> Result<ParsedMessage<T>, LlmError> {
    let format = ResponseFormat::for_type::<T>()?;
    debug!(
        "Requesting structured completion {} from {}",
        format.name(),
        request.model
    );
    request.response_format = Some(format);

    let message = provider.chat_completion(&request).await?;

    if let Some(refusal) = message.refusal {
        return Err(LlmError::Refusal(refusal));
    }
    let content = message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(LlmError::EmptyContent)?;

    let parsed = serde_json::from_str(strip_json_fences(&content))?;
    Ok(ParsedMessage { content, parsed })
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LlmClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

/// Wraps the OpenAI Chat Completions API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    retry: RetryPolicy,
}

impl LlmClient {
    pub fn new(config: LlmClientConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key: config.api_key,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            retry: config.retry,
        })
    }

    /// One HTTP round-trip, no retries.
    async fn send_once(&self, request: &CompletionRequest) -> Result<CompletionMessage, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                request.model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyContent)?;
        if choice.finish_reason.as_deref() == Some("length") {
            warn!("LLM output was truncated at max_tokens; structured parsing will likely fail");
        }
        Ok(choice.message)
    }
}

#[async_trait]
impl ChatProvider for LlmClient {
    /// Retries on 429, 5xx and transport errors with exponential backoff.
    async fn chat_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionMessage, LlmError> {
        let mut failed_attempts = 0;
        loop {
            let error = match self.send_once(request).await {
                Ok(message) => return Ok(message),
                Err(e) => e,
            };
            failed_attempts += 1;

            if !self.retry.should_retry(failed_attempts, &error) {
                if retry::is_transient(&error) {
                    warn!("LLM call failed after {failed_attempts} attempts: {error}");
                    if matches!(error, LlmError::Api { status: 429, .. }) {
                        return Err(LlmError::RateLimited {
                            retries: failed_attempts - 1,
                        });
                    }
                }
                return Err(error);
            }

            let delay = self.retry.delay_for(failed_attempts);
            warn!(
                "LLM call attempt {} failed ({}), retrying after {}ms...",
                failed_attempts,
                error,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    stripped
        .trim_start()
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(stripped.trim_start())
}
