//! Core `LineProvider` trait and the `ApiLineProvider` implementation.
//!
//! `ApiLineProvider` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint: Ollama (OpenAI mode), OpenAI, Groq, LM Studio, vLLM, etc.
//! All connection details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{CoachStyle, LlmConfig, LlmProvider};
use crate::llm::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while generating a line.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The LLM returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,

    /// The configured provider needs an API key and none is set.
    #[error("no API key configured for the LLM provider")]
    MissingApiKey,

    /// AI lines are switched off in config.
    #[error("LLM provider is disabled")]
    Disabled,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// LineProvider trait
// ---------------------------------------------------------------------------

/// Async source of coaching text.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn LineProvider>`.  A blank `Ok` means "nothing to say"; callers
/// treat it the same as an error and try the next provider.
#[async_trait]
pub trait LineProvider: Send + Sync {
    /// One short spoken line for the given context summary and style.
    async fn generate_one_liner(&self, context: &str, style: CoachStyle)
        -> Result<String, LlmError>;

    /// Free-form chat reply to `user_text`.
    async fn send_message(&self, user_text: &str, context: &str) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiLineProvider
// ---------------------------------------------------------------------------

const ONE_LINER_MAX_TOKENS: u32 = 40;
const CHAT_MAX_TOKENS: u32 = 200;

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// Wrap it in a [`FallbackLineProvider`](crate::llm::FallbackLineProvider)
/// before handing it to the orchestrator; on its own it reports failures as
/// [`LlmError`]s.
pub struct ApiLineProvider {
    client: reqwest::Client,
    config: LlmConfig,
    prompt_builder: PromptBuilder,
}

impl ApiLineProvider {
    /// Build an `ApiLineProvider` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.  A default client is used if the builder fails.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    /// Check that the config allows a request at all.
    fn check_ready(&self) -> Result<(), LlmError> {
        if !self.config.enabled || self.config.provider == LlmProvider::Disabled {
            return Err(LlmError::Disabled);
        }
        let has_key = self
            .config
            .api_key
            .as_deref()
            .is_some_and(|k| !k.is_empty());
        if self.config.provider == LlmProvider::OpenAiCompatible && !has_key {
            return Err(LlmError::MissingApiKey);
        }
        Ok(())
    }

    async fn complete(
        &self,
        system_msg: &str,
        user_msg: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.check_ready()?;

        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  max_tokens
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?.error_for_status()?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(LlmError::EmptyResponse)?
            .trim()
            .trim_matches('"')
            .to_string();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(text)
    }
}

#[async_trait]
impl LineProvider for ApiLineProvider {
    async fn generate_one_liner(
        &self,
        context: &str,
        style: CoachStyle,
    ) -> Result<String, LlmError> {
        let (system_msg, user_msg) = self.prompt_builder.build_one_liner(context, style);
        self.complete(&system_msg, &user_msg, ONE_LINER_MAX_TOKENS)
            .await
    }

    async fn send_message(&self, user_text: &str, context: &str) -> Result<String, LlmError> {
        let (system_msg, user_msg) = self.prompt_builder.build_chat(user_text, context);
        self.complete(&system_msg, &user_msg, CHAT_MAX_TOKENS).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
