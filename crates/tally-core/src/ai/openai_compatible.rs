//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - api.openai.com
//! - Groq (https://api.groq.com/openai)
//! - vLLM, LocalAI, llama-server / llama.cpp

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::ParsedTransaction;
use crate::prompts::Prompt;

use super::parsing::parse_transaction;
use super::RemoteClassifier;

/// OpenAI-compatible backend
///
/// # Example
///
/// ```rust,ignore
/// let backend = OpenAICompatibleBackend::new(
///     "https://api.openai.com",
///     "gpt-3.5-turbo",
///     Some("sk-..."),
///     Duration::from_secs(10),
/// )?;
/// ```
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    prompt: Arc<Prompt>,
}

impl OpenAICompatibleBackend {
    /// Create a new backend whose requests give up after `timeout`
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.map(str::to_string),
            prompt: Arc::new(Prompt::resolve()),
        })
    }

    /// Replace the prompt (used by tests and prompt overrides)
    pub fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompt = Arc::new(prompt);
        self
    }

    /// Make a chat completion request
    async fn chat_completion(&self, text: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.prompt.system_section() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: self.prompt.render_utterance(text),
        });

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(0.3),
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote(format!(
                "OpenAI-compatible API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Remote("No choices in OpenAI-compatible response".into()))
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl RemoteClassifier for OpenAICompatibleBackend {
    async fn classify(&self, text: &str) -> Result<ParsedTransaction> {
        let response = self.chat_completion(text).await?;
        debug!("OpenAI-compatible response: {}", response);
        parse_transaction(&response)
    }

    async fn health_check(&self) -> bool {
        let mut req_builder = self
            .http_client
            .get(format!("{}/v1/models", self.base_url));
        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }
        match req_builder.send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
