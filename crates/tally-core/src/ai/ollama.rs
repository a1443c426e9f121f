//! Ollama backend implementation
//!
//! HTTP client for the Ollama `/api/generate` endpoint.

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

/// Ollama backend
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
    prompt: Arc<Prompt>,
}

impl OllamaBackend {
    /// Create a new Ollama backend whose requests give up after `timeout`
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            prompt: Arc::new(Prompt::resolve()),
        })
    }

    /// Replace the prompt (used by tests and prompt overrides)
    pub fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompt = Arc::new(prompt);
        self
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl RemoteClassifier for OllamaBackend {
    async fn classify(&self, text: &str) -> Result<ParsedTransaction> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: self.prompt.render_utterance(text),
            system: self.prompt.system_section().map(str::to_string),
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Remote(format!(
                "Ollama API error {}",
                response.status()
            )));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama response: {}", ollama_response.response);

        parse_transaction(&ollama_response.response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
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
