//! Pluggable remote classifier strategies
//!
//! A remote classifier turns an utterance into a [`ParsedTransaction`] using a
//! language model. It is always optional: the [`TextParser`](crate::parser::TextParser)
//! falls back to its keyword rules whenever a remote call fails, so every
//! backend renders the same prompt (see [`crate::prompts`]) and shares one
//! response parser.
//!
//! # Architecture
//!
//! - `RemoteClassifier` trait: the contract every backend implements
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `OllamaBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::load(None)?;
//! if let Some(client) = AIClient::from_config(&config.remote)? {
//!     let parsed = client.classify("coffee 5 dollars").await?;
//!     println!("Category: {}", parsed.category);
//! }
//! ```

mod mock;
mod ollama;
mod openai_compatible;
pub mod parsing;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use async_trait::async_trait;
use tracing::warn;

use crate::config::{RemoteBackend, RemoteConfig};
use crate::error::Result;
use crate::models::ParsedTransaction;

/// Trait defining the remote classification contract
///
/// Implementations must return an error (never a partial record) when the
/// response is unusable; the caller decides what to fall back to.
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    /// Classify an utterance into a transaction without a date
    async fn classify(&self, text: &str) -> Result<ParsedTransaction>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete remote client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI, Groq, or any `/v1/chat/completions` server
    OpenAICompatible(OpenAICompatibleBackend),
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Build the configured remote client
    ///
    /// Returns `Ok(None)` when remote classification is disabled, or when a
    /// hosted provider is selected without an API key.
    pub fn from_config(config: &RemoteConfig) -> Result<Option<Self>> {
        let client = match config.backend {
            RemoteBackend::None => return Ok(None),
            RemoteBackend::OpenAI | RemoteBackend::Groq | RemoteBackend::OpenAICompatible => {
                if config.backend.requires_api_key() && config.api_key.is_none() {
                    warn!(
                        backend = %config.backend,
                        "No API key configured, remote classification disabled"
                    );
                    return Ok(None);
                }
                AIClient::OpenAICompatible(OpenAICompatibleBackend::new(
                    config.host(),
                    config.model(),
                    config.api_key.as_deref(),
                    config.timeout,
                )?)
            }
            RemoteBackend::Ollama => AIClient::Ollama(OllamaBackend::new(
                config.host(),
                config.model(),
                config.timeout,
            )?),
            RemoteBackend::Mock => AIClient::Mock(MockBackend::new()?),
        };
        Ok(Some(client))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Result<Self> {
        Ok(AIClient::Mock(MockBackend::new()?))
    }
}

// Implement RemoteClassifier for AIClient by delegating to the inner backend
#[async_trait]
impl RemoteClassifier for AIClient {
    async fn classify(&self, text: &str) -> Result<ParsedTransaction> {
        match self {
            AIClient::OpenAICompatible(b) => b.classify(text).await,
            AIClient::Ollama(b) => b.classify(text).await,
            AIClient::Mock(b) => b.classify(text).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Ollama(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Ollama(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock().unwrap();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_classify() {
        let client = AIClient::mock().unwrap();
        let parsed = client.classify("coffee 5 dollars").await.unwrap();
        assert_eq!(parsed.category, Category::Food);
        assert_eq!(parsed.amount, 5.0);
    }

    #[test]
    fn test_from_config_disabled() {
        let config = RemoteConfig::default();
        assert!(AIClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_from_config_hosted_without_key() {
        let config = RemoteConfig {
            backend: RemoteBackend::OpenAI,
            ..Default::default()
        };
        assert!(AIClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_from_config_groq_preset() {
        let config = RemoteConfig {
            backend: RemoteBackend::Groq,
            api_key: Some("gsk-test".to_string()),
            ..Default::default()
        };
        let client = AIClient::from_config(&config).unwrap().unwrap();
        assert!(matches!(client, AIClient::OpenAICompatible(_)));
        assert_eq!(client.host(), "https://api.groq.com/openai");
        assert_eq!(client.model(), "mixtral-8x7b-32768");
    }

    #[test]
    fn test_from_config_ollama() {
        let config = RemoteConfig {
            backend: RemoteBackend::Ollama,
            host: Some("http://nas.local:11434/".to_string()),
            ..Default::default()
        };
        let client = AIClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.host(), "http://nas.local:11434");
        assert_eq!(client.model(), "llama3.2");
    }
}
