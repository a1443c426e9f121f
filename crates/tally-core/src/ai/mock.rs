//! Mock backend for testing
//!
//! Answers with the rule-based parser's result, or fails on demand.
//! Useful for unit tests and development without a running LLM server.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::ParsedTransaction;
use crate::parser::RuleParser;

use super::RemoteClassifier;

/// Mock remote backend for testing
#[derive(Clone)]
pub struct MockBackend {
    rules: RuleParser,
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether classify should fail
    pub failing: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: RuleParser::new()?,
            healthy: true,
            failing: false,
        })
    }

    /// Create a mock backend whose classify calls always fail
    pub fn failing() -> Result<Self> {
        Ok(Self {
            healthy: false,
            failing: true,
            ..Self::new()?
        })
    }
}

#[async_trait]
impl RemoteClassifier for MockBackend {
    async fn classify(&self, text: &str) -> Result<ParsedTransaction> {
        if self.failing {
            return Err(Error::Remote("mock backend configured to fail".into()));
        }
        Ok(self.rules.parse(text))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockBackend::failing().unwrap();
        assert!(mock.classify("coffee 5").await.is_err());
        assert!(!mock.health_check().await);
    }
}
