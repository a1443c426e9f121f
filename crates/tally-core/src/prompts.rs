//! Prompt template for the remote classifier
//!
//! The prompt is loaded with a two-layer resolution:
//! 1. Check for an override in the data dir (~/.local/share/tally/prompts/)
//! 2. Fall back to the embedded default (compiled into the binary)
//!
//! Every remote backend renders the same template so their behavior stays in
//! line with the rule-based parser they fall back to.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default prompt (compiled into binary)
const PARSE_UTTERANCE: &str = include_str!("../../../prompts/parse_utterance.md");

/// File name of the prompt, both embedded and as an override
pub const PARSE_UTTERANCE_FILE: &str = "parse_utterance.md";

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptMetadata {
    /// Unique identifier
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
    /// Task type label, informational only
    #[serde(default)]
    pub task_type: String,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Metadata from frontmatter
    pub metadata: PromptMetadata,
    /// The prompt content (system + user sections)
    pub content: String,
    /// Path to override file (if any)
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    /// The embedded prompt, ignoring any override
    pub fn embedded() -> Self {
        match parse_prompt(PARSE_UTTERANCE) {
            Ok((metadata, content)) => Self {
                metadata,
                content,
                override_path: None,
            },
            Err(e) => {
                warn!("Embedded prompt failed to parse, using raw text: {}", e);
                Self {
                    metadata: PromptMetadata::default(),
                    content: PARSE_UTTERANCE.to_string(),
                    override_path: None,
                }
            }
        }
    }

    /// Load from `override_dir` if it holds an override, else the embedded prompt
    pub fn load(override_dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = override_dir {
            let path = dir.join(PARSE_UTTERANCE_FILE);
            if path.exists() {
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::InvalidData(format!("Failed to read prompt override: {}", e))
                })?;
                let (metadata, body) = parse_prompt(&content)?;
                debug!("Using prompt override at {}", path.display());
                return Ok(Self {
                    metadata,
                    content: body,
                    override_path: Some(path),
                });
            }
        }
        Ok(Self::embedded())
    }

    /// Load from the default override dir, falling back to the embedded prompt on error
    pub fn resolve() -> Self {
        let dir = default_prompts_dir();
        Self::load(dir.as_deref()).unwrap_or_else(|e| {
            warn!("Ignoring broken prompt override: {}", e);
            Self::embedded()
        })
    }

    /// Get the system section of the prompt
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    /// Get the user section of the prompt
    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the user section (or the whole prompt if it has none)
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        let mut result = self.user_section().unwrap_or(&self.content).to_string();
        for (key, value) in vars {
            let pattern = format!("{{{{{}}}}}", key);
            result = result.replace(&pattern, value);
        }
        result
    }

    /// Render the prompt for one utterance
    pub fn render_utterance(&self, text: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("text", text);
        self.render_user(&vars)
    }
}

/// Default prompt override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("prompts"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::InvalidData(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];

    // Find the next header or end of content
    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_prompt_parses() {
        let (metadata, body) = parse_prompt(PARSE_UTTERANCE).unwrap();
        assert_eq!(metadata.id, "parse_utterance");
        assert!(body.contains("# System"));
        assert!(body.contains("{{text}}"));
    }

    #[test]
    fn test_render_utterance() {
        let prompt = Prompt::embedded();
        let rendered = prompt.render_utterance("coffee 5 dollars");
        assert!(rendered.contains("Text: \"coffee 5 dollars\""));
        assert!(!rendered.contains("# System"));
        assert!(prompt.system_section().is_some());
    }

    #[test]
    fn test_missing_frontmatter_is_rejected() {
        assert!(parse_prompt("# User\nhello").is_err());
        assert!(parse_prompt("---\nid: x\nversion: 1\n# User").is_err());
    }

    #[test]
    fn test_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PARSE_UTTERANCE_FILE),
            "---\nid: parse_utterance\nversion: 7\n---\n\n# User\nCustom {{text}}",
        )
        .unwrap();

        let prompt = Prompt::load(Some(dir.path())).unwrap();
        assert_eq!(prompt.metadata.version, 7);
        assert!(prompt.override_path.is_some());
        assert_eq!(prompt.render_utterance("tea 3"), "Custom tea 3");
    }

    #[test]
    fn test_missing_override_uses_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = Prompt::load(Some(dir.path())).unwrap();
        assert!(prompt.override_path.is_none());
        assert_eq!(prompt.metadata.id, "parse_utterance");
    }
}
