//! Configuration for remote classification and storage
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a layered resolution:
//! 1. An explicit path (`--config`), which must exist
//! 2. Override in data dir (~/.local/share/tally/config.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Environment variables are applied on top of whichever file was used.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

pub const ENV_REMOTE_BACKEND: &str = "TALLY_REMOTE_BACKEND";
pub const ENV_REMOTE_HOST: &str = "TALLY_REMOTE_HOST";
pub const ENV_REMOTE_MODEL: &str = "TALLY_REMOTE_MODEL";
pub const ENV_REMOTE_API_KEY: &str = "TALLY_REMOTE_API_KEY";
pub const ENV_DB: &str = "TALLY_DB";

/// Which remote classifier to try before the rule-based parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteBackend {
    /// Rules only
    None,
    /// api.openai.com
    OpenAI,
    /// api.groq.com (OpenAI-compatible endpoint)
    Groq,
    /// Any server speaking `/v1/chat/completions`
    OpenAICompatible,
    /// Ollama `/api/generate`
    Ollama,
    /// In-process mock for testing
    Mock,
}

impl RemoteBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OpenAI => "openai",
            Self::Groq => "groq",
            Self::OpenAICompatible => "openai_compatible",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }

    fn default_host(&self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com",
            Self::Groq => "https://api.groq.com/openai",
            Self::Ollama => "http://localhost:11434",
            Self::OpenAICompatible => "http://localhost:8080",
            Self::None | Self::Mock => "",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAI | Self::OpenAICompatible => "gpt-3.5-turbo",
            Self::Groq => "mixtral-8x7b-32768",
            Self::Ollama => "llama3.2",
            Self::None => "",
            Self::Mock => "mock",
        }
    }

    /// Provider-specific API key variable, checked after `TALLY_REMOTE_API_KEY`
    fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Groq => Some("XAI_GROK_API_KEY"),
            _ => None,
        }
    }

    /// Whether requests are rejected without an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI | Self::Groq)
    }
}

impl std::str::FromStr for RemoteBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" | "local" | "rules" => Ok(Self::None),
            "openai" => Ok(Self::OpenAI),
            "groq" | "xai_grok" | "grok" => Ok(Self::Groq),
            "openai_compatible" | "vllm" | "localai" | "llamacpp" => Ok(Self::OpenAICompatible),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown remote backend: {}", s)),
        }
    }
}

impl std::fmt::Display for RemoteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remote classifier settings
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub backend: RemoteBackend,
    pub host: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    /// Upper bound on a single classification request
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            backend: RemoteBackend::None,
            host: None,
            model: None,
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl RemoteConfig {
    /// Configured host, or the backend's default
    pub fn host(&self) -> &str {
        self.host
            .as_deref()
            .unwrap_or_else(|| self.backend.default_host())
    }

    /// Configured model, or the backend's default
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }
}

/// Storage gateway kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Json,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "db" => Ok(Self::Sqlite),
            "json" | "file" => Ok(Self::Json),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: PathBuf::from("tally.db"),
        }
    }
}

/// Complete Tally configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub storage: StorageConfig,
    /// File the config was read from (None for embedded defaults)
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load config from files, then apply process environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = load_file(explicit)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse config from TOML content (no environment applied)
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup(ENV_REMOTE_BACKEND) {
            match backend.parse() {
                Ok(b) => self.remote.backend = b,
                Err(e) => {
                    warn!(backend = %backend, "{}; remote classification disabled", e);
                    self.remote.backend = RemoteBackend::None;
                }
            }
        }
        if let Some(host) = lookup(ENV_REMOTE_HOST).filter(|s| !s.is_empty()) {
            self.remote.host = Some(host);
        }
        if let Some(model) = lookup(ENV_REMOTE_MODEL).filter(|s| !s.is_empty()) {
            self.remote.model = Some(model);
        }

        let provider_key = self.remote.backend.api_key_env().and_then(&lookup);
        if let Some(key) = lookup(ENV_REMOTE_API_KEY).or(provider_key) {
            if !key.is_empty() {
                self.remote.api_key = Some(key);
            }
        }

        if let Some(db) = lookup(ENV_DB).filter(|s| !s.is_empty()) {
            self.storage.path = PathBuf::from(db);
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config.toml"))
}

fn load_file(explicit: Option<&Path>) -> Result<Config> {
    let (content, source) = match explicit {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            (content, Some(path.to_path_buf()))
        }
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => {
                let content = fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
                (content, Some(path))
            }
            None => (DEFAULT_CONFIG.to_string(), None),
        },
    };

    let mut config = parse_config(&content)?;
    debug!(source = ?source, "Loaded configuration");
    config.source = source;
    Ok(config)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    remote: Option<RawRemote>,
    storage: Option<RawStorage>,
}

#[derive(Debug, Deserialize)]
struct RawRemote {
    backend: Option<String>,
    host: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawStorage {
    backend: Option<String>,
    path: Option<String>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(remote) = raw.remote {
        if let Some(backend) = remote.backend {
            config.remote.backend = backend.parse().unwrap_or_else(|e: String| {
                warn!("{}; remote classification disabled", e);
                RemoteBackend::None
            });
        }
        config.remote.host = remote.host.filter(|s| !s.is_empty());
        config.remote.model = remote.model.filter(|s| !s.is_empty());
        config.remote.api_key = remote.api_key.filter(|s| !s.is_empty());
        if let Some(secs) = remote.timeout_secs {
            config.remote.timeout = Duration::from_secs(secs.max(1));
        }
    }

    if let Some(storage) = raw.storage {
        if let Some(backend) = storage.backend {
            config.storage.backend = backend.parse().map_err(Error::Config)?;
        }
        if let Some(path) = storage.path.filter(|s| !s.is_empty()) {
            config.storage.path = PathBuf::from(path);
        }
    }

    Ok(config)
}
