//! Configuration loading and validation for Ragline.
//!
//! Loads configuration from `ragline.toml` (path overridable via
//! `RAGLINE_CONFIG`) with environment variable overrides, then validates.
//! Every external endpoint and credential is required: a missing value is
//! a fatal startup error, never a silent default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use ragline_core::{ModelKind, ModelProfile};

/// The root configuration structure.
///
/// Maps directly to `ragline.toml`; every field can also be supplied via
/// a `RAGLINE_*` environment variable (see [`AppConfig::load`]).
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Active chat model name (one of the closed model set)
    #[serde(default)]
    pub chat_model: String,

    /// Search index service
    #[serde(default)]
    pub search: SearchConfig,

    /// Completion/embedding service
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Per-model deployment identifiers
    #[serde(default)]
    pub deployments: DeploymentsConfig,

    /// Conversation-log persistence store
    #[serde(default)]
    pub chatlog: ChatLogConfig,

    /// Document text-extraction service (indexing only)
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// HTTP gateway binding
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub endpoint: String,

    /// Index to query and upload into
    #[serde(default = "default_index")]
    pub index: String,

    #[serde(default)]
    pub api_key: String,
}

fn default_index() -> String {
    "docs".into()
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub api_version: String,
}

/// Deployment identifier for each model in the closed set.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DeploymentsConfig {
    #[serde(default)]
    pub gpt_35_turbo: String,

    #[serde(default)]
    pub gpt_4: String,

    #[serde(default)]
    pub gpt_4_32k: String,

    #[serde(default)]
    pub text_embedding_ada_002: String,
}

impl DeploymentsConfig {
    /// The deployment identifier configured for `kind`.
    pub fn for_kind(&self, kind: ModelKind) -> &str {
        match kind {
            ModelKind::Gpt35Turbo => &self.gpt_35_turbo,
            ModelKind::Gpt4 => &self.gpt_4,
            ModelKind::Gpt4_32k => &self.gpt_4_32k,
            ModelKind::TextEmbeddingAda002 => &self.text_embedding_ada_002,
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ChatLogConfig {
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub database: String,

    #[serde(default)]
    pub container: String,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8182
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &str) -> &'static str {
    if s.is_empty() { "<unset>" } else { "[REDACTED]" }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("chat_model", &self.chat_model)
            .field("search", &self.search)
            .field("openai", &self.openai)
            .field("chatlog", &self.chatlog)
            .field("extraction", &self.extraction)
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("index", &self.index)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl std::fmt::Debug for ChatLogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatLogConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("database", &self.database)
            .field("container", &self.container)
            .finish()
    }
}

impl std::fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path with environment overrides,
    /// then validate.
    ///
    /// Environment variables (highest priority):
    /// `RAGLINE_CHAT_MODEL`, `RAGLINE_SEARCH_ENDPOINT`,
    /// `RAGLINE_SEARCH_INDEX`, `RAGLINE_SEARCH_API_KEY`,
    /// `RAGLINE_OPENAI_ENDPOINT`, `RAGLINE_OPENAI_API_KEY`,
    /// `RAGLINE_OPENAI_API_VERSION`, `RAGLINE_DEPLOYMENT_GPT_35_TURBO`,
    /// `RAGLINE_DEPLOYMENT_GPT_4`, `RAGLINE_DEPLOYMENT_GPT_4_32K`,
    /// `RAGLINE_DEPLOYMENT_TEXT_EMBEDDING_ADA_002`,
    /// `RAGLINE_CHATLOG_ENDPOINT`, `RAGLINE_CHATLOG_API_KEY`,
    /// `RAGLINE_CHATLOG_DATABASE`, `RAGLINE_CHATLOG_CONTAINER`,
    /// `RAGLINE_EXTRACTION_ENDPOINT`, `RAGLINE_EXTRACTION_API_KEY`,
    /// `RAGLINE_GATEWAY_HOST`, `RAGLINE_GATEWAY_PORT`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("RAGLINE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("ragline.toml"));

        let mut config = Self::read_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load and validate from a specific file, without environment
    /// overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, expecting environment variables");
            return Ok(Self::empty());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn empty() -> Self {
        Self {
            chat_model: String::new(),
            search: SearchConfig::default(),
            openai: OpenAiConfig::default(),
            deployments: DeploymentsConfig::default(),
            chatlog: ChatLogConfig::default(),
            extraction: ExtractionConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }

    fn apply_env_overrides(&mut self) {
        fn env_into(name: &str, slot: &mut String) {
            if let Ok(value) = std::env::var(name) {
                *slot = value;
            }
        }

        env_into("RAGLINE_CHAT_MODEL", &mut self.chat_model);
        env_into("RAGLINE_SEARCH_ENDPOINT", &mut self.search.endpoint);
        env_into("RAGLINE_SEARCH_INDEX", &mut self.search.index);
        env_into("RAGLINE_SEARCH_API_KEY", &mut self.search.api_key);
        env_into("RAGLINE_OPENAI_ENDPOINT", &mut self.openai.endpoint);
        env_into("RAGLINE_OPENAI_API_KEY", &mut self.openai.api_key);
        env_into("RAGLINE_OPENAI_API_VERSION", &mut self.openai.api_version);
        env_into(
            "RAGLINE_DEPLOYMENT_GPT_35_TURBO",
            &mut self.deployments.gpt_35_turbo,
        );
        env_into("RAGLINE_DEPLOYMENT_GPT_4", &mut self.deployments.gpt_4);
        env_into("RAGLINE_DEPLOYMENT_GPT_4_32K", &mut self.deployments.gpt_4_32k);
        env_into(
            "RAGLINE_DEPLOYMENT_TEXT_EMBEDDING_ADA_002",
            &mut self.deployments.text_embedding_ada_002,
        );
        env_into("RAGLINE_CHATLOG_ENDPOINT", &mut self.chatlog.endpoint);
        env_into("RAGLINE_CHATLOG_API_KEY", &mut self.chatlog.api_key);
        env_into("RAGLINE_CHATLOG_DATABASE", &mut self.chatlog.database);
        env_into("RAGLINE_CHATLOG_CONTAINER", &mut self.chatlog.container);
        env_into("RAGLINE_EXTRACTION_ENDPOINT", &mut self.extraction.endpoint);
        env_into("RAGLINE_EXTRACTION_API_KEY", &mut self.extraction.api_key);
        env_into("RAGLINE_GATEWAY_HOST", &mut self.gateway.host);

        if let Ok(port) = std::env::var("RAGLINE_GATEWAY_PORT")
            && let Ok(port) = port.parse()
        {
            self.gateway.port = port;
        }
    }

    /// Validate the configuration. Absence of any required endpoint,
    /// credential, or deployment is fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("chat_model", &self.chat_model),
            ("search.endpoint", &self.search.endpoint),
            ("search.index", &self.search.index),
            ("search.api_key", &self.search.api_key),
            ("openai.endpoint", &self.openai.endpoint),
            ("openai.api_key", &self.openai.api_key),
            ("openai.api_version", &self.openai.api_version),
            ("deployments.gpt_35_turbo", &self.deployments.gpt_35_turbo),
            ("deployments.gpt_4", &self.deployments.gpt_4),
            ("deployments.gpt_4_32k", &self.deployments.gpt_4_32k),
            (
                "deployments.text_embedding_ada_002",
                &self.deployments.text_embedding_ada_002,
            ),
            ("chatlog.endpoint", &self.chatlog.endpoint),
            ("chatlog.api_key", &self.chatlog.api_key),
            ("chatlog.database", &self.chatlog.database),
            ("chatlog.container", &self.chatlog.container),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(name));
            }
        }

        let kind = self.chat_model_kind()?;
        if !kind.is_chat() {
            return Err(ConfigError::ValidationError(format!(
                "chat_model '{kind}' is an embedding model, not a chat model"
            )));
        }

        Ok(())
    }

    /// The active chat model, rejected at load time when unknown.
    pub fn chat_model_kind(&self) -> Result<ModelKind, ConfigError> {
        ModelKind::parse(&self.chat_model)
            .ok_or_else(|| ConfigError::UnknownModel(self.chat_model.clone()))
    }

    /// Build the immutable profile for the active chat model.
    pub fn chat_profile(&self) -> Result<ModelProfile, ConfigError> {
        let kind = self.chat_model_kind()?;
        Ok(ModelProfile::new(kind, self.deployments.for_kind(kind)))
    }

    /// The embedding deployment identifier.
    pub fn embedding_deployment(&self) -> &str {
        &self.deployments.text_embedding_ada_002
    }
}

/// Configuration errors. All fatal: the process must not start without a
/// complete, valid configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Required configuration value missing: {0}")]
    Missing(&'static str),

    #[error("Unknown model name: {0:?}")]
    UnknownModel(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for ragline_core::Error {
    fn from(e: ConfigError) -> Self {
        ragline_core::Error::Config {
            message: e.to_string(),
        }
    }
}
