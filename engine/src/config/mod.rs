//! Configuration management
//!
//! This module handles loading, validation, and management of the Chambers configuration.
//! Configuration is stored in TOML format at ~/.chambers/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level, data directory
//! - **llm**: Language-model backend selection and provider settings
//! - **memory**: Conversation history backend, retention and key prefix
//! - **orchestrator**: System prompt, token budgets and fixed replies
//! - **telegram**: Bot token, webhook secret and bind address
//!
//! Secrets may also come from the environment (`OPENAI_API_KEY`,
//! `TELEGRAM_TOKEN`, `WEBHOOK_SECRET`); environment values win over the file.
//!
//! # Examples
//!
//! ```no_run
//! use chambers_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Backend: {}", config.llm.backend);
//! println!("Turns kept: {}", config.memory.turns);
//! # Ok(())
//! # }
//! ```

use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Language-model backends the gateway can be built on
pub const VALID_BACKENDS: [&str; 2] = ["openai", "ollama"];

/// Conversation history store backends
pub const VALID_MEMORY_BACKENDS: [&str; 2] = ["sqlite", "memory"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    pub core: CoreConfig,

    /// LLM provider configuration
    pub llm: LLMConfig,

    /// Conversation memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Orchestrator prompts and replies
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Telegram transport configuration
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Data directory path (supports ~ expansion)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Backend used by the gateway (openai, ollama)
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// OpenAI provider settings
    #[serde(default)]
    pub openai: OpenAIConfig,

    /// Ollama provider settings
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// OpenAI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// Base URL for OpenAI API
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// API key. Prefer the OPENAI_API_KEY environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL for Ollama API
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

/// Conversation memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Store backend (sqlite, memory)
    #[serde(default = "default_memory_backend")]
    pub backend: String,

    /// Number of user+bot turn pairs to retain per conversation
    #[serde(default = "default_turns")]
    pub turns: usize,

    /// Namespace prefix for history keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// SQLite database file name, relative to the data directory
    #[serde(default = "default_db_file")]
    pub db_file: String,
}

impl MemoryConfig {
    /// Maximum number of stored lines per conversation
    pub fn cap(&self) -> usize {
        self.turns * 2
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// System prompt prepended to fallback requests. Empty disables it.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Token budget for the fallback answer
    #[serde(default = "default_fallback_max_tokens")]
    pub fallback_max_tokens: u32,

    /// Token budget for the case-law summary line
    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,

    /// Fixed user-facing replies
    #[serde(default)]
    pub replies: RepliesConfig,
}

/// Fixed replies returned when a stage cannot produce an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepliesConfig {
    #[serde(default = "default_empty_input_reply")]
    pub empty_input: String,

    #[serde(default = "default_agent_failure_reply")]
    pub agent_failure: String,

    #[serde(default = "default_generation_failure_reply")]
    pub generation_failure: String,

    /// Prefix placed before the case-law summary line
    #[serde(default = "default_summary_marker")]
    pub summary_marker: String,
}

/// Telegram transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token. Prefer the TELEGRAM_TOKEN environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Expected X-Telegram-Bot-Api-Secret-Token header value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,

    /// Address the webhook server binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Telegram Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.chambers")
}

fn default_backend() -> String {
    "openai".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_memory_backend() -> String {
    "sqlite".to_string()
}

fn default_turns() -> usize {
    20
}

fn default_key_prefix() -> String {
    "history:".to_string()
}

fn default_db_file() -> String {
    "chambers.db".to_string()
}

fn default_fallback_max_tokens() -> u32 {
    5000
}

fn default_summary_max_tokens() -> u32 {
    60
}

fn default_empty_input_reply() -> String {
    "🤖 Please send me some text to work with.".to_string()
}

fn default_agent_failure_reply() -> String {
    "⚠️ Oops, something went wrong in that agent.".to_string()
}

fn default_generation_failure_reply() -> String {
    "⚠️ Sorry, I wasn’t able to fetch an answer.".to_string()
}

fn default_summary_marker() -> String {
    "🕵️".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_system_prompt() -> String {
    [
        "You are the Master Agent of the Intertribal Court System's Digital Chambers,",
        "serving as royal assistant to the Office of the Trustee and the Office of the Chief Justice.",
        "Speak with the grace and decorum of a royal diplomat.",
        "",
        "Your specialist agents:",
        "  - case_law_scholar: answers legal questions and provides insightful summaries",
        "  - memo_drafter: drafts memos, briefs and other documents on demand",
        "  - file_conversion: converts files between supported formats",
        "",
        "If the user prefixes a message with a slash command (e.g. /memo), that agent was chosen explicitly.",
        "For topics outside these specialties, give a concise, authoritative answer yourself.",
    ]
    .join("\n")
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            timeout_secs: default_llm_timeout(),
            openai: OpenAIConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            api_key: None,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            backend: default_memory_backend(),
            turns: default_turns(),
            key_prefix: default_key_prefix(),
            db_file: default_db_file(),
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            fallback_max_tokens: default_fallback_max_tokens(),
            summary_max_tokens: default_summary_max_tokens(),
            replies: RepliesConfig::default(),
        }
    }
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            empty_input: default_empty_input_reply(),
            agent_failure: default_agent_failure_reply(),
            generation_failure: default_generation_failure_reply(),
            summary_marker: default_summary_marker(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            webhook_secret: None,
            bind: default_bind(),
            api_url: default_telegram_api_url(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.chambers/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read
    /// - TOML parsing fails
    /// - Validation fails (unknown backend, missing credentials)
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_toml(&contents)?;
        config.apply_env_overrides();
        config.validate_and_process()?;

        Ok(config)
    }

    /// Parse configuration text without validating it
    pub fn from_toml(contents: &str) -> Result<Self, EngineError> {
        toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config = Self::default_config();

        // Secrets are never written to disk, so serialize before env overrides
        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        let mut config = config;
        config.apply_env_overrides();
        config.validate_and_process()?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.chambers/config.toml)
    pub fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".chambers").join("config.toml"))
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            core: CoreConfig::default(),
            llm: LLMConfig::default(),
            memory: MemoryConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }

    /// Path of the SQLite database backing conversation memory
    pub fn db_path(&self) -> PathBuf {
        self.core.data_dir.join(&self.memory.db_file)
    }

    /// Copy secrets from the environment over the file values
    pub fn apply_env_overrides(&mut self) {
        if let Some(key) = non_empty_env("OPENAI_API_KEY") {
            self.llm.openai.api_key = Some(key);
        }
        if let Some(token) = non_empty_env("TELEGRAM_TOKEN") {
            self.telegram.token = Some(token);
        }
        if let Some(secret) = non_empty_env("WEBHOOK_SECRET") {
            self.telegram.webhook_secret = Some(secret);
        }
    }

    /// Check field values without touching the filesystem
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The log level or a backend name is unknown
    /// - The openai backend has no API key, or the ollama backend no model
    /// - Memory retention is zero
    pub fn validate(&self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        // Inline comments sometimes leak into env-sourced values ("openai # prod")
        let backend = self.llm.backend.split('#').next().unwrap_or("").trim();
        if !VALID_BACKENDS.contains(&backend.to_lowercase().as_str()) {
            return Err(EngineError::Config(format!(
                "Unknown LLM backend '{}'. Must be one of: {}",
                self.llm.backend,
                VALID_BACKENDS.join(", ")
            )));
        }

        match backend.to_lowercase().as_str() {
            "openai" => {
                let has_key = self
                    .llm
                    .openai
                    .api_key
                    .as_deref()
                    .is_some_and(|k| !k.trim().is_empty());
                if !has_key {
                    return Err(EngineError::Config(
                        "OPENAI_API_KEY is required when llm.backend = 'openai'".to_string(),
                    ));
                }
            }
            "ollama" => {
                if self.llm.ollama.model.trim().is_empty() {
                    return Err(EngineError::Config(
                        "llm.ollama.model is required when llm.backend = 'ollama'".to_string(),
                    ));
                }
            }
            _ => {}
        }

        if self.llm.timeout_secs == 0 {
            return Err(EngineError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !VALID_MEMORY_BACKENDS.contains(&self.memory.backend.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid memory backend '{}'. Must be one of: {}",
                self.memory.backend,
                VALID_MEMORY_BACKENDS.join(", ")
            )));
        }

        if self.memory.turns == 0 {
            return Err(EngineError::Config(
                "memory.turns must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate and process configuration
    ///
    /// Runs [`Config::validate`], normalizes the backend name, expands ~ in
    /// the data directory and creates it when the SQLite store needs it.
    pub fn validate_and_process(&mut self) -> Result<(), EngineError> {
        self.validate()?;

        self.llm.backend = self
            .llm
            .backend
            .split('#')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        self.core.data_dir = expand_path(&self.core.data_dir)?;

        if self.memory.backend == "sqlite" && !self.core.data_dir.exists() {
            fs::create_dir_all(&self.core.data_dir).map_err(|e| {
                EngineError::Config(format!("Failed to create data directory: {}", e))
            })?;
        }

        Ok(())
    }

    /// Copy of the configuration with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        let mask = |v: &mut Option<String>| {
            if v.is_some() {
                *v = Some("********".to_string());
            }
        };
        mask(&mut copy.llm.openai.api_key);
        mask(&mut copy.telegram.token);
        mask(&mut copy.telegram.webhook_secret);
        copy
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Expand ~ in path to user's home directory
fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}
