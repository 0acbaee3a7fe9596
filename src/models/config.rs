use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::Language;

/// Configuration loaded from devmate.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Chat-completion API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Model name to use
    #[serde(default = "default_model")]
    pub model: String,
    /// Timeout in seconds for API requests
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Environment variable holding the API key (optional for local servers)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            timeout_seconds: default_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo-1106".to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Token budget for a single prompt (90% of a 16k context by default)
    #[serde(default = "default_prompt_token_budget")]
    pub prompt_token_budget: usize,
    /// Maximum number of test cases to request per proposal
    #[serde(default = "default_max_test_cases")]
    pub max_test_cases: usize,
    /// Maximum number of repository files listed for the reference finder
    #[serde(default = "default_max_listed_files")]
    pub max_listed_files: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            prompt_token_budget: default_prompt_token_budget(),
            max_test_cases: default_max_test_cases(),
            max_listed_files: default_max_listed_files(),
        }
    }
}

fn default_prompt_token_budget() -> usize {
    14400
}

fn default_max_test_cases() -> usize {
    6
}

fn default_max_listed_files() -> usize {
    500
}

/// Behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Show streaming output in terminal
    #[serde(default = "default_stream_output")]
    pub stream_output: bool,
    /// Message language for user-facing text
    #[serde(default)]
    pub language: Language,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            stream_output: default_stream_output(),
            language: Language::default(),
        }
    }
}

fn default_stream_output() -> bool {
    true
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigFileError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigFileError::ReadError(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigFileError::ParseError(path.to_path_buf(), e))
    }

    /// Try to load config from devmate.toml in the given directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigFileError> {
        let config_path = dir.join("devmate.toml");
        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI overrides into the config
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        api_base: Option<String>,
        timeout: Option<u64>,
        language: Option<Language>,
        no_stream: bool,
    ) -> Self {
        if let Some(m) = model {
            self.llm.model = m;
        }
        if let Some(u) = api_base {
            self.llm.api_base = u;
        }
        if let Some(t) = timeout {
            self.llm.timeout_seconds = t;
        }
        if let Some(l) = language {
            self.behavior.language = l;
        }
        if no_stream {
            self.behavior.stream_output = false;
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, toml::de::Error),
}
