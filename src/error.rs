use std::path::PathBuf;
use thiserror::Error;

use crate::models::ConfigFileError;

/// Main error type for devmate
#[derive(Error, Debug)]
pub enum DevmateError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigFileError),

    #[error("Widget configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Form lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Token budget exceeded: estimated {estimated} tokens (max: {max})")]
    TokenBudgetExceeded { estimated: usize, max: usize },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RenderError> for DevmateError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Lifecycle(e) => DevmateError::Lifecycle(e),
            RenderError::Transport(e) => DevmateError::Transport(e),
        }
    }
}

/// Errors raised at widget/form construction time for invariant violations.
/// Never silently corrected.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Checkbox options and initial states differ in length: {options} options, {states} states")]
    CheckboxLengthMismatch { options: usize, states: usize },

    #[error("Button is not allowed inside a Form")]
    ButtonInForm,
}

/// Errors raised when a form is driven outside its render-once lifecycle
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Form can only be rendered once")]
    AlreadyRendered,
}

/// Errors from the interactive host channel
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Interaction channel closed before a response was received")]
    ChannelClosed,

    #[error("Failed to write to the interactive host: {0}")]
    WriteFailed(std::io::Error),

    #[error("Failed to read from the interactive host: {0}")]
    ReadFailed(std::io::Error),
}

/// Errors from `Form::render` and standalone widget renders
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors related to git subprocess operations
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git is not installed on your system")]
    NotInstalled,

    #[error("Not inside a git repository")]
    NotARepository,

    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Failed to run git: {0}")]
    Spawn(std::io::Error),

    #[error("git produced non-UTF-8 output: {0}")]
    InvalidOutput(String),
}

/// Errors related to the chat-completion API
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model context length exceeded: {0}")]
    ContextLengthExceeded(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(0)
        } else if err.is_connect() {
            LlmError::ConnectionRefused(err.to_string())
        } else if let Some(status) = err.status() {
            LlmError::HttpError {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, DevmateError>;
