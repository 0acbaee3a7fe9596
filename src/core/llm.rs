//! Chat-completion API client
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. Streaming uses
//! SSE (`data: {...}` lines, terminated by `data: [DONE]`); JSON-mode requests
//! go non-streaming and return the parsed object.

use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::LlmError;
use crate::models::LlmConfig;

/// Chat-completion API client
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
    api_key: Option<String>,
}

/// One message of a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the chat-completions endpoint
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Non-streaming completion response
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageContent,
}

#[derive(Debug, Deserialize)]
struct ChatMessageContent {
    #[serde(default)]
    content: String,
}

/// One streamed SSE chunk
#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Error payload some servers return inside a 200 body
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

impl LlmClient {
    /// Create a client; the API key is read from the configured environment
    /// variable and omitted when unset (local servers don't need one).
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            debug!(
                "No API key in ${}; sending unauthenticated requests",
                config.api_key_env
            );
        }

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response, LlmError> {
        let url = self.endpoint();
        debug!("Sending chat request to {} (model: {})", url, self.config.model);

        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                LlmError::ConnectionRefused(format!(
                    "Could not connect to {}. Is the API reachable?",
                    self.config.api_base
                ))
            } else if e.is_timeout() {
                LlmError::Timeout(self.config.timeout_seconds)
            } else {
                LlmError::from(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status, message));
        }

        Ok(response)
    }

    /// Generate a completion for the given messages.
    ///
    /// With `stream_to_stdout` the tokens are echoed as they arrive; the full
    /// response text is returned either way.
    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        stream_to_stdout: bool,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            stream: true,
            temperature: None,
            response_format: None,
        };

        let response = self.send(&request).await?;

        let mut full_response = String::new();
        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut done = false;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| LlmError::StreamError(e.to_string()))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // SSE frames are newline-delimited "data: {...}" lines
            while let Some(newline_pos) = buffer.find('\n') {
                let line = buffer[..newline_pos].trim().to_string();
                buffer = buffer[newline_pos + 1..].to_string();

                let Some(payload) = line.strip_prefix("data:").map(str::trim) else {
                    continue;
                };
                if payload == "[DONE]" {
                    done = true;
                    break;
                }

                let parsed: ChatCompletionChunk = match serde_json::from_str(payload) {
                    Ok(p) => p,
                    Err(e) => {
                        if !full_response.is_empty() {
                            debug!("Ignoring parse error on trailing chunk: {}", e);
                            continue;
                        }
                        return Err(LlmError::ParseError(format!(
                            "Failed to parse stream chunk: {}",
                            e
                        )));
                    }
                };

                for choice in &parsed.choices {
                    if let Some(content) = &choice.delta.content {
                        full_response.push_str(content);
                        if stream_to_stdout {
                            print!("{}", content);
                            io::stdout().flush().ok();
                        }
                    }
                    if choice.finish_reason.is_some() {
                        done = true;
                    }
                }
            }

            if done {
                break;
            }
        }

        if stream_to_stdout && !full_response.is_empty() {
            println!();
        }

        if full_response.is_empty() {
            warn!("Model returned no content");
            return Err(LlmError::EmptyResponse);
        }

        info!("Generated {} characters", full_response.len());
        Ok(full_response)
    }

    /// Generate a completion constrained to a JSON object and parse it
    pub async fn complete_json(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<serde_json::Value, LlmError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            stream: false,
            temperature: Some(0.1),
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        };

        let response = self.send(&request).await?;
        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("");
        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        serde_json::from_str(content)
            .map_err(|e| LlmError::ParseError(format!("Model did not return valid JSON: {}", e)))
    }
}

/// Map an HTTP-level failure onto the taxonomy; context overflow gets its own
/// variant so callers can show a friendly "diff too large" message.
fn classify_api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);

    if message.contains("maximum context length") {
        LlmError::ContextLengthExceeded(message)
    } else {
        LlmError::HttpError { status, message }
    }
}
