use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;

mod error;
mod prompt;
mod response;
mod tests;

pub use error::AIError;
pub use response::{best_suggestion, extract_commands};
use response::{ChatResponse, ErrorBody};
use crate::config::AIConfig;

/// What the model is told about the environment the command will run in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationContext {
    pub shell_name: String,
    pub os: String,
    pub cwd: PathBuf,
}

/// Turns natural language into one shell command line.
#[async_trait]
pub trait CommandTranslator: Send + Sync {
    async fn translate(&self, input: &str, context: &TranslationContext) -> Result<String, AIError>;
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct ChatClient {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

impl ChatClient {
    pub fn new(config: &AIConfig) -> Result<Self, AIError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AIError::ConfigurationError(format!(
                    "API key not found. Set {} or ai.api_key in the config file.",
                    crate::config::API_KEY_ENV
                ))
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| AIError::ConfigurationError(format!("Invalid API key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(referer) = &config.referer {
            insert_optional(&mut headers, HeaderName::from_static("http-referer"), referer);
        }
        if let Some(title) = &config.title {
            insert_optional(&mut headers, HeaderName::from_static("x-title"), title);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| AIError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
        })
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, AIError> {
        let started = Instant::now();

        let response = self
            .client
            .post(&self.api_url)
            .json(&json!({
                "model": &self.model,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": user }
                ]
            }))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%status, elapsed = ?started.elapsed(), "chat completion returned");

        match status {
            s if s.is_success() => (),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AIError::AuthenticationError(
                    error_message(response).await.unwrap_or_else(|| "Invalid API key".to_string()),
                ));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(AIError::RateLimitError(
                    error_message(response).await.unwrap_or_else(|| "Rate limit exceeded".to_string()),
                ));
            }
            status => {
                let detail = error_message(response).await.unwrap_or_default();
                return Err(AIError::APIError(format!(
                    "API request failed: {} - {}",
                    status.as_u16(),
                    detail
                )));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| AIError::NetworkError(format!("Failed to read response body: {}", e)))?;

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            AIError::ParseError(format!(
                "Failed to parse API response: {} - Raw response: {}",
                e,
                body.chars().take(200).collect::<String>()
            ))
        })?;

        parsed
            .content()
            .map(String::from)
            .ok_or(AIError::EmptyResponse)
    }
}

#[async_trait]
impl CommandTranslator for ChatClient {
    async fn translate(&self, input: &str, context: &TranslationContext) -> Result<String, AIError> {
        let system = prompt::system_prompt(context);
        let reply = self.complete(&system, input).await?;
        tracing::debug!(reply = reply.as_str(), "model reply");
        best_suggestion(&reply)
    }
}

fn insert_optional(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name, v);
        }
        Err(e) => tracing::warn!(header = %name, "skipping invalid header value: {}", e),
    }
}

/// `error.message` from an OpenAI-style error body, or the raw text.
async fn error_message(response: reqwest::Response) -> Option<String> {
    let text = response.text().await.ok()?;
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) if !body.error.message.is_empty() => Some(body.error.message),
        _ if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}
