use serde::Deserialize;

use super::error::AIError;

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}

impl ChatResponse {
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Pulls the command lines out of a model reply, dropping code fences and comments.
pub fn extract_commands(text: &str) -> Vec<String> {
    let mut lines: Vec<&str> = text.trim().lines().collect();

    if lines.first().is_some_and(|l| l.trim_start().starts_with("```")) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.trim() == "```") {
        lines.pop();
    }

    lines
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("//"))
        .map(String::from)
        .collect()
}

/// The first command line of the reply.
pub fn best_suggestion(text: &str) -> Result<String, AIError> {
    let mut commands = extract_commands(text).into_iter();
    let first = commands.next().ok_or(AIError::EmptyResponse)?;

    let dropped = commands.count();
    if dropped > 0 {
        tracing::debug!(dropped, "ignoring additional suggested lines");
    }

    Ok(first)
}
