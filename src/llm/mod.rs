mod ollama;
pub use ollama::OllamaClient;

#[cfg(test)]
pub mod scripted;

use crate::prelude::*;

use async_trait::async_trait;
use serde::Serialize;

/// Something that turns a chat transcript into free-form text.
///
/// Replies are not trusted: callers must cope with prose, broken JSON and
/// empty strings.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<String>;
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        return Self {
            role: Role::System,
            content: content.into(),
        };
    }

    pub fn user(content: impl Into<String>) -> Self {
        return Self {
            role: Role::User,
            content: content.into(),
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub format: ResponseFormat,
    pub temperature: f32,
}

impl ChatRequest {
    /// A system + user exchange, the only shape the game sends.
    pub fn exchange(
        model: &str,
        system: impl Into<String>,
        user: impl Into<String>,
        format: ResponseFormat,
        temperature: f32,
    ) -> Self {
        return Self {
            model: model.to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            format,
            temperature,
        };
    }
}
