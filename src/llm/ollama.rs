use super::{ChatMessage, ChatRequest, ResponseFormat, TextGenerator};

use crate::prelude::*;

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Client for a local Ollama server's `/api/chat` endpoint.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    client: Client,
    chat_url: String,
}

#[derive(Serialize, Debug)]
struct OllamaChatBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: OllamaOptions,
}

#[derive(Serialize, Debug)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Deserialize, Debug)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        return Ok(Self {
            client: builder.build()?,
            chat_url: format!("{}/api/chat", base_url.trim_end_matches('/')),
        });
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        return Self::new(&cfg.ollama_url, cfg.ollama_timeout);
    }
}

fn body(request: &ChatRequest) -> OllamaChatBody<'_> {
    return OllamaChatBody {
        model: &request.model,
        messages: &request.messages,
        stream: false,
        format: match request.format {
            ResponseFormat::Text => None,
            ResponseFormat::Json => Some("json"),
        },
        options: OllamaOptions {
            temperature: request.temperature,
        },
    };
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn chat(&self, request: ChatRequest) -> Result<String> {
        tracing::debug!(
            model = %request.model,
            format = ?request.format,
            temperature = request.temperature,
            "calling ollama"
        );

        let response = self
            .client
            .post(&self.chat_url)
            .json(&body(&request))
            .send()
            .await
            .with_context(|| format!("ollama request to {} failed", self.chat_url))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("ollama returned {status}: {text}").into());
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .context("unexpected ollama response body")?;

        return Ok(parsed.message.content);
    }
}
