use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{non_empty, read_success_body, Provider};
use crate::wire::GenerationRequest;

/// Sends the prompt as a single user message, no system scaffolding.
pub struct OpenAIProvider {
    api_key: String,
    api_base: String,
    client: Client,
    timeout: Duration,
}

impl OpenAIProvider {
    pub fn new(api_key: String, api_base: String, timeout: Duration) -> Self {
        Self { api_key, api_base, client: Client::new(), timeout }
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn send(&self, req: &GenerationRequest) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        let body = json!({
            "model": req.params.model,
            "messages": [
                { "role": "user", "content": req.prompt }
            ],
            "temperature": req.params.temperature,
            "max_tokens": req.params.max_tokens,
        });

        debug!(%url, model = %req.params.model, "POST openai chat completions");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("openai request failed")?;

        let text = read_success_body(resp, "openai").await?;
        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse OpenAI response: {e}\nRaw: {text}"))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        non_empty(content, "openai")
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
