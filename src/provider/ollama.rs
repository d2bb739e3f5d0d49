use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{non_empty, read_success_body, Provider};
use crate::wire::GenerationRequest;

pub struct Ollama {
    url: String,
    client: Client,
    timeout: Duration,
}

impl Ollama {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self { url, client: Client::new(), timeout }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

#[async_trait]
impl Provider for Ollama {
    async fn send(&self, req: &GenerationRequest) -> Result<String> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &req.params.model,
            messages: vec![Msg { role: "user", content: &req.prompt }],
            stream: false,
            options: OllamaOptions {
                temperature: req.params.temperature,
                num_predict: req.params.max_tokens,
            },
        };

        debug!(%url, model = %req.params.model, "POST ollama chat");

        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("ollama request failed")?;

        let text = read_success_body(resp, "ollama").await?;
        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("ollama response parse error: {e}\nRaw: {text}"))?;
        non_empty(parsed.message.content, "ollama")
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::GenerationParams;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_non_streaming_request_with_token_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({ "stream": false, "options": { "num_predict": 2048 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3",
                "message": { "role": "assistant", "content": "Workout Plan: yoga" },
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let p = Ollama::new(server.uri(), Duration::from_secs(5));
        let req = GenerationRequest::new(
            "hi".into(),
            GenerationParams { model: "llama3".into(), temperature: 0.6, max_tokens: 2048 },
        );
        assert_eq!(p.send(&req).await.unwrap(), "Workout Plan: yoga");
    }
}
