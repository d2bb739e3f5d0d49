use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{non_empty, read_success_body, Provider};
use crate::wire::GenerationRequest;

pub struct Cohere {
    api_key: String,
    api_base: String,
    client: Client,
    timeout: Duration,
}

impl Cohere {
    pub fn new(api_key: String, api_base: String, timeout: Duration) -> Self {
        Self { api_key, api_base, client: Client::new(), timeout }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    message: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl Provider for Cohere {
    async fn send(&self, req: &GenerationRequest) -> Result<String> {
        let url = format!("{}/v1/chat", self.api_base.trim_end_matches('/'));
        let body = ChatRequest {
            model: &req.params.model,
            message: &req.prompt,
            temperature: req.params.temperature,
            max_tokens: req.params.max_tokens,
        };

        debug!(%url, model = %req.params.model, "POST cohere chat");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("cohere request failed")?;

        let text = read_success_body(resp, "cohere").await?;
        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("cohere response parse error: {e}\nRaw: {text}"))?;
        non_empty(parsed.text, "cohere")
    }

    fn name(&self) -> &'static str {
        "cohere"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::GenerationParams;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            "Personalized Diet & Workout Plan:".into(),
            GenerationParams { model: "command-r-plus".into(), temperature: 0.6, max_tokens: 2048 },
        )
    }

    fn client(base: String) -> Cohere {
        Cohere::new("test-key".into(), base, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn returns_reply_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "command-r-plus",
                "message": "Personalized Diet & Workout Plan:",
                "max_tokens": 2048
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "text": "Diet Plan:\nDay 1: oats\nWorkout Plan:\nDay 1: walk",
                "generation_id": "g-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(server.uri()).send(&request()).await.unwrap();
        assert!(text.starts_with("Diet Plan:"));
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api token"))
            .mount(&server)
            .await;

        let err = client(server.uri()).send(&request()).await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("401"));
        assert!(msg.contains("invalid api token"));
    }

    #[tokio::test]
    async fn empty_text_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "  " })))
            .mount(&server)
            .await;

        assert!(client(server.uri()).send(&request()).await.is_err());
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        let c = client("http://127.0.0.1:9".into());
        assert!(c.send(&request()).await.is_err());
    }
}
