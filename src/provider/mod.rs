use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Response;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::config::{Config, Secrets};
use crate::errors::PlannerError;
use crate::wire::GenerationRequest;

pub mod cohere;
pub mod ollama;
pub mod openai;

#[async_trait]
pub trait Provider: Send + Sync {
    /// One call, awaited to completion. Returns the model's raw text.
    async fn send(&self, req: &GenerationRequest) -> Result<String>;

    fn name(&self) -> &'static str;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

/// Builds the configured adapter. Fails before any request exists when the
/// provider needs a credential and none is available.
pub fn make_provider(cfg: &Config, secrets: &Secrets) -> Result<DynProvider, PlannerError> {
    let timeout = Duration::from_secs(cfg.timeout_secs);
    let api_key = match cfg.provider.credential_key() {
        Some(key) => Some(secrets.resolve(key).ok_or_else(|| {
            PlannerError::Config(format!(
                "{key} not found. Set it in {} or in the environment.",
                cfg.secrets_path.display()
            ))
        })?),
        None => None,
    };

    let provider: DynProvider = match (cfg.provider, api_key) {
        (ProviderKind::Cohere, Some(key)) => Box::new(cohere::Cohere::new(key, cfg.cohere_url.clone(), timeout)),
        (ProviderKind::OpenAI, Some(key)) => Box::new(openai::OpenAIProvider::new(key, cfg.openai_url.clone(), timeout)),
        (ProviderKind::Ollama, _) => Box::new(ollama::Ollama::new(cfg.ollama_url.clone(), timeout)),
        (kind, None) => {
            return Err(PlannerError::Config(format!("{} requires an API key", kind.as_str())));
        }
    };
    Ok(provider)
}

/// Reads the body and turns non-2xx statuses into errors carrying the body text.
pub(crate) async fn read_success_body(resp: Response, provider: &str) -> Result<String> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .with_context(|| format!("{provider}: reading response body"))?;
    if !status.is_success() {
        return Err(anyhow!("{provider} API error ({status}): {text}"));
    }
    Ok(text)
}

pub(crate) fn non_empty(text: String, provider: &str) -> Result<String> {
    if text.trim().is_empty() {
        Err(anyhow!("{provider}: empty response text"))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(kind: ProviderKind) -> Config {
        Config { provider: kind, ..Config::default() }
    }

    #[test]
    fn missing_credential_is_config_error() {
        let err = make_provider(&cfg(ProviderKind::Cohere), &Secrets::from_pairs(&[])).err().unwrap();
        match err {
            PlannerError::Config(msg) => assert!(msg.contains("COHERE_API_KEY")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let secrets = Secrets::from_pairs(&[("OPENAI_API_KEY", "   ")]);
        assert!(matches!(make_provider(&cfg(ProviderKind::OpenAI), &secrets), Err(PlannerError::Config(_))));
    }

    #[test]
    fn credential_from_secrets_builds_provider() {
        let secrets = Secrets::from_pairs(&[("COHERE_API_KEY", "k")]);
        let p = make_provider(&cfg(ProviderKind::Cohere), &secrets).unwrap();
        assert_eq!(p.name(), "cohere");
    }

    #[test]
    fn ollama_needs_no_credential() {
        let p = make_provider(&cfg(ProviderKind::Ollama), &Secrets::from_pairs(&[])).unwrap();
        assert_eq!(p.name(), "ollama");
    }
}
