use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::ProviderKind;
use crate::errors::PlannerError;

pub const DEFAULT_CONFIG_FILE: &str = "nutrifit.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db_path: PathBuf,
    pub provider: ProviderKind,
    /// Falls back to the provider's default model when unset.
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub cohere_url: String,
    pub openai_url: String,
    pub ollama_url: String,
    pub secrets_path: PathBuf,
    pub artifacts_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "user_data.db".into(),
            provider: ProviderKind::Cohere,
            model: None,
            temperature: 0.6,
            max_tokens: 2048,
            timeout_secs: 120,
            cohere_url: "https://api.cohere.com".into(),
            openai_url: "https://api.openai.com".into(),
            ollama_url: "http://localhost:11434".into(),
            secrets_path: ".nutrifit/secrets.toml".into(),
            artifacts_dir: ".nutrifit/runs".into(),
        }
    }
}

impl Config {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or_else(|| self.provider.default_model())
    }

    /// An explicit path must exist; the implicit `nutrifit.toml` is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, PlannerError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                    return Ok(Self::default());
                }
                p
            }
        };
        Self::from_file(&path).map_err(|e| PlannerError::config(format!("{e:#}")))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parsing {}", path.display()))?;
        debug!(path = %path.display(), provider = ?cfg.provider, model = %cfg.model(), "config loaded");
        Ok(cfg)
    }
}

/// Operator-managed secrets, keyed the same way as the environment variables.
#[derive(Debug, Clone)]
pub struct Secrets {
    values: BTreeMap<String, String>,
    from_env: bool,
}

impl Secrets {
    /// A missing file yields an empty set; a malformed one is an error.
    /// The environment is consulted on every lookup.
    pub fn load(path: &Path) -> Result<Self, PlannerError> {
        if !path.exists() {
            debug!(path = %path.display(), "secrets file not found");
            return Ok(Self { values: BTreeMap::new(), from_env: true });
        }
        let s = fs::read_to_string(path).map_err(PlannerError::config)?;
        let values: BTreeMap<String, toml::Value> = toml::from_str(&s)
            .map_err(|e| PlannerError::config(format!("parsing {}: {e}", path.display())))?;
        let values = values
            .into_iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
            .collect();
        Ok(Self { values, from_env: true })
    }

    /// Fixed values only; the environment is never read.
    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            from_env: false,
        }
    }

    /// Environment wins over the file. Empty or blank values count as absent.
    pub fn resolve(&self, key: &str) -> Option<String> {
        let from_env = if self.from_env { std::env::var(key).ok() } else { None };
        self.resolve_with(key, from_env)
    }

    fn resolve_with(&self, key: &str, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.values.get(key).filter(|v| !v.trim().is_empty()).cloned())
    }
}
