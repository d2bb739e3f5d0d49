use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;

/// Generation settings fixed by the operator, never by the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<&Config> for GenerationParams {
    fn from(cfg: &Config) -> Self {
        Self {
            model: cfg.model().to_string(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub prompt: String,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(prompt: String, params: GenerationParams) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            prompt,
            params,
        }
    }
}
