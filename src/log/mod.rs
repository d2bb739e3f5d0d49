use anyhow::Result;
use fs_err as fs;
use serde_json::{json, to_string_pretty};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use crate::plan::GeneratedPlan;
use crate::wire::GenerationRequest;

/// stderr subscriber. `RUST_LOG` wins; otherwise `--debug` turns on this crate's debug events.
pub fn init(debug: bool) {
    let fallback = if debug { "warn,nutrifit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub struct SavedRun {
    pub dir: PathBuf,
    pub prompt: PathBuf,
    pub response: PathBuf,
    pub meta: PathBuf,
}

pub fn run_dir(artifacts_dir: &Path, run_id: Uuid) -> PathBuf {
    artifacts_dir.join(run_id.to_string())
}

pub fn save_run(artifacts_dir: &Path, provider: &str, req: &GenerationRequest, plan: &GeneratedPlan) -> Result<SavedRun> {
    let dir = run_dir(artifacts_dir, req.run_id);
    fs::create_dir_all(&dir)?;

    let prompt = dir.join("prompt.txt");
    fs::write(&prompt, &req.prompt)?;

    let response = dir.join("response.txt");
    fs::write(&response, &plan.raw)?;

    let meta = dir.join("run.json");
    let body = json!({
        "run_id": req.run_id,
        "timestamp": req.timestamp,
        "provider": provider,
        "params": req.params,
        "sectioned": plan.is_sectioned(),
        "response_bytes": plan.raw.len(),
    });
    fs::write(&meta, to_string_pretty(&body)?)?;

    Ok(SavedRun { dir, prompt, response, meta })
}
