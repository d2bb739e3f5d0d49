use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

mod cli;
mod config;
mod errors;
mod log;
mod plan;
mod profile;
mod prompt;
mod provider;
mod store;
mod ux;
mod wire;

use cli::{Args, Command};
use config::{Config, Secrets};
use errors::PlannerError;
use plan::GeneratedPlan;
use profile::Profile;
use provider::{DynProvider, Provider};
use store::PreferenceStore;
use wire::{GenerationParams, GenerationRequest};

fn save(store: &PreferenceStore, profile: &Profile) -> Result<i64, PlannerError> {
    profile.validate().map_err(PlannerError::Store)?;
    store.insert(profile).map_err(PlannerError::store)
}

/// Prompt → provider → formatter. Nothing is returned unless the call succeeded.
async fn generate(
    provider: &dyn Provider,
    params: GenerationParams,
    profile: &Profile,
    progress: bool,
) -> Result<(GenerationRequest, GeneratedPlan), PlannerError> {
    let req = GenerationRequest::new(prompt::build_prompt(profile), params);
    info!(run_id = %req.run_id, provider = provider.name(), model = %req.params.model, "generating plan");

    let pb = ux::spinner(progress, "Generating your plan...");
    let result = provider.send(&req).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let raw = result.map_err(PlannerError::generation)?;
    let plan = plan::format_plan(raw);
    debug!(run_id = %req.run_id, sectioned = plan.is_sectioned(), bytes = plan.raw.len(), "plan received");
    Ok((req, plan))
}

fn export(plan: &GeneratedPlan, path: &Path) -> Result<(), PlannerError> {
    let bytes = plan.export(path).map_err(PlannerError::export)?;
    ux::exported(path, bytes);
    Ok(())
}

fn save_artifacts(cfg: &Config, provider: &str, req: &GenerationRequest, plan: &GeneratedPlan) {
    match log::save_run(&cfg.artifacts_dir, provider, req, plan) {
        Ok(saved) => debug!(
            dir = %saved.dir.display(),
            prompt = %saved.prompt.display(),
            response = %saved.response.display(),
            meta = %saved.meta.display(),
            "run artifacts saved"
        ),
        Err(e) => ux::error(&PlannerError::export(e.context("saving run artifacts"))),
    }
}

fn load_provider(cfg: &Config, secrets: Result<Secrets, PlannerError>) -> Result<DynProvider, PlannerError> {
    provider::make_provider(cfg, &secrets?)
}

fn run_save(cfg: &Config, profile: Profile) -> ExitCode {
    let result = PreferenceStore::open(&cfg.db_path)
        .map_err(PlannerError::store)
        .and_then(|store| save(&store, &profile));
    match result {
        Ok(id) => {
            info!(id, "preferences saved");
            ux::success("Preferences Saved!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            ux::error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run_generate(
    cfg: &Config,
    secrets: Result<Secrets, PlannerError>,
    profile: Profile,
    export_to: Option<Option<PathBuf>>,
    keep_artifacts: bool,
    progress: bool,
) -> ExitCode {
    let provider = match load_provider(cfg, secrets) {
        Ok(p) => p,
        Err(e) => {
            ux::error(&e);
            return ExitCode::FAILURE;
        }
    };

    let (req, plan) = match generate(provider.as_ref(), GenerationParams::from(cfg), &profile, progress).await {
        Ok(r) => r,
        Err(e) => {
            ux::error(&e);
            return ExitCode::FAILURE;
        }
    };
    ux::show_plan(&plan);

    if keep_artifacts {
        save_artifacts(cfg, provider.name(), &req, &plan);
    }

    if let Some(path) = export_to {
        let path = path.unwrap_or_else(|| plan::default_export_path(&profile.name));
        if let Err(e) = export(&plan, &path) {
            ux::error(&e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

/// Interactive form session. Owns the store handle and the provider for its lifetime.
struct Session<'a> {
    cfg: &'a Config,
    store: Option<PreferenceStore>,
    provider: Result<DynProvider, PlannerError>,
    profile: Profile,
    last_plan: Option<GeneratedPlan>,
    progress: bool,
}

impl<'a> Session<'a> {
    fn start(cfg: &'a Config, secrets: Result<Secrets, PlannerError>, progress: bool) -> Self {
        let provider = load_provider(cfg, secrets);
        if let Err(e) = &provider {
            ux::error(e);
        }
        Self { cfg, store: None, provider, profile: Profile::default(), last_plan: None, progress }
    }

    /// Opens the store on first use; a failed open is retried on the next save.
    fn store(&mut self) -> Result<&PreferenceStore, PlannerError> {
        if self.store.is_none() {
            self.store = Some(PreferenceStore::open(&self.cfg.db_path).map_err(PlannerError::store)?);
        }
        self.store
            .as_ref()
            .ok_or_else(|| PlannerError::Store("preference store unavailable".into()))
    }

    fn on_save(&mut self) {
        let profile = self.profile.clone();
        match self.store().and_then(|s| save(s, &profile)) {
            Ok(id) => {
                info!(id, "preferences saved");
                ux::success("Preferences Saved!");
            }
            Err(e) => ux::error(&e),
        }
    }

    async fn on_generate(&mut self) {
        let provider = match &self.provider {
            Ok(p) => p,
            Err(e) => {
                ux::error(e);
                return;
            }
        };
        match generate(provider.as_ref(), GenerationParams::from(self.cfg), &self.profile, self.progress).await {
            Ok((_, plan)) => {
                ux::show_plan(&plan);
                self.last_plan = Some(plan);
            }
            Err(e) => ux::error(&e),
        }
    }

    async fn run<R: std::io::BufRead, W: std::io::Write>(&mut self, form: &mut ux::Form<R, W>) -> anyhow::Result<()> {
        match form.fill(&self.profile)? {
            Some(p) => self.profile = p,
            None => return Ok(()),
        }
        loop {
            match form.action(self.last_plan.is_some())? {
                ux::Action::Edit => match form.fill(&self.profile)? {
                    Some(p) => self.profile = p,
                    None => return Ok(()),
                },
                ux::Action::Save => self.on_save(),
                ux::Action::Generate => self.on_generate().await,
                ux::Action::Export => {
                    let Some(plan) = &self.last_plan else { continue };
                    let default = plan::default_export_path(&self.profile.name);
                    let Some(answer) = form.ask_path("Export to", &default)? else { return Ok(()) };
                    if let Err(e) = export(plan, Path::new(answer.trim())) {
                        ux::error(&e);
                    }
                }
                ux::Action::Quit => return Ok(()),
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    log::init(args.debug);

    let mut cfg = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            ux::error(&e);
            return Ok(ExitCode::FAILURE);
        }
    };
    if let Some(db) = args.db {
        cfg.db_path = db;
    }
    if let Some(secrets) = args.secrets {
        cfg.secrets_path = secrets;
    }
    let progress = !args.no_progress;

    let code = match args.command {
        Command::Save(p) => run_save(&cfg, p.into()),
        Command::Generate { profile, export, save_artifacts } => {
            let secrets = Secrets::load(&cfg.secrets_path);
            run_generate(&cfg, secrets, profile.into(), export, save_artifacts, progress).await
        }
        Command::Interactive => {
            let mut session = Session::start(&cfg, Secrets::load(&cfg.secrets_path), progress);
            session.run(&mut ux::Form::stdio()).await?;
            ExitCode::SUCCESS
        }
    };
    Ok(code)
}
