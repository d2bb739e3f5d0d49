use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("configuration error: {0}")] Config(String),
    #[error("could not save preferences: {0}")] Store(String),
    #[error("plan generation failed: {0}")] Generation(String),
    #[error("export failed: {0}")] Export(String),
}

impl PlannerError {
    pub fn config(e: impl std::fmt::Display) -> Self {
        Self::Config(e.to_string())
    }

    /// Flattens an anyhow chain into one line so the notice shows every cause.
    pub fn store(e: anyhow::Error) -> Self {
        Self::Store(format!("{e:#}"))
    }

    pub fn generation(e: anyhow::Error) -> Self {
        Self::Generation(format!("{e:#}"))
    }

    pub fn export(e: anyhow::Error) -> Self {
        Self::Export(format!("{e:#}"))
    }
}
