use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::profile::{self, ActivityLevel, DietPreference, Gender, Goal, Profile};

#[derive(ValueEnum, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Cohere,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Ollama,
}

impl ProviderKind {
    /// Name of the secret/env var holding the credential, if the provider needs one.
    pub fn credential_key(self) -> Option<&'static str> {
        match self {
            ProviderKind::Cohere => Some("COHERE_API_KEY"),
            ProviderKind::OpenAI => Some("OPENAI_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }

    /// Model used when the config file does not name one.
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Cohere => "command-r-plus",
            ProviderKind::OpenAI => "gpt-4o-mini",
            ProviderKind::Ollama => "llama3",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Cohere => "cohere",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Ollama => "ollama",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "nutrifit", version, about = "Personalized diet and workout plans from your profile")]
pub struct Args {
    /// Operator config file (defaults to ./nutrifit.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Secrets file holding the provider API key
    #[arg(long, global = true)]
    pub secrets: Option<PathBuf>,

    /// SQLite file for saved preferences
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[arg(long, global = true, default_value_t = false)]
    pub no_progress: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store the profile as a new preferences row
    Save(ProfileArgs),
    /// Ask the model for a 7-day diet and workout plan
    Generate {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Write the raw response to a text file (default name derives from --name)
        #[arg(long, num_args = 0..=1)]
        export: Option<Option<PathBuf>>,

        /// Keep prompt, response and run metadata under the artifacts directory
        #[arg(long, default_value_t = false)]
        save_artifacts: bool,
    },
    /// Fill in the form step by step and save or generate from it
    Interactive,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProfileArgs {
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value_t = profile::AGE_RANGE.0, value_parser = parse_age)]
    pub age: u32,

    #[arg(long, value_enum, default_value_t = Gender::Male)]
    pub gender: Gender,

    /// Weight in kilograms
    #[arg(long, default_value_t = profile::WEIGHT_RANGE.0, value_parser = parse_weight)]
    pub weight: f64,

    /// Height in centimeters
    #[arg(long, default_value_t = profile::HEIGHT_RANGE.0, value_parser = parse_height)]
    pub height: u32,

    #[arg(long, value_enum, default_value_t = Goal::WeightLoss)]
    pub goal: Goal,

    #[arg(long, value_enum, default_value_t = DietPreference::Vegetarian)]
    pub diet: DietPreference,

    #[arg(long, value_enum, default_value_t = ActivityLevel::Sedentary)]
    pub activity_level: ActivityLevel,

    /// Medical conditions or allergies
    #[arg(long, default_value = "")]
    pub medical_conditions: String,

    /// Country or region
    #[arg(long, default_value = "")]
    pub region: String,

    #[arg(long, default_value = "")]
    pub state: String,
}

impl From<ProfileArgs> for Profile {
    fn from(a: ProfileArgs) -> Self {
        Profile {
            name: a.name,
            age: a.age,
            gender: a.gender,
            weight_kg: a.weight,
            height_cm: a.height,
            goal: a.goal,
            diet: a.diet,
            activity_level: a.activity_level,
            medical_conditions: a.medical_conditions,
            region: a.region,
            state: a.state,
        }
    }
}

fn parse_age(s: &str) -> Result<u32, String> {
    s.trim().parse::<u32>().map_err(|e| e.to_string()).and_then(profile::check_age)
}

fn parse_weight(s: &str) -> Result<f64, String> {
    s.trim().parse::<f64>().map_err(|e| e.to_string()).and_then(profile::check_weight)
}

fn parse_height(s: &str) -> Result<u32, String> {
    s.trim().parse::<u32>().map_err(|e| e.to_string()).and_then(profile::check_height)
}
