use anyhow::{Context, Result};
use fs_err as fs;
use std::path::{Path, PathBuf};

use crate::prompt::{DIET_MARKER, WORKOUT_MARKER};

pub const DEFAULT_EXPORT_NAME: &str = "diet_workout_plan.txt";

const DIET_DECORATIONS: &[(&str, &str)] = &[
    ("Day 1:", "Day 1: 🥣"),
    ("Day 2:", "Day 2: 🥗"),
    ("Day 3:", "Day 3: 🍲"),
    ("Day 4:", "Day 4: 🥑"),
    ("Day 5:", "Day 5: 🍛"),
    ("Day 6:", "Day 6: 🥙"),
    ("Day 7:", "Day 7: 🍱"),
    ("Breakfast:", "Breakfast: 🍳"),
    ("Lunch:", "Lunch: 🥪"),
    ("Dinner:", "Dinner: 🍽️"),
    ("Snack:", "Snack: 🍎"),
    ("Rest Day:", "Rest Day: 😴"),
];

const WORKOUT_DECORATIONS: &[(&str, &str)] = &[
    ("Day 1:", "Day 1: 🏋️"),
    ("Day 2:", "Day 2: 🏃"),
    ("Day 3:", "Day 3: 🚴"),
    ("Day 4:", "Day 4: 🧘"),
    ("Day 5:", "Day 5: 🤸"),
    ("Day 6:", "Day 6: 🏊"),
    ("Day 7:", "Day 7: 🥊"),
];

/// The model's reply after sectioning.
#[derive(Debug, Clone, PartialEq)]
pub enum Sections {
    Split { diet: String, workout: String },
    /// Either marker was missing; shown as one block, undecorated.
    Single(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub raw: String,
    pub sections: Sections,
}

impl GeneratedPlan {
    pub fn is_sectioned(&self) -> bool {
        matches!(self.sections, Sections::Split { .. })
    }

    /// Writes the verbatim raw response. Returns the number of bytes written.
    pub fn export(&self, path: &Path) -> Result<u64> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.raw.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(self.raw.len() as u64)
    }
}

/// Splits the raw text into undecorated (diet, workout) halves.
///
/// Splits on the first `Workout Plan:` only. Returns None unless both markers are present.
pub fn split_sections(raw: &str) -> Option<(String, String)> {
    if !raw.contains(DIET_MARKER) {
        return None;
    }
    let at = raw.find(WORKOUT_MARKER)?;
    let diet = raw[..at].replace(DIET_MARKER, "");
    let workout = raw[at + WORKOUT_MARKER.len()..].trim().to_string();
    Some((diet, workout))
}

/// Literal, case-sensitive replacement of every pattern in one left-to-right pass.
///
/// Matches never overlap and inserted text is never rescanned. When several
/// patterns match at the same offset the first one in `table` wins.
pub fn decorate(text: &str, table: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut rest = text;
    while !rest.is_empty() {
        match table.iter().find(|(pat, _)| rest.starts_with(pat)) {
            Some((pat, with)) => {
                out.push_str(with);
                rest = &rest[pat.len()..];
            }
            None => {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    out.push(c);
                }
                rest = chars.as_str();
            }
        }
    }
    out
}

pub fn format_plan(raw: impl Into<String>) -> GeneratedPlan {
    let raw = raw.into();
    let sections = match split_sections(&raw) {
        Some((diet, workout)) => Sections::Split {
            diet: decorate(&diet, DIET_DECORATIONS),
            workout: decorate(&workout, WORKOUT_DECORATIONS),
        },
        None => Sections::Single(raw.clone()),
    };
    GeneratedPlan { raw, sections }
}

/// `asha_diet_workout_plan.txt` for "Asha", the bare default for an empty name.
pub fn default_export_path(name: &str) -> PathBuf {
    let slug = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect::<String>();
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        PathBuf::from(DEFAULT_EXPORT_NAME)
    } else {
        PathBuf::from(format!("{slug}_{DEFAULT_EXPORT_NAME}"))
    }
}
