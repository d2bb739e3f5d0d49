use clap::ValueEnum;
use std::fmt;

pub const AGE_RANGE: (u32, u32) = (10, 100);
pub const WEIGHT_RANGE: (f64, f64) = (30.0, 200.0);
pub const HEIGHT_RANGE: (u32, u32) = (100, 220);

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Goal {
    #[default]
    WeightLoss,
    WeightGain,
    MuscleGain,
    Maintenance,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DietPreference {
    #[default]
    Vegetarian,
    NonVegetarian,
    Vegan,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Moderate,
    Active,
}

/// Human-readable labels. These are what gets persisted and what the model sees.
pub trait Label: Sized + Copy + 'static {
    const ALL: &'static [Self];
    fn label(self) -> &'static str;
}

impl Label for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female, Gender::Other];
    fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl Label for Goal {
    const ALL: &'static [Self] = &[Goal::WeightLoss, Goal::WeightGain, Goal::MuscleGain, Goal::Maintenance];
    fn label(self) -> &'static str {
        match self {
            Goal::WeightLoss => "Weight Loss",
            Goal::WeightGain => "Weight Gain",
            Goal::MuscleGain => "Muscle Gain",
            Goal::Maintenance => "Maintenance",
        }
    }
}

impl Label for DietPreference {
    const ALL: &'static [Self] = &[DietPreference::Vegetarian, DietPreference::NonVegetarian, DietPreference::Vegan];
    fn label(self) -> &'static str {
        match self {
            DietPreference::Vegetarian => "Vegetarian",
            DietPreference::NonVegetarian => "Non-Vegetarian",
            DietPreference::Vegan => "Vegan",
        }
    }
}

impl Label for ActivityLevel {
    const ALL: &'static [Self] = &[ActivityLevel::Sedentary, ActivityLevel::Moderate, ActivityLevel::Active];
    fn label(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::Moderate => "Moderate",
            ActivityLevel::Active => "Active",
        }
    }
}

macro_rules! display_via_label {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(Gender, Goal, DietPreference, ActivityLevel);

/// One user's submitted attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: u32,
    pub goal: Goal,
    pub diet: DietPreference,
    pub activity_level: ActivityLevel,
    pub medical_conditions: String,
    pub region: String,
    pub state: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: AGE_RANGE.0,
            gender: Gender::default(),
            weight_kg: WEIGHT_RANGE.0,
            height_cm: HEIGHT_RANGE.0,
            goal: Goal::default(),
            diet: DietPreference::default(),
            activity_level: ActivityLevel::default(),
            medical_conditions: String::new(),
            region: String::new(),
            state: String::new(),
        }
    }
}

impl Profile {
    /// Checks the numeric bounds the input surface enforces.
    pub fn validate(&self) -> Result<(), String> {
        check_age(self.age)?;
        check_weight(self.weight_kg)?;
        check_height(self.height_cm)?;
        Ok(())
    }
}

pub fn check_age(age: u32) -> Result<u32, String> {
    let (lo, hi) = AGE_RANGE;
    if (lo..=hi).contains(&age) {
        Ok(age)
    } else {
        Err(format!("age must be between {lo} and {hi}, got {age}"))
    }
}

pub fn check_weight(weight: f64) -> Result<f64, String> {
    let (lo, hi) = WEIGHT_RANGE;
    if weight.is_finite() && (lo..=hi).contains(&weight) {
        Ok(weight)
    } else {
        Err(format!("weight must be between {lo} and {hi} kg, got {weight}"))
    }
}

pub fn check_height(height: u32) -> Result<u32, String> {
    let (lo, hi) = HEIGHT_RANGE;
    if (lo..=hi).contains(&height) {
        Ok(height)
    } else {
        Err(format!("height must be between {lo} and {hi} cm, got {height}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_sits_on_lower_bounds() {
        let p = Profile::default();
        assert_eq!(p.age, 10);
        assert_eq!(p.weight_kg, 30.0);
        assert_eq!(p.height_cm, 100);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(check_age(9).is_err());
        assert!(check_age(101).is_err());
        assert!(check_weight(29.5).is_err());
        assert!(check_weight(200.5).is_err());
        assert!(check_weight(f64::NAN).is_err());
        assert!(check_height(221).is_err());

        let p = Profile { age: 150, ..Profile::default() };
        assert!(p.validate().unwrap_err().contains("age"));
    }

    #[test]
    fn labels_use_human_spelling() {
        assert_eq!(Goal::MuscleGain.to_string(), "Muscle Gain");
        assert_eq!(DietPreference::NonVegetarian.to_string(), "Non-Vegetarian");
        assert_eq!(ActivityLevel::ALL.len(), 3);
    }

    #[test]
    fn cli_values_are_kebab_case() {
        let goal = Goal::from_str("muscle-gain", false).unwrap();
        assert_eq!(goal, Goal::MuscleGain);
        let diet = DietPreference::from_str("non-vegetarian", false).unwrap();
        assert_eq!(diet, DietPreference::NonVegetarian);
    }
}
