use crate::profile::Profile;

pub const PREAMBLE: &str = "Personalized Diet & Workout Plan:";

pub const DIET_MARKER: &str = "Diet Plan:";
pub const WORKOUT_MARKER: &str = "Workout Plan:";

fn instruction() -> String {
    format!(
        "Provide a structured 7-day diet and workout plan. \
         The response must contain a heading \"{DIET_MARKER}\" followed by the detailed diet plan, \
         and a heading \"{WORKOUT_MARKER}\" followed by the detailed workout plan."
    )
}

/// Whole numbers keep one decimal so `70.0` reads the way the form showed it.
fn format_weight(w: f64) -> String {
    if w.fract() == 0.0 {
        format!("{w:.1}")
    } else {
        format!("{w}")
    }
}

/// Renders the instruction text for one profile.
///
/// Every field gets its own line, in a fixed order, even when empty.
pub fn build_prompt(p: &Profile) -> String {
    let lines = [
        PREAMBLE.to_string(),
        format!("Name: {}", p.name),
        format!("Age: {}", p.age),
        format!("Gender: {}", p.gender),
        format!("Weight: {} kg", format_weight(p.weight_kg)),
        format!("Height: {} cm", p.height_cm),
        format!("Goal: {}", p.goal),
        format!("Diet Preference: {}", p.diet),
        format!("Activity Level: {}", p.activity_level),
        format!("Medical Conditions: {}", p.medical_conditions),
        format!("Region: {}", p.region),
        format!("State: {}", p.state),
        instruction(),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ActivityLevel, DietPreference, Gender, Goal};

    fn sample() -> Profile {
        Profile {
            name: "Asha".into(),
            age: 25,
            gender: Gender::Female,
            weight_kg: 70.0,
            height_cm: 175,
            goal: Goal::MuscleGain,
            diet: DietPreference::Vegan,
            activity_level: ActivityLevel::Moderate,
            medical_conditions: "lactose intolerance".into(),
            region: "India".into(),
            state: "Kerala".into(),
        }
    }

    #[test]
    fn lines_follow_fixed_field_order() {
        let prompt = build_prompt(&sample());
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "Personalized Diet & Workout Plan:");
        assert_eq!(lines[1], "Name: Asha");
        assert_eq!(lines[2], "Age: 25");
        assert_eq!(lines[3], "Gender: Female");
        assert_eq!(lines[4], "Weight: 70.0 kg");
        assert_eq!(lines[5], "Height: 175 cm");
        assert_eq!(lines[6], "Goal: Muscle Gain");
        assert_eq!(lines[7], "Diet Preference: Vegan");
        assert_eq!(lines[8], "Activity Level: Moderate");
        assert_eq!(lines[9], "Medical Conditions: lactose intolerance");
        assert_eq!(lines[10], "Region: India");
        assert_eq!(lines[11], "State: Kerala");
        assert!(lines[12].starts_with("Provide a structured 7-day diet and workout plan."));
        assert!(lines[12].contains("\"Diet Plan:\""));
        assert!(lines[12].contains("\"Workout Plan:\""));
    }

    #[test]
    fn field_values_appear_in_order() {
        let p = sample();
        let prompt = build_prompt(&p);
        let values = [
            p.name.clone(),
            "25".to_string(),
            "Female".to_string(),
            "70.0 kg".to_string(),
            "175 cm".to_string(),
            "Muscle Gain".to_string(),
            "Vegan".to_string(),
            "Moderate".to_string(),
            p.medical_conditions.clone(),
            p.region.clone(),
            p.state.clone(),
        ];
        let mut cursor = 0;
        for v in values {
            let found = prompt[cursor..].find(&v).unwrap_or_else(|| panic!("{v} missing or out of order"));
            cursor += found + v.len();
        }
    }

    #[test]
    fn identical_input_gives_identical_bytes() {
        let p = sample();
        assert_eq!(build_prompt(&p), build_prompt(&p.clone()));
    }

    #[test]
    fn empty_text_fields_still_render_their_line() {
        let p = Profile::default();
        let prompt = build_prompt(&p);
        assert!(prompt.contains("\nName: \n"));
        assert!(prompt.contains("\nMedical Conditions: \n"));
        assert!(prompt.contains("\nRegion: \n"));
        assert!(prompt.contains("\nState: \n"));
    }

    #[test]
    fn fractional_weight_keeps_its_digits() {
        let p = Profile { weight_kg: 72.5, ..sample() };
        assert!(build_prompt(&p).contains("Weight: 72.5 kg"));
    }
}
