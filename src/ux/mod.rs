use colored::Colorize;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use crate::errors::PlannerError;
use crate::plan::{GeneratedPlan, Sections};
use crate::profile::{self, Label, Profile};

pub fn success(msg: &str) {
    println!("{} {}", "✔".green().bold(), msg.green());
}

pub fn error(err: &PlannerError) {
    eprintln!("{} {}", "✘".red().bold(), err.to_string().red());
}

pub fn spinner(enabled: bool, msg: &str) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    Some(pb)
}

fn pane(title: &str, body: &str) {
    let rule = "━".repeat(56);
    println!("\n{}", format!("┏{rule}┓").bold());
    println!("  {}", title.bold());
    println!("{}", format!("┗{rule}┛").bold());
    println!("{}", body.trim_end());
}

pub fn show_plan(plan: &GeneratedPlan) {
    match &plan.sections {
        Sections::Split { diet, workout } => {
            pane("🥗 Diet Plan", diet);
            pane("🏋️ Workout Plan", workout);
        }
        Sections::Single(text) => pane("Your Plan", text),
    }
    println!();
}

pub fn exported(path: &Path, bytes: u64) {
    success(&format!("Plan exported to {} ({})", path.display(), format_size(bytes, DECIMAL)));
}

/// Actions offered by the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    Save,
    Generate,
    Export,
    Quit,
}

/// Answer that empties a free-text field.
pub const CLEAR: &str = "-";

/// Prompt-driven form over any reader/writer pair.
pub struct Form<R, W> {
    input: R,
    out: W,
}

impl Form<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Form<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// None on end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut s = String::new();
        if self.input.read_line(&mut s)? == 0 {
            return Ok(None);
        }
        Ok(Some(s.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask(&mut self, label: &str, current: &str) -> io::Result<Option<String>> {
        if current.is_empty() {
            write!(self.out, "{label}: ")?;
        } else {
            write!(self.out, "{label} [{current}]: ")?;
        }
        self.out.flush()?;
        Ok(self.read_line()?.map(|s| if s.trim().is_empty() { current.to_string() } else { s }))
    }

    /// Free-text field. Blank keeps the current value, `-` empties it.
    fn ask_text(&mut self, label: &str, current: &str) -> io::Result<Option<String>> {
        let label = if current.is_empty() { label.to_string() } else { format!("{label} ('{CLEAR}' clears)") };
        Ok(self.ask(&label, current)?.map(|s| if s.trim() == CLEAR { String::new() } else { s }))
    }

    /// Re-asks until `check` accepts the answer.
    fn ask_number<T>(
        &mut self,
        label: &str,
        current: T,
        check: fn(T) -> Result<T, String>,
    ) -> io::Result<Option<T>>
    where
        T: std::str::FromStr + std::fmt::Display + Copy,
    {
        loop {
            let Some(answer) = self.ask(label, &current.to_string())? else { return Ok(None) };
            match answer.trim().parse::<T>() {
                Ok(v) => match check(v) {
                    Ok(v) => return Ok(Some(v)),
                    Err(msg) => writeln!(self.out, "  {msg}")?,
                },
                Err(_) => writeln!(self.out, "  not a number: {answer}")?,
            }
        }
    }

    fn choose<T: Label + PartialEq>(&mut self, label: &str, current: T) -> io::Result<Option<T>> {
        loop {
            writeln!(self.out, "{label}:")?;
            for (i, v) in T::ALL.iter().enumerate() {
                let mark = if *v == current { "*" } else { " " };
                writeln!(self.out, " {mark}{}. {}", i + 1, v.label())?;
            }
            let Some(answer) = self.ask("Choice", "")? else { return Ok(None) };
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(Some(current));
            }
            if let Ok(n) = answer.parse::<usize>() {
                if let Some(v) = n.checked_sub(1).and_then(|i| T::ALL.get(i)) {
                    return Ok(Some(*v));
                }
            }
            if let Some(v) = T::ALL.iter().find(|v| v.label().eq_ignore_ascii_case(answer)) {
                return Ok(Some(*v));
            }
            writeln!(self.out, "  pick 1-{}", T::ALL.len())?;
        }
    }

    /// Walks every field, starting from `current`. An empty answer keeps the
    /// shown value; `-` clears a text field. Returns None if input ends midway.
    pub fn fill(&mut self, current: &Profile) -> io::Result<Option<Profile>> {
        writeln!(self.out, "\n{}", "User Preferences".bold())?;
        macro_rules! field {
            ($e:expr) => {
                match $e? {
                    Some(v) => v,
                    None => return Ok(None),
                }
            };
        }
        let p = Profile {
            name: field!(self.ask_text("Enter your name", &current.name)),
            age: field!(self.ask_number("Enter your age", current.age, profile::check_age)),
            gender: field!(self.choose("Select your gender", current.gender)),
            weight_kg: field!(self.ask_number("Enter your weight (kg)", current.weight_kg, profile::check_weight)),
            height_cm: field!(self.ask_number("Enter your height (cm)", current.height_cm, profile::check_height)),
            goal: field!(self.choose("Select your goal", current.goal)),
            diet: field!(self.choose("Diet Preference", current.diet)),
            activity_level: field!(self.choose("Activity Level", current.activity_level)),
            medical_conditions: field!(self.ask_text("Any medical conditions or allergies?", &current.medical_conditions)),
            region: field!(self.ask_text("Enter your country/region", &current.region)),
            state: field!(self.ask_text("Enter your state", &current.state)),
        };
        Ok(Some(p))
    }

    /// End of input reads as Quit.
    pub fn action(&mut self, can_export: bool) -> io::Result<Action> {
        loop {
            let export = if can_export { "  [x] export plan" } else { "" };
            write!(self.out, "\n[e] edit  [s] save preferences  [g] generate plan{export}  [q] quit > ")?;
            self.out.flush()?;
            let Some(answer) = self.read_line()? else { return Ok(Action::Quit) };
            match answer.trim().to_lowercase().as_str() {
                "e" | "edit" => return Ok(Action::Edit),
                "s" | "save" => return Ok(Action::Save),
                "g" | "generate" => return Ok(Action::Generate),
                "x" | "export" if can_export => return Ok(Action::Export),
                "q" | "quit" => return Ok(Action::Quit),
                other => writeln!(self.out, "  unknown action: {other}")?,
            }
        }
    }

    pub fn ask_path(&mut self, label: &str, default: &Path) -> io::Result<Option<String>> {
        self.ask(label, &default.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{DietPreference, Gender, Goal};

    fn form(script: &str) -> Form<&[u8], Vec<u8>> {
        Form::new(script.as_bytes(), Vec::new())
    }

    #[test]
    fn fill_reads_every_field_in_order() {
        let script = "Asha\n25\n2\n70.5\n175\n3\nvegan\n\nnone\nIndia\nKerala\n";
        let mut f = form(script);
        let p = f.fill(&Profile::default()).unwrap().unwrap();
        assert_eq!(p.name, "Asha");
        assert_eq!(p.age, 25);
        assert_eq!(p.gender, Gender::Female);
        assert_eq!(p.weight_kg, 70.5);
        assert_eq!(p.height_cm, 175);
        assert_eq!(p.goal, Goal::MuscleGain);
        assert_eq!(p.diet, DietPreference::Vegan);
        assert_eq!(p.activity_level, Profile::default().activity_level);
        assert_eq!(p.medical_conditions, "none");
        assert_eq!(p.state, "Kerala");
    }

    #[test]
    fn out_of_range_number_is_asked_again() {
        let script = "\n5\nabc\n30\n\n\n\n\n\n\n\n\n\n";
        let mut f = form(script);
        let p = f.fill(&Profile::default()).unwrap().unwrap();
        assert_eq!(p.age, 30);
        let shown = String::from_utf8(f.out).unwrap();
        assert!(shown.contains("age must be between 10 and 100"));
        assert!(shown.contains("not a number: abc"));
    }

    #[test]
    fn blank_answers_keep_previous_values() {
        let previous = Profile { name: "Ravi".into(), age: 40, ..Profile::default() };
        let script = "\n".repeat(11);
        let mut f = form(&script);
        assert_eq!(f.fill(&previous).unwrap().unwrap(), previous);
    }

    #[test]
    fn dash_clears_text_fields_but_blank_keeps_them() {
        let previous = Profile {
            name: "Ravi".into(),
            medical_conditions: "asthma".into(),
            region: "India".into(),
            state: "Goa".into(),
            ..Profile::default()
        };
        // name keeps, seven numeric/choice fields keep, medical and region clear, state keeps
        let script = " \n\n\n\n\n\n\n\n-\n - \n\n";
        let mut f = form(script);
        let p = f.fill(&previous).unwrap().unwrap();
        assert_eq!(p.name, "Ravi");
        assert_eq!(p.medical_conditions, "");
        assert_eq!(p.region, "");
        assert_eq!(p.state, "Goa");
        assert_eq!(p.age, previous.age);
    }

    #[test]
    fn dash_is_not_a_number() {
        let script = "\n-\n20\n\n\n\n\n\n\n\n\n\n";
        let mut f = form(script);
        let p = f.fill(&Profile::default()).unwrap().unwrap();
        assert_eq!(p.age, 20);
    }

    #[test]
    fn truncated_input_yields_none() {
        let mut f = form("Asha\n25\n");
        assert!(f.fill(&Profile::default()).unwrap().is_none());
    }

    #[test]
    fn export_action_only_when_plan_exists() {
        let mut f = form("x\ng\n");
        assert_eq!(f.action(false).unwrap(), Action::Generate);
        let mut f = form("x\n");
        assert_eq!(f.action(true).unwrap(), Action::Export);
        let mut f = form("");
        assert_eq!(f.action(true).unwrap(), Action::Quit);
    }
}
