//! Question catalogue stored as TOML.
//!
//! ```toml
//! general = ["What is your name?"]
//!
//! [occupation]
//! Student = ["..."]
//!
//! [role]
//! "UI/UX" = ["..."]
//! ```
//!
//! Occupation and role tables are keyed by the choice labels.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::choice::{Choice, JobRole, Occupation};
use crate::core::ports::QuestionSource;

/// Returned as the only general question when the catalogue cannot be read.
pub const GENERAL_UNAVAILABLE: &str =
    "Sorry, I couldn't load the questions. Please try again later.";

/// Most questions asked per occupation or job role.
pub const MAX_POOL_SIZE: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Catalogue {
    pub general: Vec<String>,
    pub occupation: BTreeMap<String, Vec<String>>,
    pub role: BTreeMap<String, Vec<String>>,
}

impl Catalogue {
    /// General questions up to the first blank entry.
    #[must_use]
    pub fn general_questions(&self) -> Vec<String> {
        self.general
            .iter()
            .map(|q| q.trim())
            .take_while(|q| !q.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Questions listed for a choice, or `None` when its key is absent.
    fn pool_for<C: Choice>(table: &BTreeMap<String, Vec<String>>, choice: C) -> Option<Vec<String>> {
        table.get(choice.label()).map(|questions| {
            questions
                .iter()
                .map(|q| q.trim())
                .filter(|q| !q.is_empty())
                .map(ToString::to_string)
                .collect()
        })
    }

    /// Table keys that match no occupation or job role label.
    #[must_use]
    pub fn unknown_keys(&self) -> Vec<String> {
        let occupations = Occupation::labels();
        let roles = JobRole::labels();
        let mut unknown: Vec<String> = self
            .occupation
            .keys()
            .filter(|key| !occupations.contains(key))
            .map(|key| format!("occupation.{key}"))
            .collect();
        unknown.extend(
            self.role
                .keys()
                .filter(|key| !roles.contains(key))
                .map(|key| format!("role.{key}")),
        );
        unknown
    }
}

/// Parse a catalogue file.
pub fn load_catalogue(path: &Path) -> Result<Catalogue> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read catalogue {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parse catalogue {}", path.display()))
}

/// [`QuestionSource`] backed by a catalogue file.
///
/// The file is re-read on every call, so edits apply to the next question
/// fetched. Read failures never surface: general questions fall back to a
/// single apology line and branch pools fall back to built-in lists.
#[derive(Debug, Clone)]
pub struct CatalogueSource {
    path: PathBuf,
    pool_size: usize,
}

impl CatalogueSource {
    /// `pool_size` is capped at [`MAX_POOL_SIZE`].
    #[must_use]
    pub fn new(path: PathBuf, pool_size: usize) -> Self {
        Self {
            path,
            pool_size: pool_size.min(MAX_POOL_SIZE),
        }
    }

    fn load(&self) -> Option<Catalogue> {
        match load_catalogue(&self.path) {
            Ok(catalogue) => Some(catalogue),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "question catalogue unavailable");
                None
            }
        }
    }

    fn sample(&self, questions: &[String]) -> Vec<String> {
        let mut rng = rand::thread_rng();
        questions
            .choose_multiple(&mut rng, self.pool_size.min(questions.len()))
            .cloned()
            .collect()
    }
}

impl QuestionSource for CatalogueSource {
    fn general_questions(&self) -> Result<Vec<String>> {
        Ok(match self.load() {
            Some(catalogue) => catalogue.general_questions(),
            None => vec![GENERAL_UNAVAILABLE.to_string()],
        })
    }

    fn occupation_questions(&self, occupation: Occupation) -> Result<Vec<String>> {
        let listed = self
            .load()
            .and_then(|catalogue| Catalogue::pool_for(&catalogue.occupation, occupation));
        let questions = listed.unwrap_or_else(|| {
            debug!(occupation = occupation.label(), "using built-in questions");
            owned(default_occupation_questions(occupation))
        });
        Ok(self.sample(&questions))
    }

    fn role_questions(&self, role: JobRole) -> Result<Vec<String>> {
        let listed = self
            .load()
            .and_then(|catalogue| Catalogue::pool_for(&catalogue.role, role));
        let questions = listed.unwrap_or_else(|| {
            debug!(role = role.label(), "using built-in questions");
            owned(default_role_questions(role))
        });
        Ok(self.sample(&questions))
    }
}

fn owned(questions: &[&str]) -> Vec<String> {
    questions.iter().map(ToString::to_string).collect()
}

fn default_occupation_questions(occupation: Occupation) -> &'static [&'static str] {
    match occupation {
        Occupation::Student => &[
            "What are you currently studying?",
            "Which subject do you enjoy the most, and why?",
            "Tell me about a project you worked on during your studies.",
            "How do you balance coursework with other commitments?",
            "What do you hope to learn from your first job?",
            "Which skills have you picked up outside the classroom?",
        ],
        Occupation::Fresher => &[
            "What did you study, and where?",
            "Tell me about your final-year project.",
            "Have you completed any internships? What did you do there?",
            "What kind of team would you like to join?",
            "How do you keep learning now that you have graduated?",
            "What motivates you to start your career in this field?",
        ],
        Occupation::ExperiencedProfessional => &[
            "How many years of experience do you have?",
            "Describe your current role and responsibilities.",
            "Tell me about a project you are proud of.",
            "Describe a difficult problem at work and how you solved it.",
            "How do you mentor less experienced colleagues?",
            "Why are you looking for a new opportunity?",
        ],
    }
}

fn default_role_questions(role: JobRole) -> &'static [&'static str] {
    match role {
        JobRole::UiUx => &[
            "Walk me through your design process.",
            "Which design tools do you use most?",
            "How do you run usability tests?",
            "How do you handle feedback that conflicts with your design?",
            "Tell me about a design you improved after user research.",
            "How do you work with developers during implementation?",
        ],
        JobRole::Java => &[
            "What is the difference between an interface and an abstract class?",
            "How does garbage collection work in the JVM?",
            "Which Java frameworks have you used?",
            "How do you handle concurrency in Java?",
            "Explain how a HashMap works internally.",
            "How do you approach testing Java code?",
        ],
        JobRole::AiMl => &[
            "Explain the difference between supervised and unsupervised learning.",
            "How do you detect and handle overfitting?",
            "Which machine learning libraries have you used?",
            "Describe a model you trained and how you evaluated it.",
            "How do you prepare messy data for training?",
            "How would you deploy a model to production?",
        ],
    }
}

/// Catalogue written by `interview init`.
pub const SAMPLE_CATALOGUE: &str = r#"# Questions asked by the interview chatbot.
#
# `general` is asked in order; a blank entry ends the list.
# Occupation and role tables are sampled at random (see `pool_size` in
# interview.toml). Remove a key to use the built-in questions for it, or set
# it to an empty list to skip straight to the next selection.

general = [
    "What is your name?",
    "Where are you currently based?",
    "How did you hear about this opportunity?",
]

[occupation]
Student = [
    "What are you currently studying?",
    "Which subject do you enjoy the most, and why?",
    "Tell me about a project you worked on during your studies.",
    "How do you balance coursework with other commitments?",
    "What do you hope to learn from your first job?",
]
Fresher = [
    "What did you study, and where?",
    "Tell me about your final-year project.",
    "Have you completed any internships? What did you do there?",
    "What kind of team would you like to join?",
    "What motivates you to start your career in this field?",
]
"Experienced Professional" = [
    "How many years of experience do you have?",
    "Describe your current role and responsibilities.",
    "Tell me about a project you are proud of.",
    "Describe a difficult problem at work and how you solved it.",
    "Why are you looking for a new opportunity?",
]

[role]
"UI/UX" = [
    "Walk me through your design process.",
    "Which design tools do you use most?",
    "How do you run usability tests?",
    "How do you work with developers during implementation?",
    "Tell me about a design you improved after user research.",
]
Java = [
    "What is the difference between an interface and an abstract class?",
    "How does garbage collection work in the JVM?",
    "Which Java frameworks have you used?",
    "How do you handle concurrency in Java?",
    "Explain how a HashMap works internally.",
]
"AI/ML" = [
    "Explain the difference between supervised and unsupervised learning.",
    "How do you detect and handle overfitting?",
    "Which machine learning libraries have you used?",
    "Describe a model you trained and how you evaluated it.",
    "How would you deploy a model to production?",
]
"#;
