//! Closed option sets for the branch steps and their alias tables.
//!
//! Every option answers to exactly two inputs: its numeric alias (`"1"`..)
//! and its label. Both are exhaustive `match`es, so adding a variant without
//! an alias or a label fails to compile.

use serde::{Deserialize, Serialize};

/// An option set presented by a selection step.
pub trait Choice: Copy + Eq + Sized + 'static {
    /// Every option, in display order.
    const ALL: &'static [Self];
    /// Question shown with the options.
    const PROMPT: &'static str;
    /// Re-prompt text for input that resolves to no option.
    const INVALID: &'static str = "Please select a valid option.";

    /// Display label, also accepted verbatim as input.
    fn label(self) -> &'static str;

    /// Numeric alias accepted as input.
    fn alias(self) -> &'static str;

    /// Acknowledgement shown once this option is picked.
    fn acknowledgement(self) -> &'static str;

    /// Resolve trimmed user input against aliases, then labels.
    fn resolve(input: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|option| option.alias() == input)
            .or_else(|| Self::ALL.iter().copied().find(|option| option.label() == input))
    }

    /// Labels in display order, as sent to the client.
    fn labels() -> Vec<String> {
        Self::ALL.iter().map(|option| option.label().to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupation {
    Student,
    Fresher,
    #[serde(rename = "Experienced Professional")]
    ExperiencedProfessional,
}

impl Choice for Occupation {
    const ALL: &'static [Self] = &[
        Occupation::Student,
        Occupation::Fresher,
        Occupation::ExperiencedProfessional,
    ];
    const PROMPT: &'static str = "What is your current occupation status?";

    fn label(self) -> &'static str {
        match self {
            Occupation::Student => "Student",
            Occupation::Fresher => "Fresher",
            Occupation::ExperiencedProfessional => "Experienced Professional",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            Occupation::Student => "1",
            Occupation::Fresher => "2",
            Occupation::ExperiencedProfessional => "3",
        }
    }

    fn acknowledgement(self) -> &'static str {
        match self {
            Occupation::Student => "Great! Student perspective is valuable.",
            Occupation::Fresher => "Fresh talent is always welcome!",
            Occupation::ExperiencedProfessional => "Your experience matters.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobRole {
    #[serde(rename = "UI/UX")]
    UiUx,
    Java,
    #[serde(rename = "AI/ML")]
    AiMl,
}

impl Choice for JobRole {
    const ALL: &'static [Self] = &[JobRole::UiUx, JobRole::Java, JobRole::AiMl];
    const PROMPT: &'static str = "Select a job role:";
    const INVALID: &'static str = "Please select a valid job role.";

    fn label(self) -> &'static str {
        match self {
            JobRole::UiUx => "UI/UX",
            JobRole::Java => "Java",
            JobRole::AiMl => "AI/ML",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            JobRole::UiUx => "1",
            JobRole::Java => "2",
            JobRole::AiMl => "3",
        }
    }

    fn acknowledgement(self) -> &'static str {
        match self {
            JobRole::UiUx => "Great choice! UI/UX is in demand.",
            JobRole::Java => "Java skills are always valuable.",
            JobRole::AiMl => "AI/ML is cutting-edge. Good pick!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Freelancing,
}

impl Choice for JobType {
    const ALL: &'static [Self] = &[JobType::FullTime, JobType::PartTime, JobType::Freelancing];
    const PROMPT: &'static str = "Select the type of job role:";

    fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Freelancing => "Freelancing",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            JobType::FullTime => "1",
            JobType::PartTime => "2",
            JobType::Freelancing => "3",
        }
    }

    fn acknowledgement(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time - solid choice.",
            JobType::PartTime => "Part-time offers good flexibility.",
            JobType::Freelancing => "Freelancing gives you independence.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobMode {
    Remote,
    Onsite,
    Hybrid,
}

impl Choice for JobMode {
    const ALL: &'static [Self] = &[JobMode::Remote, JobMode::Onsite, JobMode::Hybrid];
    const PROMPT: &'static str = "Select your preferred job mode:";

    fn label(self) -> &'static str {
        match self {
            JobMode::Remote => "Remote",
            JobMode::Onsite => "Onsite",
            JobMode::Hybrid => "Hybrid",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            JobMode::Remote => "1",
            JobMode::Onsite => "2",
            JobMode::Hybrid => "3",
        }
    }

    fn acknowledgement(self) -> &'static str {
        match self {
            JobMode::Remote => "Remote work - good choice.",
            JobMode::Onsite => "Onsite offers great collaboration.",
            JobMode::Hybrid => "Hybrid gives you flexibility.",
        }
    }
}
