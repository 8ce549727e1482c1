//! Shared deterministic types for the interview core.
//!
//! These types define the stable contracts between the state machine, its
//! collaborators and the transport layer. They carry no I/O.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::choice::{JobMode, JobRole, JobType, Occupation};

/// Numeric identifier of one interview.
///
/// Issued by an [`IdGenerator`](crate::core::ports::IdGenerator); positive and
/// strictly increasing across interviews.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewId(u64);

impl InterviewId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InterviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phase of the interview, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    General,
    Occupation,
    JobRole,
    JobType,
    JobMode,
    ResumeUpload,
    Complete,
}

impl Step {
    /// Stable snake_case name, also used as the prefix of answer keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Step::General => "general",
            Step::Occupation => "occupation",
            Step::JobRole => "job_role",
            Step::JobType => "job_type",
            Step::JobMode => "job_mode",
            Step::ResumeUpload => "resume_upload",
            Step::Complete => "complete",
        }
    }

    /// Steps that walk a cached question pool after a selection.
    #[must_use]
    pub fn iterates_pool(self) -> bool {
        matches!(self, Step::Occupation | Step::JobRole)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who produced a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

/// One line of the replayable transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// Branch choices made so far. Unset until the matching step accepts input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    pub occupation: Option<Occupation>,
    pub job_role: Option<JobRole>,
    pub job_type: Option<JobType>,
    pub job_mode: Option<JobMode>,
}

impl Selections {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupation.is_none()
            && self.job_role.is_none()
            && self.job_type.is_none()
            && self.job_mode.is_none()
    }
}

/// What the user sees after a single transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEvent {
    /// Acknowledgement of the input just received.
    pub bot_text: String,
    /// Next question or instruction; empty once the interview has ended.
    pub next_prompt: String,
    pub is_choice_prompt: bool,
    pub choice_options: Vec<String>,
    pub is_file_upload_prompt: bool,
}

/// Bot text shown when a transition cannot be computed.
pub const FAULT_TEXT: &str = "Something went wrong, let's try again";
/// Prompt shown alongside [`FAULT_TEXT`].
pub const RETRY_PROMPT: &str = "Please retry.";

impl OutputEvent {
    /// Free-text question.
    pub fn prompt(bot_text: impl Into<String>, next_prompt: impl Into<String>) -> Self {
        Self {
            bot_text: bot_text.into(),
            next_prompt: next_prompt.into(),
            ..Self::default()
        }
    }

    /// Enumerated question; the client renders `options` as buttons.
    pub fn choice(
        bot_text: impl Into<String>,
        next_prompt: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            bot_text: bot_text.into(),
            next_prompt: next_prompt.into(),
            is_choice_prompt: true,
            choice_options: options,
            is_file_upload_prompt: false,
        }
    }

    /// Request for a file upload.
    pub fn upload(bot_text: impl Into<String>, next_prompt: impl Into<String>) -> Self {
        Self {
            bot_text: bot_text.into(),
            next_prompt: next_prompt.into(),
            is_file_upload_prompt: true,
            ..Self::default()
        }
    }

    /// Generic retry output for a failed transition.
    #[must_use]
    pub fn fault() -> Self {
        Self::prompt(FAULT_TEXT, RETRY_PROMPT)
    }

    /// Nothing further is asked; front ends may close the conversation.
    #[must_use]
    pub fn is_farewell(&self) -> bool {
        self.next_prompt.is_empty()
    }
}

/// A keyed piece of text inside a snapshot (an answer or a question).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedText {
    pub key: String,
    pub text: String,
}

/// Immutable record of a finished interview, handed to persistence.
///
/// `answers` and `questions_asked` share the same keys in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSnapshot {
    pub id: InterviewId,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub file_reference: Option<String>,
    pub answers: Vec<KeyedText>,
    pub questions_asked: Vec<KeyedText>,
    pub selections: Selections,
}
