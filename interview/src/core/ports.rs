//! Collaborator contracts consumed by the state machine.
//!
//! The core never performs I/O itself; adapters in [`crate::io`] (and the
//! scripted doubles in `test_support`) implement these traits.

use anyhow::Result;

use crate::core::choice::{JobRole, Occupation};
use crate::core::error::UploadRejected;
use crate::core::types::{InterviewId, InterviewSnapshot, Step};

/// Supplies the questions asked during an interview.
///
/// Adapters fail open (defaults) for unreadable sources; an `Err` here is
/// treated as a transition fault and the session is left unchanged.
pub trait QuestionSource: Send + Sync {
    /// Ordered general questions asked before any branch.
    fn general_questions(&self) -> Result<Vec<String>>;

    /// Up to a pool's worth of questions for an occupation. May be empty.
    fn occupation_questions(&self, occupation: Occupation) -> Result<Vec<String>>;

    /// Up to a pool's worth of questions for a job role. May be empty.
    fn role_questions(&self, role: JobRole) -> Result<Vec<String>>;
}

/// Issues interview ids, strictly increasing across interviews.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> InterviewId;
}

/// Receives completed interviews.
///
/// Append semantics; never overwrites earlier records. Failures are reported
/// as `false` and never raised.
pub trait InterviewRecorder: Send + Sync {
    fn persist(&self, snapshot: &InterviewSnapshot) -> bool;
}

/// Stores uploaded resumes.
pub trait ResumeStore: Send + Sync {
    /// Store `bytes` under a name derived from `original_name` and return the
    /// stored file name.
    fn store(
        &self,
        interview: InterviewId,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, UploadRejected>;
}

/// Cosmetic acknowledgement text. Never used for branching.
pub trait Tone: Send + Sync {
    fn acknowledge(&self, input: &str, step: Step) -> String;
}
