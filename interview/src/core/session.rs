//! Mutable record of one interview in progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::UploadRejected;
use crate::core::types::{
    HistoryEntry, InterviewId, InterviewSnapshot, KeyedText, Selections, Speaker, Step,
};

/// One recorded answer together with the question that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub key: String,
    pub question: String,
    pub answer: String,
}

/// Ordered answer/question ledger.
///
/// Answers and the questions asked are stored side by side, so both views
/// always expose the same key set. Re-recording a key overwrites in place and
/// keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerLedger {
    entries: Vec<AnswerEntry>,
}

impl AnswerLedger {
    pub fn record(&mut self, key: &str, question: &str, answer: &str) {
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => {
                entry.question = question.to_string();
                entry.answer = answer.to_string();
            }
            None => self.entries.push(AnswerEntry {
                key: key.to_string(),
                question: question.to_string(),
                answer: answer.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn answer(&self, key: &str) -> Option<&str> {
        self.find(key).map(|entry| entry.answer.as_str())
    }

    #[must_use]
    pub fn question(&self, key: &str) -> Option<&str> {
        self.find(key).map(|entry| entry.question.as_str())
    }

    fn find(&self, key: &str) -> Option<&AnswerEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn entries(&self) -> &[AnswerEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Answers keyed in recording order.
    #[must_use]
    pub fn answers(&self) -> Vec<KeyedText> {
        self.entries
            .iter()
            .map(|entry| KeyedText {
                key: entry.key.clone(),
                text: entry.answer.clone(),
            })
            .collect()
    }

    /// Questions asked, keyed exactly like [`Self::answers`].
    #[must_use]
    pub fn questions_asked(&self) -> Vec<KeyedText> {
        self.entries
            .iter()
            .map(|entry| KeyedText {
                key: entry.key.clone(),
                text: entry.question.clone(),
            })
            .collect()
    }
}

/// State of one interview.
///
/// Only the transition function and the upload path mutate a session; the
/// transport layer just stores it between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) id: InterviewId,
    pub(crate) step: Step,
    pub(crate) step_index: usize,
    pub(crate) current_prompt: Option<String>,
    pub(crate) ledger: AnswerLedger,
    pub(crate) selections: Selections,
    pub(crate) question_pool: Vec<String>,
    pub(crate) file_uploaded: bool,
    pub(crate) file_reference: Option<String>,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) completed_at: Option<DateTime<Utc>>,
    pub(crate) history: Vec<HistoryEntry>,
}

impl Session {
    /// Fresh session at the start of the general questions.
    #[must_use]
    pub fn new(id: InterviewId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            step: Step::General,
            step_index: 0,
            current_prompt: None,
            ledger: AnswerLedger::default(),
            selections: Selections::default(),
            question_pool: Vec::new(),
            file_uploaded: false,
            file_reference: None,
            started_at,
            completed_at: None,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> InterviewId {
        self.id
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    #[must_use]
    pub fn current_prompt(&self) -> Option<&str> {
        self.current_prompt.as_deref()
    }

    #[must_use]
    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    #[must_use]
    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    /// Questions cached for the current branch step.
    #[must_use]
    pub fn question_pool(&self) -> &[String] {
        &self.question_pool
    }

    #[must_use]
    pub fn file_uploaded(&self) -> bool {
        self.file_uploaded
    }

    #[must_use]
    pub fn file_reference(&self) -> Option<&str> {
        self.file_reference.as_deref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Transcript in the order it was produced.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.step == Step::Complete
    }

    /// Record an accepted upload.
    ///
    /// Only allowed while the resume is being requested. Once set, the flag
    /// stays set; a later upload only replaces the reference.
    ///
    /// # Errors
    ///
    /// Returns `UploadRejected::WrongStep` outside `ResumeUpload`.
    pub fn mark_uploaded(&mut self, reference: impl Into<String>) -> Result<(), UploadRejected> {
        if self.step != Step::ResumeUpload {
            return Err(UploadRejected::WrongStep);
        }
        self.file_uploaded = true;
        self.file_reference = Some(reference.into());
        Ok(())
    }

    /// Immutable copy of the completed interview for persistence.
    ///
    /// Returns `None` until the interview has been completed.
    #[must_use]
    pub fn snapshot(&self) -> Option<InterviewSnapshot> {
        let completed_at = self.completed_at?;
        Some(InterviewSnapshot {
            id: self.id,
            started_at: self.started_at,
            completed_at,
            file_reference: self.file_reference.clone(),
            answers: self.ledger.answers(),
            questions_asked: self.ledger.questions_asked(),
            selections: self.selections.clone(),
        })
    }

    pub(crate) fn record(&mut self, key: &str, question: &str, answer: &str) {
        self.ledger.record(key, question, answer);
    }

    pub(crate) fn push_history(&mut self, user_input: &str, bot_text: &str) {
        if !user_input.is_empty() {
            self.history.push(HistoryEntry {
                speaker: Speaker::User,
                text: user_input.to_string(),
            });
        }
        if !bot_text.is_empty() {
            self.history.push(HistoryEntry {
                speaker: Speaker::Bot,
                text: bot_text.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::fixed_now;

    #[test]
    fn ledger_overwrites_in_place() {
        let mut ledger = AnswerLedger::default();
        ledger.record("start", "Name?", "Alice");
        ledger.record("general_1", "Age?", "30");
        ledger.record("start", "Name?", "Bob");

        let keys: Vec<&str> = ledger.keys().collect();
        assert_eq!(keys, vec!["start", "general_1"]);
        assert_eq!(ledger.answer("start"), Some("Bob"));
        assert_eq!(ledger.question("general_1"), Some("Age?"));
    }

    #[test]
    fn ledger_views_share_keys() {
        let mut ledger = AnswerLedger::default();
        ledger.record("a", "qa", "1");
        ledger.record("b", "qb", "2");
        let answer_keys: Vec<String> = ledger.answers().into_iter().map(|k| k.key).collect();
        let question_keys: Vec<String> =
            ledger.questions_asked().into_iter().map(|k| k.key).collect();
        assert_eq!(answer_keys, question_keys);
    }

    #[test]
    fn upload_only_accepted_while_requested() {
        let mut session = Session::new(InterviewId::new(1), fixed_now());
        assert_eq!(
            session.mark_uploaded("1_cv.pdf"),
            Err(UploadRejected::WrongStep)
        );
        assert!(!session.file_uploaded());

        session.step = Step::ResumeUpload;
        session.mark_uploaded("1_cv.pdf").expect("upload");
        assert!(session.file_uploaded());
        assert_eq!(session.file_reference(), Some("1_cv.pdf"));
    }

    #[test]
    fn snapshot_requires_completion() {
        let mut session = Session::new(InterviewId::new(4), fixed_now());
        session.record("start", "Name?", "Alice");
        assert!(session.snapshot().is_none());

        session.step = Step::Complete;
        session.completed_at = Some(fixed_now());
        let snapshot = session.snapshot().expect("snapshot");
        assert_eq!(snapshot.id, InterviewId::new(4));
        assert_eq!(snapshot.answers.len(), 1);
        assert_eq!(snapshot.questions_asked[0].text, "Name?");
    }

    #[test]
    fn history_skips_empty_lines() {
        let mut session = Session::new(InterviewId::new(1), fixed_now());
        session.push_history("", "Welcome! Let's begin.");
        session.push_history("Alice", "");
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].speaker, Speaker::Bot);
        assert_eq!(session.history()[1].speaker, Speaker::User);
    }
}
