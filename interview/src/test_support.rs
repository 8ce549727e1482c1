//! Test-only collaborators with scripted, inspectable behavior.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Result, anyhow};

use crate::core::choice::{Choice, JobRole, Occupation};
use crate::core::clock::{Clock, fixed_now};
use crate::core::error::UploadRejected;
use crate::core::ports::{IdGenerator, InterviewRecorder, QuestionSource, ResumeStore, Tone};
use crate::core::types::{InterviewId, InterviewSnapshot, Step};
use crate::engine::Interviewer;
use crate::io::uploads::check_resume_name;

/// Question source with fixed lists and a failure switch.
pub struct ScriptedQuestions {
    general: Vec<String>,
    occupation: HashMap<Occupation, Vec<String>>,
    role: HashMap<JobRole, Vec<String>>,
    failing: AtomicBool,
}

impl ScriptedQuestions {
    /// One general question and five questions per occupation and role.
    pub fn standard() -> Self {
        let occupation = Occupation::ALL
            .iter()
            .map(|o| (*o, numbered(&format!("{} question", o.label()), 5)))
            .collect();
        let role = JobRole::ALL
            .iter()
            .map(|r| (*r, numbered(&format!("{} question", r.label()), 5)))
            .collect();
        Self {
            general: vec!["What is your name?".to_string()],
            occupation,
            role,
            failing: AtomicBool::new(false),
        }
    }

    pub fn with_general(mut self, questions: &[&str]) -> Self {
        self.general = questions.iter().map(ToString::to_string).collect();
        self
    }

    pub fn without_occupation(mut self, occupation: Occupation) -> Self {
        self.occupation.insert(occupation, Vec::new());
        self
    }

    pub fn without_role(mut self, role: JobRole) -> Self {
        self.role.insert(role, Vec::new());
        self
    }

    /// No follow-up questions for any branch.
    pub fn with_empty_pools(mut self) -> Self {
        self.occupation.values_mut().for_each(Vec::clear);
        self.role.values_mut().for_each(Vec::clear);
        self
    }

    /// Make every call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("scripted question source failure"));
        }
        Ok(())
    }
}

impl QuestionSource for ScriptedQuestions {
    fn general_questions(&self) -> Result<Vec<String>> {
        self.check()?;
        Ok(self.general.clone())
    }

    fn occupation_questions(&self, occupation: Occupation) -> Result<Vec<String>> {
        self.check()?;
        Ok(self.occupation.get(&occupation).cloned().unwrap_or_default())
    }

    fn role_questions(&self, role: JobRole) -> Result<Vec<String>> {
        self.check()?;
        Ok(self.role.get(&role).cloned().unwrap_or_default())
    }
}

fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("{prefix} {n}?")).collect()
}

/// Sequential ids starting after a given value.
pub struct CountingIds {
    last: AtomicU64,
}

impl CountingIds {
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }
}

impl IdGenerator for CountingIds {
    fn next_id(&self) -> InterviewId {
        InterviewId::new(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Recorder that keeps every snapshot it is handed.
#[derive(Default)]
pub struct RecordingRecorder {
    snapshots: Mutex<Vec<InterviewSnapshot>>,
    reject: AtomicBool,
}

impl RecordingRecorder {
    /// Report every write as failed (snapshots are still captured).
    pub fn set_rejecting(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    pub fn snapshots(&self) -> Vec<InterviewSnapshot> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl InterviewRecorder for RecordingRecorder {
    fn persist(&self, snapshot: &InterviewSnapshot) -> bool {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(snapshot.clone());
        !self.reject.load(Ordering::SeqCst)
    }
}

/// Resume store that validates names like the file store but keeps bytes in memory.
#[derive(Default)]
pub struct MemoryResumes {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryResumes {
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl ResumeStore for MemoryResumes {
    fn store(
        &self,
        interview: InterviewId,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, UploadRejected> {
        let safe = check_resume_name(original_name)?;
        let stored = format!("{interview}_{safe}");
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(stored.clone(), bytes.to_vec());
        Ok(stored)
    }
}

/// Tone that echoes its inputs, so tests can see what was acknowledged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoTone;

impl Tone for EchoTone {
    fn acknowledge(&self, input: &str, step: Step) -> String {
        format!("ack:{step}:{input}")
    }
}

/// Scripted collaborators plus an interviewer wired to them.
pub struct TestInterviewer {
    pub questions: Arc<ScriptedQuestions>,
    pub recorder: Arc<RecordingRecorder>,
    pub resumes: Arc<MemoryResumes>,
    pub interviewer: Interviewer,
}

impl TestInterviewer {
    pub fn new(questions: ScriptedQuestions) -> Self {
        let questions = Arc::new(questions);
        let recorder = Arc::new(RecordingRecorder::default());
        let resumes = Arc::new(MemoryResumes::default());
        let interviewer = Interviewer::new(
            questions.clone(),
            recorder.clone(),
            Arc::new(CountingIds::starting_after(0)),
            resumes.clone(),
        )
        .with_tone(Arc::new(EchoTone))
        .with_clock(Clock::fixed(fixed_now()));
        Self {
            questions,
            recorder,
            resumes,
            interviewer,
        }
    }
}

/// Temporary project directory for filesystem tests.
pub struct TestProject {
    dir: tempfile::TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }
}
