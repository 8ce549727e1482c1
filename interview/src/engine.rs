//! Orchestration for a single interview turn.
//!
//! The [`Interviewer`] owns the collaborators, applies each input as one
//! all-or-nothing transition, carries out the persistence a completed
//! interview asks for, and routes uploads through the resume store.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::core::clock::Clock;
use crate::core::error::UploadRejected;
use crate::core::ports::{IdGenerator, InterviewRecorder, QuestionSource, ResumeStore, Tone};
use crate::core::session::Session;
use crate::core::tone::KeywordTone;
use crate::core::transition::{Effect, TransitionContext, apply};
use crate::core::types::{HistoryEntry, OutputEvent, Step};
use crate::io::catalogue::CatalogueSource;
use crate::io::config::InterviewConfig;
use crate::io::results_store::JsonResultsStore;
use crate::io::uploads::FileResumeStore;

/// Runs interviews against a fixed set of collaborators.
#[derive(Clone)]
pub struct Interviewer {
    questions: Arc<dyn QuestionSource>,
    recorder: Arc<dyn InterviewRecorder>,
    ids: Arc<dyn IdGenerator>,
    resumes: Arc<dyn ResumeStore>,
    tone: Arc<dyn Tone>,
    clock: Clock,
}

impl Interviewer {
    #[must_use]
    pub fn new(
        questions: Arc<dyn QuestionSource>,
        recorder: Arc<dyn InterviewRecorder>,
        ids: Arc<dyn IdGenerator>,
        resumes: Arc<dyn ResumeStore>,
    ) -> Self {
        Self {
            questions,
            recorder,
            ids,
            resumes,
            tone: Arc::new(KeywordTone),
            clock: Clock::default(),
        }
    }

    /// Wire the file-backed collaborators described by `cfg`.
    ///
    /// Relative paths in the config resolve against `root`.
    #[must_use]
    pub fn from_config(root: &Path, cfg: &InterviewConfig) -> Self {
        let results = Arc::new(JsonResultsStore::new(root.join(&cfg.results_path)));
        Self::new(
            Arc::new(CatalogueSource::new(
                root.join(&cfg.catalogue_path),
                cfg.pool_size,
            )),
            results.clone(),
            results,
            Arc::new(FileResumeStore::new(
                root.join(&cfg.upload_dir),
                cfg.max_upload_bytes,
            )),
        )
    }

    #[must_use]
    pub fn with_tone(mut self, tone: Arc<dyn Tone>) -> Self {
        self.tone = tone;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Begin a new interview. Nothing is asked until the first input arrives.
    #[must_use]
    pub fn start_session(&self) -> Session {
        let session = Session::new(self.ids.next_id(), self.clock.now());
        info!(interview_id = %session.id(), "interview started");
        session
    }

    /// Apply one input to `session` and return what to show the user.
    ///
    /// On a fault the session is left exactly as it was and a generic retry
    /// event is returned, so the same input can be sent again.
    #[instrument(skip_all, fields(interview_id = %session.id(), step = %session.step()))]
    pub fn handle_message(&self, session: &mut Session, input: &str) -> OutputEvent {
        let ctx = TransitionContext {
            questions: self.questions.as_ref(),
            ids: self.ids.as_ref(),
            tone: self.tone.as_ref(),
            now: self.clock.now(),
        };

        let transition = match apply(session, input, &ctx) {
            Ok(transition) => transition,
            Err(err) => {
                warn!(error = %err, "transition failed; session unchanged");
                return OutputEvent::fault();
            }
        };

        if transition.session.id() != session.id() {
            info!(new_interview_id = %transition.session.id(), "interview restarted");
        }
        debug!(
            next_step = %transition.session.step(),
            step_index = transition.session.step_index(),
            "transition applied"
        );
        *session = transition.session;

        for effect in transition.effects {
            match effect {
                Effect::PersistInterview(snapshot) => {
                    if self.recorder.persist(&snapshot) {
                        info!(answers = snapshot.answers.len(), "interview recorded");
                    } else {
                        warn!("interview could not be recorded");
                    }
                }
            }
        }

        transition.output
    }

    /// Store an uploaded resume and mark the session as having one.
    ///
    /// Returns the stored file name.
    ///
    /// # Errors
    ///
    /// Returns `UploadRejected` when no resume is being requested, the file
    /// is missing or of the wrong type, or storage fails. The session is
    /// unchanged in every error case.
    #[instrument(skip_all, fields(interview_id = %session.id()))]
    pub fn accept_upload(
        &self,
        session: &mut Session,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, UploadRejected> {
        if session.step() != Step::ResumeUpload {
            warn!(step = %session.step(), "upload outside the resume step");
            return Err(UploadRejected::WrongStep);
        }
        let stored = self
            .resumes
            .store(session.id(), original_name, bytes)
            .inspect_err(|err| warn!(error = %err, "upload rejected"))?;
        session.mark_uploaded(stored.clone())?;
        info!(file = %stored, "resume uploaded");
        Ok(stored)
    }

    /// Transcript for client replay.
    #[must_use]
    pub fn transcript<'a>(&self, session: &'a Session) -> &'a [HistoryEntry] {
        session.history()
    }
}
