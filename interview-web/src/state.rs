//! Shared application state for the interview server.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use interview::core::session::Session;
use interview::engine::Interviewer;
use interview::io::config::InterviewConfig;
use interview::io::uploads::FileResumeStore;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::pages::Pages;

/// One interview behind its own lock, so turns of a session never interleave.
pub type SharedSession = Arc<Mutex<Session>>;

struct SessionSlot {
    session: SharedSession,
    touched: Instant,
}

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub interviewer: Arc<Interviewer>,
    /// Read side of the upload directory, for downloads.
    pub downloads: Arc<FileResumeStore>,
    pub pages: Arc<Pages>,
    pub max_upload_bytes: usize,
    idle_timeout: Duration,
    sessions: Arc<RwLock<HashMap<Uuid, SessionSlot>>>,
}

impl AppState {
    pub fn new(
        interviewer: Interviewer,
        downloads: FileResumeStore,
        max_upload_bytes: usize,
        idle_timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            interviewer: Arc::new(interviewer),
            downloads: Arc::new(downloads),
            pages: Arc::new(Pages::new()?),
            max_upload_bytes,
            idle_timeout,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Wire the file-backed engine for a project directory.
    pub fn from_config(project_dir: &Path, cfg: &InterviewConfig) -> Result<Self> {
        Self::new(
            Interviewer::from_config(project_dir, cfg),
            FileResumeStore::new(project_dir.join(&cfg.upload_dir), cfg.max_upload_bytes),
            cfg.max_upload_bytes,
            Duration::from_secs(cfg.server.session_idle_secs),
        )
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Start an interview and return the token that addresses it.
    pub async fn create_session(&self) -> Uuid {
        let now = Instant::now();
        self.prune_idle(now).await;

        let token = Uuid::new_v4();
        let session = self.interviewer.start_session();
        self.sessions.write().await.insert(
            token,
            SessionSlot {
                session: Arc::new(Mutex::new(session)),
                touched: now,
            },
        );
        token
    }

    /// Look up a session and mark it as used.
    pub async fn session(&self, token: Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions.get_mut(&token)?;
        slot.touched = Instant::now();
        Some(Arc::clone(&slot.session))
    }

    /// Forget a session; its token stops resolving.
    pub async fn end_session(&self, token: Uuid) {
        if self.sessions.write().await.remove(&token).is_some() {
            debug!(%token, "session ended");
        }
    }

    /// Drop sessions idle for longer than the timeout as of `now`.
    ///
    /// Returns the number removed.
    pub async fn prune_idle(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| now.saturating_duration_since(slot.touched) < self.idle_timeout);
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, remaining = sessions.len(), "pruned idle sessions");
        }
        removed
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
