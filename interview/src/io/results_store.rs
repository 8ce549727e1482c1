//! Completed interviews stored as a JSON array.
//!
//! The same file drives id generation, so ids keep increasing across process
//! restarts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, instrument, warn};

use super::config::write_atomic;
use crate::core::ports::{IdGenerator, InterviewRecorder};
use crate::core::types::{InterviewId, InterviewSnapshot};

/// Load every persisted interview. A missing file holds no interviews.
pub fn load_records(path: &Path) -> Result<Vec<InterviewSnapshot>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read results {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&contents).with_context(|| format!("parse results {}", path.display()))
}

fn write_records(path: &Path, records: &[InterviewSnapshot]) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(records).context("serialize results")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

/// JSON-file recorder and id generator.
///
/// One lock serializes appends and id issue within the process.
#[derive(Debug)]
pub struct JsonResultsStore {
    path: PathBuf,
    last_issued: Mutex<u64>,
}

impl JsonResultsStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            last_issued: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, snapshot: &InterviewSnapshot) -> Result<usize> {
        let mut records = load_records(&self.path)?;
        records.push(snapshot.clone());
        write_records(&self.path, &records)?;
        Ok(records.len())
    }

    fn max_persisted_id(&self) -> Result<u64> {
        Ok(load_records(&self.path)?
            .iter()
            .map(|record| record.id.value())
            .max()
            .unwrap_or(0))
    }
}

impl InterviewRecorder for JsonResultsStore {
    #[instrument(skip_all, fields(interview_id = %snapshot.id, path = %self.path.display()))]
    fn persist(&self, snapshot: &InterviewSnapshot) -> bool {
        let _guard = self
            .last_issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match self.append(snapshot) {
            Ok(total) => {
                debug!(total, "interview appended");
                true
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "failed to save interview");
                false
            }
        }
    }
}

impl IdGenerator for JsonResultsStore {
    fn next_id(&self) -> InterviewId {
        let mut last = self
            .last_issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let next = match self.max_persisted_id() {
            Ok(max) => max.max(*last) + 1,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "results unreadable; using timestamp id");
                let now = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
                now.max(*last + 1)
            }
        };
        *last = next;
        InterviewId::new(next)
    }
}
