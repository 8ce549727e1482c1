//! Interview configuration stored in `interview.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::io::catalogue::MAX_POOL_SIZE;

pub const CONFIG_FILE: &str = "interview.toml";

/// Interview configuration (TOML).
///
/// Paths are relative to the directory holding the config file. Missing
/// fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InterviewConfig {
    /// Question catalogue (TOML).
    pub catalogue_path: PathBuf,

    /// JSON array of completed interviews.
    pub results_path: PathBuf,

    /// Directory receiving uploaded resumes.
    pub upload_dir: PathBuf,

    /// Reject uploads larger than this many bytes.
    pub max_upload_bytes: usize,

    /// Questions sampled per occupation and per job role.
    pub pool_size: usize,

    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,

    /// Drop web sessions untouched for this many seconds.
    pub session_idle_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
            session_idle_secs: 30 * 60,
        }
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            catalogue_path: PathBuf::from("questions.toml"),
            results_path: PathBuf::from("data/interview_results.json"),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 16 * 1024 * 1024,
            pool_size: 5,
            server: ServerConfig::default(),
        }
    }
}

impl InterviewConfig {
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 || self.pool_size > MAX_POOL_SIZE {
            return Err(anyhow!("pool_size must be between 1 and {MAX_POOL_SIZE}"));
        }
        if self.max_upload_bytes == 0 {
            return Err(anyhow!("max_upload_bytes must be > 0"));
        }
        for (name, path) in [
            ("catalogue_path", &self.catalogue_path),
            ("results_path", &self.results_path),
            ("upload_dir", &self.upload_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("{name} must not be empty"));
            }
        }
        if self.server.bind.trim().is_empty() {
            return Err(anyhow!("server.bind must not be empty"));
        }
        if self.server.session_idle_secs == 0 {
            return Err(anyhow!("server.session_idle_secs must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `InterviewConfig::default()`.
pub fn load_config(path: &Path) -> Result<InterviewConfig> {
    if !path.exists() {
        let cfg = InterviewConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: InterviewConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &InterviewConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

/// Write `contents` beside `path` and rename it into place.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let mut tmp_name = path
        .file_name()
        .with_context(|| format!("path missing file name {}", path.display()))?
        .to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
