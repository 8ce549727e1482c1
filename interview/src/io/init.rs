//! Scaffolding for a new interview project directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use super::catalogue::SAMPLE_CATALOGUE;
use super::config::{CONFIG_FILE, InterviewConfig, write_config};

/// Canonical paths of a project rooted at `root`, resolved through its config.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub catalogue_path: PathBuf,
    pub results_path: PathBuf,
    pub upload_dir: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>, cfg: &InterviewConfig) -> Self {
        let root = root.into();
        Self {
            config_path: root.join(CONFIG_FILE),
            catalogue_path: root.join(&cfg.catalogue_path),
            results_path: root.join(&cfg.results_path),
            upload_dir: root.join(&cfg.upload_dir),
            root,
        }
    }
}

/// Options for `init_project`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite an existing config and catalogue.
    pub force: bool,
}

/// Write a default `interview.toml`, a sample catalogue and the upload
/// directory into `root`.
///
/// Fails if `interview.toml` already exists unless `options.force` is set.
/// Recorded results are never touched.
pub fn init_project(root: &Path, options: &InitOptions) -> Result<ProjectPaths> {
    let cfg = InterviewConfig::default();
    let paths = ProjectPaths::new(root, &cfg);
    if paths.config_path.exists() && !options.force {
        return Err(anyhow!(
            "interview init: {CONFIG_FILE} already exists (use --force to overwrite)"
        ));
    }

    write_config(&paths.config_path, &cfg)?;
    fs::write(&paths.catalogue_path, SAMPLE_CATALOGUE)
        .with_context(|| format!("write catalogue {}", paths.catalogue_path.display()))?;
    fs::create_dir_all(&paths.upload_dir)
        .with_context(|| format!("create directory {}", paths.upload_dir.display()))?;
    Ok(paths)
}
