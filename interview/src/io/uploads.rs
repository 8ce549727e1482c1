//! Resume uploads on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::core::error::UploadRejected;
use crate::core::ports::ResumeStore;
use crate::core::types::InterviewId;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid file name pattern"));

/// Reduce a client-supplied file name to a safe basename.
///
/// Directory components are dropped, anything outside `[A-Za-z0-9._-]` becomes
/// `_` and leading dots are removed. May return an empty string.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let replaced = UNSAFE_CHARS.replace_all(base, "_");
    replaced.trim_start_matches('.').to_string()
}

/// Validate an uploaded resume name and return its sanitized form.
///
/// # Errors
///
/// `EmptyFilename` for a blank name, `DisallowedExtension` unless the name
/// ends in `.pdf`, `.doc` or `.docx` (any case).
pub fn check_resume_name(original_name: &str) -> Result<String, UploadRejected> {
    if original_name.trim().is_empty() {
        return Err(UploadRejected::EmptyFilename);
    }
    let safe = sanitize_file_name(original_name);
    let allowed = safe
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| {
            !stem.is_empty() && ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        });
    if !allowed {
        return Err(UploadRejected::DisallowedExtension);
    }
    Ok(safe)
}

/// Stores resumes as `{interview_id}_{sanitized name}` in one directory.
#[derive(Debug, Clone)]
pub struct FileResumeStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl FileResumeStore {
    #[must_use]
    pub fn new(dir: PathBuf, max_bytes: usize) -> Self {
        Self { dir, max_bytes }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a stored resume, if `name` names one.
    ///
    /// The name is sanitized again so it can never leave the upload directory.
    #[must_use]
    pub fn resolve_download(&self, name: &str) -> Option<PathBuf> {
        let safe = sanitize_file_name(name);
        if safe.is_empty() || safe != name {
            return None;
        }
        let path = self.dir.join(safe);
        path.is_file().then_some(path)
    }
}

impl ResumeStore for FileResumeStore {
    fn store(
        &self,
        interview: InterviewId,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, UploadRejected> {
        if bytes.len() > self.max_bytes {
            return Err(UploadRejected::TooLarge {
                limit: self.max_bytes,
            });
        }
        let safe = check_resume_name(original_name)?;
        let stored = format!("{interview}_{safe}");
        let path = self.dir.join(&stored);

        let written = fs::create_dir_all(&self.dir).and_then(|()| fs::write(&path, bytes));
        if let Err(err) = written {
            warn!(error = %err, path = %path.display(), "failed to store resume");
            return Err(UploadRejected::Storage(err.to_string()));
        }
        debug!(path = %path.display(), bytes = bytes.len(), "resume stored");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name(r"C:\Users\me\My CV.pdf"), "My_CV.pdf");
        assert_eq!(sanitize_file_name("...hidden.docx"), "hidden.docx");
        assert_eq!(sanitize_file_name("résumé.pdf"), "r_sum_.pdf");
        assert_eq!(sanitize_file_name("dir/"), "");
    }

    #[test]
    fn only_document_extensions_are_accepted() {
        assert_eq!(check_resume_name("cv.PDF"), Ok("cv.PDF".to_string()));
        assert_eq!(check_resume_name("cv.docx"), Ok("cv.docx".to_string()));
        assert_eq!(check_resume_name("  "), Err(UploadRejected::EmptyFilename));
        for bad in ["cv.exe", "cv", ".pdf", "cv.pdf.zip"] {
            assert_eq!(
                check_resume_name(bad),
                Err(UploadRejected::DisallowedExtension),
                "{bad}"
            );
        }
    }

    #[test]
    fn store_writes_prefixed_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FileResumeStore::new(temp.path().join("uploads"), 1024);

        let stored = store
            .store(InterviewId::new(12), "My CV.pdf", b"%PDF-1.4")
            .expect("store");

        assert_eq!(stored, "12_My_CV.pdf");
        let bytes = fs::read(temp.path().join("uploads").join(&stored)).expect("read");
        assert_eq!(bytes, b"%PDF-1.4");
        assert_eq!(
            store.resolve_download(&stored),
            Some(temp.path().join("uploads").join(&stored))
        );
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FileResumeStore::new(temp.path().to_path_buf(), 4);
        let err = store
            .store(InterviewId::new(1), "cv.pdf", b"12345")
            .expect_err("too large");
        assert_eq!(err, UploadRejected::TooLarge { limit: 4 });
    }

    #[test]
    fn download_refuses_traversal_and_unknown_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("secret.txt"), "x").expect("write");
        let store = FileResumeStore::new(temp.path().join("uploads"), 1024);

        assert_eq!(store.resolve_download("../secret.txt"), None);
        assert_eq!(store.resolve_download("1_missing.pdf"), None);
        assert_eq!(store.resolve_download(""), None);
    }
}
