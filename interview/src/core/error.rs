//! Error taxonomy that crosses the core boundary.
//!
//! Invalid selections are not errors: they are ordinary transitions that
//! re-prompt. Collaborator outages are absorbed by the io adapters. What
//! remains is a failed transition and a rejected upload.

use thiserror::Error;

/// A transition could not be computed. The session must be left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransitionFault {
    #[error("malformed session state: {0}")]
    MalformedState(String),

    #[error("question source failed: {0}")]
    QuestionSource(String),
}

/// An upload was refused. The session is unchanged; `Display` is shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UploadRejected {
    #[error("No file part")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("File type not allowed. Use PDF, DOC, or DOCX.")]
    DisallowedExtension,

    #[error("File is too large (limit {limit} bytes).")]
    TooLarge { limit: usize },

    #[error("A resume can only be uploaded when it is requested.")]
    WrongStep,

    #[error("Upload failed. Please try again.")]
    Storage(String),
}
