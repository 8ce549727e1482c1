//! HTTP route handlers for the interview API.

use std::fs;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Json};
use axum::routing::{get, post};
use interview::core::error::UploadRejected;
use interview::core::types::{HistoryEntry, OutputEvent};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::{AppState, SharedSession};

/// Multipart framing allowance on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the API router.
pub fn api_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session))
        .route("/sessions/{token}/messages", post(post_message))
        .route(
            "/sessions/{token}/resume",
            post(upload_resume)
                .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)),
        )
        .route("/sessions/{token}/history", get(get_history))
        .route("/download/{filename}", get(download))
}

/// GET / - the chat page.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    state
        .pages
        .index(state.max_upload_bytes)
        .map(Html)
        .map_err(|err| {
            warn!(error = %err, "failed to render index");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct SessionCreated {
    token: Uuid,
}

/// POST /api/sessions - start an interview.
async fn create_session(State(state): State<AppState>) -> Json<SessionCreated> {
    let token = state.create_session().await;
    let active = state.session_count().await;
    info!(%token, active, "session created");
    Json(SessionCreated { token })
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    #[serde(default)]
    message: String,
}

/// POST /api/sessions/:token/messages - apply one input.
///
/// The farewell ends the session; its token stops resolving afterwards.
async fn post_message(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<OutputEvent>, StatusCode> {
    let token = parse_token(&token)?;
    let session = lookup(&state, token).await?;
    let (event, finished) = {
        let mut session = session.lock().await;
        let event = state.interviewer.handle_message(&mut session, &request.message);
        let finished = session.is_complete() && event.is_farewell();
        (event, finished)
    };
    if finished {
        state.end_session(token).await;
    }
    Ok(Json(event))
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct UploadResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
}

/// A file part pulled out of the multipart body.
struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
}

/// POST /api/sessions/:token/resume - multipart upload, field `resume`.
async fn upload_resume(
    State(state): State<AppState>,
    Path(token): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, StatusCode> {
    let session = lookup(&state, parse_token(&token)?).await?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() != Some("resume") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        file = Some(UploadedFile {
            name,
            bytes: bytes.to_vec(),
        });
        break;
    }

    Ok(Json(accept_upload(&state, &session, file).await))
}

async fn accept_upload(
    state: &AppState,
    session: &SharedSession,
    file: Option<UploadedFile>,
) -> UploadResponse {
    let mut session = session.lock().await;
    let result = file
        .ok_or(UploadRejected::MissingFile)
        .and_then(|file| {
            state
                .interviewer
                .accept_upload(&mut session, &file.name, &file.bytes)
        });
    match result {
        Ok(filename) => UploadResponse {
            success: true,
            message: "Resume uploaded successfully".to_string(),
            filename: Some(filename),
        },
        Err(err) => UploadResponse {
            success: false,
            message: err.to_string(),
            filename: None,
        },
    }
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    chat_history: Vec<HistoryEntry>,
}

/// GET /api/sessions/:token/history - transcript for replay.
async fn get_history(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<HistoryResponse>, StatusCode> {
    let session = lookup(&state, parse_token(&token)?).await?;
    let session = session.lock().await;
    Ok(Json(HistoryResponse {
        chat_history: state.interviewer.transcript(&session).to_vec(),
    }))
}

/// GET /api/download/:filename - a stored resume.
async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let path = state
        .downloads
        .resolve_download(&filename)
        .ok_or(StatusCode::NOT_FOUND)?;
    let bytes = fs::read(&path).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let disposition = format!("attachment; filename=\"{filename}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

fn parse_token(token: &str) -> Result<Uuid, StatusCode> {
    Uuid::parse_str(token).map_err(|_| StatusCode::NOT_FOUND)
}

async fn lookup(state: &AppState, token: Uuid) -> Result<SharedSession, StatusCode> {
    state.session(token).await.ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use interview::core::transition::FAREWELL;
    use interview::core::types::Step;
    use interview::io::uploads::FileResumeStore;
    use interview::test_support::{ScriptedQuestions, TestInterviewer};

    use super::*;

    fn state(dir: &std::path::Path) -> (TestInterviewer, AppState) {
        let t = TestInterviewer::new(ScriptedQuestions::standard().with_empty_pools());
        let state = AppState::new(
            t.interviewer.clone(),
            FileResumeStore::new(dir.to_path_buf(), 1024),
            1024,
            Duration::from_secs(60),
        )
        .expect("state");
        (t, state)
    }

    async fn say(state: &AppState, token: Uuid, message: &str) -> OutputEvent {
        let Json(event) = post_message(
            State(state.clone()),
            Path(token.to_string()),
            Json(MessageRequest {
                message: message.to_string(),
            }),
        )
        .await
        .expect("message");
        event
    }

    fn file(name: &str) -> Option<UploadedFile> {
        Some(UploadedFile {
            name: name.to_string(),
            bytes: b"%PDF".to_vec(),
        })
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (_t, state) = state(temp.path());
        let Json(first) = create_session(State(state.clone())).await;
        let Json(second) = create_session(State(state.clone())).await;
        assert_ne!(first.token, second.token);
        assert_eq!(state.session_count().await, 2);

        let body = serde_json::to_value(&first).expect("serialize");
        assert_eq!(body["token"], first.token.to_string());

        let welcome = say(&state, first.token, "").await;
        assert_eq!(welcome.next_prompt, "What is your name?");
        say(&state, first.token, "Alice").await;

        let other = say(&state, second.token, "").await;
        assert_eq!(other.next_prompt, "What is your name?");
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (_t, state) = state(temp.path());

        let err = post_message(
            State(state.clone()),
            Path("not-a-uuid".to_string()),
            Json(MessageRequest {
                message: "hi".to_string(),
            }),
        )
        .await
        .expect_err("unknown");
        assert_eq!(err, StatusCode::NOT_FOUND);

        let err = get_history(State(state), Path(Uuid::new_v4().to_string()))
            .await
            .expect_err("unknown");
        assert_eq!(err, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn upload_reports_each_rejection_then_succeeds() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (t, state) = state(temp.path());
        let token = state.create_session().await;
        let session = state.session(token).await.expect("session");

        let early = accept_upload(&state, &session, file("cv.pdf")).await;
        assert!(!early.success);
        assert_eq!(early.message, UploadRejected::WrongStep.to_string());

        for input in ["", "Alice", "1", "1", "1", "1"] {
            say(&state, token, input).await;
        }

        let missing = accept_upload(&state, &session, None).await;
        assert_eq!(missing.message, "No file part");
        let blank = accept_upload(&state, &session, file("")).await;
        assert_eq!(blank.message, "No selected file");
        let wrong = accept_upload(&state, &session, file("cv.png")).await;
        assert_eq!(wrong.message, "File type not allowed. Use PDF, DOC, or DOCX.");

        let ok = accept_upload(&state, &session, file("cv.pdf")).await;
        assert_eq!(
            ok,
            UploadResponse {
                success: true,
                message: "Resume uploaded successfully".to_string(),
                filename: Some("1_cv.pdf".to_string()),
            }
        );
        assert_eq!(t.resumes.get("1_cv.pdf"), Some(b"%PDF".to_vec()));

        let done = say(&state, token, "").await;
        assert!(done.is_choice_prompt);
        assert_eq!(session.lock().await.step(), Step::Complete);
        assert_eq!(t.recorder.snapshots().len(), 1);
    }

    #[tokio::test]
    async fn farewell_releases_finished_sessions() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (t, state) = state(temp.path());

        for _ in 0..3 {
            let token = state.create_session().await;
            let session = state.session(token).await.expect("session");
            for input in ["", "Alice", "1", "1", "1", "1"] {
                say(&state, token, input).await;
            }
            assert!(accept_upload(&state, &session, file("cv.pdf")).await.success);
            say(&state, token, "").await;
            assert_eq!(state.session_count().await, 1);

            let bye = say(&state, token, "no").await;
            assert_eq!(bye.bot_text, FAREWELL);
            assert_eq!(state.session_count().await, 0);
        }
        assert_eq!(t.recorder.snapshots().len(), 3);
    }

    #[tokio::test]
    async fn restart_keeps_the_session() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (_t, state) = state(temp.path());
        let token = state.create_session().await;
        let session = state.session(token).await.expect("session");
        for input in ["", "Alice", "1", "1", "1", "1"] {
            say(&state, token, input).await;
        }
        accept_upload(&state, &session, file("cv.pdf")).await;
        say(&state, token, "").await;

        let again = say(&state, token, "yes").await;
        assert_eq!(again.next_prompt, "What is your name?");
        assert_eq!(state.session_count().await, 1);
    }

    #[tokio::test]
    async fn history_replays_transcript() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (_t, state) = state(temp.path());
        let token = state.create_session().await;
        say(&state, token, "").await;
        say(&state, token, "Alice").await;

        let Json(history) = get_history(State(state), Path(token.to_string()))
            .await
            .expect("history");
        assert_eq!(history.chat_history.len(), 3);
        assert_eq!(history.chat_history[1].text, "Alice");
    }

    #[tokio::test]
    async fn download_serves_only_stored_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("1_cv.pdf"), b"%PDF").expect("write");
        let (_t, state) = state(temp.path());

        let ok = download(State(state.clone()), Path("1_cv.pdf".to_string())).await;
        assert!(ok.is_ok());

        let missing = download(State(state.clone()), Path("2_cv.pdf".to_string())).await;
        assert_eq!(missing.err(), Some(StatusCode::NOT_FOUND));

        let traversal = download(State(state), Path("../etc/passwd".to_string())).await;
        assert_eq!(traversal.err(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn index_page_renders() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (_t, state) = state(temp.path());
        let Html(page) = index(State(state)).await.expect("index");
        assert!(page.contains("/api/sessions"));
    }
}
