//! End-to-end interviews driven through the engine with scripted collaborators.

use interview::core::choice::{JobMode, JobRole, JobType, Occupation};
use interview::core::error::UploadRejected;
use interview::core::session::Session;
use interview::core::types::{OutputEvent, Speaker, Step};
use interview::test_support::{ScriptedQuestions, TestInterviewer};

fn send(t: &TestInterviewer, session: &mut Session, inputs: &[&str]) -> OutputEvent {
    let mut last = OutputEvent::default();
    for input in inputs {
        last = t.interviewer.handle_message(session, input);
    }
    last
}

fn through_selections(t: &TestInterviewer, session: &mut Session) {
    send(
        t,
        session,
        &[
            "", "Alice", "2", "o1", "o2", "o3", "o4", "o5", "2", "r1", "r2", "r3", "r4", "r5",
            "1", "2",
        ],
    );
}

#[test]
fn full_interview_records_fifteen_answers() {
    let t = TestInterviewer::new(ScriptedQuestions::standard());
    let mut session = t.interviewer.start_session();

    through_selections(&t, &mut session);
    assert_eq!(session.step(), Step::ResumeUpload);

    let stored = t
        .interviewer
        .accept_upload(&mut session, "resume.pdf", b"%PDF")
        .expect("upload");
    let out = t.interviewer.handle_message(&mut session, "ignored");

    assert_eq!(session.step(), Step::Complete);
    assert!(out.is_choice_prompt);
    assert_eq!(session.ledger().len(), 15);

    let snapshots = t.recorder.snapshots();
    assert_eq!(snapshots.len(), 1);
    let snapshot = &snapshots[0];
    assert_eq!(snapshot.answers.len(), 15);
    assert_eq!(snapshot.file_reference.as_deref(), Some(stored.as_str()));
    assert_eq!(snapshot.selections.occupation, Some(Occupation::Fresher));
    assert_eq!(snapshot.selections.job_role, Some(JobRole::Java));
    assert_eq!(snapshot.selections.job_type, Some(JobType::FullTime));
    assert_eq!(snapshot.selections.job_mode, Some(JobMode::Onsite));

    let keys: Vec<&str> = snapshot.answers.iter().map(|a| a.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "start",
            "occupation",
            "occupation_q1",
            "occupation_q2",
            "occupation_q3",
            "occupation_q4",
            "occupation_q5",
            "job_role",
            "job_role_q1",
            "job_role_q2",
            "job_role_q3",
            "job_role_q4",
            "job_role_q5",
            "job_type",
            "job_mode",
        ]
    );
    assert_eq!(t.resumes.get(&stored), Some(b"%PDF".to_vec()));
}

#[test]
fn invalid_occupation_reoffers_the_same_options() {
    let t = TestInterviewer::new(ScriptedQuestions::standard());
    let mut session = t.interviewer.start_session();

    let offered = send(&t, &mut session, &["", "Alice"]);
    let retry = t.interviewer.handle_message(&mut session, "9");

    assert!(session.selections().occupation.is_none());
    assert_eq!(retry.choice_options, offered.choice_options);
    assert_eq!(retry.next_prompt, offered.next_prompt);
}

#[test]
fn interview_persists_exactly_once_and_only_after_upload() {
    let t = TestInterviewer::new(ScriptedQuestions::standard().with_empty_pools());
    let mut session = t.interviewer.start_session();
    send(&t, &mut session, &["", "Alice", "1", "1", "1", "1"]);

    send(&t, &mut session, &["done", "really done"]);
    assert_eq!(session.step(), Step::ResumeUpload);
    assert!(t.recorder.snapshots().is_empty());

    t.interviewer
        .accept_upload(&mut session, "cv.doc", b"doc")
        .expect("upload");
    send(&t, &mut session, &["next", "no", "still no"]);

    assert_eq!(session.step(), Step::Complete);
    assert_eq!(t.recorder.snapshots().len(), 1);
}

#[test]
fn second_upload_replaces_reference() {
    let t = TestInterviewer::new(ScriptedQuestions::standard().with_empty_pools());
    let mut session = t.interviewer.start_session();
    send(&t, &mut session, &["", "Alice", "1", "1", "1", "1"]);

    t.interviewer
        .accept_upload(&mut session, "old.pdf", b"1")
        .expect("first upload");
    let err = t
        .interviewer
        .accept_upload(&mut session, "new.txt", b"2")
        .expect_err("wrong type");
    assert_eq!(err, UploadRejected::DisallowedExtension);
    assert_eq!(session.file_reference(), Some("1_old.pdf"));

    t.interviewer
        .accept_upload(&mut session, "new.docx", b"3")
        .expect("second upload");
    assert_eq!(session.file_reference(), Some("1_new.docx"));
}

#[test]
fn restart_issues_a_larger_id_and_a_clean_session() {
    let t = TestInterviewer::new(ScriptedQuestions::standard().with_empty_pools());
    let mut session = t.interviewer.start_session();
    let first_id = session.id();
    send(&t, &mut session, &["", "Alice", "1", "1", "1", "1"]);
    t.interviewer
        .accept_upload(&mut session, "cv.pdf", b"pdf")
        .expect("upload");
    send(&t, &mut session, &["done"]);

    let out = t.interviewer.handle_message(&mut session, "Yes");

    assert!(session.id() > first_id);
    assert_eq!(session.step(), Step::General);
    assert!(session.ledger().is_empty());
    assert_eq!(session.file_reference(), None);
    assert_eq!(out.next_prompt, "What is your name?");

    send(&t, &mut session, &["Bob", "3", "3", "3", "3"]);
    t.interviewer
        .accept_upload(&mut session, "cv.pdf", b"pdf")
        .expect("upload");
    send(&t, &mut session, &["done"]);

    let snapshots = t.recorder.snapshots();
    assert_eq!(snapshots.len(), 2);
    assert!(snapshots[1].id > snapshots[0].id);
    assert_eq!(snapshots[1].answers[0].text, "Bob");
}

#[test]
fn transcript_alternates_user_and_bot() {
    let t = TestInterviewer::new(ScriptedQuestions::standard());
    let mut session = t.interviewer.start_session();
    send(&t, &mut session, &["", "Alice", "Student"]);

    let history = t.interviewer.transcript(&session);
    let speakers: Vec<Speaker> = history.iter().map(|entry| entry.speaker).collect();
    assert_eq!(
        speakers,
        vec![
            Speaker::Bot,
            Speaker::User,
            Speaker::Bot,
            Speaker::User,
            Speaker::Bot,
        ]
    );
    assert_eq!(history[1].text, "Alice");
}
