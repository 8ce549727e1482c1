//! Structural invariants of a session.
//!
//! Sessions built by the transition function always satisfy these; a session
//! restored from elsewhere may not, and the state machine refuses to advance
//! one that fails.

use std::collections::HashSet;

use crate::core::session::Session;
use crate::core::types::Step;

/// Check session invariants:
/// - Answer keys are unique
/// - `step_index` stays within the cached pool on branch steps
/// - A pool is only cached after a branch selection
/// - Selections required by the current step are present
/// - Upload and completion flags match the step
pub fn validate_session(session: &Session) -> Vec<String> {
    let mut errors = Vec::new();
    check_ledger(session, &mut errors);
    check_pool(session, &mut errors);
    check_selections(session, &mut errors);
    check_flags(session, &mut errors);
    errors
}

fn check_ledger(session: &Session, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for key in session.ledger().keys() {
        if !seen.insert(key) {
            errors.push(format!("duplicate answer key '{key}'"));
        }
    }
}

fn check_pool(session: &Session, errors: &mut Vec<String>) {
    let step = session.step();
    let index = session.step_index();
    let pool = session.question_pool().len();

    if step.iterates_pool() {
        if index > pool {
            errors.push(format!("{step}: step_index {index} exceeds pool of {pool}"));
        }
        if index == 0 && pool > 0 {
            errors.push(format!("{step}: pool cached before a selection was made"));
        }
        if index > 0 && session.current_prompt().is_none() {
            errors.push(format!("{step}: pool question asked without a prompt"));
        }
    } else if pool > 0 {
        errors.push(format!("{step}: question pool must be empty"));
    }

    if matches!(
        step,
        Step::JobType | Step::JobMode | Step::ResumeUpload | Step::Complete
    ) && index != 0
    {
        errors.push(format!("{step}: step_index must be 0, got {index}"));
    }
}

fn check_selections(session: &Session, errors: &mut Vec<String>) {
    let step = session.step();
    let selections = session.selections();

    let (occupation, role, job_type, job_mode) = match step {
        Step::General => {
            if !selections.is_empty() {
                errors.push("general: no selection may be made yet".to_string());
            }
            return;
        }
        Step::Occupation => (session.step_index() > 0, false, false, false),
        Step::JobRole => (true, session.step_index() > 0, false, false),
        Step::JobType => (true, true, false, false),
        Step::JobMode => (true, true, true, false),
        Step::ResumeUpload | Step::Complete => (true, true, true, true),
    };

    if occupation && selections.occupation.is_none() {
        errors.push(format!("{step}: occupation not selected"));
    }
    if role && selections.job_role.is_none() {
        errors.push(format!("{step}: job role not selected"));
    }
    if job_type && selections.job_type.is_none() {
        errors.push(format!("{step}: job type not selected"));
    }
    if job_mode && selections.job_mode.is_none() {
        errors.push(format!("{step}: job mode not selected"));
    }
}

fn check_flags(session: &Session, errors: &mut Vec<String>) {
    let step = session.step();

    if session.file_uploaded() && !matches!(step, Step::ResumeUpload | Step::Complete) {
        errors.push(format!("{step}: file uploaded before it was requested"));
    }
    if step == Step::Complete && !session.file_uploaded() {
        errors.push("complete: no file uploaded".to_string());
    }
    if session.file_uploaded() != session.file_reference().is_some() {
        errors.push(format!("{step}: file flag and reference disagree"));
    }
    if (step == Step::Complete) != session.completed_at().is_some() {
        errors.push(format!("{step}: completed_at only set once complete"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::choice::Occupation;
    use crate::core::clock::fixed_now;
    use crate::core::types::InterviewId;

    fn session() -> Session {
        Session::new(InterviewId::new(1), fixed_now())
    }

    #[test]
    fn fresh_session_is_valid() {
        assert!(validate_session(&session()).is_empty());
    }

    #[test]
    fn reports_index_past_pool() {
        let mut s = session();
        s.step = Step::Occupation;
        s.selections.occupation = Some(Occupation::Student);
        s.question_pool = vec!["q1".to_string()];
        s.current_prompt = Some("q1".to_string());
        s.step_index = 3;

        let errors = validate_session(&s);
        assert!(errors.iter().any(|e| e.contains("exceeds pool")));
    }

    #[test]
    fn reports_premature_upload_and_missing_selections() {
        let mut s = session();
        s.step = Step::JobMode;
        s.file_uploaded = true;

        let errors = validate_session(&s);
        assert!(errors.iter().any(|e| e.contains("uploaded before")));
        assert!(errors.iter().any(|e| e.contains("flag and reference")));
        assert!(errors.iter().any(|e| e.contains("occupation not selected")));
        assert!(errors.iter().any(|e| e.contains("job type not selected")));
    }

    #[test]
    fn reports_stale_pool_outside_branch_steps() {
        let mut s = session();
        s.question_pool = vec!["left over".to_string()];
        let errors = validate_session(&s);
        assert!(errors.iter().any(|e| e.contains("pool must be empty")));
    }
}
