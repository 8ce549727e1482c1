//! The interview state machine.
//!
//! [`apply`] takes the current session and one input and computes the next
//! session, the output event and any effects the caller must carry out. The
//! input session is never modified, so a failed transition leaves it intact.

use chrono::{DateTime, Utc};

use crate::core::choice::{Choice, JobMode, JobRole, JobType, Occupation};
use crate::core::error::TransitionFault;
use crate::core::invariants::validate_session;
use crate::core::ports::{IdGenerator, QuestionSource, Tone};
use crate::core::session::Session;
use crate::core::types::{InterviewSnapshot, OutputEvent, Step};

pub const UPLOAD_PROMPT: &str = "Please upload your resume (PDF, DOC, or DOCX format).";
pub const RESTART_PROMPT: &str = "Would you like to start another interview?";
pub const RESTART_OPTIONS: [&str; 2] = ["Yes", "No"];

const WELCOME: &str = "Welcome! Let's begin.";
const UPLOAD_REMINDER: &str = "Please upload your resume to continue.";
const COMPLETED: &str = "Thanks for completing the interview! Your responses have been recorded.";
const RESTARTED: &str = "Starting a new interview.";
const NO_QUESTIONS: &str = "Sorry, questions couldn't be loaded. Please try again later.";
pub const FAREWELL: &str = "Thank you for using our interview chatbot. Have a great day!";

/// Collaborators and time for one transition.
pub struct TransitionContext<'a> {
    pub questions: &'a dyn QuestionSource,
    pub ids: &'a dyn IdGenerator,
    pub tone: &'a dyn Tone,
    pub now: DateTime<Utc>,
}

/// Side effects requested by a transition, carried out by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The interview just completed; hand this snapshot to persistence.
    PersistInterview(InterviewSnapshot),
}

/// Result of a successful transition.
#[derive(Debug, Clone)]
pub struct Transition {
    pub session: Session,
    pub output: OutputEvent,
    pub effects: Vec<Effect>,
}

/// Apply one user input to `session`.
///
/// Input is trimmed before use. Every successful transition appends the input
/// (if non-empty) and the bot text (if non-empty) to the transcript.
///
/// # Errors
///
/// Returns `TransitionFault` if the session is malformed or a question source
/// fails. `session` is unchanged in that case.
pub fn apply(
    session: &Session,
    input: &str,
    ctx: &TransitionContext<'_>,
) -> Result<Transition, TransitionFault> {
    let errors = validate_session(session);
    if !errors.is_empty() {
        return Err(TransitionFault::MalformedState(errors.join("; ")));
    }

    let input = input.trim();
    let mut next = session.clone();
    let mut effects = Vec::new();

    let output = match next.step {
        Step::General => general(&mut next, input, ctx)?,
        Step::Occupation => occupation(&mut next, input, ctx)?,
        Step::JobRole => job_role(&mut next, input, ctx)?,
        Step::JobType => job_type(&mut next, input),
        Step::JobMode => job_mode(&mut next, input),
        Step::ResumeUpload => resume_upload(&mut next, ctx, &mut effects)?,
        Step::Complete => complete(&mut next, input, ctx)?,
    };

    next.push_history(input, &output.bot_text);
    Ok(Transition {
        session: next,
        output,
        effects,
    })
}

fn general(
    next: &mut Session,
    input: &str,
    ctx: &TransitionContext<'_>,
) -> Result<OutputEvent, TransitionFault> {
    // The general question list is immutable, so it is read fresh each time.
    if let Some(question) = next.current_prompt.clone() {
        let key = if next.ledger.is_empty() {
            "start".to_string()
        } else {
            let asked = next.step_index.checked_sub(1).ok_or_else(|| {
                TransitionFault::MalformedState("general: prompt set before any question".into())
            })?;
            format!("{}_{asked}", Step::General)
        };
        next.record(&key, &question, input);
    }

    let questions = ctx.questions.general_questions().map_err(source_fault)?;
    let bot_text = if input.is_empty() {
        WELCOME.to_string()
    } else {
        ctx.tone.acknowledge(input, Step::General)
    };

    match questions.get(next.step_index) {
        Some(question) => Ok(ask(next, bot_text, question)),
        None => Ok(enter_selection::<Occupation>(next, Step::Occupation, bot_text)),
    }
}

fn occupation(
    next: &mut Session,
    input: &str,
    ctx: &TransitionContext<'_>,
) -> Result<OutputEvent, TransitionFault> {
    if next.step_index >= 1 {
        let ack = ctx.tone.acknowledge(input, Step::Occupation);
        return Ok(match answer_pool_question(next, Step::Occupation, input, ack)? {
            PoolProgress::Asked(output) => output,
            PoolProgress::Exhausted(ack) => enter_selection::<JobRole>(next, Step::JobRole, ack),
        });
    }

    let Some(selected) = Occupation::resolve(input) else {
        return Ok(invalid_selection::<Occupation>());
    };
    record_selection(next, Step::Occupation, selected);
    next.selections.occupation = Some(selected);

    let pool = ctx
        .questions
        .occupation_questions(selected)
        .map_err(source_fault)?;
    if pool.is_empty() {
        let ack = format!("{} noted. Let's talk about your interests.", selected.label());
        return Ok(enter_selection::<JobRole>(next, Step::JobRole, ack));
    }
    Ok(start_pool(next, pool, selected.acknowledgement()))
}

fn job_role(
    next: &mut Session,
    input: &str,
    ctx: &TransitionContext<'_>,
) -> Result<OutputEvent, TransitionFault> {
    if next.step_index >= 1 {
        let ack = ctx.tone.acknowledge(input, Step::JobRole);
        return Ok(match answer_pool_question(next, Step::JobRole, input, ack)? {
            PoolProgress::Asked(output) => output,
            PoolProgress::Exhausted(ack) => enter_selection::<JobType>(next, Step::JobType, ack),
        });
    }

    let Some(selected) = JobRole::resolve(input) else {
        return Ok(invalid_selection::<JobRole>());
    };
    record_selection(next, Step::JobRole, selected);
    next.selections.job_role = Some(selected);

    let pool = ctx.questions.role_questions(selected).map_err(source_fault)?;
    if pool.is_empty() {
        return Ok(enter_selection::<JobType>(
            next,
            Step::JobType,
            selected.acknowledgement().to_string(),
        ));
    }
    Ok(start_pool(next, pool, selected.acknowledgement()))
}

fn job_type(next: &mut Session, input: &str) -> OutputEvent {
    let Some(selected) = JobType::resolve(input) else {
        return invalid_selection::<JobType>();
    };
    record_selection(next, Step::JobType, selected);
    next.selections.job_type = Some(selected);
    enter_selection::<JobMode>(next, Step::JobMode, selected.acknowledgement().to_string())
}

fn job_mode(next: &mut Session, input: &str) -> OutputEvent {
    let Some(selected) = JobMode::resolve(input) else {
        return invalid_selection::<JobMode>();
    };
    record_selection(next, Step::JobMode, selected);
    next.selections.job_mode = Some(selected);

    next.step = Step::ResumeUpload;
    next.step_index = 0;
    next.current_prompt = Some(UPLOAD_PROMPT.to_string());
    OutputEvent::upload(selected.acknowledgement(), UPLOAD_PROMPT)
}

/// Text input never uploads anything; only the upload path flips the flag.
fn resume_upload(
    next: &mut Session,
    ctx: &TransitionContext<'_>,
    effects: &mut Vec<Effect>,
) -> Result<OutputEvent, TransitionFault> {
    if !next.file_uploaded {
        return Ok(OutputEvent::upload(UPLOAD_REMINDER, UPLOAD_PROMPT));
    }

    next.step = Step::Complete;
    next.completed_at = Some(ctx.now);
    next.current_prompt = Some(RESTART_PROMPT.to_string());
    let snapshot = next.snapshot().ok_or_else(|| {
        TransitionFault::MalformedState("complete: snapshot unavailable".to_string())
    })?;
    effects.push(Effect::PersistInterview(snapshot));

    Ok(OutputEvent::choice(
        COMPLETED,
        RESTART_PROMPT,
        RESTART_OPTIONS.iter().map(ToString::to_string).collect(),
    ))
}

fn complete(
    next: &mut Session,
    input: &str,
    ctx: &TransitionContext<'_>,
) -> Result<OutputEvent, TransitionFault> {
    if !(input.eq_ignore_ascii_case("yes") || input == "1") {
        return Ok(OutputEvent::prompt(FAREWELL, ""));
    }

    // Restart is eager: the first general question goes out with this reply.
    let questions = ctx.questions.general_questions().map_err(source_fault)?;
    let mut fresh = Session::new(ctx.ids.next_id(), ctx.now);
    let output = match questions.first() {
        Some(question) => ask(&mut fresh, RESTARTED.to_string(), question),
        None => OutputEvent::prompt(NO_QUESTIONS, ""),
    };
    *next = fresh;
    Ok(output)
}

enum PoolProgress {
    Asked(OutputEvent),
    Exhausted(String),
}

/// Record the answer to the pool question just shown and ask the next one.
fn answer_pool_question(
    next: &mut Session,
    step: Step,
    input: &str,
    ack: String,
) -> Result<PoolProgress, TransitionFault> {
    let index = next.step_index;
    let question = next.current_prompt.clone().ok_or_else(|| {
        TransitionFault::MalformedState(format!("{step}: pool question without prompt"))
    })?;
    next.record(&format!("{step}_q{index}"), &question, input);

    match next.question_pool.get(index).cloned() {
        Some(question) => Ok(PoolProgress::Asked(ask(next, ack, &question))),
        None => Ok(PoolProgress::Exhausted(ack)),
    }
}

/// Cache a freshly fetched pool and ask its first question.
fn start_pool(next: &mut Session, pool: Vec<String>, ack: &str) -> OutputEvent {
    next.question_pool = pool;
    next.step_index = 0;
    match next.question_pool.first().cloned() {
        Some(first) => ask(next, ack.to_string(), &first),
        None => OutputEvent::prompt(ack, ""),
    }
}

fn ask(next: &mut Session, bot_text: String, question: &str) -> OutputEvent {
    next.current_prompt = Some(question.to_string());
    next.step_index += 1;
    OutputEvent::prompt(bot_text, question)
}

fn enter_selection<C: Choice>(next: &mut Session, step: Step, bot_text: String) -> OutputEvent {
    next.step = step;
    next.step_index = 0;
    next.question_pool.clear();
    next.current_prompt = Some(C::PROMPT.to_string());
    OutputEvent::choice(bot_text, C::PROMPT, C::labels())
}

fn invalid_selection<C: Choice>() -> OutputEvent {
    OutputEvent::choice(C::INVALID, C::PROMPT, C::labels())
}

fn record_selection<C: Choice>(next: &mut Session, step: Step, selected: C) {
    next.record(step.as_str(), C::PROMPT, selected.label());
}

fn source_fault(err: anyhow::Error) -> TransitionFault {
    TransitionFault::QuestionSource(format!("{err:#}"))
}
