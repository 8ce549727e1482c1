//! Default acknowledgement tone.
//!
//! A small lexical estimate of how positive an answer sounds picks the opening
//! phrase, a couple of topic keywords override it, and a per-step suffix is
//! appended. Purely cosmetic: the state machine only concatenates the result.

use crate::core::ports::Tone;
use crate::core::types::Step;

const POSITIVE: &[&str] = &[
    "good", "great", "love", "like", "enjoy", "happy", "excited", "excellent", "passionate",
    "amazing", "best", "nice", "glad", "confident", "proud", "awesome", "fun", "interesting",
    "success", "successful", "strong", "yes",
];

const NEGATIVE: &[&str] = &[
    "bad", "hate", "dislike", "difficult", "hard", "struggle", "struggled", "sad", "worried",
    "afraid", "fail", "failed", "failure", "boring", "stress", "stressful", "terrible", "poor",
    "weak", "no", "never", "problem",
];

const NEGATIONS: &[&str] = &["not", "dont", "don't", "never", "isnt", "isn't", "wasnt", "wasn't"];

const EXPERIENCE_WORDS: &[&str] = &["experience", "worked", "job", "project", "projects", "jobs"];
const LEARNING_WORDS: &[&str] = &["learn", "learning", "education", "study", "studying", "studied"];

/// Keyword and sentiment driven acknowledgements.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTone;

impl Tone for KeywordTone {
    fn acknowledge(&self, input: &str, step: Step) -> String {
        let tokens = tokenize(input);
        let opening = if tokens.iter().any(|t| EXPERIENCE_WORDS.contains(&t.as_str())) {
            "Your experience is valuable."
        } else if tokens.iter().any(|t| LEARNING_WORDS.contains(&t.as_str())) {
            "Great background."
        } else {
            opening_for(sentiment(&tokens))
        };
        format!("{opening} {}", step_suffix(step))
    }
}

fn tokenize(input: &str) -> Vec<String> {
    input
        .split(|c: char| c.is_whitespace() || (c.is_ascii_punctuation() && c != '\''))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Score in `[-1, 1]`; a negation flips the polarity of the next scored word.
fn sentiment(tokens: &[String]) -> f64 {
    let mut score = 0_i32;
    let mut hits = 0_i32;
    let mut negate = false;
    for token in tokens {
        let token = token.as_str();
        if NEGATIONS.contains(&token) {
            negate = true;
            continue;
        }
        let polarity = if POSITIVE.contains(&token) {
            1
        } else if NEGATIVE.contains(&token) {
            -1
        } else {
            continue;
        };
        score += if negate { -polarity } else { polarity };
        hits += 1;
        negate = false;
    }
    if hits == 0 {
        return 0.0;
    }
    f64::from(score) / f64::from(hits)
}

fn opening_for(compound: f64) -> &'static str {
    if compound > 0.3 {
        "Great!"
    } else if compound > 0.0 {
        "Thanks for sharing."
    } else if compound > -0.3 {
        "I understand."
    } else {
        "I appreciate your honesty."
    }
}

fn step_suffix(step: Step) -> &'static str {
    match step {
        Step::General => "Let's continue.",
        Step::Occupation => "Good to know.",
        Step::JobRole => "Excellent choice.",
        Step::JobType => "Perfect.",
        Step::JobMode => "Got it.",
        Step::ResumeUpload => "Almost done!",
        Step::Complete => "Thanks for completing the interview!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_answer_is_understood() {
        let text = KeywordTone.acknowledge("Alice", Step::General);
        assert_eq!(text, "I understand. Let's continue.");
    }

    #[test]
    fn positive_answer_is_great() {
        let text = KeywordTone.acknowledge("I love building great tools", Step::Occupation);
        assert_eq!(text, "Great! Good to know.");
    }

    #[test]
    fn negated_positive_reads_negative() {
        let text = KeywordTone.acknowledge("I do not like deadlines", Step::JobRole);
        assert_eq!(text, "I appreciate your honesty. Excellent choice.");
    }

    #[test]
    fn keywords_override_sentiment() {
        let text = KeywordTone.acknowledge("I hated my last job", Step::General);
        assert_eq!(text, "Your experience is valuable. Let's continue.");
        let text = KeywordTone.acknowledge("Still studying, I love to learn", Step::JobRole);
        assert_eq!(text, "Great background. Excellent choice.");
    }
}
