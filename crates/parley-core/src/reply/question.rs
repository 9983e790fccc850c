//! Message classification for question-style replies.
//!
//! All matching is case-insensitive substring matching, so "somehow" counts
//! as containing "how" and "today" as containing "do".

use super::templates::NAME_PATTERNS;

const QUESTION_WORDS: &[&str] = &["what", "who", "where", "when", "how", "why"];

/// Which question reply applies to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    /// Asks for the current date or time.
    CurrentTime,
    Weather,
    /// Asks for the assistant's name.
    Name,
    /// Asks what the assistant can do.
    Capabilities,
    /// Anything else: answered from the top keyword, or generically.
    Open,
}

/// Whether the message asks for the assistant's name.
pub fn is_asking_name(message: &str) -> bool {
    let lower = message.to_lowercase();
    NAME_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Classify a message whose intent is `question`.
///
/// Time/date wins over weather, weather over name, name over help. Messages
/// without a question word skip straight to [`QuestionKind::Open`].
pub fn classify(message: &str) -> QuestionKind {
    let lower = message.to_lowercase();

    if QUESTION_WORDS.iter().any(|w| lower.contains(w)) {
        if lower.contains("time") || lower.contains("date") {
            return QuestionKind::CurrentTime;
        } else if lower.contains("weather") {
            return QuestionKind::Weather;
        } else if is_asking_name(&lower) {
            return QuestionKind::Name;
        } else if lower.contains("help") || lower.contains("do") {
            return QuestionKind::Capabilities;
        }
    }

    QuestionKind::Open
}
