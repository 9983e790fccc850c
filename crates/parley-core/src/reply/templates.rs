//! Static reply tables and placeholder rendering.
//!
//! Templates use `{name}` placeholders filled by [`render`]. Every table is
//! non-empty.

use parley_types::error::GenerationError;

/// Reply when a message arrives without any analysis.
pub const UNANALYZED_FALLBACK: &str = "I understand you're asking something important. Could you help me understand better by providing more details or rephrasing your question?";

/// Reply when an unknown intent arrives without keywords.
pub const GENERIC_FALLBACK: &str =
    "I'd like to help you with that! Could you tell me more about what you're looking for?";

/// Reply when generation fails for any reason.
pub const APOLOGY: &str = "I apologize, but I encountered an error processing your message. Could you please try again?";

pub const WEATHER_DISCLAIMER: &str = "I don't have access to real-time weather data, but I'd recommend checking a weather app for current conditions.";

pub const CAPABILITIES: &str = "I can help you with a wide variety of tasks including answering questions, providing explanations, analyzing text, having conversations, and much more! What would you like to explore?";

pub const QUESTION_ABOUT_TOPIC: &str = "That's a great question about {topic}! Could you provide more specific details so I can give you the most helpful answer?";

pub const GENERIC_QUESTION: &str = "I'd be happy to help answer your question! Could you provide a bit more detail about what you'd like to know?";

pub const CURRENT_TIME: &str = "The current date and time is {timestamp}.";

pub const NEGATIVE_PREFIX: &str = "I understand this might be frustrating. ";
pub const POSITIVE_SUFFIX: &str = " I'm glad to help with this!";
pub const PERSON_MENTION: &str = " I notice you mentioned {entity}.";
pub const PLACE_MENTION: &str = " I see you're asking about {entity}.";

pub const GREETING_NAMED: &str = "Hello {name}! How can I help you today?";
pub const GREETING_ANONYMOUS: &str = "Hello! How can I assist you today?";

/// `YYYY-MM-DD HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `Saturday, March 09, 2024 at 02:05 PM`
pub const LONG_DATE_FORMAT: &str = "%A, %B %d, %Y at %I:%M %p";

/// Phrases that mark a message as asking for the assistant's name.
pub const NAME_PATTERNS: &[&str] = &[
    "what is your name",
    "what's your name",
    "who are you",
    "what are you called",
    "your name",
    "tell me your name",
];

pub const NAME_RESPONSES: &[&str] = &[
    "I'm Parley, a conversational assistant. I'm here to help you with questions and tasks!",
    "My name is Parley! I'm an assistant designed to be helpful, clear, and honest.",
    "I'm Parley, your assistant. Nice to meet you! What's your name?",
    "You can call me Parley! I'm here to assist and chat with people.",
];

pub const FALLBACK_RESPONSES: &[&str] = &[
    "I understand you're asking about {topic}. Could you provide more details so I can give you a better answer?",
    "That's interesting! Tell me more about what you'd like to know regarding {topic}.",
    "I'd like to help you with that. Could you rephrase your question or provide more context?",
    "I want to make sure I understand correctly. Are you asking about {topic}?",
];

const GREETING: &[&str] = &[
    "Hello! I'm Parley, your assistant. How can I help you today?",
    "Hi there! I'm Parley, nice to meet you! What would you like to know?",
    "Hey! I'm Parley, your virtual assistant. What can I do for you?",
    "Hello! I'm Parley, an assistant here to help. What's on your mind?",
];

const QUESTION: &[&str] = &[
    "That's a great question! Let me help you with that.",
    "I'd be happy to answer that for you.",
    "Let me think about that and provide you with a helpful response.",
    "Interesting question! Here's what I can tell you:",
];

const REQUEST_HELP: &[&str] = &[
    "I'm here to help! I can assist with questions, analysis, explanations, and much more.",
    "Absolutely! I can help with a wide range of topics. What specific area would you like assistance with?",
    "Of course! I'm designed to help with various tasks. What do you need help with?",
];

const WEATHER: &[&str] = &[
    "I don't have access to real-time weather data, but I'd recommend checking a weather app or website for current conditions.",
    "For accurate weather information, I'd suggest checking your local weather service or a weather app.",
];

const TIME_DATE: &[&str] = &[
    CURRENT_TIME,
    "Right now it's {long_date} ({timestamp}).",
];

const GOODBYE: &[&str] = &[
    "Goodbye! It was great chatting with you. Feel free to come back anytime!",
    "Take care! I'm here whenever you need assistance.",
    "See you later! Have a wonderful day!",
];

const COMPLIMENT: &[&str] = &[
    "Thank you so much! I really appreciate your kind words. Is there anything else I can help you with?",
    "That's very kind of you to say! I'm glad I could be helpful.",
    "Thanks! I'm here to help whenever you need it.",
];

const COMPLAINT: &[&str] = &[
    "I apologize if I didn't meet your expectations. Could you tell me more about what went wrong so I can help better?",
    "I'm sorry about that. Let me try to help you in a different way. What specifically can I improve?",
];

/// Intents with a dedicated reply table.
pub const INTENTS: &[&str] = &[
    "greeting",
    "question",
    "request_help",
    "weather",
    "time_date",
    "goodbye",
    "compliment",
    "complaint",
];

/// Reply table for an intent, if it has one.
pub fn intent_responses(intent: &str) -> Option<&'static [&'static str]> {
    match intent {
        "greeting" => Some(GREETING),
        "question" => Some(QUESTION),
        "request_help" => Some(REQUEST_HELP),
        "weather" => Some(WEATHER),
        "time_date" => Some(TIME_DATE),
        "goodbye" => Some(GOODBYE),
        "compliment" => Some(COMPLIMENT),
        "complaint" => Some(COMPLAINT),
        _ => None,
    }
}

/// Fill every `{key}` placeholder in `template` from `values`.
///
/// Text without placeholders passes through unchanged. Values are inserted
/// verbatim and are not scanned for further placeholders.
pub fn render(template: &str, values: &[(&str, &str)]) -> Result<String, GenerationError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return Ok(out);
        };
        let key = &after[..close];
        let value = values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| GenerationError::Template {
                template: template.to_string(),
                placeholder: key.to_string(),
            })?;
        out.push_str(value);
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
