//! Classification of chat input lines.
//!
//! A line is a slash command, a JSON envelope carrying a message plus its
//! analysis bundle, or plain text sent without analysis.

use serde::Deserialize;
use serde_json::Value;

use super::commands::{self, ChatCommand};

#[derive(Debug, PartialEq)]
pub enum ChatLine {
    Command(ChatCommand),
    Message {
        text: String,
        analysis: Option<Value>,
    },
    Blank,
}

#[derive(Deserialize)]
struct Envelope {
    message: String,
    #[serde(default)]
    analysis: Option<Value>,
}

pub fn classify(line: &str) -> ChatLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ChatLine::Blank;
    }
    if let Some(cmd) = commands::parse(trimmed) {
        return ChatLine::Command(cmd);
    }
    if trimmed.starts_with('{') {
        if let Ok(envelope) = serde_json::from_str::<Envelope>(trimmed) {
            return ChatLine::Message {
                text: envelope.message,
                analysis: envelope.analysis,
            };
        }
    }
    ChatLine::Message {
        text: trimmed.to_string(),
        analysis: None,
    }
}
