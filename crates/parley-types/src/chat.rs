//! Conversation turn and summary types for Parley.
//!
//! A conversation is an ordered list of [`ConversationTurn`]s owned by the
//! response selector. [`ConversationSummary`] is the condensed view handed
//! back to hosts.

use chrono::{DateTime, Local};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use std::fmt;

use crate::analysis::AnalysisBundle;

/// Text returned in place of a summary when nothing has been said yet.
pub const NO_HISTORY_MESSAGE: &str = "No conversation history available.";

/// Number of trailing turns scanned for recent intents.
pub const RECENT_TURN_WINDOW: usize = 5;

/// A single user message as received by the selector.
///
/// Turns are appended in arrival order and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_message: String,
    pub timestamp: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisBundle>,
}

impl ConversationTurn {
    /// Primary intent carried by this turn's analysis, if any.
    ///
    /// Unlike [`AnalysisBundle::primary_intent`], this does not fall back to
    /// the default intent: a turn without an explicit label yields `None`.
    pub fn recorded_intent(&self) -> Option<&str> {
        self.analysis
            .as_ref()
            .and_then(|a| a.intent.primary.as_deref())
    }
}

/// Condensed view of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationSummary {
    /// History is empty. Displays and serializes as [`NO_HISTORY_MESSAGE`].
    NoHistory,
    Stats {
        message_count: usize,
        /// Primary intents of the last [`RECENT_TURN_WINDOW`] turns, oldest
        /// first, skipping turns without one.
        recent_intents: Vec<String>,
        conversation_length: usize,
    },
}

impl ConversationSummary {
    pub fn is_empty(&self) -> bool {
        matches!(self, ConversationSummary::NoHistory)
    }
}

impl fmt::Display for ConversationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationSummary::NoHistory => write!(f, "{NO_HISTORY_MESSAGE}"),
            ConversationSummary::Stats {
                message_count,
                recent_intents,
                ..
            } => {
                if recent_intents.is_empty() {
                    write!(f, "{message_count} message(s); no recent intents")
                } else {
                    write!(
                        f,
                        "{message_count} message(s); recent intents: {}",
                        recent_intents.join(", ")
                    )
                }
            }
        }
    }
}

impl Serialize for ConversationSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConversationSummary::NoHistory => serializer.serialize_str(NO_HISTORY_MESSAGE),
            ConversationSummary::Stats {
                message_count,
                recent_intents,
                conversation_length,
            } => {
                let mut state = serializer.serialize_struct("ConversationSummary", 3)?;
                state.serialize_field("message_count", message_count)?;
                state.serialize_field("recent_intents", recent_intents)?;
                state.serialize_field("conversation_length", conversation_length)?;
                state.end()
            }
        }
    }
}
