//! Message analysis bundle produced by the upstream analysis pipeline.
//!
//! Parley never computes these values itself. The shapes mirror the JSON the
//! pipeline emits, and every field is optional so a partial bundle still
//! deserializes. A missing field only becomes an error when a reply actually
//! needs it, see [`AnalysisBundle::top_keyword`] and [`Entity::mention_text`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::GenerationError;

/// Intent used when the bundle carries no primary intent.
pub const DEFAULT_INTENT: &str = "general";

/// Sentiment used when the bundle carries no sentiment label.
pub const DEFAULT_SENTIMENT: &str = "neutral";

/// Entity label for people.
pub const LABEL_PERSON: &str = "PERSON";

/// Entity labels treated as places (geopolitical entities and locations).
pub const PLACE_LABELS: &[&str] = &["GPE", "LOC"];

/// Precomputed analysis of a single user message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBundle {
    #[serde(default)]
    pub intent: IntentData,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub sentiment: SentimentData,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

impl AnalysisBundle {
    /// Primary intent label, falling back to [`DEFAULT_INTENT`].
    pub fn primary_intent(&self) -> &str {
        self.intent.primary.as_deref().unwrap_or(DEFAULT_INTENT)
    }

    /// Sentiment label, falling back to [`DEFAULT_SENTIMENT`].
    pub fn sentiment_label(&self) -> &str {
        self.sentiment.sentiment.as_deref().unwrap_or(DEFAULT_SENTIMENT)
    }

    /// The highest-ranked keyword, used as a fallback topic.
    ///
    /// `Ok(None)` when there are no keywords; an error when the first keyword
    /// has no `word`.
    pub fn top_keyword(&self) -> Result<Option<&str>, GenerationError> {
        match self.keywords.first() {
            None => Ok(None),
            Some(keyword) => keyword.word.as_deref().map(Some).ok_or_else(|| {
                GenerationError::MalformedAnalysis("first keyword has no word".to_string())
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
}

/// A labelled span of the user message (e.g. `PERSON`, `GPE`, `LOC`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            label: Some(label.into()),
        }
    }

    pub fn is_person(&self) -> bool {
        self.label.as_deref() == Some(LABEL_PERSON)
    }

    pub fn is_place(&self) -> bool {
        self.label
            .as_deref()
            .is_some_and(|label| PLACE_LABELS.contains(&label))
    }

    /// Text to quote back to the user, required once the entity is mentioned.
    pub fn mention_text(&self) -> Result<&str, GenerationError> {
        self.text.as_deref().ok_or_else(|| {
            GenerationError::MalformedAnalysis(format!(
                "{} entity has no text",
                self.label.as_deref().unwrap_or("unlabelled")
            ))
        })
    }
}

/// A salient word extracted from the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    /// Non-string words (numbers, booleans) are kept in their JSON text form.
    #[serde(
        default,
        deserialize_with = "word_as_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Keyword {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: Some(word.into()),
            score: None,
        }
    }
}

fn word_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(word)) => Some(word),
        Some(other) => Some(other.to_string()),
    })
}
