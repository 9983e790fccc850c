//! Sentiment and entity decorations applied to a base reply.

use parley_types::analysis::Entity;
use parley_types::error::GenerationError;

use super::templates::{NEGATIVE_PREFIX, PERSON_MENTION, PLACE_MENTION, POSITIVE_SUFFIX};

/// Prefix or suffix the reply according to the sentiment label.
pub fn with_sentiment(response: String, sentiment: &str) -> String {
    match sentiment {
        "negative" => format!("{NEGATIVE_PREFIX}{response}"),
        "positive" => format!("{response}{POSITIVE_SUFFIX}"),
        _ => response,
    }
}

/// Append at most one entity mention. The first person wins over any place.
///
/// Every entity must carry a label; only the mentioned one needs text.
pub fn with_entities(mut response: String, entities: &[Entity]) -> Result<String, GenerationError> {
    if let Some(index) = entities.iter().position(|e| e.label.is_none()) {
        return Err(GenerationError::MalformedAnalysis(format!(
            "entity {index} has no label"
        )));
    }

    let mention = match entities.iter().find(|e| e.is_person()) {
        Some(person) => Some((PERSON_MENTION, person)),
        None => entities
            .iter()
            .find(|e| e.is_place())
            .map(|place| (PLACE_MENTION, place)),
    };

    if let Some((template, entity)) = mention {
        response.push_str(&template.replace("{entity}", entity.mention_text()?));
    }
    Ok(response)
}
