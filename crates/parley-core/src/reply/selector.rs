//! Response selector: the per-conversation reply engine.
//!
//! Records every incoming message, picks a base reply from the intent tables
//! (or a fallback), then decorates it with sentiment and entity clauses.
//! Generation failures never escape [`ResponseSelector::generate_response`];
//! they are logged and answered with a fixed apology.

use std::collections::HashMap;

use parley_types::analysis::{AnalysisBundle, IntentData};
use parley_types::chat::{ConversationSummary, ConversationTurn, RECENT_TURN_WINDOW};
use parley_types::error::GenerationError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::clock::{Clock, SystemClock};

use super::decorate::{with_entities, with_sentiment};
use super::question::{QuestionKind, classify, is_asking_name};
use super::templates::{
    APOLOGY, CAPABILITIES, CURRENT_TIME, FALLBACK_RESPONSES, GENERIC_FALLBACK, GENERIC_QUESTION,
    GREETING_ANONYMOUS, GREETING_NAMED, LONG_DATE_FORMAT, NAME_RESPONSES, QUESTION_ABOUT_TOPIC,
    TIMESTAMP_FORMAT, UNANALYZED_FALLBACK, WEATHER_DISCLAIMER, intent_responses, render,
};

/// Canned-reply engine for a single conversation.
///
/// Not internally synchronized: every mutating call takes `&mut self`, so a
/// host sharing one selector between callers must wrap it in a lock.
#[derive(Debug)]
pub struct ResponseSelector<R = StdRng, C = SystemClock> {
    history: Vec<ConversationTurn>,
    user_name: Option<String>,
    context: HashMap<String, String>,
    rng: R,
    clock: C,
}

impl ResponseSelector {
    /// Selector with an entropy-seeded RNG and the system clock.
    pub fn new() -> Self {
        Self::with_parts(StdRng::from_entropy(), SystemClock)
    }

    /// Selector whose template choices are reproducible for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_parts(StdRng::seed_from_u64(seed), SystemClock)
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng, C: Clock> ResponseSelector<R, C> {
    pub fn with_parts(rng: R, clock: C) -> Self {
        Self {
            history: Vec::new(),
            user_name: None,
            context: HashMap::new(),
            rng,
            clock,
        }
    }

    /// Reply to `message`, recording it in the history.
    ///
    /// Without analysis the reply is always [`UNANALYZED_FALLBACK`]. Any
    /// failure is logged and answered with [`APOLOGY`].
    #[tracing::instrument(name = "generate_response", skip_all, fields(turn = self.history.len() + 1))]
    pub fn generate_response(&mut self, message: &str, analysis: Option<&AnalysisBundle>) -> String {
        match self.try_generate_response(message, analysis) {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "Error generating response");
                APOLOGY.to_string()
            }
        }
    }

    /// Fallible form of [`generate_response`](Self::generate_response).
    ///
    /// The turn is recorded before anything can fail.
    pub fn try_generate_response(
        &mut self,
        message: &str,
        analysis: Option<&AnalysisBundle>,
    ) -> Result<String, GenerationError> {
        self.record_turn(message, analysis.cloned());

        let Some(analysis) = analysis else {
            debug!("No analysis available, using fallback");
            return Ok(UNANALYZED_FALLBACK.to_string());
        };

        let base = self.base_response(message, analysis)?;
        let response = with_sentiment(base, analysis.sentiment_label());
        with_entities(response, &analysis.entities)
    }

    /// Reply to `message` with the analysis in its JSON wire shape.
    ///
    /// `null` and `{}` count as no analysis. A bundle that fails to
    /// deserialize is a generation failure: the turn is recorded with
    /// whatever primary intent can still be read from it and the apology is
    /// returned.
    pub fn generate_response_json(&mut self, message: &str, analysis: Option<&Value>) -> String {
        match parse_analysis(analysis) {
            Ok(bundle) => self.generate_response(message, bundle.as_ref()),
            Err(err) => {
                self.record_turn(message, analysis.and_then(salvage_intent));
                error!(error = %err, "Error generating response");
                APOLOGY.to_string()
            }
        }
    }

    /// Message count plus the intents of the most recent turns.
    pub fn conversation_summary(&self) -> ConversationSummary {
        if self.history.is_empty() {
            return ConversationSummary::NoHistory;
        }

        let start = self.history.len().saturating_sub(RECENT_TURN_WINDOW);
        let recent_intents = self.history[start..]
            .iter()
            .filter_map(ConversationTurn::recorded_intent)
            .map(str::to_string)
            .collect();

        ConversationSummary::Stats {
            message_count: self.history.len(),
            recent_intents,
            conversation_length: self.history.len(),
        }
    }

    /// Forget every turn and all context facts. The user name is kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.context.clear();
        info!("Conversation history cleared");
    }

    pub fn set_user_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        info!(user_name = %name, "User name set");
        self.user_name = Some(name);
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Greeting that uses the stored user name when there is one.
    pub fn personalized_greeting(&self) -> String {
        match self.user_name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => GREETING_NAMED.replace("{name}", name),
            None => GREETING_ANONYMOUS.to_string(),
        }
    }

    /// Turns in arrival order.
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Store an auxiliary fact about the conversation.
    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.insert(key.into(), value.into());
    }

    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    fn record_turn(&mut self, message: &str, analysis: Option<AnalysisBundle>) {
        self.history.push(ConversationTurn {
            user_message: message.to_string(),
            timestamp: self.clock.now(),
            analysis,
        });
    }

    fn base_response(
        &mut self,
        message: &str,
        analysis: &AnalysisBundle,
    ) -> Result<String, GenerationError> {
        let intent = analysis.primary_intent();

        if is_asking_name(message) {
            debug!("Name question detected");
            return Ok(self.pick(NAME_RESPONSES).to_string());
        }

        if intent == "question" {
            return self.answer_question(message, analysis);
        }

        if let Some(table) = intent_responses(intent) {
            debug!(intent, "Using intent table");
            let template = self.pick(table);
            return self.render_timed(template);
        }

        debug!(intent, "Unknown intent, using contextual fallback");
        match analysis.top_keyword()? {
            Some(topic) => {
                let template = self.pick(FALLBACK_RESPONSES);
                render(template, &[("topic", topic)])
            }
            None => Ok(GENERIC_FALLBACK.to_string()),
        }
    }

    fn answer_question(
        &mut self,
        message: &str,
        analysis: &AnalysisBundle,
    ) -> Result<String, GenerationError> {
        let kind = classify(message);
        debug!(?kind, "Question classified");

        match kind {
            QuestionKind::CurrentTime => self.render_timed(CURRENT_TIME),
            QuestionKind::Weather => Ok(WEATHER_DISCLAIMER.to_string()),
            QuestionKind::Name => Ok(self.pick(NAME_RESPONSES).to_string()),
            QuestionKind::Capabilities => Ok(CAPABILITIES.to_string()),
            QuestionKind::Open => match analysis.top_keyword()? {
                Some(topic) => render(QUESTION_ABOUT_TOPIC, &[("topic", topic)]),
                None => Ok(GENERIC_QUESTION.to_string()),
            },
        }
    }

    /// Render a template with the clock read at call time.
    fn render_timed(&self, template: &str) -> Result<String, GenerationError> {
        let now = self.clock.now();
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let long_date = now.format(LONG_DATE_FORMAT).to_string();
        render(
            template,
            &[("timestamp", &timestamp), ("long_date", &long_date)],
        )
    }

    fn pick(&mut self, table: &'static [&'static str]) -> &'static str {
        table.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

/// Decode a JSON analysis bundle. `null` and `{}` mean "no analysis".
pub fn parse_analysis(value: Option<&Value>) -> Result<Option<AnalysisBundle>, GenerationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
    }
}

/// Keep the primary intent of an undecodable bundle so summaries still see it.
fn salvage_intent(value: &Value) -> Option<AnalysisBundle> {
    let primary = value.pointer("/intent/primary")?.as_str()?;
    Some(AnalysisBundle {
        intent: IntentData {
            primary: Some(primary.to_string()),
        },
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::reply::templates::INTENTS;
    use chrono::{Local, TimeZone};
    use parley_types::analysis::{Entity, Keyword, SentimentData};
    use parley_types::chat::NO_HISTORY_MESSAGE;
    use serde_json::json;

    fn fixed_selector(seed: u64) -> ResponseSelector<StdRng, FixedClock> {
        let instant = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        ResponseSelector::with_parts(StdRng::seed_from_u64(seed), FixedClock(instant))
    }

    fn bundle(intent: Option<&str>) -> AnalysisBundle {
        AnalysisBundle {
            intent: IntentData {
                primary: intent.map(str::to_string),
            },
            ..Default::default()
        }
    }

    fn with_sentiment_label(mut analysis: AnalysisBundle, label: &str) -> AnalysisBundle {
        analysis.sentiment = SentimentData {
            sentiment: Some(label.to_string()),
        };
        analysis
    }

    #[test]
    fn test_no_analysis_returns_fixed_fallback() {
        let mut selector = fixed_selector(1);
        for message in ["hello", "What is your name?", "", "what time is it"] {
            assert_eq!(selector.generate_response(message, None), UNANALYZED_FALLBACK);
        }
        assert_eq!(selector.history().len(), 4);
    }

    #[test]
    fn test_name_question_draws_from_name_set() {
        let mut selector = ResponseSelector::new();
        for intent in ["greeting", "question", "general", "complaint"] {
            for message in ["What is your name?", "hey WHO ARE YOU", "tell me your name"] {
                let reply = selector.generate_response(message, Some(&bundle(Some(intent))));
                assert!(NAME_RESPONSES.contains(&reply.as_str()), "{reply}");
            }
        }
    }

    #[test]
    fn test_intent_tables_are_used() {
        let mut selector = fixed_selector(7);
        for intent in ["greeting", "request_help", "weather", "goodbye", "compliment", "complaint"] {
            let table = intent_responses(intent).unwrap();
            let reply = selector.generate_response("something", Some(&bundle(Some(intent))));
            assert!(table.contains(&reply.as_str()), "{intent}: {reply}");
        }
    }

    #[test]
    fn test_time_date_intent_embeds_fresh_timestamp() {
        for seed in 0..16 {
            let mut selector = fixed_selector(seed);
            let reply = selector.generate_response("clock?", Some(&bundle(Some("time_date"))));
            assert!(reply.contains("2024-03-09 14:05:07"), "{reply}");
        }
    }

    #[test]
    fn test_time_date_long_form() {
        let mut seen_long = false;
        for seed in 0..32 {
            let mut selector = fixed_selector(seed);
            let reply = selector.generate_response("clock?", Some(&bundle(Some("time_date"))));
            if reply.starts_with("Right now") {
                assert_eq!(
                    reply,
                    "Right now it's Saturday, March 09, 2024 at 02:05 PM (2024-03-09 14:05:07)."
                );
                seen_long = true;
            }
        }
        assert!(seen_long);
    }

    #[test]
    fn test_question_time_branch() {
        let mut selector = fixed_selector(3);
        let reply =
            selector.generate_response("What time is it?", Some(&bundle(Some("question"))));
        assert_eq!(reply, "The current date and time is 2024-03-09 14:05:07.");
    }

    #[test]
    fn test_question_branches() {
        let mut selector = fixed_selector(3);
        let question = bundle(Some("question"));

        assert_eq!(
            selector.generate_response("How's the weather?", Some(&question)),
            WEATHER_DISCLAIMER
        );
        assert_eq!(
            selector.generate_response("What can you do?", Some(&question)),
            CAPABILITIES
        );
        assert_eq!(
            selector.generate_response("Why is the sky blue?", Some(&question)),
            GENERIC_QUESTION
        );

        let mut with_topic = question.clone();
        with_topic.keywords = vec![Keyword::new("sky"), Keyword::new("blue")];
        assert_eq!(
            selector.generate_response("Why is the sky blue?", Some(&with_topic)),
            "That's a great question about sky! Could you provide more specific details so I can give you the most helpful answer?"
        );
    }

    #[test]
    fn test_unknown_intent_with_keywords_uses_topic() {
        let mut selector = ResponseSelector::new();
        let mut analysis = bundle(Some("shopping"));
        analysis.keywords = vec![Keyword::new("bicycles")];

        let candidates: Vec<String> = FALLBACK_RESPONSES
            .iter()
            .map(|t| t.replace("{topic}", "bicycles"))
            .collect();
        for _ in 0..20 {
            let reply = selector.generate_response("bikes", Some(&analysis));
            assert!(candidates.contains(&reply), "{reply}");
        }
    }

    #[test]
    fn test_missing_intent_without_keywords_is_generic() {
        let mut selector = fixed_selector(5);
        assert_eq!(
            selector.generate_response("hmm", Some(&bundle(None))),
            GENERIC_FALLBACK
        );
    }

    #[test]
    fn test_decoration_order() {
        let mut selector = fixed_selector(9);
        let mut analysis = with_sentiment_label(bundle(Some("question")), "negative");
        analysis.entities = vec![Entity::new("Alice", "PERSON")];

        assert_eq!(
            selector.generate_response("How's the weather?", Some(&analysis)),
            format!(
                "I understand this might be frustrating. {WEATHER_DISCLAIMER} I notice you mentioned Alice."
            )
        );

        let mut analysis = with_sentiment_label(bundle(Some("question")), "positive");
        analysis.entities = vec![Entity::new("Paris", "GPE")];
        assert_eq!(
            selector.generate_response("How's the weather?", Some(&analysis)),
            format!(
                "{WEATHER_DISCLAIMER} I'm glad to help with this! I see you're asking about Paris."
            )
        );
    }

    #[test]
    fn test_person_entity_takes_precedence() {
        let mut selector = fixed_selector(2);
        let mut analysis = bundle(Some("greeting"));
        analysis.entities = vec![Entity::new("Paris", "GPE"), Entity::new("Alice", "PERSON")];

        let reply = selector.generate_response("hi", Some(&analysis));
        assert!(reply.ends_with("I notice you mentioned Alice."), "{reply}");
        assert!(!reply.contains("Paris"));
    }

    #[test]
    fn test_same_seed_same_replies() {
        let mut a = ResponseSelector::with_seed(42);
        let mut b = ResponseSelector::with_seed(42);
        let greeting = bundle(Some("greeting"));
        for _ in 0..10 {
            assert_eq!(
                a.generate_response("hello", Some(&greeting)),
                b.generate_response("hello", Some(&greeting))
            );
        }
    }

    #[test]
    fn test_every_intent_produces_a_reply() {
        let mut selector = fixed_selector(11);
        for intent in INTENTS {
            let reply = selector
                .try_generate_response("ok", Some(&bundle(Some(*intent))))
                .unwrap();
            assert!(!reply.is_empty());
            assert!(!reply.contains('{'), "{intent}: {reply}");
        }
    }

    #[test]
    fn test_turn_is_recorded_with_analysis() {
        let mut selector = fixed_selector(1);
        let analysis = bundle(Some("greeting"));
        selector.generate_response("hello there", Some(&analysis));

        let turn = &selector.history()[0];
        assert_eq!(turn.user_message, "hello there");
        assert_eq!(turn.analysis.as_ref(), Some(&analysis));
        assert_eq!(
            turn.timestamp,
            Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
        );
    }

    #[test]
    fn test_json_analysis_is_decoded() {
        let mut selector = fixed_selector(4);
        let analysis = json!({
            "intent": {"primary": "question", "confidence": 0.9},
            "sentiment": {"sentiment": "positive"},
            "entities": [{"text": "Alice", "label": "PERSON"}],
            "keywords": []
        });
        let reply = selector.generate_response_json("How's the weather?", Some(&analysis));
        assert_eq!(
            reply,
            format!("{WEATHER_DISCLAIMER} I'm glad to help with this! I notice you mentioned Alice.")
        );
    }

    #[test]
    fn test_json_empty_or_null_is_no_analysis() {
        let mut selector = fixed_selector(4);
        assert_eq!(
            selector.generate_response_json("hello", Some(&json!({}))),
            UNANALYZED_FALLBACK
        );
        assert_eq!(
            selector.generate_response_json("hello", Some(&Value::Null)),
            UNANALYZED_FALLBACK
        );
        assert_eq!(selector.generate_response_json("hello", None), UNANALYZED_FALLBACK);
    }

    #[test]
    fn test_malformed_json_returns_apology_and_records_turn() {
        let mut selector = fixed_selector(4);
        let malformed = json!({"entities": [{"text": "Alice"}]});
        assert_eq!(
            selector.generate_response_json("hi Alice", Some(&malformed)),
            APOLOGY
        );
        assert_eq!(
            selector.generate_response_json("hi", Some(&json!("greeting"))),
            APOLOGY
        );
        assert_eq!(selector.history().len(), 2);
        assert_eq!(selector.history()[0].analysis.as_ref(), Some(&from_json(&malformed)));
        assert!(selector.history()[1].analysis.is_none());
    }

    fn from_json(value: &Value) -> AnalysisBundle {
        serde_json::from_value(value.clone()).unwrap()
    }

    #[test]
    fn test_unused_partial_fields_do_not_fail() {
        let mut selector = fixed_selector(4);
        let greeting = intent_responses("greeting").unwrap();

        for analysis in [
            json!({"intent": {"primary": "greeting"}, "entities": [{"label": "ORG"}]}),
            json!({"intent": {"primary": "greeting"}, "keywords": [{"score": 0.3}]}),
            json!({"intent": {"primary": "greeting"}, "keywords": [{"word": 5}]}),
        ] {
            let reply = selector.generate_response_json("hi", Some(&analysis));
            assert!(greeting.contains(&reply.as_str()), "{reply}");
        }

        assert_eq!(
            selector.conversation_summary(),
            ConversationSummary::Stats {
                message_count: 3,
                recent_intents: vec!["greeting".into(); 3],
                conversation_length: 3,
            }
        );
    }

    #[test]
    fn test_non_string_keyword_used_as_topic() {
        let mut selector = fixed_selector(4);
        let analysis = json!({"intent": {"primary": "question"}, "keywords": [{"word": 5}]});
        assert_eq!(
            selector.generate_response_json("Is it five", Some(&analysis)),
            "That's a great question about 5! Could you provide more specific details so I can give you the most helpful answer?"
        );
    }

    #[test]
    fn test_needed_field_missing_is_apology_with_intent_kept() {
        let mut selector = fixed_selector(4);
        let wordless = json!({"intent": {"primary": "shopping"}, "keywords": [{"score": 0.3}]});
        assert_eq!(selector.generate_response_json("bikes", Some(&wordless)), APOLOGY);

        let nameless = json!({"intent": {"primary": "greeting"}, "entities": [{"label": "PERSON"}]});
        assert_eq!(selector.generate_response_json("hi", Some(&nameless)), APOLOGY);

        let unlabelled = json!({"intent": {"primary": "goodbye"}, "entities": [{"text": "Bob"}]});
        assert_eq!(selector.generate_response_json("bye", Some(&unlabelled)), APOLOGY);

        match selector.conversation_summary() {
            ConversationSummary::Stats { recent_intents, .. } => {
                assert_eq!(recent_intents, vec!["shopping", "greeting", "goodbye"]);
            }
            ConversationSummary::NoHistory => panic!("expected stats"),
        }
    }

    #[test]
    fn test_undecodable_bundle_keeps_primary_intent() {
        let mut selector = fixed_selector(4);
        let analysis = json!({"intent": {"primary": "greeting"}, "keywords": "oops"});
        assert_eq!(selector.generate_response_json("hi", Some(&analysis)), APOLOGY);
        assert_eq!(selector.history()[0].recorded_intent(), Some("greeting"));
    }

    #[test]
    fn test_parse_analysis_error_kind() {
        let err = parse_analysis(Some(&json!({"entities": "Alice"}))).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedAnalysis(_)));
    }

    #[test]
    fn test_summary_empty_history() {
        let selector = fixed_selector(1);
        let summary = selector.conversation_summary();
        assert!(summary.is_empty());
        assert_eq!(summary.to_string(), NO_HISTORY_MESSAGE);
    }

    #[test]
    fn test_summary_scans_last_five_turns() {
        let mut selector = fixed_selector(1);
        for (i, intent) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
            if i == 2 {
                selector.generate_response("no analysis here", None);
            } else {
                selector.generate_response("msg", Some(&bundle(Some(*intent))));
            }
        }

        assert_eq!(
            selector.conversation_summary(),
            ConversationSummary::Stats {
                message_count: 7,
                recent_intents: vec!["d".into(), "e".into(), "f".into(), "g".into()],
                conversation_length: 7,
            }
        );
    }

    #[test]
    fn test_summary_skips_turns_without_primary_intent() {
        let mut selector = fixed_selector(1);
        selector.generate_response("one", Some(&bundle(Some("greeting"))));
        selector.generate_response("two", Some(&bundle(None)));
        selector.generate_response("three", Some(&bundle(Some("goodbye"))));

        match selector.conversation_summary() {
            ConversationSummary::Stats { recent_intents, message_count, .. } => {
                assert_eq!(message_count, 3);
                assert_eq!(recent_intents, vec!["greeting", "goodbye"]);
            }
            ConversationSummary::NoHistory => panic!("expected stats"),
        }
    }

    #[test]
    fn test_clear_history_resets_summary_and_context() {
        let mut selector = fixed_selector(1);
        selector.set_context("topic", "bikes");
        selector.set_user_name("Sam");
        selector.generate_response("hello", Some(&bundle(Some("greeting"))));
        selector.generate_response("bye", None);

        selector.clear_history();

        assert!(selector.history().is_empty());
        assert_eq!(selector.context_value("topic"), None);
        assert_eq!(
            selector.conversation_summary().to_string(),
            "No conversation history available."
        );
        assert_eq!(selector.user_name(), Some("Sam"));
    }

    #[test]
    fn test_personalized_greeting() {
        let mut selector = fixed_selector(1);
        assert_eq!(
            selector.personalized_greeting(),
            "Hello! How can I assist you today?"
        );

        selector.set_user_name("Sam");
        assert_eq!(
            selector.personalized_greeting(),
            "Hello Sam! How can I help you today?"
        );

        selector.set_user_name("");
        assert_eq!(
            selector.personalized_greeting(),
            "Hello! How can I assist you today?"
        );
    }

    #[test]
    fn test_context_values() {
        let mut selector = fixed_selector(1);
        assert_eq!(selector.context_value("mood"), None);
        selector.set_context("mood", "curious");
        selector.set_context("mood", "happy");
        assert_eq!(selector.context_value("mood"), Some("happy"));
    }
}
