//! Canned reply selection.
//!
//! `selector` owns conversation state and drives the pipeline: base reply by
//! intent (`question` classifies question-style messages, `templates` holds
//! the tables), then `decorate` adds sentiment and entity clauses.

pub mod decorate;
pub mod question;
pub mod selector;
pub mod templates;
