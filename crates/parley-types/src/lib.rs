//! Shared domain types for Parley.
//!
//! This crate contains the data shapes that flow into and out of the response
//! selector: the externally produced analysis bundle, conversation turns,
//! conversation summaries, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, chrono,
//! thiserror.

pub mod analysis;
pub mod chat;
pub mod config;
pub mod error;
