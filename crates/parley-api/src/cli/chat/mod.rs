//! Interactive chat session over stdin.

pub mod commands;
pub mod input;
pub mod loop_runner;
