//! Response selection logic for Parley.
//!
//! This crate picks canned replies for user messages. It depends only on
//! `parley-types` -- never on the CLI, config files or any IO crate. Hosts own
//! a [`reply::selector::ResponseSelector`] per conversation session.

pub mod clock;
pub mod reply;
