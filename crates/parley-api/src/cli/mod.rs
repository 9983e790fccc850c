//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod respond;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use parley_core::reply::selector::ResponseSelector;
use parley_types::config::ParleyConfig;

/// Canned replies for analyzed chat messages.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log errors. Replies and command output still print.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config.toml (defaults to $PARLEY_HOME/config.toml).
    #[arg(long, global = true, env = "PARLEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Export tracing spans through OpenTelemetry to stdout.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reply to a single message.
    Respond {
        /// The user's message.
        message: String,

        /// Analysis bundle as JSON (intent, entities, sentiment, keywords).
        #[arg(long)]
        analysis: Option<String>,

        /// Seed for template selection.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Start an interactive conversation on stdin.
    Chat {
        /// Your name, used for the greeting.
        #[arg(long)]
        name: Option<String>,

        /// Seed for template selection.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Build a selector from resolved configuration.
pub fn build_selector(config: &ParleyConfig) -> ResponseSelector {
    let mut selector = match config.seed {
        Some(seed) => ResponseSelector::with_seed(seed),
        None => ResponseSelector::new(),
    };
    if let Some(name) = &config.user_name {
        selector.set_user_name(name.clone());
    }
    selector
}
