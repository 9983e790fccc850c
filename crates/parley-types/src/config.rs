//! Global configuration types for Parley.
//!
//! `ParleyConfig` represents the top-level `config.toml` that seeds template
//! selection and presets the user's name.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the `parley` binary.
///
/// Loaded from `~/.parley/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParleyConfig {
    /// Seed for template selection. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Name used for the personalized greeting.
    #[serde(default)]
    pub user_name: Option<String>,
}
