use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::connections::DEFAULT_HINT_THRESHOLD;
use crate::progress::{DEFAULT_INITIAL_AFFECTION, GatePolicy};
use crate::store::DEFAULT_KEY_PREFIX;

/// Engine knobs, read from the page as camelCase JSON. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub initial_affection: i32,
    pub gate_policy: GatePolicy,
    pub hint_threshold: u32,
    pub storage_key_prefix: String,
    pub log_level: String,
    /// Seeds the play-through's board shuffles. `None` takes one from the `rng` feature, or 0 without it.
    pub shuffle_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_affection: DEFAULT_INITIAL_AFFECTION,
            gate_policy: GatePolicy::WarnOnly,
            hint_threshold: DEFAULT_HINT_THRESHOLD,
            storage_key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            log_level: "info".to_string(),
            shuffle_seed: None,
        }
    }
}

impl EngineConfig {
    /// Blank input means defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Unrecognised level names fall back to `Info`.
    pub fn level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
