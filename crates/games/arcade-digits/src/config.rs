use serde::{Deserialize, Serialize};

/// Data-driven configuration for the digit-sequence game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigitsConfig {
    /// Characters sequences are drawn from. Duplicates are ignored.
    pub charset: String,
    /// Length of the first sequence.
    pub start_length: usize,
    /// Growth after each completed sequence.
    pub length_step: usize,
    /// Longest sequence the game will ask for.
    pub max_length: usize,
    /// Fixed part of the preview period (ms).
    pub preview_base_ms: f32,
    /// Additional preview time per character (ms).
    pub preview_per_char_ms: f32,
    /// Session countdown (ms). 0 = untimed.
    pub time_limit_ms: f32,
    /// Base points per correct character, multiplied by the combo.
    pub points_per_char: u64,
    /// Raw bonus per character when a sequence is completed.
    pub sequence_bonus_per_char: u64,
    /// Combo growth per correct character.
    pub combo_step: f64,
    /// Currency paid per point scored.
    pub money_per_point: u64,
}

impl Default for DigitsConfig {
    fn default() -> Self {
        Self {
            charset: "0123456789".to_string(),
            start_length: 4,
            length_step: 1,
            max_length: 12,
            preview_base_ms: 1500.0,
            preview_per_char_ms: 250.0,
            time_limit_ms: 60_000.0,
            points_per_char: 10,
            sequence_bonus_per_char: 5,
            combo_step: 0.1,
            money_per_point: 1,
        }
    }
}

impl DigitsConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("ARCADE_DIGITS_CONFIG") {
            match std::fs::read_to_string(&path).map(|s| toml::from_str::<Self>(&s)) {
                Ok(Ok(config)) => return config,
                Ok(Err(e)) => tracing::warn!(%path, error = %e, "Invalid digits config, using defaults"),
                Err(e) => tracing::warn!(%path, error = %e, "Unreadable digits config, using defaults"),
            }
        }
        if let Ok(contents) = std::fs::read_to_string("config/digits.toml")
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        Self::default()
    }
}
