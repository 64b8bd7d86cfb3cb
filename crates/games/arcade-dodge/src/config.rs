use serde::{Deserialize, Serialize};

/// Data-driven configuration for the wall-dodge game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DodgeConfig {
    /// Playfield width (px).
    pub canvas_width: f32,
    /// Playfield height (px).
    pub canvas_height: f32,
    /// Base horizontal player speed (px/s).
    pub player_speed: f32,
    /// Side of the square player hitbox (px).
    pub player_size: f32,
    /// Distance from the bottom edge to the player's centre (px).
    pub player_y_offset: f32,
    /// Downward wall speed (px/s).
    pub scroll_speed: f32,
    /// Base gap width (px).
    pub gap_width: f32,
    /// Base time between spawns (ms).
    pub spawn_interval_ms: f32,
    /// Quiet period before the first wall (ms).
    pub initial_spawn_delay_ms: f32,
    /// Wall thickness (px).
    pub obstacle_height: f32,
    /// Currency paid per wall passed.
    pub money_per_wall: u64,
}

impl Default for DodgeConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            player_speed: 300.0,
            player_size: 30.0,
            player_y_offset: 80.0,
            scroll_speed: 150.0,
            gap_width: 150.0,
            spawn_interval_ms: 1800.0,
            initial_spawn_delay_ms: 1000.0,
            obstacle_height: 30.0,
            money_per_wall: 1,
        }
    }
}

impl DodgeConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("ARCADE_DODGE_CONFIG") {
            match std::fs::read_to_string(&path).map(|s| toml::from_str::<Self>(&s)) {
                Ok(Ok(config)) => return config,
                Ok(Err(e)) => tracing::warn!(%path, error = %e, "Invalid dodge config, using defaults"),
                Err(e) => tracing::warn!(%path, error = %e, "Unreadable dodge config, using defaults"),
            }
        }
        if let Ok(contents) = std::fs::read_to_string("config/dodge.toml")
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        Self::default()
    }

    /// Vertical centre of the player.
    pub fn player_y(&self) -> f32 {
        self.canvas_height - self.player_y_offset
    }
}

/// Purchased upgrades, applied once when the game is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeBonuses {
    /// Extra gap width (px).
    pub gap_width_bonus: f32,
    /// Extra distance between walls (px), converted to spawn time at the scroll speed.
    pub wall_spacing_bonus_px: f32,
    /// Extra player speed (px/s).
    pub move_speed_bonus: f32,
}
