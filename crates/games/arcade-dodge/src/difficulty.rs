use arcade_core::events::DifficultyChannel;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{DodgeConfig, UpgradeBonuses};

/// Spawn-interval penalty per draw (ms).
pub const SPAWN_RATE_STEP_MS: f32 = 50.0;
/// Gap-width penalty per draw (px).
pub const GAP_WIDTH_STEP_PX: f32 = 3.0;
/// Player-speed penalty per draw (px/s).
pub const PLAYER_SPEED_STEP: f32 = 5.0;

/// Floors keeping the game survivable however far the penalties climb.
pub const MIN_SPAWN_INTERVAL_MS: f32 = 400.0;
pub const MIN_GAP_WIDTH: f32 = 30.0;
pub const MIN_PLAYER_SPEED: f32 = 80.0;

/// Per-session difficulty accumulators. They only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyPenalties {
    pub spawn_rate_ms: f32,
    pub gap_width_px: f32,
    pub player_speed: f32,
}

impl DifficultyPenalties {
    /// Raise one channel by its fixed step.
    pub fn apply(&mut self, channel: DifficultyChannel) {
        match channel {
            DifficultyChannel::SpawnRate => self.spawn_rate_ms += SPAWN_RATE_STEP_MS,
            DifficultyChannel::GapWidth => self.gap_width_px += GAP_WIDTH_STEP_PX,
            DifficultyChannel::PlayerSpeed => self.player_speed += PLAYER_SPEED_STEP,
        }
    }

    /// Pick a channel uniformly at random and raise it.
    pub fn draw(&mut self, rng: &mut impl Rng) -> DifficultyChannel {
        let channel = DifficultyChannel::ALL[rng.random_range(0..DifficultyChannel::ALL.len())];
        self.apply(channel);
        channel
    }

    /// How many steps a channel has taken.
    pub fn steps(&self, channel: DifficultyChannel) -> u32 {
        let (value, step) = match channel {
            DifficultyChannel::SpawnRate => (self.spawn_rate_ms, SPAWN_RATE_STEP_MS),
            DifficultyChannel::GapWidth => (self.gap_width_px, GAP_WIDTH_STEP_PX),
            DifficultyChannel::PlayerSpeed => (self.player_speed, PLAYER_SPEED_STEP),
        };
        (value / step).round() as u32
    }
}

/// Converts the pixel wall-spacing bonus into extra spawn time at the scroll speed.
pub fn spacing_bonus_ms(config: &DodgeConfig, bonuses: &UpgradeBonuses) -> f32 {
    if config.scroll_speed > 0.0 {
        bonuses.wall_spacing_bonus_px / config.scroll_speed * 1000.0
    } else {
        0.0
    }
}

pub fn effective_spawn_interval_ms(
    config: &DodgeConfig,
    bonuses: &UpgradeBonuses,
    penalties: &DifficultyPenalties,
) -> f32 {
    (config.spawn_interval_ms + spacing_bonus_ms(config, bonuses) - penalties.spawn_rate_ms)
        .max(MIN_SPAWN_INTERVAL_MS)
}

pub fn effective_gap_width(
    config: &DodgeConfig,
    bonuses: &UpgradeBonuses,
    penalties: &DifficultyPenalties,
) -> f32 {
    (config.gap_width + bonuses.gap_width_bonus - penalties.gap_width_px).max(MIN_GAP_WIDTH)
}

pub fn effective_player_speed(
    config: &DodgeConfig,
    bonuses: &UpgradeBonuses,
    penalties: &DifficultyPenalties,
) -> f32 {
    (config.player_speed + bonuses.move_speed_bonus - penalties.player_speed)
        .max(MIN_PLAYER_SPEED)
}

#[cfg(test)]
mod tests {
    use arcade_core::rng;

    use super::*;

    #[test]
    fn apply_raises_only_the_chosen_channel() {
        let mut p = DifficultyPenalties::default();
        p.apply(DifficultyChannel::GapWidth);
        assert_eq!(p.gap_width_px, GAP_WIDTH_STEP_PX);
        assert_eq!(p.spawn_rate_ms, 0.0);
        assert_eq!(p.player_speed, 0.0);
    }

    #[test]
    fn draw_eventually_hits_every_channel() {
        let mut rng = rng::seeded(3);
        let mut p = DifficultyPenalties::default();
        for _ in 0..200 {
            p.draw(&mut rng);
        }
        for channel in DifficultyChannel::ALL {
            assert!(p.steps(channel) > 0, "{channel:?} never drawn");
        }
    }

    #[test]
    fn spacing_bonus_converts_pixels_to_time() {
        let config = DodgeConfig {
            scroll_speed: 100.0,
            ..DodgeConfig::default()
        };
        let bonuses = UpgradeBonuses {
            wall_spacing_bonus_px: 50.0,
            ..UpgradeBonuses::default()
        };
        assert_eq!(spacing_bonus_ms(&config, &bonuses), 500.0);
        assert_eq!(
            effective_spawn_interval_ms(&config, &bonuses, &DifficultyPenalties::default()),
            config.spawn_interval_ms + 500.0
        );
    }

    #[test]
    fn effective_values_respect_floors() {
        let config = DodgeConfig::default();
        let bonuses = UpgradeBonuses::default();
        let maxed = DifficultyPenalties {
            spawn_rate_ms: 1.0e6,
            gap_width_px: 1.0e6,
            player_speed: 1.0e6,
        };
        assert_eq!(
            effective_spawn_interval_ms(&config, &bonuses, &maxed),
            MIN_SPAWN_INTERVAL_MS
        );
        assert_eq!(effective_gap_width(&config, &bonuses, &maxed), MIN_GAP_WIDTH);
        assert_eq!(
            effective_player_speed(&config, &bonuses, &maxed),
            MIN_PLAYER_SPEED
        );
    }

    #[test]
    fn bonuses_add_to_base_values() {
        let config = DodgeConfig::default();
        let bonuses = UpgradeBonuses {
            gap_width_bonus: 20.0,
            wall_spacing_bonus_px: 0.0,
            move_speed_bonus: 40.0,
        };
        let none = DifficultyPenalties::default();
        assert_eq!(effective_gap_width(&config, &bonuses, &none), 170.0);
        assert_eq!(effective_player_speed(&config, &bonuses, &none), 340.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ratchet_steps_sum_to_draw_count(seed in any::<u64>(), draws in 0usize..300) {
                let mut rng = rng::seeded(seed);
                let mut p = DifficultyPenalties::default();
                let mut previous = p;
                for _ in 0..draws {
                    p.draw(&mut rng);
                    prop_assert!(p.spawn_rate_ms >= previous.spawn_rate_ms);
                    prop_assert!(p.gap_width_px >= previous.gap_width_px);
                    prop_assert!(p.player_speed >= previous.player_speed);
                    previous = p;
                }
                let total: u32 = DifficultyChannel::ALL.iter().map(|c| p.steps(*c)).sum();
                prop_assert_eq!(total as usize, draws);
                prop_assert_eq!(p.spawn_rate_ms, p.steps(DifficultyChannel::SpawnRate) as f32 * SPAWN_RATE_STEP_MS);
                prop_assert_eq!(p.gap_width_px, p.steps(DifficultyChannel::GapWidth) as f32 * GAP_WIDTH_STEP_PX);
                prop_assert_eq!(p.player_speed, p.steps(DifficultyChannel::PlayerSpeed) as f32 * PLAYER_SPEED_STEP);
            }
        }
    }
}
