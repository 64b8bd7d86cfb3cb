use std::collections::HashMap;

use arcade_core::autoplay::AutoPlayer;
use arcade_core::rng::{self, GameRng};
use arcade_core::session::Session;
use arcade_core::skill::SkillLevel;
use rand::Rng;

use crate::{DodgeGame, Obstacle, SteerInput};

/// Steering parameters for one skill level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringLevel {
    /// How far above the player a wall must be before the bot reacts (px).
    pub reaction_distance: f32,
    /// 1.0 aims at the gap centre; lower values allow a wider per-wall miss.
    pub targeting_accuracy: f32,
    /// Peak jitter added to the aim point (px).
    pub jitter_amplitude: f32,
    /// How often the jitter is re-rolled (ms).
    pub jitter_interval_ms: f32,
}

pub const STEERING_LEVELS: [SteeringLevel; SkillLevel::COUNT] = [
    SteeringLevel {
        reaction_distance: 180.0,
        targeting_accuracy: 0.20,
        jitter_amplitude: 30.0,
        jitter_interval_ms: 300.0,
    },
    SteeringLevel {
        reaction_distance: 260.0,
        targeting_accuracy: 0.45,
        jitter_amplitude: 20.0,
        jitter_interval_ms: 400.0,
    },
    SteeringLevel {
        reaction_distance: 340.0,
        targeting_accuracy: 0.65,
        jitter_amplitude: 12.0,
        jitter_interval_ms: 500.0,
    },
    SteeringLevel {
        reaction_distance: 440.0,
        targeting_accuracy: 0.85,
        jitter_amplitude: 6.0,
        jitter_interval_ms: 700.0,
    },
    SteeringLevel {
        reaction_distance: 600.0,
        targeting_accuracy: 1.0,
        jitter_amplitude: 0.0,
        jitter_interval_ms: 0.0,
    },
];

/// No input is issued while the aim point is this close (px).
pub const DEAD_ZONE_PX: f32 = 4.0;

/// Exponential pull of the idle aim point toward the canvas centre (1/s).
const IDLE_RETURN_RATE: f32 = 3.0;

/// Periodically re-rolled aim wobble.
#[derive(Debug, Clone, Default)]
pub struct Jitter {
    current_offset: f32,
    time_since_last_roll: f32,
    rolled: bool,
}

impl Jitter {
    pub fn current_offset(&self) -> f32 {
        self.current_offset
    }

    pub fn tick(&mut self, rng: &mut impl Rng, params: &SteeringLevel, delta_ms: f32) -> f32 {
        if params.jitter_amplitude <= 0.0 {
            self.current_offset = 0.0;
            return 0.0;
        }
        self.time_since_last_roll += delta_ms;
        if !self.rolled || self.time_since_last_roll >= params.jitter_interval_ms {
            self.rolled = true;
            self.time_since_last_roll = 0.0;
            self.current_offset = rng::symmetric(rng, params.jitter_amplitude);
        }
        self.current_offset
    }
}

/// Auto-play for the wall-dodge game: steers toward the next gap with
/// level-dependent reaction range, aim error and jitter.
pub struct SteeringBot {
    level: SkillLevel,
    params: SteeringLevel,
    /// Aim error per wall id, rolled once per wall.
    aim_offsets: HashMap<u64, f32>,
    jitter: Jitter,
    /// Aim point before jitter; drifts to centre when nothing is in range.
    base_aim_x: Option<f32>,
    last_target_x: Option<f32>,
    rng: GameRng,
    destroyed: bool,
}

impl SteeringBot {
    pub fn new(level: impl Into<SkillLevel>) -> Self {
        Self::with_rng(level.into(), rng::ambient())
    }

    pub fn with_seed(level: impl Into<SkillLevel>, seed: u64) -> Self {
        Self::with_rng(level.into(), rng::seeded(seed))
    }

    fn with_rng(level: SkillLevel, rng: GameRng) -> Self {
        Self {
            level,
            params: STEERING_LEVELS[level.index()],
            aim_offsets: HashMap::new(),
            jitter: Jitter::default(),
            base_aim_x: None,
            last_target_x: None,
            rng,
            destroyed: false,
        }
    }

    pub fn params(&self) -> &SteeringLevel {
        &self.params
    }

    /// Cached aim error for a wall, if one has been rolled.
    pub fn cached_offset(&self, obstacle_id: u64) -> Option<f32> {
        self.aim_offsets.get(&obstacle_id).copied()
    }

    pub fn cache_len(&self) -> usize {
        self.aim_offsets.len()
    }

    /// Aim point (after jitter) used on the last update.
    pub fn last_target_x(&self) -> Option<f32> {
        self.last_target_x
    }

    /// Aim error for a wall: rolled on first sight, then reused.
    fn aim_offset(&mut self, obstacle: &Obstacle, canvas_width: f32) -> f32 {
        let accuracy = self.params.targeting_accuracy.clamp(0.0, 1.0);
        let max_offset = obstacle.gap_width(canvas_width) / 2.0 * (1.0 - accuracy);
        let source = &mut self.rng;
        *self
            .aim_offsets
            .entry(obstacle.id)
            .or_insert_with(|| rng::symmetric(source, max_offset))
    }
}

/// Nearest wall the player has not yet cleared, provided its bottom edge is
/// within `reaction_distance` of the player's top edge. A wall level with the
/// player counts as distance 0.
///
/// A wall stays a threat until its top edge drops below the player's bottom
/// edge, not merely until its bottom edge passes the player's top. Dropping it
/// earlier would let the bot steer out of a gap it is still standing in.
pub fn nearest_threat(
    obstacles: &[Obstacle],
    player_top: f32,
    player_bottom: f32,
    reaction_distance: f32,
) -> Option<&Obstacle> {
    obstacles
        .iter()
        .filter(|o| o.y < player_bottom)
        .filter_map(|o| {
            let distance = (player_top - o.bottom()).max(0.0);
            (distance <= reaction_distance).then_some((distance, o))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(b.1.bottom().total_cmp(&a.1.bottom())))
        .map(|(_, o)| o)
}

/// Keys to hold to move from `player_x` toward `target_x`.
pub fn steer_toward(player_x: f32, target_x: f32) -> SteerInput {
    let diff = target_x - player_x;
    if diff > DEAD_ZONE_PX {
        SteerInput::RIGHT
    } else if diff < -DEAD_ZONE_PX {
        SteerInput::LEFT
    } else {
        SteerInput::NONE
    }
}

impl AutoPlayer for SteeringBot {
    type Game = DodgeGame;

    fn level(&self) -> SkillLevel {
        self.level
    }

    fn update(&mut self, session: &mut Session<DodgeGame>, delta_ms: f32) {
        if self.destroyed || !session.is_playing() {
            return;
        }

        let game = session.game();
        let canvas_width = game.config().canvas_width;
        let half = game.config().player_size / 2.0;
        let player_x = game.player_x();
        let player_top = game.player_y() - half;
        let player_bottom = game.player_y() + half;

        let live = game.obstacles();
        self.aim_offsets
            .retain(|id, _| live.iter().any(|o| o.id == *id));

        let center = canvas_width / 2.0;
        let base = match nearest_threat(
            live,
            player_top,
            player_bottom,
            self.params.reaction_distance,
        ) {
            Some(threat) => threat.gap_center(canvas_width) + self.aim_offset(threat, canvas_width),
            None => {
                let from = self.base_aim_x.unwrap_or(player_x);
                let pull = 1.0 - (-IDLE_RETURN_RATE * delta_ms / 1000.0).exp();
                from + (center - from) * pull
            },
        };
        self.base_aim_x = Some(base);

        let jitter = self.jitter.tick(&mut self.rng, &self.params, delta_ms);
        let max_x = (canvas_width - half).max(half);
        let target = (base + jitter).clamp(half, max_x);
        self.last_target_x = Some(target);

        let input = steer_toward(player_x, target);
        session.handle_input(input);
    }

    fn destroy(&mut self) {
        self.aim_offsets.clear();
        self.base_aim_x = None;
        self.last_target_x = None;
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use arcade_core::autoplay::drive_frame;
    use arcade_core::session::Phase;

    use super::*;
    use crate::config::{DodgeConfig, UpgradeBonuses};
    use crate::DodgeSession;

    fn quiet_session() -> Session<DodgeGame> {
        let config = DodgeConfig {
            initial_spawn_delay_ms: 1.0e9,
            ..DodgeConfig::default()
        };
        Session::new(DodgeGame::with_seed(config, UpgradeBonuses::default(), 5))
    }

    fn wall(id: u64, gap_start: f32, y: f32) -> Obstacle {
        Obstacle {
            id,
            y,
            left_width: gap_start,
            right_width: 800.0 - (gap_start + 150.0),
            height: 30.0,
            passed: false,
        }
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(SteeringBot::with_seed(0u8, 1).level().get(), 1);
        assert_eq!(SteeringBot::with_seed(42u8, 1).level().get(), 5);
    }

    #[test]
    fn table_scales_with_level() {
        for pair in STEERING_LEVELS.windows(2) {
            assert!(pair[1].reaction_distance > pair[0].reaction_distance);
            assert!(pair[1].targeting_accuracy > pair[0].targeting_accuracy);
            assert!(pair[1].jitter_amplitude < pair[0].jitter_amplitude);
        }
        assert_eq!(STEERING_LEVELS[SkillLevel::COUNT - 1].jitter_amplitude, 0.0);
    }

    #[test]
    fn idle_session_gets_no_input() {
        let mut s = quiet_session();
        let mut bot = SteeringBot::with_seed(3u8, 1);
        bot.update(&mut s, 16.0);
        assert_eq!(s.game().input(), SteerInput::NONE);
        assert!(bot.last_target_x().is_none());
    }

    #[test]
    fn destroyed_bot_is_inert() {
        let mut s = quiet_session();
        s.start();
        s.game_mut().state.obstacles.push(wall(1, 40.0, 300.0));
        let mut bot = SteeringBot::with_seed(5u8, 1);
        bot.destroy();
        bot.destroy();
        bot.update(&mut s, 16.0);
        assert!(bot.is_destroyed());
        assert_eq!(s.game().input(), SteerInput::NONE);
    }

    #[test]
    fn nearest_threat_ignores_walls_outside_window() {
        let obstacles = vec![wall(1, 40.0, 100.0), wall(2, 400.0, 300.0), wall(3, 200.0, 600.0)];
        // Player spans 505..535: wall 2 bottom at 330 is 175 px away, wall 3
        // is already below the player.
        let hit = nearest_threat(&obstacles, 505.0, 535.0, 200.0);
        assert_eq!(hit.map(|o| o.id), Some(2));
        assert!(nearest_threat(&obstacles, 505.0, 535.0, 100.0).is_none());
    }

    #[test]
    fn wall_level_with_player_stays_the_threat() {
        // Wall 1 overlaps the player's rows; wall 2 is approaching.
        let obstacles = vec![wall(1, 325.0, 500.0), wall(2, 40.0, 250.0)];
        let hit = nearest_threat(&obstacles, 505.0, 535.0, 600.0);
        assert_eq!(hit.map(|o| o.id), Some(1));
    }

    #[test]
    fn steers_toward_gap_at_top_level() {
        let mut s = quiet_session();
        s.start();
        // Gap centred on x = 115.
        s.game_mut().state.obstacles.push(wall(1, 40.0, 300.0));
        let mut bot = SteeringBot::with_seed(5u8, 1);
        bot.update(&mut s, 16.0);
        assert_eq!(s.game().input(), SteerInput::LEFT);
        assert_eq!(bot.last_target_x(), Some(115.0));
        assert_eq!(bot.cached_offset(1), Some(0.0));
    }

    #[test]
    fn dead_zone_suppresses_input() {
        assert_eq!(steer_toward(400.0, 403.0), SteerInput::NONE);
        assert_eq!(steer_toward(400.0, 397.0), SteerInput::NONE);
        assert_eq!(steer_toward(400.0, 410.0), SteerInput::RIGHT);
        assert_eq!(steer_toward(400.0, 390.0), SteerInput::LEFT);
    }

    #[test]
    fn low_level_bot_is_blind_to_distant_walls() {
        let mut s = quiet_session();
        s.start();
        // Bottom at 130: 375 px above the player, beyond level 1's reach.
        s.game_mut().state.obstacles.push(wall(1, 40.0, 100.0));
        let mut bot = SteeringBot::with_seed(1u8, 9);
        bot.update(&mut s, 16.0);
        assert!(bot.cached_offset(1).is_none());
        let target = bot.last_target_x().unwrap();
        assert!((target - 400.0).abs() <= STEERING_LEVELS[0].jitter_amplitude);
    }

    #[test]
    fn aim_offset_is_stable_per_obstacle() {
        let mut s = quiet_session();
        s.start();
        s.game_mut().state.obstacles.push(wall(7, 300.0, 400.0));
        let mut bot = SteeringBot::with_seed(1u8, 77);
        bot.update(&mut s, 16.0);
        let first = bot.cached_offset(7).unwrap();
        for _ in 0..20 {
            bot.update(&mut s, 16.0);
            assert_eq!(bot.cached_offset(7), Some(first));
        }
        let max = 75.0 * (1.0 - STEERING_LEVELS[0].targeting_accuracy);
        assert!(first.abs() <= max);
    }

    #[test]
    fn cache_is_pruned_to_live_obstacles() {
        let mut s = quiet_session();
        s.start();
        let mut bot = SteeringBot::with_seed(5u8, 2);
        for (id, y) in [(1, 440.0), (2, 420.0), (3, 400.0)] {
            s.game_mut().state.obstacles.clear();
            s.game_mut().state.obstacles.push(wall(id, 325.0, y));
            bot.update(&mut s, 16.0);
            assert_eq!(bot.cache_len(), 1);
            assert!(bot.cached_offset(id).is_some());
        }
        s.game_mut().state.obstacles.clear();
        bot.update(&mut s, 16.0);
        assert_eq!(bot.cache_len(), 0);
    }

    #[test]
    fn idle_aim_drifts_to_centre() {
        let mut s = quiet_session();
        s.start();
        let mut bot = SteeringBot::with_seed(5u8, 2);
        bot.base_aim_x = Some(100.0);
        for _ in 0..300 {
            bot.update(&mut s, 16.0);
        }
        let target = bot.last_target_x().unwrap();
        assert!((target - 400.0).abs() < 1.0, "target {target} should settle at centre");
    }

    #[test]
    fn jitter_rerolls_on_interval_only() {
        let params = STEERING_LEVELS[0];
        let mut rng = rng::seeded(4);
        let mut jitter = Jitter::default();
        jitter.tick(&mut rng, &params, params.jitter_interval_ms);
        let rolled = jitter.current_offset();
        assert!(rolled.abs() <= params.jitter_amplitude);
        jitter.tick(&mut rng, &params, params.jitter_interval_ms / 2.0);
        assert_eq!(jitter.current_offset(), rolled);
    }

    #[test]
    fn jitter_rolls_on_first_tick() {
        let params = STEERING_LEVELS[0];
        let mut rng = rng::seeded(9);
        let mut jitter = Jitter::default();
        let first = jitter.tick(&mut rng, &params, 1.0);
        assert_ne!(first, 0.0);
        assert!(first.abs() <= params.jitter_amplitude);
        assert_eq!(jitter.tick(&mut rng, &params, 1.0), first);
    }

    #[test]
    fn jitter_is_zero_at_top_level() {
        let params = STEERING_LEVELS[SkillLevel::COUNT - 1];
        let mut rng = rng::seeded(4);
        let mut jitter = Jitter::default();
        for _ in 0..50 {
            assert_eq!(jitter.tick(&mut rng, &params, 100.0), 0.0);
        }
    }

    #[test]
    fn top_level_bot_clears_first_wall() {
        let mut s = Session::new(DodgeGame::with_seed(
            DodgeConfig::default(),
            UpgradeBonuses::default(),
            2024,
        ));
        let mut bot = SteeringBot::with_seed(5u8, 2024);
        s.start();
        for _ in 0..325 {
            drive_frame(&mut bot, &mut s, 16.0);
        }
        assert_eq!(s.phase(), Phase::Playing);
        assert!(s.state().walls_passed >= 1);
        assert!(bot.cache_len() <= s.game().obstacles().len());
    }
}
