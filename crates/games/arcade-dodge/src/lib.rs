pub mod bot;
pub mod collision;
pub mod config;
pub mod difficulty;
pub mod scoring;
pub mod spawner;

use serde::{Deserialize, Serialize};

use arcade_core::events::GameEvent;
use arcade_core::minigame::{Minigame, MinigameMetadata};
use arcade_core::rng::{self, GameRng};
use arcade_core::session::{Phase, Session, SessionCore};

use collision::Aabb;
use config::{DodgeConfig, UpgradeBonuses};
use difficulty::DifficultyPenalties;
use spawner::SpawnTimer;

/// Walls further than this below the canvas are dropped (px).
const DESPAWN_MARGIN: f32 = 100.0;

/// A full-width wall with a single gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u64,
    /// Top edge.
    pub y: f32,
    /// Width of the block left of the gap; also the gap's left edge.
    pub left_width: f32,
    /// Width of the block right of the gap.
    pub right_width: f32,
    pub height: f32,
    /// Latched once the wall's bottom edge has scrolled past the canvas.
    pub passed: bool,
}

impl Obstacle {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn gap_start(&self) -> f32 {
        self.left_width
    }

    pub fn gap_end(&self, canvas_width: f32) -> f32 {
        canvas_width - self.right_width
    }

    pub fn gap_width(&self, canvas_width: f32) -> f32 {
        self.gap_end(canvas_width) - self.gap_start()
    }

    pub fn gap_center(&self, canvas_width: f32) -> f32 {
        (self.gap_start() + self.gap_end(canvas_width)) / 2.0
    }
}

/// Held movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteerInput {
    pub left: bool,
    pub right: bool,
}

impl SteerInput {
    pub const NONE: SteerInput = SteerInput {
        left: false,
        right: false,
    };
    pub const LEFT: SteerInput = SteerInput {
        left: true,
        right: false,
    };
    pub const RIGHT: SteerInput = SteerInput {
        left: false,
        right: true,
    };

    /// -1, 0 or 1.
    pub fn direction(self) -> f32 {
        f32::from(u8::from(self.right)) - f32::from(u8::from(self.left))
    }
}

/// Mutable per-run simulation state.
#[derive(Debug, Clone, Default)]
struct DodgeState {
    player_x: f32,
    obstacles: Vec<Obstacle>,
    distance: f32,
    walls_passed: u32,
    penalties: DifficultyPenalties,
    spawn_timer: SpawnTimer,
}

/// Read-only view handed to the renderer each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DodgeSnapshot {
    pub phase: Phase,
    pub player_x: f32,
    pub player_y: f32,
    pub player_size: f32,
    pub obstacles: Vec<Obstacle>,
    pub score: u64,
    pub distance: f32,
    pub walls_passed: u32,
    pub penalties: DifficultyPenalties,
}

/// The wall-dodge endless runner.
pub struct DodgeGame {
    state: DodgeState,
    input: SteerInput,
    config: DodgeConfig,
    bonuses: UpgradeBonuses,
    rng: GameRng,
    /// Never reset, so ids stay unique across runs.
    next_obstacle_id: u64,
}

impl DodgeGame {
    pub fn new() -> Self {
        Self::with_config(DodgeConfig::load(), UpgradeBonuses::default())
    }

    pub fn with_config(config: DodgeConfig, bonuses: UpgradeBonuses) -> Self {
        Self::with_rng(config, bonuses, rng::ambient())
    }

    /// Reproducible walls and difficulty draws.
    pub fn with_seed(config: DodgeConfig, bonuses: UpgradeBonuses, seed: u64) -> Self {
        Self::with_rng(config, bonuses, rng::seeded(seed))
    }

    fn with_rng(config: DodgeConfig, bonuses: UpgradeBonuses, rng: GameRng) -> Self {
        Self {
            state: DodgeState {
                player_x: config.canvas_width / 2.0,
                ..DodgeState::default()
            },
            input: SteerInput::NONE,
            config,
            bonuses,
            rng,
            next_obstacle_id: 0,
        }
    }

    pub fn config(&self) -> &DodgeConfig {
        &self.config
    }

    pub fn bonuses(&self) -> &UpgradeBonuses {
        &self.bonuses
    }

    pub fn player_x(&self) -> f32 {
        self.state.player_x
    }

    pub fn player_y(&self) -> f32 {
        self.config.player_y()
    }

    pub fn player_box(&self) -> Aabb {
        Aabb::centered(self.state.player_x, self.player_y(), self.config.player_size)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.state.obstacles
    }

    pub fn walls_passed(&self) -> u32 {
        self.state.walls_passed
    }

    pub fn distance(&self) -> f32 {
        self.state.distance
    }

    pub fn penalties(&self) -> &DifficultyPenalties {
        &self.state.penalties
    }

    pub fn input(&self) -> SteerInput {
        self.input
    }

    pub fn player_speed(&self) -> f32 {
        difficulty::effective_player_speed(&self.config, &self.bonuses, &self.state.penalties)
    }

    pub fn spawn_interval_ms(&self) -> f32 {
        difficulty::effective_spawn_interval_ms(&self.config, &self.bonuses, &self.state.penalties)
    }

    pub fn gap_width(&self) -> f32 {
        difficulty::effective_gap_width(&self.config, &self.bonuses, &self.state.penalties)
    }

    pub fn calculate_money_reward(&self) -> u64 {
        scoring::calculate_money_reward(self.state.walls_passed, &self.config)
    }

    fn move_player(&mut self, delta_sec: f32) {
        let half = self.config.player_size / 2.0;
        let max_x = (self.config.canvas_width - half).max(half);
        let step = self.input.direction() * self.player_speed() * delta_sec;
        self.state.player_x = (self.state.player_x + step).clamp(half, max_x);
    }

    fn advance_obstacles(&mut self, core: &mut SessionCore, delta_sec: f32) {
        let dy = self.config.scroll_speed * delta_sec;
        let canvas_height = self.config.canvas_height;

        for obstacle in &mut self.state.obstacles {
            obstacle.y += dy;
            if !obstacle.passed && obstacle.bottom() > canvas_height {
                obstacle.passed = true;
                self.state.walls_passed += 1;
                let channel = self.state.penalties.draw(&mut self.rng);
                tracing::debug!(
                    id = obstacle.id,
                    walls_passed = self.state.walls_passed,
                    ?channel,
                    "wall passed"
                );
                core.emit(GameEvent::ObstaclePassed {
                    id: obstacle.id,
                    walls_passed: self.state.walls_passed,
                    channel,
                });
            }
        }

        self.state
            .obstacles
            .retain(|o| o.y <= canvas_height + DESPAWN_MARGIN);
    }

    fn spawn_obstacle(&mut self, core: &mut SessionCore) {
        let gap_width = self.gap_width();
        let (left_width, right_width) =
            spawner::roll_gap(&mut self.rng, self.config.canvas_width, gap_width);
        self.next_obstacle_id += 1;
        let obstacle = Obstacle {
            id: self.next_obstacle_id,
            y: -self.config.obstacle_height,
            left_width,
            right_width,
            height: self.config.obstacle_height,
            passed: false,
        };
        tracing::debug!(id = obstacle.id, gap_start = left_width, gap_width, "wall spawned");
        core.emit(GameEvent::ObstacleSpawned {
            id: obstacle.id,
            gap_start: left_width,
            gap_width,
        });
        self.state.obstacles.push(obstacle);
    }
}

impl Default for DodgeGame {
    fn default() -> Self {
        Self::with_config(DodgeConfig::default(), UpgradeBonuses::default())
    }
}

impl Minigame for DodgeGame {
    type Input = SteerInput;
    type Outcome = ();

    fn metadata(&self) -> MinigameMetadata {
        MinigameMetadata {
            name: "Wall Dodge".to_string(),
            description: "Slip through the gaps as the walls close in.".to_string(),
        }
    }

    fn on_start(&mut self, _core: &mut SessionCore) {
        self.state = DodgeState {
            player_x: self.config.canvas_width / 2.0,
            ..DodgeState::default()
        };
        self.input = SteerInput::NONE;
    }

    fn on_update(&mut self, core: &mut SessionCore, delta_ms: f32) {
        let delta_sec = delta_ms / 1000.0;

        self.move_player(delta_sec);

        self.advance_obstacles(core, delta_sec);
        let interval = self.spawn_interval_ms();
        if self
            .state
            .spawn_timer
            .tick(delta_ms, self.config.initial_spawn_delay_ms, interval)
        {
            self.spawn_obstacle(core);
        }

        self.state.distance += self.config.scroll_speed * delta_sec;
        core.set_score(u64::from(self.state.walls_passed));

        let player = self.player_box();
        if let Some(hit) =
            collision::first_hit(&player, &self.state.obstacles, self.config.canvas_width)
        {
            tracing::debug!(id = hit.id, "player hit wall");
            core.emit(GameEvent::Collision {
                obstacle_id: hit.id,
            });
            core.request_end();
        }
    }

    fn on_input(&mut self, _core: &mut SessionCore, input: SteerInput) {
        self.input = input;
    }
}

/// Runner-specific operations on a dodge session.
pub trait DodgeSession {
    /// Replace the held movement keys; takes effect on the next update.
    fn set_input(&mut self, left: bool, right: bool);

    /// Snapshot for rendering.
    fn state(&self) -> DodgeSnapshot;

    fn calculate_money_reward(&self) -> u64;
}

impl DodgeSession for Session<DodgeGame> {
    fn set_input(&mut self, left: bool, right: bool) {
        self.handle_input(SteerInput { left, right });
    }

    fn state(&self) -> DodgeSnapshot {
        let game = self.game();
        DodgeSnapshot {
            phase: self.phase(),
            player_x: game.player_x(),
            player_y: game.player_y(),
            player_size: game.config.player_size,
            obstacles: game.state.obstacles.clone(),
            score: self.stats().score,
            distance: game.state.distance,
            walls_passed: game.state.walls_passed,
            penalties: game.state.penalties,
        }
    }

    fn calculate_money_reward(&self) -> u64 {
        self.game().calculate_money_reward()
    }
}
