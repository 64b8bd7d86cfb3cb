use serde::{Deserialize, Serialize};

use crate::emitter::{EventBus, ListenerId};
use crate::events::{EventKind, FinalStats, GameEvent};
use crate::minigame::Minigame;
use crate::timer::{Countdown, CountdownTick};

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    Paused,
    Ended,
}

/// Slack for combos built from steps like 0.1 that binary floats cannot hold
/// exactly. `10 × (1.0 + 13 × 0.1)` must floor to 23.
const COMBO_EPSILON: f64 = 1e-9;

/// `floor(base_points × combo)`.
pub fn combo_points(base_points: u64, combo: f64) -> u64 {
    (base_points as f64 * combo + COMBO_EPSILON).floor() as u64
}

/// Bookkeeping shared by every minigame. Reset on each start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u64,
    /// Multiplier applied by [`SessionCore::add_score`]; never below 1.
    pub combo: f64,
    pub max_combo: f64,
    pub success_count: u32,
    pub fail_count: u32,
    /// 0 when untimed.
    pub time_limit_ms: f32,
    pub time_remaining_ms: f32,
    pub play_time_ms: f32,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            score: 0,
            combo: 1.0,
            max_combo: 1.0,
            success_count: 0,
            fail_count: 0,
            time_limit_ms: 0.0,
            time_remaining_ms: 0.0,
            play_time_ms: 0.0,
        }
    }
}

/// The part of a session a [`Minigame`] hook may touch: scoring, combo,
/// events, and ending the session.
#[derive(Default)]
pub struct SessionCore {
    phase: Phase,
    stats: SessionStats,
    countdown: Countdown,
    bus: EventBus,
    end_requested: bool,
}

impl SessionCore {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn final_stats(&self) -> FinalStats {
        FinalStats {
            score: self.stats.score,
            max_combo: self.stats.max_combo,
            duration_ms: self.stats.play_time_ms,
            success_count: self.stats.success_count,
            fail_count: self.stats.fail_count,
        }
    }

    /// Add `floor(base_points × combo)`. Returns the points added.
    pub fn add_score(&mut self, base_points: u64) -> u64 {
        let points = combo_points(base_points, self.stats.combo);
        self.add_points(points)
    }

    /// Add points without the combo multiplier.
    pub fn add_raw_score(&mut self, points: u64) -> u64 {
        self.add_points(points)
    }

    /// Overwrite the score with a counter readout. Emits nothing.
    pub fn set_score(&mut self, score: u64) {
        self.stats.score = score;
    }

    pub fn increment_combo(&mut self) {
        self.increment_combo_by(1.0);
    }

    pub fn increment_combo_by(&mut self, step: f64) {
        self.stats.combo += step;
        let is_new_max = self.stats.combo > self.stats.max_combo;
        if is_new_max {
            self.stats.max_combo = self.stats.combo;
        }
        self.stats.success_count += 1;
        self.emit(GameEvent::Combo {
            combo: self.stats.combo,
            is_new_max,
        });
    }

    /// Drop the combo back to 1 and count a failure. Only announces the reset
    /// when there was a combo to lose.
    pub fn reset_combo(&mut self) {
        let had_combo = self.stats.combo > 1.0;
        self.stats.combo = 1.0;
        self.stats.fail_count += 1;
        if had_combo {
            self.emit(GameEvent::ComboReset);
        }
    }

    pub fn emit(&self, event: GameEvent) {
        self.bus.emit(&event);
    }

    /// Ask the session to end once the current hook returns.
    pub fn request_end(&mut self) {
        self.end_requested = true;
    }

    fn add_points(&mut self, points: u64) -> u64 {
        self.stats.score += points;
        self.emit(GameEvent::Score {
            points_added: points,
            total_score: self.stats.score,
        });
        points
    }

    fn take_end_request(&mut self) -> bool {
        std::mem::take(&mut self.end_requested)
    }
}

/// One run of a minigame, from `start()` to `end()`.
///
/// Owns the phase machine, countdown and event bus; delegates domain logic
/// to the held [`Minigame`].
pub struct Session<G: Minigame> {
    core: SessionCore,
    game: G,
    destroyed: bool,
}

impl<G: Minigame> Session<G> {
    pub fn new(game: G) -> Self {
        Self {
            core: SessionCore::default(),
            game,
            destroyed: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.core.phase
    }

    pub fn is_playing(&self) -> bool {
        self.core.is_playing()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn stats(&self) -> &SessionStats {
        &self.core.stats
    }

    pub fn final_stats(&self) -> FinalStats {
        self.core.final_stats()
    }

    pub fn core(&self) -> &SessionCore {
        &self.core
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Begin a fresh run. Ignored (with a warning) while a run is in progress.
    pub fn start(&mut self) -> bool {
        if matches!(self.core.phase, Phase::Playing | Phase::Paused) {
            tracing::warn!(phase = ?self.core.phase, "start() ignored: session already in progress");
            return false;
        }

        let limit = self.game.time_limit_ms();
        self.core.countdown = Countdown::new(limit);
        self.core.stats = SessionStats {
            time_limit_ms: self.core.countdown.limit_ms(),
            time_remaining_ms: self.core.countdown.remaining_ms(),
            ..SessionStats::default()
        };
        self.core.end_requested = false;
        self.core.phase = Phase::Playing;

        self.game.on_start(&mut self.core);
        tracing::info!(game = %self.game.metadata().name, time_limit_ms = limit, "session started");
        self.core.emit(GameEvent::Start);
        true
    }

    /// Finish the run and hand out the final stats. `None` if no run was in progress.
    pub fn end(&mut self) -> Option<FinalStats> {
        if !matches!(self.core.phase, Phase::Playing | Phase::Paused) {
            return None;
        }
        self.core.phase = Phase::Ended;
        self.core.end_requested = false;
        self.game.on_end(&mut self.core);

        let stats = self.core.final_stats();
        tracing::info!(
            game = %self.game.metadata().name,
            score = stats.score,
            duration_ms = stats.duration_ms,
            "session ended"
        );
        self.core.emit(GameEvent::End(stats));
        Some(stats)
    }

    pub fn pause(&mut self) -> bool {
        if self.core.phase != Phase::Playing {
            tracing::warn!(phase = ?self.core.phase, "pause() ignored: not playing");
            return false;
        }
        self.core.phase = Phase::Paused;
        self.core.emit(GameEvent::Pause);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.core.phase != Phase::Paused {
            tracing::warn!(phase = ?self.core.phase, "resume() ignored: not paused");
            return false;
        }
        self.core.phase = Phase::Playing;
        self.core.emit(GameEvent::Resume);
        true
    }

    /// Advance one frame. Does nothing outside `Playing`.
    pub fn update(&mut self, delta_ms: f32) {
        if self.core.phase != Phase::Playing {
            return;
        }
        self.core.stats.play_time_ms += delta_ms;

        let tick = self.core.countdown.tick(delta_ms);
        self.core.stats.time_remaining_ms = self.core.countdown.remaining_ms();
        match tick {
            CountdownTick::Expired => {
                self.core.emit(GameEvent::TimeUp);
                self.end();
                return;
            },
            CountdownTick::Warning => {
                self.core.emit(GameEvent::TimeWarning {
                    remaining_ms: self.core.stats.time_remaining_ms,
                });
            },
            CountdownTick::Running => {},
        }

        self.game.on_update(&mut self.core, delta_ms);
        if self.core.take_end_request() {
            self.end();
        }
    }

    /// Route input to the game. The game decides whether input is judged
    /// outside `Playing`.
    pub fn handle_input(&mut self, input: G::Input) -> G::Outcome {
        let outcome = self.game.on_input(&mut self.core, input);
        if self.core.take_end_request() {
            self.end();
        }
        outcome
    }

    /// End any run in progress and drop every listener. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.end();
        self.core.bus.clear();
        self.destroyed = true;
    }

    pub fn on(&mut self, kind: EventKind, listener: impl Fn(&GameEvent) + 'static) -> ListenerId {
        self.core.bus.on(kind, listener)
    }

    pub fn on_any(&mut self, listener: impl Fn(&GameEvent) + 'static) -> ListenerId {
        self.core.bus.on_any(listener)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.core.bus.off(id)
    }

    pub fn clear_listeners(&mut self) {
        self.core.bus.clear();
    }
}
