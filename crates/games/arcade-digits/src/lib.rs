pub mod bot;
pub mod config;
pub mod scoring;
pub mod sequence;

use serde::{Deserialize, Serialize};

use arcade_core::events::GameEvent;
use arcade_core::minigame::{Minigame, MinigameMetadata};
use arcade_core::rng::{self, GameRng};
use arcade_core::session::{Phase, Session, SessionCore};

use config::DigitsConfig;

/// Mutable per-run state.
#[derive(Debug, Clone, Default)]
struct DigitsState {
    target: Vec<char>,
    position: usize,
    preview_remaining_ms: f32,
    sequences_completed: u32,
}

/// Read-only view handed to the renderer each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitsSnapshot {
    pub phase: Phase,
    pub target: Vec<char>,
    pub position: usize,
    pub previewing: bool,
    pub preview_remaining_ms: f32,
    pub sequences_completed: u32,
    pub score: u64,
    pub time_remaining_ms: f32,
}

/// Memorise a sequence while it is shown, then type it back.
pub struct DigitsGame {
    state: DigitsState,
    config: DigitsConfig,
    charset: Vec<char>,
    rng: GameRng,
}

impl DigitsGame {
    pub fn new() -> Self {
        Self::with_config(DigitsConfig::load())
    }

    pub fn with_config(config: DigitsConfig) -> Self {
        Self::with_rng(config, rng::ambient())
    }

    /// Reproducible sequences.
    pub fn with_seed(config: DigitsConfig, seed: u64) -> Self {
        Self::with_rng(config, rng::seeded(seed))
    }

    fn with_rng(config: DigitsConfig, rng: GameRng) -> Self {
        let mut charset = sequence::parse_charset(&config.charset);
        if charset.is_empty() {
            tracing::warn!(charset = %config.charset, "Empty charset, falling back to digits");
            charset = sequence::parse_charset(&DigitsConfig::default().charset);
        }
        Self {
            state: DigitsState::default(),
            config,
            charset,
            rng,
        }
    }

    pub fn config(&self) -> &DigitsConfig {
        &self.config
    }

    pub fn charset(&self) -> &[char] {
        &self.charset
    }

    pub fn target(&self) -> &[char] {
        &self.state.target
    }

    /// Index of the next character to type.
    pub fn position(&self) -> usize {
        self.state.position
    }

    /// The character the player must type next, if any.
    pub fn current_char(&self) -> Option<char> {
        self.state.target.get(self.state.position).copied()
    }

    pub fn is_previewing(&self) -> bool {
        self.state.preview_remaining_ms > 0.0
    }

    pub fn preview_remaining_ms(&self) -> f32 {
        self.state.preview_remaining_ms
    }

    pub fn sequences_completed(&self) -> u32 {
        self.state.sequences_completed
    }

    fn begin_sequence(&mut self, len: usize) {
        self.state.target = sequence::generate(&mut self.rng, &self.charset, len);
        self.state.position = 0;
        self.state.preview_remaining_ms = sequence::preview_duration_ms(&self.config, len);
        tracing::debug!(
            len,
            preview_ms = self.state.preview_remaining_ms,
            "sequence shown"
        );
    }

    fn complete_sequence(&mut self, core: &mut SessionCore) {
        let length = self.state.target.len();
        let bonus = length as u64 * self.config.sequence_bonus_per_char;
        self.state.sequences_completed += 1;
        core.add_raw_score(bonus);
        core.emit(GameEvent::SequenceComplete { length, bonus });
        let next = sequence::next_length(&self.config, length);
        self.begin_sequence(next);
    }
}

impl Default for DigitsGame {
    fn default() -> Self {
        Self::with_config(DigitsConfig::default())
    }
}

impl Minigame for DigitsGame {
    type Input = char;
    /// `None` when the key was not judged, otherwise whether it was correct.
    type Outcome = Option<bool>;

    fn metadata(&self) -> MinigameMetadata {
        MinigameMetadata {
            name: "Digit Recall".to_string(),
            description: "Memorise the sequence, then type it back.".to_string(),
        }
    }

    fn time_limit_ms(&self) -> f32 {
        self.config.time_limit_ms
    }

    fn on_start(&mut self, _core: &mut SessionCore) {
        self.state = DigitsState::default();
        let len = sequence::first_length(&self.config);
        self.begin_sequence(len);
    }

    fn on_update(&mut self, _core: &mut SessionCore, delta_ms: f32) {
        if self.state.preview_remaining_ms > 0.0 {
            self.state.preview_remaining_ms = (self.state.preview_remaining_ms - delta_ms).max(0.0);
        }
    }

    fn on_input(&mut self, core: &mut SessionCore, got: char) -> Option<bool> {
        if !core.is_playing() || self.is_previewing() || !self.charset.contains(&got) {
            return None;
        }
        let expected = self.current_char()?;

        if got != expected {
            core.reset_combo();
            core.emit(GameEvent::CharWrong { expected, got });
            return Some(false);
        }

        let position = self.state.position;
        self.state.position += 1;
        core.add_score(self.config.points_per_char);
        core.increment_combo_by(self.config.combo_step);
        core.emit(GameEvent::CharCorrect { ch: got, position });

        if self.state.position >= self.state.target.len() {
            self.complete_sequence(core);
        }
        Some(true)
    }
}

/// Typing-specific operations on a digits session.
pub trait DigitsSession {
    /// Judge one typed key. Anything other than a single character is ignored.
    fn handle_char_input(&mut self, key: &str) -> Option<bool>;

    fn handle_digit_input(&mut self, digit: u8) -> Option<bool>;

    fn state(&self) -> DigitsSnapshot;

    fn calculate_money_reward(&self) -> u64;
}

impl DigitsSession for Session<DigitsGame> {
    fn handle_char_input(&mut self, key: &str) -> Option<bool> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.handle_input(c),
            _ => None,
        }
    }

    fn handle_digit_input(&mut self, digit: u8) -> Option<bool> {
        let c = char::from_digit(u32::from(digit), 10)?;
        self.handle_input(c)
    }

    fn state(&self) -> DigitsSnapshot {
        let game = self.game();
        DigitsSnapshot {
            phase: self.phase(),
            target: game.state.target.clone(),
            position: game.state.position,
            previewing: game.is_previewing(),
            preview_remaining_ms: game.state.preview_remaining_ms,
            sequences_completed: game.state.sequences_completed,
            score: self.stats().score,
            time_remaining_ms: self.stats().time_remaining_ms,
        }
    }

    fn calculate_money_reward(&self) -> u64 {
        scoring::calculate_money_reward(self.stats().score, self.game().config())
    }
}
