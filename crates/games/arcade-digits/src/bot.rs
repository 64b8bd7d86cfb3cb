use arcade_core::autoplay::AutoPlayer;
use arcade_core::rng::{self, GameRng};
use arcade_core::session::Session;
use arcade_core::skill::SkillLevel;
use rand::Rng;

use crate::DigitsGame;

/// Typing parameters for one skill level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypingLevel {
    pub delay_min_ms: f32,
    pub delay_max_ms: f32,
    /// Probability that a press is deliberately wrong.
    pub error_rate: f64,
}

pub const TYPING_LEVELS: [TypingLevel; SkillLevel::COUNT] = [
    TypingLevel {
        delay_min_ms: 900.0,
        delay_max_ms: 1400.0,
        error_rate: 0.20,
    },
    TypingLevel {
        delay_min_ms: 650.0,
        delay_max_ms: 1000.0,
        error_rate: 0.12,
    },
    TypingLevel {
        delay_min_ms: 450.0,
        delay_max_ms: 750.0,
        error_rate: 0.07,
    },
    TypingLevel {
        delay_min_ms: 300.0,
        delay_max_ms: 500.0,
        error_rate: 0.03,
    },
    TypingLevel {
        delay_min_ms: 180.0,
        delay_max_ms: 300.0,
        error_rate: 0.01,
    },
];

/// Random draws spent looking for a wrong key before falling back.
const WRONG_KEY_ATTEMPTS: usize = 8;

/// A key from `charset` other than `correct`.
///
/// Falls back to the character after `correct` in the set when sampling keeps
/// hitting it, and to `correct` itself when the set has nothing else.
pub fn pick_wrong_char(rng: &mut impl Rng, charset: &[char], correct: char) -> char {
    if charset.iter().all(|c| *c == correct) {
        return correct;
    }
    for _ in 0..WRONG_KEY_ATTEMPTS {
        let c = charset[rng.random_range(0..charset.len())];
        if c != correct {
            return c;
        }
    }
    match charset.iter().position(|c| *c == correct) {
        Some(i) => charset[(i + 1) % charset.len()],
        None => charset[0],
    }
}

/// Decide what to press for `correct`: the right key, or (at the level's
/// error rate) a wrong one.
pub fn choose_key(
    rng: &mut impl Rng,
    params: &TypingLevel,
    charset: &[char],
    correct: char,
) -> char {
    if rng.random_bool(params.error_rate.clamp(0.0, 1.0)) {
        pick_wrong_char(rng, charset, correct)
    } else {
        correct
    }
}

/// Auto-player for the sequence game: presses one key per randomised delay.
pub struct TypingBot {
    level: SkillLevel,
    params: TypingLevel,
    rng: GameRng,
    elapsed_ms: f32,
    /// Drawn lazily once a sequence is typeable.
    pending_delay_ms: Option<f32>,
    last_delay_ms: Option<f32>,
    presses: u32,
    wrong_presses: u32,
    destroyed: bool,
}

impl TypingBot {
    pub fn new(level: impl Into<SkillLevel>) -> Self {
        Self::with_rng(level.into(), rng::ambient())
    }

    pub fn with_seed(level: impl Into<SkillLevel>, seed: u64) -> Self {
        Self::with_rng(level.into(), rng::seeded(seed))
    }

    fn with_rng(level: SkillLevel, rng: GameRng) -> Self {
        Self {
            level,
            params: TYPING_LEVELS[level.index()],
            rng,
            elapsed_ms: 0.0,
            pending_delay_ms: None,
            last_delay_ms: None,
            presses: 0,
            wrong_presses: 0,
            destroyed: false,
        }
    }

    pub fn params(&self) -> &TypingLevel {
        &self.params
    }

    /// The delay that preceded the most recent press, as drawn.
    pub fn last_delay_ms(&self) -> Option<f32> {
        self.last_delay_ms
    }

    pub fn presses(&self) -> u32 {
        self.presses
    }

    pub fn wrong_presses(&self) -> u32 {
        self.wrong_presses
    }

    fn reset_timing(&mut self) {
        self.elapsed_ms = 0.0;
        self.pending_delay_ms = None;
    }
}

impl AutoPlayer for TypingBot {
    type Game = DigitsGame;

    fn level(&self) -> SkillLevel {
        self.level
    }

    fn update(&mut self, session: &mut Session<DigitsGame>, delta_ms: f32) {
        if self.destroyed || !session.is_playing() {
            return;
        }
        if session.game().is_previewing() {
            self.reset_timing();
            return;
        }

        let params = self.params;
        let delay = *self.pending_delay_ms.get_or_insert_with(|| {
            rng::uniform(&mut self.rng, params.delay_min_ms, params.delay_max_ms)
        });
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms < delay {
            return;
        }

        let game = session.game();
        let Some(correct) = game.current_char() else {
            return;
        };
        let key = choose_key(&mut self.rng, &params, game.charset(), correct);

        self.last_delay_ms = Some(delay);
        self.reset_timing();
        self.presses += 1;
        if key != correct {
            self.wrong_presses += 1;
        }
        tracing::trace!(level = %self.level, %key, hit = key == correct, "bot key press");
        session.handle_input(key);
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.reset_timing();
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
    use crate::config::DigitsConfig;

    fn digits() -> Vec<char> {
        "0123456789".chars().collect()
    }

    fn session() -> Session<DigitsGame> {
        Session::new(DigitsGame::with_seed(DigitsConfig::default(), 11))
    }

    #[test]
    fn level_table_is_monotonic() {
        for pair in TYPING_LEVELS.windows(2) {
            assert!(pair[1].delay_max_ms < pair[0].delay_max_ms);
            assert!(pair[1].delay_min_ms < pair[0].delay_min_ms);
            assert!(pair[1].error_rate < pair[0].error_rate);
        }
        for level in &TYPING_LEVELS {
            assert!(level.delay_min_ms <= level.delay_max_ms);
        }
    }

    #[test]
    fn wrong_char_never_matches_correct() {
        let mut rng = rng::seeded(3);
        let set = digits();
        for _ in 0..2_000 {
            let c = pick_wrong_char(&mut rng, &set, '4');
            assert_ne!(c, '4');
            assert!(set.contains(&c));
        }
    }

    #[test]
    fn wrong_char_degenerate_sets() {
        let mut rng = rng::seeded(3);
        assert_eq!(pick_wrong_char(&mut rng, &['7'], '7'), '7');
        assert_eq!(pick_wrong_char(&mut rng, &['7', '7'], '7'), '7');
        let c = pick_wrong_char(&mut rng, &['a', 'b'], 'a');
        assert_eq!(c, 'b');
    }

    #[test]
    fn error_rate_converges_per_level() {
        let set = digits();
        for (i, params) in TYPING_LEVELS.iter().enumerate() {
            let mut rng = rng::seeded(100 + i as u64);
            let trials = 20_000;
            let wrong = (0..trials)
                .filter(|_| choose_key(&mut rng, params, &set, '5') != '5')
                .count();
            let rate = wrong as f64 / trials as f64;
            assert!(
                (rate - params.error_rate).abs() < 0.02,
                "level {} rate {rate} vs {}",
                i + 1,
                params.error_rate
            );
        }
    }

    #[test]
    fn press_intervals_stay_within_level_range() {
        const FRAME_MS: f32 = 16.0;
        for level in SkillLevel::all() {
            let mut s = session();
            let mut bot = TypingBot::with_seed(level, 5);
            let p = *bot.params();
            s.start();
            let mut frames_since_press = 0u32;
            let mut saw_preview = true;
            let mut measured = 0;
            for _ in 0..4_000 {
                let before = bot.presses();
                drive_frame(&mut bot, &mut s, FRAME_MS);
                frames_since_press += 1;
                if bot.presses() > before {
                    let delay = bot.last_delay_ms().unwrap();
                    assert!(delay >= p.delay_min_ms && delay <= p.delay_max_ms);
                    if !saw_preview {
                        let interval = frames_since_press as f32 * FRAME_MS;
                        assert!(
                            interval >= p.delay_min_ms && interval <= p.delay_max_ms + FRAME_MS,
                            "{level}: {interval} ms between presses"
                        );
                        measured += 1;
                    }
                    frames_since_press = 0;
                    saw_preview = false;
                }
                if s.game().is_previewing() {
                    saw_preview = true;
                }
                if s.phase() == Phase::Ended {
                    break;
                }
            }
            assert!(measured > 0, "{level} never pressed twice in a row");
        }
    }

    #[test]
    fn no_presses_during_preview() {
        let mut s = session();
        let mut bot = TypingBot::with_seed(5u8, 1);
        s.start();
        // Default first preview is 2.5 s.
        for _ in 0..150 {
            drive_frame(&mut bot, &mut s, 16.0);
        }
        assert!(s.game().is_previewing());
        assert_eq!(bot.presses(), 0);
    }

    #[test]
    fn inert_when_idle_or_destroyed() {
        let mut s = session();
        let mut bot = TypingBot::with_seed(5u8, 1);
        for _ in 0..100 {
            bot.update(&mut s, 100.0);
        }
        assert_eq!(bot.presses(), 0);

        s.start();
        bot.destroy();
        bot.destroy();
        assert!(bot.is_destroyed());
        for _ in 0..1_000 {
            drive_frame(&mut bot, &mut s, 16.0);
        }
        assert_eq!(bot.presses(), 0);
        assert_eq!(s.stats().success_count + s.stats().fail_count, 0);
    }

    #[test]
    fn skilled_bot_completes_sequences() {
        let mut s = session();
        let mut bot = TypingBot::with_seed(5u8, 9);
        s.start();
        while s.phase() == Phase::Playing {
            drive_frame(&mut bot, &mut s, 16.0);
        }
        assert!(s.game().sequences_completed() >= 3);
        assert!(s.final_stats().score > 0);
        assert_eq!(bot.presses(), s.stats().success_count + s.stats().fail_count);
        assert_eq!(bot.wrong_presses(), s.stats().fail_count);
    }

    #[test]
    fn level_is_reported() {
        assert_eq!(TypingBot::new(SkillLevel::new(3)).level(), SkillLevel::new(3));
    }
}
