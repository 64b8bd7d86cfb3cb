//! Headless frame driver: pairs a minigame session with an auto-player and
//! runs it to completion at a fixed frame step.

use serde::{Deserialize, Serialize};

use arcade_core::autoplay::{AutoPlayer, drive_frame};
use arcade_core::events::FinalStats;
use arcade_core::session::Session;
use arcade_core::skill::SkillLevel;
use arcade_digits::bot::TypingBot;
use arcade_digits::config::DigitsConfig;
use arcade_digits::{DigitsGame, DigitsSession};
use arcade_dodge::bot::SteeringBot;
use arcade_dodge::config::{DodgeConfig, UpgradeBonuses};
use arcade_dodge::{DodgeGame, DodgeSession};

/// Mixed into the run seed so the bot and the game draw from unrelated streams.
const BOT_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Dodge,
    Digits,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOptions {
    pub level: SkillLevel,
    pub seed: u64,
    /// Fixed frame step (ms).
    pub frame_ms: f32,
    /// Runs still going after this much play time are ended (ms).
    pub max_ms: f32,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            level: SkillLevel::new(3),
            seed: 0,
            frame_ms: 16.0,
            max_ms: 300_000.0,
        }
    }
}

/// Outcome of one auto-played run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub game: GameKind,
    pub level: SkillLevel,
    pub seed: u64,
    pub frames: u32,
    /// Ended by the play-time cap rather than by the game.
    pub capped: bool,
    pub stats: FinalStats,
    pub reward: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub runs: Vec<RunSummary>,
    pub mean_score: f64,
    pub best_score: u64,
    pub total_reward: u64,
}

impl BatchSummary {
    fn from_runs(runs: Vec<RunSummary>) -> Self {
        let best_score = runs.iter().map(|r| r.stats.score).max().unwrap_or(0);
        let total_reward = runs.iter().map(|r| r.reward).sum();
        let mean_score = if runs.is_empty() {
            0.0
        } else {
            runs.iter().map(|r| r.stats.score as f64).sum::<f64>() / runs.len() as f64
        };
        Self {
            runs,
            mean_score,
            best_score,
            total_reward,
        }
    }
}

/// Frames run and whether the cap cut the run short.
fn drive_to_end<P: AutoPlayer>(
    player: &mut P,
    session: &mut Session<P::Game>,
    opts: &SimOptions,
) -> (u32, bool, FinalStats) {
    session.start();
    let mut frames = 0u32;
    let mut elapsed = 0.0f32;
    while session.is_playing() && elapsed < opts.max_ms {
        drive_frame(player, session, opts.frame_ms);
        frames += 1;
        elapsed += opts.frame_ms;
    }
    let capped = session.is_playing();
    let stats = session.end().unwrap_or_else(|| session.final_stats());
    player.destroy();
    (frames, capped, stats)
}

pub fn simulate_dodge(
    config: DodgeConfig,
    bonuses: UpgradeBonuses,
    opts: &SimOptions,
) -> RunSummary {
    let mut session = Session::new(DodgeGame::with_seed(config, bonuses, opts.seed));
    let mut bot = SteeringBot::with_seed(opts.level, opts.seed ^ BOT_SEED_SALT);
    let (frames, capped, stats) = drive_to_end(&mut bot, &mut session, opts);
    let reward = session.calculate_money_reward();
    session.destroy();
    tracing::info!(
        level = %opts.level,
        seed = opts.seed,
        walls = session.game().walls_passed(),
        capped,
        "dodge run finished"
    );
    RunSummary {
        game: GameKind::Dodge,
        level: opts.level,
        seed: opts.seed,
        frames,
        capped,
        stats,
        reward,
    }
}

pub fn simulate_digits(config: DigitsConfig, opts: &SimOptions) -> RunSummary {
    let mut session = Session::new(DigitsGame::with_seed(config, opts.seed));
    let mut bot = TypingBot::with_seed(opts.level, opts.seed ^ BOT_SEED_SALT);
    let (frames, capped, stats) = drive_to_end(&mut bot, &mut session, opts);
    let reward = session.calculate_money_reward();
    session.destroy();
    tracing::info!(
        level = %opts.level,
        seed = opts.seed,
        sequences = session.game().sequences_completed(),
        presses = bot.presses(),
        capped,
        "digits run finished"
    );
    RunSummary {
        game: GameKind::Digits,
        level: opts.level,
        seed: opts.seed,
        frames,
        capped,
        stats,
        reward,
    }
}

/// `runs` consecutive runs with seeds `seed, seed + 1, ...`, using each
/// game's loaded config.
pub fn run_batch(game: GameKind, opts: &SimOptions, runs: u32) -> BatchSummary {
    let summaries = (0..u64::from(runs))
        .map(|i| {
            let opts = SimOptions {
                seed: opts.seed.wrapping_add(i),
                ..*opts
            };
            match game {
                GameKind::Dodge => {
                    simulate_dodge(DodgeConfig::load(), UpgradeBonuses::default(), &opts)
                },
                GameKind::Digits => simulate_digits(DigitsConfig::load(), &opts),
            }
        })
        .collect();
    BatchSummary::from_runs(summaries)
}
