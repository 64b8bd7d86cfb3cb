use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use arcade_core::skill::SkillLevel;
use arcade_sim::{GameKind, SimOptions, run_batch};

/// Run arcade minigames headlessly under an auto-player.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Minigame to run
    #[arg(value_enum)]
    game: GameKind,

    /// Auto-player skill level (1-5)
    #[arg(short, long, default_value_t = 3)]
    level: u8,

    /// Number of consecutive runs
    #[arg(short, long, default_value_t = 1)]
    runs: u32,

    /// Seed for the first run; later runs use seed + i. Random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fixed frame step in milliseconds
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f32,

    /// Play-time cap per run in milliseconds
    #[arg(long, default_value_t = 300_000.0)]
    max_ms: f32,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !(1..=SkillLevel::COUNT as u8).contains(&cli.level) {
        return Err(format!(
            "level must be between 1 and {}, got {}",
            SkillLevel::COUNT,
            cli.level
        )
        .into());
    }
    if cli.frame_ms <= 0.0 || !cli.frame_ms.is_finite() {
        return Err(format!("frame-ms must be positive, got {}", cli.frame_ms).into());
    }

    let opts = SimOptions {
        level: SkillLevel::new(cli.level),
        seed: cli.seed.unwrap_or_else(rand::random),
        frame_ms: cli.frame_ms,
        max_ms: cli.max_ms,
    };
    tracing::info!(
        game = ?cli.game,
        level = cli.level,
        runs = cli.runs,
        seed = opts.seed,
        "arcade-sim starting"
    );

    let batch = run_batch(cli.game, &opts, cli.runs);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    for run in &batch.runs {
        println!(
            "seed {:>20}  score {:>6}  max combo {:>5.1}  {:>8.0} ms  ok {:>4}  miss {:>4}  reward {:>6}{}",
            run.seed,
            run.stats.score,
            run.stats.max_combo,
            run.stats.duration_ms,
            run.stats.success_count,
            run.stats.fail_count,
            run.reward,
            if run.capped { "  (capped)" } else { "" },
        );
    }
    println!(
        "{} runs: mean score {:.1}, best {}, total reward {}",
        batch.runs.len(),
        batch.mean_score,
        batch.best_score,
        batch.total_reward
    );
    Ok(())
}
