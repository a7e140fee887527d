//! Current Dive entry point
//!
//! Headless runner: plays levels with the autopilot through the same
//! fixed-timestep loop a UI host would use, then records the results to the
//! local profile and leaderboard.
//!
//! Usage: `current-dive [seed] [easy|normal|hard]`
//! Data lives in `$CURRENT_DIVE_DATA` (default: `<tmp>/current-dive`).

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use current_dive::consts::*;
use current_dive::profile::RunOutcome;
use current_dive::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use current_dive::{FileStore, Leaderboard, Settings, UserProfile};

/// Levels played per session before stopping
const SESSION_LEVELS: u32 = 5;
/// Simulated display frame time (slightly off the sim rate on purpose)
const FRAME_DT: f32 = 1.0 / 59.0;

/// Game instance holding the running level and the frame accumulator
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
        }
    }

    /// Run simulation ticks for one display frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.start = false;
            self.input.pause = false;
            self.input.stroke = None;
        }
    }

    /// Play until the level finishes
    fn play(&mut self) {
        self.input.start = true;
        while !self.state.phase.is_finished() {
            self.update(FRAME_DT);
            for event in self.state.drain_events() {
                match event {
                    GameEvent::PowerUpCollected { kind, .. } => log::info!("Picked up {:?}", kind),
                    GameEvent::ShieldAbsorbed { .. } => log::info!("Shield took the hit"),
                    _ => log::trace!("{:?}", event),
                }
            }
        }
    }
}

fn data_dir() -> PathBuf {
    std::env::var_os("CURRENT_DIVE_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("current-dive"))
}

fn now_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

fn main() {
    env_logger::init();
    log::info!("Current Dive (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| now_millis() as u64);

    let mut store = match FileStore::open(data_dir()) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Cannot open data directory {:?}: {}", data_dir(), e);
            std::process::exit(1);
        }
    };

    let settings = Settings::load(&store);
    let difficulty = settings.session_difficulty(args.next().as_deref());
    let mut profile = UserProfile::load(&store);
    let mut leaderboard = Leaderboard::load(&store);

    log::info!(
        "Seed {} on {} with {} coins",
        seed,
        difficulty.as_str(),
        profile.coins
    );

    let mut game = Game::new(
        GameState::new(1, difficulty.difficulty_for_level(1), seed)
            .with_skin(profile.selected_skin),
    );

    for _ in 0..SESSION_LEVELS {
        game.play();

        let Some(outcome) = RunOutcome::from_state(&game.state) else {
            break;
        };
        let rewards = profile.record_run(&outcome, &game.state.tuning);

        if outcome.completed {
            let rank = leaderboard.add_entry(outcome.score, outcome.level, outcome.time_taken, now_millis());
            println!(
                "Level {}: cleared in {:.1}s, score {}, +{} coins{}{}",
                outcome.level,
                outcome.time_taken,
                outcome.score,
                rewards.coins_earned,
                if rewards.new_best_time { ", new best time" } else { "" },
                rank.map(|r| format!(", leaderboard #{r}")).unwrap_or_default(),
            );
            for achievement in &rewards.new_achievements {
                println!("  Achievement unlocked: {}", achievement.as_str());
            }
        } else {
            println!("Level {}: failed after {:.1}s", outcome.level, outcome.time_taken);
        }

        if game.state.phase != GamePhase::LevelCompleted || !game.state.advance_level() {
            break;
        }
    }

    println!("Coins: {}  Top score: {:?}", profile.coins, leaderboard.top_score());

    for result in [
        profile.save(&mut store),
        leaderboard.save(&mut store),
        settings.save(&mut store),
    ] {
        if let Err(e) = result {
            log::error!("Save failed: {}", e);
        }
    }
}
