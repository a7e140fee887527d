//! Game state and core simulation types
//!
//! Everything a running level needs lives here. Entities are plain values
//! created at level load, mutated every tick and dropped at level end.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::generate_level;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level loaded, waiting for the player to start
    NotStarted,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Submarine reached the goal
    LevelCompleted,
    /// Timer ran out or the submarine crashed
    GameOver,
}

impl GamePhase {
    /// True once the level can no longer change
    pub fn is_finished(&self) -> bool {
        matches!(self, GamePhase::LevelCompleted | GamePhase::GameOver)
    }
}

/// Cosmetic submarine skins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum SubmarineSkin {
    #[default]
    Classic,
    Golden,
    Stealth,
    Coral,
}

impl SubmarineSkin {
    pub const ALL: [SubmarineSkin; 4] = [
        SubmarineSkin::Classic,
        SubmarineSkin::Golden,
        SubmarineSkin::Stealth,
        SubmarineSkin::Coral,
    ];

    /// Price in coins (Classic is free)
    pub fn price(&self) -> u64 {
        match self {
            SubmarineSkin::Classic => 0,
            SubmarineSkin::Coral => 200,
            SubmarineSkin::Stealth => 500,
            SubmarineSkin::Golden => 1000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmarineSkin::Classic => "Classic",
            SubmarineSkin::Golden => "Golden",
            SubmarineSkin::Stealth => "Stealth",
            SubmarineSkin::Coral => "Coral",
        }
    }
}

/// The player's submarine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submarine {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub skin: SubmarineSkin,
}

impl Submarine {
    pub fn new(pos: Vec2, skin: SubmarineSkin) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: SUBMARINE_RADIUS,
            skin,
        }
    }
}

/// Axis-aligned rectangle (center + half extents)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half_size: Vec2) -> Self {
        Self {
            center,
            half_size: half_size.abs(),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_size
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_size
    }

    /// Closest point inside the rectangle to `point`
    #[inline]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }

    /// Rectangles overlap when grown by `spacing` on every side
    pub fn overlaps(&self, other: &Rect, spacing: f32) -> bool {
        let reach = self.half_size + other.half_size + Vec2::splat(spacing);
        let delta = (self.center - other.center).abs();
        delta.x < reach.x && delta.y < reach.y
    }
}

/// A static maze obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub rect: Rect,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Amplifies current forces for a while
    SpeedBoost,
    /// Absorbs one obstacle hit while active
    Shield,
    /// Adds seconds to the timer
    TimeBonus,
    /// Adds coins to the run payout
    Coin,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::Shield,
        PowerUpKind::TimeBonus,
        PowerUpKind::Coin,
    ];
}

/// A collectible power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
    pub collected: bool,
}

/// A transient force field drawn by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterCurrent {
    pub origin: Vec2,
    /// Unit direction of the push
    pub direction: Vec2,
    /// Force at the origin of a fresh current
    pub strength: f32,
    /// Radius of influence
    pub radius: f32,
    /// Simulation time (seconds) the current was drawn
    pub created_at: f32,
}

impl WaterCurrent {
    /// Seconds since the current was drawn
    #[inline]
    pub fn age(&self, now: f32) -> f32 {
        (now - self.created_at).max(0.0)
    }

    #[inline]
    pub fn is_expired(&self, now: f32, lifetime: f32) -> bool {
        self.age(now) >= lifetime
    }
}

/// A generated level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Level number (1-based)
    pub number: u32,
    pub difficulty: u32,
    pub seed: u64,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub start: Vec2,
    pub goal: Vec2,
    pub goal_radius: f32,
    /// Seconds available to reach the goal
    pub time_limit: f32,
}

/// Active power-up effects, by expiry time in simulation seconds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub speed_boost_until: Option<f32>,
    pub shield_until: Option<f32>,
}

impl ActiveEffects {
    pub fn speed_boost_active(&self, now: f32) -> bool {
        self.speed_boost_until.is_some_and(|t| now < t)
    }

    pub fn shield_active(&self, now: f32) -> bool {
        self.shield_until.is_some_and(|t| now < t)
    }

    /// Forget effects whose time has run out
    pub fn expire(&mut self, now: f32) {
        if self.speed_boost_until.is_some_and(|t| now >= t) {
            self.speed_boost_until = None;
        }
        if self.shield_until.is_some_and(|t| now >= t) {
            self.shield_until = None;
        }
    }
}

/// Things that happened during a tick, drained by the host (sounds, haptics, UI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    CurrentDrawn { origin: Vec2, direction: Vec2 },
    PowerUpCollected { id: u32, kind: PowerUpKind },
    ShieldAbsorbed { obstacle_id: u32 },
    Crashed { obstacle_id: u32 },
    TimeUp,
    LevelCompleted { score: u64 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance parameters in effect
    pub tuning: Tuning,
    pub level: Level,
    pub submarine: Submarine,
    /// Active currents, oldest first
    pub currents: Vec<WaterCurrent>,
    pub phase: GamePhase,
    /// Simulation tick counter (only advances while playing)
    pub time_ticks: u64,
    /// Sum of `dt` over those ticks
    #[serde(default)]
    pub elapsed_secs: f32,
    /// Seconds left on the timer
    pub time_remaining: f32,
    pub effects: ActiveEffects,
    /// Power-ups picked up this level
    pub pickups_collected: u32,
    /// Coins picked up this level (paid out on completion)
    pub coins_collected: u64,
    /// Final score (set on completion)
    pub score: u64,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state for a level with default tuning
    pub fn new(level_number: u32, difficulty: u32, seed: u64) -> Self {
        Self::with_tuning(level_number, difficulty, seed, Tuning::default())
    }

    /// Create a new game state for a level with custom tuning
    pub fn with_tuning(level_number: u32, difficulty: u32, seed: u64, tuning: Tuning) -> Self {
        let level = generate_level(level_number, difficulty, seed, &tuning);
        let submarine = Submarine::new(level.start, SubmarineSkin::default());
        let time_remaining = level.time_limit;
        Self {
            seed,
            tuning,
            level,
            submarine,
            currents: Vec::new(),
            phase: GamePhase::NotStarted,
            time_ticks: 0,
            elapsed_secs: 0.0,
            time_remaining,
            effects: ActiveEffects::default(),
            pickups_collected: 0,
            coins_collected: 0,
            score: 0,
            events: Vec::new(),
        }
    }

    /// Use a cosmetic skin for the submarine
    pub fn with_skin(mut self, skin: SubmarineSkin) -> Self {
        self.submarine.skin = skin;
        self
    }

    /// Elapsed simulation time in seconds
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds spent playing the level so far (pauses excluded)
    pub fn time_taken(&self) -> f32 {
        self.elapsed()
    }

    /// Reload the current level from scratch
    pub fn restart(&mut self) {
        let skin = self.submarine.skin;
        *self = Self::with_tuning(
            self.level.number,
            self.level.difficulty,
            self.seed,
            self.tuning.clone(),
        )
        .with_skin(skin);
        log::info!("Restarted level {}", self.level.number);
    }

    /// Move on to the next level, one difficulty step harder.
    /// Returns false if the current level has not been completed.
    pub fn advance_level(&mut self) -> bool {
        if self.phase != GamePhase::LevelCompleted {
            return false;
        }
        let skin = self.submarine.skin;
        *self = Self::with_tuning(
            self.level.number + 1,
            self.level.difficulty + 1,
            self.seed,
            self.tuning.clone(),
        )
        .with_skin(skin);
        log::info!(
            "Advanced to level {} (difficulty {})",
            self.level.number,
            self.level.difficulty
        );
        true
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
