//! Current Dive - steer a submarine through underwater mazes with water currents
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, physics, collisions, scoring)
//! - `persistence`: Key-value storage of JSON blobs
//! - `profile`: Player coins, cosmetics, achievements and best times
//! - `leaderboard`: Top scores
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod leaderboard;
pub mod persistence;
pub mod profile;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use leaderboard::Leaderboard;
pub use persistence::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use profile::{ProfileError, UserProfile};
pub use settings::{Difficulty, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the display timer)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (points, origin at top-left, y grows downward)
    pub const SCREEN_WIDTH: f32 = 390.0;
    pub const SCREEN_HEIGHT: f32 = 844.0;

    /// Submarine collision radius
    pub const SUBMARINE_RADIUS: f32 = 18.0;

    /// Goal pickup radius
    pub const GOAL_RADIUS: f32 = 30.0;
    /// Power-up pickup radius
    pub const POWER_UP_RADIUS: f32 = 14.0;

    /// Distance of start/goal from the bottom/top edge
    pub const START_GOAL_INSET: f32 = 80.0;
}

/// Screen bounds as (min, max) corners
#[inline]
pub fn screen_bounds() -> (Vec2, Vec2) {
    (
        Vec2::ZERO,
        Vec2::new(consts::SCREEN_WIDTH, consts::SCREEN_HEIGHT),
    )
}

/// Clamp a circle's center so the whole circle stays inside the screen
#[inline]
pub fn clamp_to_screen(pos: Vec2, radius: f32) -> Vec2 {
    let (min, max) = screen_bounds();
    let inset = Vec2::splat(radius);
    pos.clamp(min + inset, max - inset)
}
