//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod physics;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, circle_circle_overlap, circle_rect_contact, circle_rect_overlap};
pub use level::generate_level;
pub use physics::{current_force, current_from_stroke, integrate, total_force};
pub use score::{ScoreBreakdown, coins_for_score, compute_score};
pub use state::{
    ActiveEffects, GameEvent, GamePhase, GameState, Level, Obstacle, PowerUp, PowerUpKind, Rect,
    Submarine, SubmarineSkin, WaterCurrent,
};
pub use tick::{Stroke, TickInput, tick};
