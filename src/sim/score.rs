//! Level scoring
//!
//! Score is a fixed linear formula over time left, pickups and difficulty.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Inputs to the score formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Seconds left on the timer when the goal was reached
    pub time_remaining: f32,
    pub pickups_collected: u32,
    pub difficulty: u32,
}

/// Compute the score for a completed level.
/// Non-decreasing in every input; negative time counts as zero.
pub fn compute_score(breakdown: &ScoreBreakdown, tuning: &Tuning) -> u64 {
    let whole_seconds = breakdown.time_remaining.max(0.0).floor() as u64;

    tuning
        .score_base
        .saturating_add(whole_seconds.saturating_mul(tuning.score_per_second_left))
        .saturating_add((breakdown.pickups_collected as u64).saturating_mul(tuning.score_per_pickup))
        .saturating_add((breakdown.difficulty as u64).saturating_mul(tuning.score_per_difficulty))
}

/// Coins awarded for a score
pub fn coins_for_score(score: u64, tuning: &Tuning) -> u64 {
    score / tuning.coin_divisor.max(1)
}
