//! Data-driven game balance
//!
//! Every number that shapes how a level plays lives here so it can be
//! tweaked from a JSON file without touching the simulation.

use serde::{Deserialize, Serialize};

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Currents ===
    /// Seconds a current stays active after being drawn
    pub current_lifetime: f32,
    /// Radius of influence of a drawn current
    pub current_radius: f32,
    /// Force per point of stroke length
    pub current_strength_per_point: f32,
    /// Minimum force of a current
    pub current_min_strength: f32,
    /// Maximum force of a current
    pub current_max_strength: f32,
    /// Strokes shorter than this are ignored (taps)
    pub min_stroke_length: f32,
    /// Oldest currents are dropped beyond this many
    pub max_active_currents: usize,

    // === Submarine ===
    /// Per-frame velocity multiplier at 60 Hz
    pub drag: f32,
    /// Speed cap (points/sec)
    pub max_speed: f32,
    /// Force multiplier while a speed boost is active
    pub speed_boost_multiplier: f32,
    /// Seconds a speed boost lasts
    pub speed_boost_duration: f32,
    /// Seconds a shield lasts
    pub shield_duration: f32,
    /// Seconds added by a time bonus pickup
    pub time_bonus_seconds: f32,
    /// Coins added by a coin pickup
    pub coin_pickup_value: u64,
    /// Speed the submarine is pushed away at when a shield absorbs a hit
    pub shield_knockback_speed: f32,

    // === Generation ===
    pub base_obstacles: u32,
    pub obstacles_per_difficulty: u32,
    pub max_obstacles: u32,
    pub base_power_ups: u32,
    pub max_power_ups: u32,
    /// Smallest obstacle half extent
    pub obstacle_min_half_size: f32,
    /// Largest obstacle half extent at difficulty 0
    pub obstacle_max_half_size: f32,
    /// Added to the largest half extent per difficulty step
    pub obstacle_growth_per_difficulty: f32,
    /// Radius around start/goal kept free of obstacles
    pub safe_zone_radius: f32,
    /// Minimum spacing between generated entities
    pub placement_spacing: f32,
    /// Attempts per entity before giving up on placing it
    pub placement_attempts: u32,
    /// Distance kept free along the screen edges
    pub playfield_margin: f32,
    /// Time limit at difficulty 0 (seconds)
    pub base_time_limit: f32,
    /// Seconds removed per difficulty step
    pub time_limit_per_difficulty: f32,
    /// Lowest time limit (seconds)
    pub min_time_limit: f32,

    // === Scoring ===
    pub score_base: u64,
    pub score_per_second_left: u64,
    pub score_per_pickup: u64,
    pub score_per_difficulty: u64,
    /// Score points per coin earned
    pub coin_divisor: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            current_lifetime: 2.0,
            current_radius: 110.0,
            current_strength_per_point: 4.0,
            current_min_strength: 150.0,
            current_max_strength: 900.0,
            min_stroke_length: 12.0,
            max_active_currents: 8,

            drag: 0.97,
            max_speed: 420.0,
            speed_boost_multiplier: 1.5,
            speed_boost_duration: 5.0,
            shield_duration: 8.0,
            time_bonus_seconds: 5.0,
            coin_pickup_value: 10,
            shield_knockback_speed: 160.0,

            base_obstacles: 6,
            obstacles_per_difficulty: 2,
            max_obstacles: 30,
            base_power_ups: 2,
            max_power_ups: 8,
            obstacle_min_half_size: 14.0,
            obstacle_max_half_size: 40.0,
            obstacle_growth_per_difficulty: 3.0,
            safe_zone_radius: 90.0,
            placement_spacing: 12.0,
            placement_attempts: 40,
            playfield_margin: 20.0,
            base_time_limit: 60.0,
            time_limit_per_difficulty: 3.0,
            min_time_limit: 25.0,

            score_base: 1000,
            score_per_second_left: 20,
            score_per_pickup: 150,
            score_per_difficulty: 250,
            coin_divisor: 100,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their default values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Time limit for a given difficulty
    pub fn time_limit(&self, difficulty: u32) -> f32 {
        (self.base_time_limit - self.time_limit_per_difficulty * difficulty as f32)
            .max(self.min_time_limit)
    }

    /// Number of obstacles to generate for a given difficulty
    pub fn obstacle_count(&self, difficulty: u32) -> u32 {
        self.base_obstacles
            .saturating_add(self.obstacles_per_difficulty.saturating_mul(difficulty))
            .min(self.max_obstacles)
    }

    /// Number of power-ups to generate for a given difficulty
    pub fn power_up_count(&self, difficulty: u32) -> u32 {
        self.base_power_ups
            .saturating_add(difficulty / 2)
            .min(self.max_power_ups)
    }
}
