//! Submarine motion under water-current forces
//!
//! Each current pushes along its direction with a force that falls off
//! linearly from its origin to its radius and fades out over its lifetime.

use glam::Vec2;

use super::state::{Submarine, WaterCurrent};
use crate::clamp_to_screen;
use crate::consts::SIM_DT;
use crate::tuning::Tuning;

/// Force a single current exerts at `point`
pub fn current_force(current: &WaterCurrent, point: Vec2, now: f32, tuning: &Tuning) -> Vec2 {
    if current.radius <= 0.0 || current.is_expired(now, tuning.current_lifetime) {
        return Vec2::ZERO;
    }

    let dist = current.origin.distance(point);
    if dist >= current.radius {
        return Vec2::ZERO;
    }

    let falloff = 1.0 - dist / current.radius;
    let decay = 1.0 - current.age(now) / tuning.current_lifetime;
    current.direction * current.strength * falloff * decay
}

/// Sum of forces from all currents at `point`
pub fn total_force(currents: &[WaterCurrent], point: Vec2, now: f32, tuning: &Tuning) -> Vec2 {
    currents
        .iter()
        .map(|c| current_force(c, point, now, tuning))
        .sum()
}

/// Turn a drag gesture into a current. Taps shorter than the minimum stroke
/// length produce nothing.
pub fn current_from_stroke(from: Vec2, to: Vec2, now: f32, tuning: &Tuning) -> Option<WaterCurrent> {
    let stroke = to - from;
    let length = stroke.length();
    if !length.is_finite() || length < tuning.min_stroke_length {
        return None;
    }

    let strength = (length * tuning.current_strength_per_point)
        .clamp(tuning.current_min_strength, tuning.current_max_strength);

    Some(WaterCurrent {
        origin: from,
        direction: stroke / length,
        strength,
        radius: tuning.current_radius,
        created_at: now,
    })
}

/// Advance the submarine one step: accelerate, apply drag, cap speed,
/// move, and keep it on screen
pub fn integrate(sub: &mut Submarine, force: Vec2, dt: f32, tuning: &Tuning) {
    sub.vel += force * dt;
    sub.vel *= tuning.drag.powf(dt / SIM_DT);
    sub.vel = sub.vel.clamp_length_max(tuning.max_speed);
    sub.pos += sub.vel * dt;

    let clamped = clamp_to_screen(sub.pos, sub.radius);
    // Stop motion into any wall we were pushed back from
    if clamped.x != sub.pos.x {
        sub.vel.x = 0.0;
    }
    if clamped.y != sub.pos.y {
        sub.vel.y = 0.0;
    }
    sub.pos = clamped;
}
