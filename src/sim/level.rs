//! Procedural level generation
//!
//! Levels are rebuilt from `(number, difficulty, seed)` alone, so a level can
//! be replayed or restarted without storing its layout.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{circle_circle_overlap, circle_rect_overlap};
use super::state::{Level, Obstacle, PowerUp, PowerUpKind, Rect};
use crate::consts::*;
use crate::tuning::Tuning;

/// Seed for one level, decorrelated by level number
pub fn level_seed(run_seed: u64, number: u32) -> u64 {
    run_seed.wrapping_add((number as u64).wrapping_mul(2654435761))
}

/// Start point (bottom center)
pub fn start_point() -> Vec2 {
    Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - START_GOAL_INSET)
}

/// Goal point (top center)
pub fn goal_point() -> Vec2 {
    Vec2::new(SCREEN_WIDTH / 2.0, START_GOAL_INSET)
}

/// Generate a level with obstacles and power-ups scaled by difficulty
pub fn generate_level(number: u32, difficulty: u32, run_seed: u64, tuning: &Tuning) -> Level {
    let seed = level_seed(run_seed, number);
    let mut rng = Pcg32::seed_from_u64(seed);

    let start = start_point();
    let goal = goal_point();
    let mut next_id = 1u32;

    let obstacle_target = tuning.obstacle_count(difficulty);
    let max_half = (tuning.obstacle_max_half_size
        + tuning.obstacle_growth_per_difficulty * difficulty as f32)
        .max(tuning.obstacle_min_half_size);

    let mut obstacles: Vec<Obstacle> = Vec::with_capacity(obstacle_target as usize);
    for _ in 0..obstacle_target {
        let placed = (0..tuning.placement_attempts).find_map(|_| {
            let half_size = Vec2::new(
                random_between(&mut rng, tuning.obstacle_min_half_size, max_half),
                random_between(&mut rng, tuning.obstacle_min_half_size, max_half),
            );
            let center = random_point(&mut rng, half_size, tuning.playfield_margin);
            let rect = Rect::new(center, half_size);

            let blocks_endpoint = circle_rect_overlap(start, tuning.safe_zone_radius, &rect)
                || circle_rect_overlap(goal, tuning.safe_zone_radius, &rect);
            let crowded = obstacles
                .iter()
                .any(|o| o.rect.overlaps(&rect, tuning.placement_spacing));

            (!blocks_endpoint && !crowded).then_some(rect)
        });

        match placed {
            Some(rect) => {
                obstacles.push(Obstacle { id: next_id, rect });
                next_id += 1;
            }
            None => log::debug!("Level {}: gave up placing an obstacle", number),
        }
    }

    let power_up_target = tuning.power_up_count(difficulty);
    let mut power_ups: Vec<PowerUp> = Vec::with_capacity(power_up_target as usize);
    for _ in 0..power_up_target {
        let placed = (0..tuning.placement_attempts).find_map(|_| {
            let pos = random_point(&mut rng, Vec2::splat(POWER_UP_RADIUS), tuning.playfield_margin);
            let reach = POWER_UP_RADIUS + tuning.placement_spacing;

            let inside_obstacle = obstacles
                .iter()
                .any(|o| circle_rect_overlap(pos, reach, &o.rect));
            let on_endpoint = circle_circle_overlap(pos, reach, start, tuning.safe_zone_radius)
                || circle_circle_overlap(pos, reach, goal, GOAL_RADIUS);
            let crowded = power_ups
                .iter()
                .any(|p| circle_circle_overlap(pos, reach, p.pos, p.radius));

            (!inside_obstacle && !on_endpoint && !crowded).then_some(pos)
        });

        match placed {
            Some(pos) => {
                let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
                power_ups.push(PowerUp {
                    id: next_id,
                    kind,
                    pos,
                    radius: POWER_UP_RADIUS,
                    collected: false,
                });
                next_id += 1;
            }
            None => log::debug!("Level {}: gave up placing a power-up", number),
        }
    }

    let time_limit = tuning.time_limit(difficulty);

    log::info!(
        "Level {} (difficulty {}): {} obstacles, {} power-ups, {:.0}s",
        number,
        difficulty,
        obstacles.len(),
        power_ups.len(),
        time_limit
    );

    Level {
        number,
        difficulty,
        seed,
        obstacles,
        power_ups,
        start,
        goal,
        goal_radius: GOAL_RADIUS,
        time_limit,
    }
}

#[inline]
fn random_between(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max <= min {
        min
    } else {
        rng.random_range(min..max)
    }
}

/// Random center that keeps an entity of `half_size` inside the playfield margin
fn random_point(rng: &mut Pcg32, half_size: Vec2, margin: f32) -> Vec2 {
    let lo = half_size + Vec2::splat(margin);
    let hi = Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT) - lo;
    Vec2::new(
        random_between(rng, lo.x, hi.x),
        random_between(rng, lo.y, hi.y),
    )
}
