//! Collision detection for circles against rectangles and circles
//!
//! The submarine, power-ups and goal are circles; obstacles are axis-aligned
//! rectangles. Everything reduces to a distance threshold.

use glam::Vec2;

use super::state::Rect;

/// Result of a circle-vs-rectangle contact check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the rectangle (if hit)
    pub point: Vec2,
    /// Surface normal pointing from the rectangle toward the circle center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check whether a circle overlaps a rectangle
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    center.distance_squared(closest) < radius * radius
}

/// Check whether two circles overlap
#[inline]
pub fn circle_circle_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// Circle-vs-rectangle contact with push-out normal
///
/// When the circle center is inside the rectangle, the normal points out
/// through the nearest face.
pub fn circle_rect_contact(center: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let closest = rect.closest_point(center);
    let offset = center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    if dist_sq > 1e-8 {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Center is inside the rectangle: exit through the nearest face
    let local = center - rect.center;
    let room = rect.half_size - local.abs();
    let (normal, depth, point) = if room.x < room.y {
        let sign = if local.x < 0.0 { -1.0 } else { 1.0 };
        (
            Vec2::new(sign, 0.0),
            room.x,
            Vec2::new(rect.center.x + sign * rect.half_size.x, center.y),
        )
    } else {
        let sign = if local.y < 0.0 { -1.0 } else { 1.0 };
        (
            Vec2::new(0.0, sign),
            room.y,
            Vec2::new(center.x, rect.center.y + sign * rect.half_size.y),
        )
    };

    CollisionResult {
        hit: true,
        point,
        normal,
        penetration: depth + radius,
    }
}
