//! Collision detection and response
//!
//! Marble vs. obstacle uses the closest point on the rectangle for detection,
//! but resolves along whichever axis separates the marble from the obstacle
//! centre the most. That is not a minimum-translation correction: a marble
//! clipping the end of a long platform can be snapped to the top face even
//! though the side face is nearer. The resulting jitter is part of how the
//! race looks, so keep it.

use glam::Vec2;
use rand::Rng;

use super::geometry::{Rect, circle_circle_intersects, circle_rect_intersects};
use super::marble::Marble;

/// Extra gap left between marbles after separation so they no longer overlap
/// once floating point rounding is accounted for
const SEPARATION_SLOP: f32 = 1e-3;

/// Result of a marble/obstacle check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Nearest point of the obstacle to the marble centre
    pub point: Vec2,
    /// Resolution axis (unit, pointing from obstacle toward marble)
    pub normal: Vec2,
    /// How far the marble reaches into the obstacle
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

/// Check a marble against an obstacle
///
/// The normal is chosen by comparing the separation from the obstacle centre
/// on each axis; ties go to the vertical axis.
pub fn marble_rect_collision(pos: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    if !circle_rect_intersects(pos, radius, rect) {
        return CollisionResult::miss();
    }

    let point = rect.closest_point(pos);
    let offset = pos - rect.center();
    let normal = if offset.x.abs() > offset.y.abs() {
        Vec2::new(if offset.x > 0.0 { 1.0 } else { -1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if offset.y > 0.0 { 1.0 } else { -1.0 })
    };

    CollisionResult {
        hit: true,
        point,
        normal,
        penetration: radius - (pos - point).length(),
    }
}

/// Bounce a marble off one obstacle
///
/// Reverses and damps the velocity component on the resolution axis, snaps
/// the marble just outside the face on that side, then adds a random
/// horizontal kick so symmetric stacks don't settle. Returns true on a hit.
pub fn resolve_obstacle<R: Rng + ?Sized>(
    marble: &mut Marble,
    rect: &Rect,
    bounce_damping: f32,
    jitter: f32,
    rng: &mut R,
) -> bool {
    if marble.finished {
        return false;
    }

    let result = marble_rect_collision(marble.pos, marble.radius, rect);
    if !result.hit {
        return false;
    }

    if result.normal.x != 0.0 {
        marble.vel.x *= -bounce_damping;
        marble.pos.x = if result.normal.x > 0.0 {
            rect.right() + marble.radius
        } else {
            rect.x - marble.radius
        };
    } else {
        marble.vel.y *= -bounce_damping;
        marble.pos.y = if result.normal.y > 0.0 {
            rect.bottom() + marble.radius
        } else {
            rect.y - marble.radius
        };
    }

    marble.vel.x += rng.random_range(-jitter..=jitter);
    true
}

/// Check a marble against every obstacle in order, resolving each hit as it
/// is found. `on_hit` receives the index of every obstacle that was hit.
pub fn resolve_obstacles<R: Rng + ?Sized>(
    marble: &mut Marble,
    obstacles: &[Rect],
    bounce_damping: f32,
    jitter: f32,
    rng: &mut R,
    mut on_hit: impl FnMut(usize),
) {
    for (index, rect) in obstacles.iter().enumerate() {
        if resolve_obstacle(marble, rect, bounce_damping, jitter, rng) {
            on_hit(index);
        }
    }
}

/// Separate two overlapping marbles and exchange an inelastic impulse
///
/// Both marbles move apart by half the overlap along the centre line. If they
/// are already separating the velocities are left alone. Returns true if the
/// marbles overlapped.
pub fn resolve_marble_pair(a: &mut Marble, b: &mut Marble, restitution: f32) -> bool {
    if a.finished || b.finished {
        return false;
    }

    if !circle_circle_intersects(a.pos, a.radius, b.pos, b.radius) {
        return false;
    }

    let delta = b.pos - a.pos;
    let min_dist = a.radius + b.radius;
    let dist = delta.length();
    // Coincident centres: push apart horizontally
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::X
    };

    let correction = normal * (min_dist - dist + SEPARATION_SLOP) * 0.5;
    a.pos -= correction;
    b.pos += correction;

    let approach = (b.vel - a.vel).dot(normal);
    if approach > 0.0 {
        return true;
    }

    // Equal masses: each marble takes half the impulse
    let impulse = -(1.0 + restitution) * approach * 0.5;
    a.vel -= normal * impulse;
    b.vel += normal * impulse;
    true
}

/// Resolve every overlapping pair of racing marbles, in starting order
///
/// O(n²) over the field; `on_contact` receives each colliding pair's indices.
pub fn resolve_marble_collisions(
    marbles: &mut [Marble],
    restitution: f32,
    mut on_contact: impl FnMut(usize, usize),
) {
    for i in 0..marbles.len() {
        let (head, tail) = marbles.split_at_mut(i + 1);
        let a = &mut head[i];
        if a.finished {
            continue;
        }
        for (offset, b) in tail.iter_mut().enumerate() {
            if resolve_marble_pair(a, b, restitution) {
                on_contact(i, i + 1 + offset);
            }
        }
    }
}
