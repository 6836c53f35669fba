//! Per-frame physics integrator
//!
//! One call to [`Integrator::step`] advances every ball by one frame. There
//! is no `dt`: velocities are in units per frame, so the feel of the game is
//! tied to the host frame rate.
//!
//! Balls are processed in index order and each one is fully resolved
//! (cursor push, collisions against later balls, integration, speed clamp,
//! walls) before moving on. Pair resolution therefore depends on ordering;
//! that is an accepted approximation, not an exact solver.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Arena, Ball};
use crate::consts::*;

/// Physics and clustering constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Cursor repulsion reaches this far from the cursor
    pub push_radius: f32,
    /// Repulsion strength at zero distance, falling linearly to 0 at `push_radius`
    pub push_force: f32,
    /// Velocity multiplier per frame
    pub friction: f32,
    /// Speed cap per frame
    pub max_speed: f32,
    /// Fraction of velocity kept when bouncing off a wall
    pub bounce: f32,
    /// Velocity kick given to each ball of an overlapping pair
    pub collision_impulse: f32,
    /// Max center distance for two same-colored balls to be connected
    pub group_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            push_radius: PUSH_RADIUS,
            push_force: PUSH_FORCE,
            friction: FRICTION,
            max_speed: MAX_SPEED,
            bounce: WALL_BOUNCE,
            collision_impulse: COLLISION_IMPULSE,
            group_radius: GROUP_RADIUS,
        }
    }
}

/// Stateless stepper bound to an arena and a tuning
#[derive(Debug, Clone, Copy, Default)]
pub struct Integrator {
    pub arena: Arena,
    pub tuning: Tuning,
}

impl Integrator {
    pub fn new(arena: Arena, tuning: Tuning) -> Self {
        Self { arena, tuning }
    }

    /// Advance all balls by one frame, mutating them in place
    ///
    /// `cursor` is in arena-local coordinates; pass `None` when the pointer
    /// is outside the arena or the session is won.
    pub fn step(&self, balls: &mut [Ball], cursor: Option<Vec2>) {
        for i in 0..balls.len() {
            let (head, tail) = balls.split_at_mut(i + 1);
            let ball = &mut head[i];

            if let Some(cursor) = cursor {
                ball.vel += cursor_push(ball.center(&self.arena), cursor, &self.tuning);
            }

            for other in tail.iter_mut() {
                resolve_overlap(ball, other, &self.arena, &self.tuning);
            }

            ball.pos += ball.vel;
            ball.vel *= self.tuning.friction;
            ball.vel = clamp_speed(ball.vel, self.tuning.max_speed);
            bounce_off_walls(ball, &self.arena, self.tuning.bounce);
        }
    }
}

/// Velocity change from the cursor for a ball centered at `center`
///
/// Linear falloff from `push_force` at the cursor to zero at `push_radius`.
/// A ball sitting exactly on the cursor has no push direction and gets none.
pub fn cursor_push(center: Vec2, cursor: Vec2, tuning: &Tuning) -> Vec2 {
    let away = center - cursor;
    let dist = away.length();
    if dist <= 0.0 || dist >= tuning.push_radius {
        return Vec2::ZERO;
    }
    let strength = tuning.push_force * (tuning.push_radius - dist) / tuning.push_radius;
    away / dist * strength
}

/// Separate two overlapping balls and kick them apart
///
/// Each ball moves half the overlap along the contact normal and gets an
/// equal and opposite velocity impulse. Coincident centers have no normal
/// and are left alone. Returns whether the pair overlapped.
pub fn resolve_overlap(a: &mut Ball, b: &mut Ball, arena: &Arena, tuning: &Tuning) -> bool {
    let delta = b.center(arena) - a.center(arena);
    let dist = delta.length();
    if dist <= 0.0 || dist >= arena.diameter {
        return false;
    }

    let normal = delta / dist;
    let half_overlap = (arena.diameter - dist) / 2.0;
    a.pos -= normal * half_overlap;
    b.pos += normal * half_overlap;
    a.vel -= normal * tuning.collision_impulse;
    b.vel += normal * tuning.collision_impulse;
    true
}

/// Rescale `vel` to `max_speed` if it is faster, keeping its direction
#[inline]
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    if vel.length() > max_speed {
        vel.normalize_or_zero() * max_speed
    } else {
        vel
    }
}

/// Clamp a ball into the arena, reflecting only the offending axis
///
/// The reflected component keeps `bounce` of its magnitude.
pub fn bounce_off_walls(ball: &mut Ball, arena: &Arena, bounce: f32) {
    let max = Vec2::new(arena.max_x(), arena.max_y());

    if ball.pos.x < 0.0 {
        ball.pos.x = 0.0;
        ball.vel.x *= -bounce;
    } else if ball.pos.x > max.x {
        ball.pos.x = max.x;
        ball.vel.x *= -bounce;
    }

    if ball.pos.y < 0.0 {
        ball.pos.y = 0.0;
        ball.vel.y *= -bounce;
    } else if ball.pos.y > max.y {
        ball.pos.y = max.y;
        ball.vel.y *= -bounce;
    }
}
