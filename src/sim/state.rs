//! Entity model: balls, their colors, and the arena they live in
//!
//! Plain data only. Positions and velocities are changed by the integrator;
//! a ball's color never changes once spawned.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::StartError;

/// Ball colors, in palette order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

/// Fixed palette; colors are handed out cyclically from the front
pub const PALETTE: [BallColor; 6] = [
    BallColor::Red,
    BallColor::Green,
    BallColor::Blue,
    BallColor::Yellow,
    BallColor::Purple,
    BallColor::Orange,
];

impl BallColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BallColor::Red => "red",
            BallColor::Green => "green",
            BallColor::Blue => "blue",
            BallColor::Yellow => "yellow",
            BallColor::Purple => "purple",
            BallColor::Orange => "orange",
        }
    }

    /// Palette slot of this color
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Color for ball `ball_index` when `color_count` colors are in play
    ///
    /// `color_count` is clamped to the palette size.
    pub fn cyclic(ball_index: usize, color_count: usize) -> Self {
        PALETTE[ball_index % color_count.clamp(1, PALETTE.len())]
    }
}

/// Rectangular play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Ball diameter
    pub diameter: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            diameter: BALL_DIAMETER,
        }
    }
}

impl Arena {
    #[inline]
    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }

    /// Largest legal top-left x
    #[inline]
    pub fn max_x(&self) -> f32 {
        self.width - self.diameter
    }

    /// Largest legal top-left y
    #[inline]
    pub fn max_y(&self) -> f32 {
        self.height - self.diameter
    }

    /// Whether a point (arena-local) lies inside the arena
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Whether a ball's top-left corner is within the legal range
    pub fn holds(&self, ball: &Ball) -> bool {
        ball.pos.x >= 0.0 && ball.pos.x <= self.max_x() && ball.pos.y >= 0.0 && ball.pos.y <= self.max_y()
    }
}

/// A ball entity
///
/// `pos` is the top-left corner of the ball's bounding box, matching what
/// the presentation layer draws. Use [`Ball::center`] for geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    color: BallColor,
}

impl Ball {
    pub fn new(id: u64, pos: Vec2, color: BallColor) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            color,
        }
    }

    #[inline]
    pub fn color(&self) -> BallColor {
        self.color
    }

    #[inline]
    pub fn center(&self, arena: &Arena) -> Vec2 {
        self.pos + Vec2::splat(arena.radius())
    }
}

/// Minimum ball count for the given number of colors
pub fn required_balls(color_count: usize) -> usize {
    color_count * MIN_BALLS_PER_COLOR
}

/// Check a ball/color combination before spawning anything
pub fn validate_counts(ball_count: usize, color_count: usize) -> Result<(), StartError> {
    if color_count == 0 || color_count > PALETTE.len() {
        return Err(StartError::UnsupportedColorCount {
            colors: color_count,
            max: PALETTE.len(),
        });
    }
    let required = required_balls(color_count);
    if ball_count < required {
        return Err(StartError::NotEnoughBalls {
            balls: ball_count,
            colors: color_count,
            required,
        });
    }
    Ok(())
}

/// Spawn a fresh batch at random positions with zero velocity
///
/// Ids start at `first_id` so balls from different batches never share one.
pub fn spawn_batch<R: Rng + ?Sized>(
    rng: &mut R,
    arena: &Arena,
    ball_count: usize,
    color_count: usize,
    first_id: u64,
) -> Result<Vec<Ball>, StartError> {
    validate_counts(ball_count, color_count)?;

    let max_x = arena.max_x().max(0.0);
    let max_y = arena.max_y().max(0.0);
    let balls = (0..ball_count)
        .map(|i| {
            let pos = Vec2::new(rng.random_range(0.0..=max_x), rng.random_range(0.0..=max_y));
            Ball::new(first_id.wrapping_add(i as u64), pos, BallColor::cyclic(i, color_count))
        })
        .collect();
    Ok(balls)
}
