//! Session controller and per-frame tick
//!
//! Owns the ball batch, drives the integrator once per frame, and checks the
//! win condition after every step.

use std::time::{Duration, Instant};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cluster::Analyzer;
use super::physics::{Integrator, Tuning};
use super::state::{Arena, Ball, BallColor, spawn_batch};
use crate::error::StartError;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No valid batch yet (never started, or the last start was rejected)
    Idle,
    /// Simulation running
    Running,
    /// Puzzle solved; simulation and clock frozen
    Won,
}

/// Input sampled for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Pointer position in arena-local coordinates, if inside the arena
    pub cursor: Option<Vec2>,
}

/// What the presentation layer needs to draw one ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub id: u64,
    /// Top-left corner of the ball
    pub pos: Vec2,
    pub color: BallColor,
    pub highlighted: bool,
}

/// A puzzle session
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed the spawn RNG was created from
    pub seed: u64,
    rng: Pcg32,
    integrator: Integrator,
    analyzer: Analyzer,
    phase: SessionPhase,
    balls: Vec<Ball>,
    cursor: Option<Vec2>,
    started_at: Option<Instant>,
    elapsed: Duration,
    frames: u64,
    counts: Option<(usize, usize)>,
    last_error: Option<StartError>,
    next_id: u64,
}

impl Session {
    /// Create an idle session with default arena and tuning
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Arena::default(), Tuning::default())
    }

    /// Create an idle session with an explicit arena and tuning
    pub fn with_config(seed: u64, arena: Arena, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            integrator: Integrator::new(arena, tuning),
            analyzer: Analyzer::new(arena, &tuning),
            phase: SessionPhase::Idle,
            balls: Vec::new(),
            cursor: None,
            started_at: None,
            elapsed: Duration::ZERO,
            frames: 0,
            counts: None,
            last_error: None,
            next_id: 1,
        }
    }

    /// Spawn a fresh batch and start running
    ///
    /// On a bad ball/color combination the old batch is dropped, the session
    /// goes back to `Idle` and the error is kept in [`Session::last_error`].
    pub fn start(&mut self, ball_count: usize, color_count: usize) -> Result<(), StartError> {
        self.cursor = None;
        self.started_at = None;
        self.elapsed = Duration::ZERO;
        self.frames = 0;

        let arena = self.integrator.arena;
        match spawn_batch(&mut self.rng, &arena, ball_count, color_count, self.next_id) {
            Ok(balls) => {
                self.next_id = self.next_id.wrapping_add(balls.len() as u64);
                self.balls = balls;
                self.phase = SessionPhase::Running;
                self.counts = Some((ball_count, color_count));
                self.last_error = None;
                log::info!(
                    "Session started: {} balls, {} colors (seed {})",
                    ball_count,
                    color_count,
                    self.seed
                );
                Ok(())
            }
            Err(err) => {
                log::warn!("Session not started: {}", err);
                self.balls.clear();
                self.phase = SessionPhase::Idle;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_won(&self) -> bool {
        self.phase == SessionPhase::Won
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn arena(&self) -> &Arena {
        &self.integrator.arena
    }

    pub fn tuning(&self) -> &Tuning {
        &self.integrator.tuning
    }

    /// Cursor applied on the last frame (cleared once won)
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// Frames stepped since the last start
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Ball and color counts of the last successful start
    pub fn counts(&self) -> Option<(usize, usize)> {
        self.counts
    }

    /// Why the last start was rejected, if it was
    pub fn last_error(&self) -> Option<&StartError> {
        self.last_error.as_ref()
    }

    /// Highlight flag per ball, in batch order
    pub fn highlights(&self) -> Vec<bool> {
        self.analyzer.highlights(&self.balls)
    }

    /// Everything the renderer needs for this frame
    pub fn views(&self) -> Vec<BallView> {
        self.balls
            .iter()
            .zip(self.highlights())
            .map(|(ball, highlighted)| BallView {
                id: ball.id,
                pos: ball.pos,
                color: ball.color(),
                highlighted,
            })
            .collect()
    }

    /// Number of clusters still on the board (one per color when solved)
    pub fn cluster_count(&self) -> usize {
        self.analyzer.clusters(&self.balls).len()
    }
}

/// Drop cursor samples that are not finite or lie outside the arena
fn sanitize_cursor(cursor: Option<Vec2>, arena: &Arena) -> Option<Vec2> {
    cursor.filter(|c| c.is_finite() && arena.contains(*c))
}

/// Advance the session by one frame
///
/// `now` must come from a monotonic clock. The first frame after a start
/// marks the start time. Does nothing unless the session is running.
pub fn tick(session: &mut Session, input: &FrameInput, now: Instant) {
    if session.phase != SessionPhase::Running {
        return;
    }

    let started_at = *session.started_at.get_or_insert(now);
    session.elapsed = now.saturating_duration_since(started_at);

    session.cursor = sanitize_cursor(input.cursor, &session.integrator.arena);
    session.integrator.step(&mut session.balls, session.cursor);
    session.frames += 1;
    log::trace!(
        "frame {} cursor {:?} elapsed {}ms",
        session.frames,
        session.cursor,
        session.elapsed_ms()
    );

    if session.analyzer.is_won(&session.balls) {
        session.phase = SessionPhase::Won;
        session.cursor = None;
        log::info!(
            "Puzzle solved in {} after {} frames",
            crate::format_elapsed(session.elapsed_ms()),
            session.frames
        );
    }
}
