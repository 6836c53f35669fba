//! Simulation module
//!
//! All puzzle logic lives here. This module must stay free of rendering and
//! platform code:
//! - Entities carry plain position/velocity/color data, no display handles
//! - The integrator and analyzer hold no state between calls
//! - Iteration order is batch index order

pub mod cluster;
pub mod physics;
pub mod session;
pub mod state;

pub use cluster::{Analyzer, Cluster, components, reachable};
pub use physics::{Integrator, Tuning, bounce_off_walls, clamp_speed, cursor_push, resolve_overlap};
pub use session::{BallView, FrameInput, Session, SessionPhase, tick};
pub use state::{Arena, Ball, BallColor, PALETTE, required_balls, spawn_batch, validate_counts};
