//! Chroma Cluster - a cursor-driven ball sorting puzzle
//!
//! Colored balls bounce around a rectangular arena. The cursor pushes them
//! away; the puzzle is solved once every color forms a single cluster and no
//! two colors touch.
//!
//! Core modules:
//! - `sim`: Simulation (entity model, physics, clustering, session)
//! - `settings`: Ball/color counts and physics tuning, loaded from JSON
//! - `error`: Error types for session start and settings loading

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SettingsError, StartError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 600.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    /// Ball diameter (all balls are the same size)
    pub const BALL_DIAMETER: f32 = 20.0;

    /// Cursor repulsion reach and strength at contact
    pub const PUSH_RADIUS: f32 = 150.0;
    pub const PUSH_FORCE: f32 = 2.5;

    /// Velocity multiplier applied every frame
    pub const FRICTION: f32 = 0.97;
    /// Speed cap (units per frame)
    pub const MAX_SPEED: f32 = 6.0;
    /// Fraction of velocity kept (and inverted) on a wall hit
    pub const WALL_BOUNCE: f32 = 0.6;
    /// Velocity kick applied to both balls of an overlapping pair
    pub const COLLISION_IMPULSE: f32 = 0.3;

    /// Center distance at which two balls count as connected
    pub const GROUP_RADIUS: f32 = 100.0;

    /// Every color needs at least this many balls
    pub const MIN_BALLS_PER_COLOR: usize = 2;
}

/// Format elapsed milliseconds as `"<seconds>.<millis>s"`, e.g. `"12.045s"`
pub fn format_elapsed(ms: u64) -> String {
    format!("{}.{:03}s", ms / 1000, ms % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0.000s");
        assert_eq!(format_elapsed(7), "0.007s");
        assert_eq!(format_elapsed(12_045), "12.045s");
        assert_eq!(format_elapsed(60_000), "60.000s");
    }
}
