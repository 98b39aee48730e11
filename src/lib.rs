//! Marble Race - labeled marbles falling through a generated obstacle course
//!
//! Core modules:
//! - `sim`: Simulation (marble physics, collisions, course generation, ranking, camera)
//! - `config`: Race profiles and validation
//! - `participants`: Labels and colors for the racing marbles
//! - `standings`: Leaderboard views over a race

pub mod config;
pub mod error;
pub mod participants;
pub mod sim;
pub mod standings;

pub use config::{CourseLayout, CourseParams, Profile, RaceConfig};
pub use error::ConfigError;
pub use participants::{Color, Participant};
pub use standings::Standings;

/// Default configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz frame pacing)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Course dimensions
    pub const COURSE_WIDTH: f32 = 1200.0;
    pub const SHORT_COURSE_HEIGHT: f32 = 800.0;
    pub const LONG_COURSE_HEIGHT: f32 = 4000.0;
    pub const VIEWPORT_HEIGHT: f32 = 800.0;
    /// Finish boundary sits this far above the course bottom
    pub const FINISH_OFFSET: f32 = 50.0;

    /// Per-tick physics defaults
    pub const GRAVITY: f32 = 0.3;
    pub const FRICTION: f32 = 0.95;
    pub const BOUNCE_DAMPING: f32 = 0.7;
    /// Velocity cap for the long course (per axis)
    pub const MAX_SPEED: f32 = 12.0;
    /// Marble-marble restitution (long course)
    pub const RESTITUTION: f32 = 0.8;
    /// Horizontal kick range after an obstacle hit (±)
    pub const OBSTACLE_JITTER: f32 = 0.5;
    /// Initial horizontal velocity range (±)
    pub const LAUNCH_SPREAD: f32 = 1.0;

    /// Marble defaults
    pub const MARBLE_RADIUS: f32 = 8.0;

    /// Camera defaults
    pub const CAMERA_SMOOTHING: f32 = 0.1;
    pub const CAMERA_FINISH_MARGIN: f32 = 100.0;
}

/// Clamp helper that tolerates an inverted range by collapsing it to `lo`
#[inline]
pub fn clamp_range(value: f32, lo: f32, hi: f32) -> f32 {
    if hi < lo { lo } else { value.clamp(lo, hi) }
}
