//! Race configuration
//!
//! Two profiles share one engine: the short course fits on a single screen,
//! the long course scrolls under a camera, caps marble speed and lets marbles
//! collide with each other.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Largest magnitude any length or rate may take. Keeps every `±x` sampling
/// range representable.
pub const MAX_EXTENT: f32 = 1.0e6;

/// Upper bound on platforms per zig-zag staircase
pub const MAX_ZIGZAG_STEPS: u32 = 16;

/// Race format presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Profile {
    #[default]
    Short,
    Long,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Short => "short",
            Profile::Long => "long",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "short" | "s" => Some(Profile::Short),
            "long" | "l" => Some(Profile::Long),
            _ => None,
        }
    }

    /// Full configuration for this preset
    pub fn config(&self) -> RaceConfig {
        match self {
            Profile::Short => RaceConfig::short_course(),
            Profile::Long => RaceConfig::long_course(),
        }
    }
}

/// Obstacle layout strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CourseLayout {
    /// Randomized-height bands, each with independently sampled features
    #[default]
    Banded,
    /// Fixed-spacing rows of side platforms, centre platforms and funnels
    Lattice,
}

/// Procedural course generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseParams {
    pub layout: CourseLayout,
    /// First band starts at this descent coordinate
    pub top_margin: f32,
    /// No band starts within this distance of the course bottom
    pub bottom_margin: f32,
    pub band_min: f32,
    pub band_max: f32,
    /// Height of every platform
    pub platform_thickness: f32,

    // === Side platforms ===
    /// Gap between a side platform and its wall
    pub side_margin: f32,
    pub side_width_min: f32,
    pub side_width_max: f32,

    // === Centre platforms ===
    pub center_width_min: f32,
    pub center_width_max: f32,
    /// Horizontal offset range (±) around the course centre
    pub center_jitter: f32,

    // === Funnels ===
    /// Distance from each wall to its funnel wall
    pub funnel_inset: f32,
    pub funnel_wall_width: f32,
    pub funnel_wall_height: f32,

    // === Zig-zag staircase ===
    pub zigzag_steps: u32,
    pub zigzag_width_min: f32,
    pub zigzag_width_max: f32,
    /// Vertical distance between consecutive steps
    pub zigzag_step_gap: f32,

    // === Per-band placement probabilities ===
    pub p_left: f64,
    pub p_right: f64,
    pub p_center: f64,
    pub p_funnel: f64,
    pub p_zigzag: f64,
}

impl Default for CourseParams {
    fn default() -> Self {
        Self {
            layout: CourseLayout::Banded,
            top_margin: 150.0,
            bottom_margin: 100.0,
            band_min: 120.0,
            band_max: 200.0,
            platform_thickness: 20.0,

            side_margin: 50.0,
            side_width_min: 150.0,
            side_width_max: 300.0,

            center_width_min: 100.0,
            center_width_max: 200.0,
            center_jitter: 50.0,

            funnel_inset: 200.0,
            funnel_wall_width: 20.0,
            funnel_wall_height: 80.0,

            zigzag_steps: 3,
            zigzag_width_min: 120.0,
            zigzag_width_max: 220.0,
            zigzag_step_gap: 45.0,

            p_left: 0.45,
            p_right: 0.45,
            p_center: 0.4,
            p_funnel: 0.25,
            p_zigzag: 0.15,
        }
    }
}

impl CourseParams {
    /// Sparser, taller bands for the scrolling course
    pub fn long_course() -> Self {
        Self {
            top_margin: 250.0,
            band_min: 160.0,
            band_max: 300.0,
            p_zigzag: 0.25,
            ..Self::default()
        }
    }
}

/// Complete race configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub profile: Profile,

    // === Course ===
    pub course_width: f32,
    pub course_height: f32,
    /// Finish boundary = course_height - finish_offset
    pub finish_offset: f32,
    /// Camera viewport height; `None` disables the camera
    pub viewport_height: Option<f32>,

    // === Physics (per tick) ===
    /// Seconds of race clock per tick
    pub dt: f32,
    pub gravity: f32,
    pub friction: f32,
    pub bounce_damping: f32,
    /// Per-axis velocity cap; `None` leaves velocity unbounded
    pub max_speed: Option<f32>,
    pub marble_radius: f32,
    pub marble_collisions: bool,
    pub restitution: f32,
    pub obstacle_jitter: f32,
    pub launch_spread: f32,

    // === Race ===
    /// Race completes once this many marbles have finished
    pub winner_threshold: usize,
    /// Participant list is truncated to this many marbles
    pub max_marbles: usize,

    // === Starting grid ===
    pub start_origin: Vec2,
    pub start_spacing: Vec2,
    pub start_columns: usize,

    // === Camera ===
    pub camera_smoothing: f32,
    pub camera_finish_margin: f32,

    pub course: CourseParams,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self::short_course()
    }
}

impl RaceConfig {
    /// Single-screen course: no speed cap, no marble-marble contact, top 5 win
    pub fn short_course() -> Self {
        Self {
            profile: Profile::Short,

            course_width: COURSE_WIDTH,
            course_height: SHORT_COURSE_HEIGHT,
            finish_offset: FINISH_OFFSET,
            viewport_height: None,

            dt: SIM_DT,
            gravity: GRAVITY,
            friction: FRICTION,
            bounce_damping: BOUNCE_DAMPING,
            max_speed: None,
            marble_radius: MARBLE_RADIUS,
            marble_collisions: false,
            restitution: RESTITUTION,
            obstacle_jitter: OBSTACLE_JITTER,
            launch_spread: LAUNCH_SPREAD,

            winner_threshold: 5,
            max_marbles: 15,

            start_origin: Vec2::new(100.0, 50.0),
            start_spacing: Vec2::new(40.0, 20.0),
            start_columns: 5,

            camera_smoothing: CAMERA_SMOOTHING,
            camera_finish_margin: CAMERA_FINISH_MARGIN,

            course: CourseParams::default(),
        }
    }

    /// Scrolling course: speed cap, marble-marble collisions, top 3 win
    pub fn long_course() -> Self {
        Self {
            profile: Profile::Long,
            course_height: LONG_COURSE_HEIGHT,
            viewport_height: Some(VIEWPORT_HEIGHT),
            max_speed: Some(MAX_SPEED),
            marble_collisions: true,
            winner_threshold: 3,
            max_marbles: 25,
            start_origin: Vec2::new(420.0, 40.0),
            start_spacing: Vec2::new(40.0, 24.0),
            start_columns: 10,
            course: CourseParams::long_course(),
            ..Self::short_course()
        }
    }

    /// Descent coordinate past which a marble has finished
    #[inline]
    pub fn finish_y(&self) -> f32 {
        self.course_height - self.finish_offset
    }

    /// Parse a config from JSON; missing fields take short-course defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded {} race config from {}", config.profile.as_str(), path.display());
        Ok(config)
    }

    /// Number of marbles a roster of `participants` labels produces
    pub fn population(&self, participants: usize) -> usize {
        participants.min(self.max_marbles)
    }

    /// Starting position of the marble at `index` in the grid
    pub fn start_position(&self, index: usize) -> Vec2 {
        let columns = self.start_columns.max(1);
        let col = (index % columns) as f32;
        let row = (index / columns) as f32;
        self.start_origin + Vec2::new(col * self.start_spacing.x, row * self.start_spacing.y)
    }

    /// Reject configurations that cannot produce a well-defined race of `marbles` marbles
    pub fn validate(&self, marbles: usize) -> Result<(), ConfigError> {
        if marbles == 0 {
            return Err(ConfigError::NoParticipants);
        }
        if self.winner_threshold == 0 || self.winner_threshold > marbles {
            return Err(ConfigError::WinnerThreshold {
                threshold: self.winner_threshold,
                marbles,
            });
        }

        positive("marble_radius", self.marble_radius)?;
        positive("dt", self.dt)?;
        positive("course_height", self.course_height)?;
        finite("course_width", self.course_width)?;
        if self.course_width < 2.0 * self.marble_radius {
            return Err(ConfigError::OutOfRange {
                name: "course_width",
                value: self.course_width,
                reason: "must fit at least one marble",
            });
        }
        finite("finish_offset", self.finish_offset)?;
        if self.finish_offset < 0.0 || self.finish_offset >= self.course_height {
            return Err(ConfigError::OutOfRange {
                name: "finish_offset",
                value: self.finish_offset,
                reason: "finish boundary must lie inside the course",
            });
        }
        if let Some(viewport) = self.viewport_height {
            positive("viewport_height", viewport)?;
            if viewport > self.course_height {
                return Err(ConfigError::ViewportTooTall {
                    viewport,
                    course: self.course_height,
                });
            }
        }
        if let Some(max_speed) = self.max_speed {
            positive("max_speed", max_speed)?;
        }

        unit("friction", self.friction)?;
        unit("bounce_damping", self.bounce_damping)?;
        unit("restitution", self.restitution)?;
        non_negative("gravity", self.gravity)?;
        non_negative("obstacle_jitter", self.obstacle_jitter)?;
        non_negative("launch_spread", self.launch_spread)?;
        if !(self.camera_smoothing > 0.0 && self.camera_smoothing <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "camera_smoothing",
                value: self.camera_smoothing,
                reason: "must be in (0, 1]",
            });
        }
        finite("camera_finish_margin", self.camera_finish_margin)?;
        finite("start_origin.x", self.start_origin.x)?;
        finite("start_origin.y", self.start_origin.y)?;
        finite("start_spacing.x", self.start_spacing.x)?;
        finite("start_spacing.y", self.start_spacing.y)?;

        // Every grid slot has to sit inside the walls
        let columns = self.start_columns.max(1).min(marbles);
        let left = self.start_origin.x;
        let right = left + (columns - 1) as f32 * self.start_spacing.x;
        let (left, right) = (left.min(right), left.max(right));
        if left < self.marble_radius || right > self.course_width - self.marble_radius {
            return Err(ConfigError::StartGridOutOfBounds {
                left,
                right,
                width: self.course_width,
            });
        }

        self.course.validate()
    }
}

impl CourseParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("band_min", self.band_min)?;
        ordered("band", self.band_min, self.band_max)?;
        ordered("side_width", self.side_width_min, self.side_width_max)?;
        ordered("center_width", self.center_width_min, self.center_width_max)?;
        ordered("zigzag_width", self.zigzag_width_min, self.zigzag_width_max)?;
        positive("platform_thickness", self.platform_thickness)?;
        non_negative("center_jitter", self.center_jitter)?;
        non_negative("zigzag_step_gap", self.zigzag_step_gap)?;
        finite("top_margin", self.top_margin)?;
        finite("bottom_margin", self.bottom_margin)?;
        finite("side_margin", self.side_margin)?;
        finite("funnel_inset", self.funnel_inset)?;
        non_negative("funnel_wall_width", self.funnel_wall_width)?;
        non_negative("funnel_wall_height", self.funnel_wall_height)?;
        if self.zigzag_steps > MAX_ZIGZAG_STEPS {
            return Err(ConfigError::OutOfRange {
                name: "zigzag_steps",
                value: self.zigzag_steps as f32,
                reason: "too many steps for one staircase",
            });
        }
        for (name, p) in [
            ("p_left", self.p_left),
            ("p_right", self.p_right),
            ("p_center", self.p_center),
            ("p_funnel", self.p_funnel),
            ("p_zigzag", self.p_zigzag),
        ] {
            unit(name, p as f32)?;
        }
        Ok(())
    }
}

/// Finite and no larger than `MAX_EXTENT` in magnitude
fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value.abs() <= MAX_EXTENT {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            reason: "must be finite and within 1e6 in magnitude",
        })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            reason: "must be positive",
        })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            reason: "must not be negative",
        })
    }
}

fn unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            reason: "must be in [0, 1]",
        })
    }
}

fn ordered(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(name, min)?;
    finite(name, max)?;
    if min < 0.0 {
        return Err(ConfigError::OutOfRange {
            name,
            value: min,
            reason: "minimum must not be negative",
        });
    }
    if min > max {
        return Err(ConfigError::InvertedRange { name, min, max });
    }
    Ok(())
}
