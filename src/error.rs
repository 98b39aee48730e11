//! Configuration errors
//!
//! The simulation itself cannot fail once a race has been built; everything
//! that can go wrong is caught when the configuration is checked.

use thiserror::Error;

/// A race configuration that cannot produce a well-defined race.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No participants were supplied.
    #[error("race needs at least one participant")]
    NoParticipants,
    /// Winner threshold is zero or larger than the field.
    #[error("winner threshold {threshold} must be between 1 and the marble count {marbles}")]
    WinnerThreshold { threshold: usize, marbles: usize },
    /// A dimension or physical constant is out of its valid range.
    #[error("{name} = {value} is invalid: {reason}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
    /// A min/max pair is inverted.
    #[error("{name} range is inverted: min {min} > max {max}")]
    InvertedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    /// The camera viewport is taller than the course.
    #[error("viewport height {viewport} exceeds course height {course}")]
    ViewportTooTall { viewport: f32, course: f32 },
    /// The starting grid does not fit inside the course.
    #[error("starting grid spans x = {left}..{right}, outside course width {width}")]
    StartGridOutOfBounds { left: f32, right: f32, width: f32 },
    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// A config file is not valid JSON for `RaceConfig`.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
