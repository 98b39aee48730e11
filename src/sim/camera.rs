//! Camera tracking for scrolling courses
//!
//! The camera follows the deepest marble still racing and eases toward it
//! with a first-order low-pass filter. Once every marble is in, it settles
//! on the finish line.

use serde::{Deserialize, Serialize};

use super::marble::{Marble, leader};
use crate::config::RaceConfig;

/// Vertical viewport offset into the course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current offset (top of the viewport)
    pub y: f32,
    /// Offset the camera is easing toward
    pub target_y: f32,
    pub viewport_height: f32,
    pub course_height: f32,
    pub finish_y: f32,
    pub smoothing: f32,
    pub finish_margin: f32,
}

impl Camera {
    pub fn new(viewport_height: f32, config: &RaceConfig) -> Self {
        Self {
            y: 0.0,
            target_y: 0.0,
            viewport_height,
            course_height: config.course_height,
            finish_y: config.finish_y(),
            smoothing: config.camera_smoothing,
            finish_margin: config.camera_finish_margin,
        }
    }

    /// Camera for `config`, if it has a viewport
    pub fn for_config(config: &RaceConfig) -> Option<Self> {
        config.viewport_height.map(|h| Self::new(h, config))
    }

    /// Largest valid offset
    #[inline]
    pub fn max_y(&self) -> f32 {
        (self.course_height - self.viewport_height).max(0.0)
    }

    /// Retarget on the leading racer (or the finish line) and ease toward it
    pub fn update(&mut self, marbles: &[Marble]) {
        self.target_y = match leader(marbles) {
            Some(lead) => lead.pos.y - self.viewport_height / 2.0,
            None => self.finish_y - self.finish_margin,
        };

        self.y += (self.target_y - self.y) * self.smoothing;
        self.y = self.y.clamp(0.0, self.max_y());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::{Color, Participant};
    use glam::Vec2;

    fn marble_at(y: f32) -> Marble {
        Marble::new(
            0,
            &Participant::new("cam", Color::GREEN),
            Vec2::new(600.0, y),
            Vec2::ZERO,
            8.0,
        )
    }

    fn camera() -> Camera {
        let config = RaceConfig::long_course();
        Camera::for_config(&config).unwrap()
    }

    #[test]
    fn test_eases_toward_leader() {
        let mut cam = camera();
        let marbles = vec![marble_at(1000.0), marble_at(1400.0)];
        cam.update(&marbles);
        // Target = 1400 - 400; one step of 10%
        assert_eq!(cam.target_y, 1000.0);
        assert!((cam.y - 100.0).abs() < 1e-4);
        cam.update(&marbles);
        assert!((cam.y - 190.0).abs() < 1e-3);
    }

    #[test]
    fn test_clamped_at_top() {
        let mut cam = camera();
        cam.update(&[marble_at(50.0)]);
        assert!(cam.target_y < 0.0);
        assert_eq!(cam.y, 0.0);
    }

    #[test]
    fn test_clamped_at_bottom() {
        let mut cam = camera();
        cam.y = cam.max_y();
        cam.update(&[marble_at(3990.0)]);
        assert_eq!(cam.y, 3200.0);
    }

    #[test]
    fn test_ignores_finished_marbles() {
        let mut cam = camera();
        let mut done = marble_at(3960.0);
        done.finished = true;
        cam.update(&[done, marble_at(900.0)]);
        assert_eq!(cam.target_y, 500.0);
    }

    #[test]
    fn test_settles_on_finish_when_all_done() {
        let mut cam = camera();
        let mut done = marble_at(3960.0);
        done.finished = true;
        for _ in 0..200 {
            cam.update(std::slice::from_ref(&done));
        }
        assert_eq!(cam.target_y, 3950.0 - 100.0);
        assert!((cam.y - cam.max_y()).abs() < 1e-2);
    }

    #[test]
    fn test_no_camera_without_viewport() {
        assert!(Camera::for_config(&RaceConfig::short_course()).is_none());
    }
}
