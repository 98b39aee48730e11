//! Marble dynamics
//!
//! Integration is per tick, not per second: gravity is added to the vertical
//! velocity once per tick and the position advances by the velocity once per
//! tick. The race clock (`dt`) only stamps finish times.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::RaceConfig;
use crate::participants::{Color, Participant};

/// Per-tick motion constants shared by every marble in a race
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dynamics {
    pub gravity: f32,
    pub friction: f32,
    pub bounce_damping: f32,
    /// Per-axis cap; the short course runs without one
    pub max_speed: Option<f32>,
    pub course_width: f32,
}

impl Dynamics {
    pub fn from_config(config: &RaceConfig) -> Self {
        Self {
            gravity: config.gravity,
            friction: config.friction,
            bounce_damping: config.bounce_damping,
            max_speed: config.max_speed,
            course_width: config.course_width,
        }
    }
}

/// A racing marble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marble {
    /// Starting order (0-based); also the tie-break order
    pub id: u32,
    pub label: String,
    pub color: Color,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Once set, never cleared; position and velocity freeze
    pub finished: bool,
    /// Race clock (seconds) at the tick the finish was detected
    pub finish_time: Option<f32>,
    /// Tick the finish was detected
    pub finish_tick: Option<u64>,
    /// 1-based finishing position, assigned once
    pub rank: Option<u32>,
}

impl Marble {
    pub fn new(id: u32, participant: &Participant, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            label: participant.label.clone(),
            color: participant.color,
            pos,
            vel,
            radius,
            finished: false,
            finish_time: None,
            finish_tick: None,
            rank: None,
        }
    }

    /// Still moving and subject to physics
    #[inline]
    pub fn is_racing(&self) -> bool {
        !self.finished
    }

    /// Advance one tick: gravity, horizontal friction, optional speed cap,
    /// position update, then wall bounce. Returns true if a wall was hit.
    pub fn integrate(&mut self, dynamics: &Dynamics) -> bool {
        if self.finished {
            return false;
        }

        self.vel.y += dynamics.gravity;
        self.vel.x *= dynamics.friction;

        if let Some(max) = dynamics.max_speed {
            self.vel = self.vel.clamp(Vec2::splat(-max), Vec2::splat(max));
        }

        self.pos += self.vel;

        self.contain(dynamics.course_width, dynamics.bounce_damping)
    }

    /// Keep the marble between the side walls, reflecting and damping `vx`
    /// when it reached or crossed one. Returns true on a wall hit.
    pub fn contain(&mut self, course_width: f32, bounce_damping: f32) -> bool {
        if self.finished {
            return false;
        }
        let left = self.radius;
        let right = (course_width - self.radius).max(left);
        if self.pos.x <= left || self.pos.x >= right {
            self.vel.x *= -bounce_damping;
            self.pos.x = self.pos.x.clamp(left, right);
            return true;
        }
        false
    }

    /// Push the marble back inside the walls after a collision moved it out.
    /// Unlike `contain`, a marble resting against a wall is left alone and
    /// `vx` only flips if it still points out of the course.
    pub fn keep_inside(&mut self, course_width: f32, bounce_damping: f32) -> bool {
        if self.finished {
            return false;
        }
        let left = self.radius;
        let right = (course_width - self.radius).max(left);
        if self.pos.x < left {
            self.pos.x = left;
            if self.vel.x < 0.0 {
                self.vel.x *= -bounce_damping;
            }
            true
        } else if self.pos.x > right {
            self.pos.x = right;
            if self.vel.x > 0.0 {
                self.vel.x *= -bounce_damping;
            }
            true
        } else {
            false
        }
    }

    /// Mark the marble finished if it is past the finish boundary.
    /// Returns true only on the tick the finish is first detected.
    pub fn check_finish(&mut self, finish_y: f32, elapsed: f32, tick: u64) -> bool {
        if self.finished || self.pos.y <= finish_y {
            return false;
        }
        self.finished = true;
        self.finish_time = Some(elapsed);
        self.finish_tick = Some(tick);
        true
    }

    /// Assign a finishing position; an existing rank is never replaced
    pub fn assign_rank(&mut self, rank: u32) -> bool {
        if self.rank.is_some() {
            return false;
        }
        self.rank = Some(rank);
        true
    }
}

/// The deepest marble still racing; the first one wins a tie
pub fn leader(marbles: &[Marble]) -> Option<&Marble> {
    marbles
        .iter()
        .filter(|m| m.is_racing())
        .reduce(|best, m| if m.pos.y > best.pos.y { m } else { best })
}
