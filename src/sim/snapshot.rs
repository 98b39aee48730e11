//! Per-frame view of a race for presentation layers
//!
//! Renderers read a snapshot and never write back into the simulation.

use serde::Serialize;

use super::geometry::Rect;
use super::state::{Race, RaceEvent};
use crate::participants::Color;

/// One marble as a renderer sees it
#[derive(Debug, Clone, Serialize)]
pub struct MarbleView {
    pub label: String,
    pub color: Color,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub finished: bool,
    pub rank: Option<u32>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct RaceSnapshot {
    pub tick: u64,
    /// Race clock in seconds
    pub elapsed: f32,
    pub complete: bool,
    pub course_width: f32,
    pub course_height: f32,
    pub finish_y: f32,
    /// Vertical viewport offset when the course scrolls
    pub camera_y: Option<f32>,
    /// Marbles in starting order
    pub marbles: Vec<MarbleView>,
    pub obstacles: Vec<Rect>,
    /// Indices into `marbles`, in rank order
    pub winners: Vec<usize>,
    pub events: Vec<RaceEvent>,
}

impl RaceSnapshot {
    pub fn capture(race: &Race) -> Self {
        let course = race.course();
        Self {
            tick: race.ticks(),
            elapsed: race.elapsed(),
            complete: race.is_complete(),
            course_width: course.width,
            course_height: course.height,
            finish_y: course.finish_y,
            camera_y: race.camera().map(|c| c.y),
            marbles: race
                .marbles()
                .iter()
                .map(|m| MarbleView {
                    label: m.label.clone(),
                    color: m.color,
                    x: m.pos.x,
                    y: m.pos.y,
                    radius: m.radius,
                    finished: m.finished,
                    rank: m.rank,
                })
                .collect(),
            obstacles: course.obstacles.clone(),
            winners: race.winner_indices().to_vec(),
            events: race.events().to_vec(),
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
