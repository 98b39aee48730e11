//! Obstacle course generation
//!
//! Courses are rebuilt from scratch for every race. Generation cannot fail:
//! every draw is bounded and every loop advances by a positive step, so a
//! (possibly sparse) layout always comes back.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::clamp_range;
use crate::config::{CourseLayout, CourseParams, RaceConfig};

/// Smallest band height the banded generator will advance by
const MIN_BAND_HEIGHT: f32 = 1.0;

/// Classic lattice rows: (first row, spacing)
const LATTICE_SIDE_ROWS: (f32, f32) = (150.0, 120.0);
const LATTICE_CENTER_ROWS: (f32, f32) = (200.0, 150.0);
const LATTICE_FUNNEL_ROWS: (f32, f32) = (300.0, 200.0);
const LATTICE_SIDE_CHANCE: f64 = 0.8;
const LATTICE_CENTER_CHANCE: f64 = 0.6;
/// Lattice centre platforms start this far left of the course centre
const LATTICE_CENTER_OFFSET: f32 = 100.0;

/// The bounded race area and its obstacles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub width: f32,
    pub height: f32,
    /// Descent coordinate past which a marble has finished
    pub finish_y: f32,
    pub layout: CourseLayout,
    /// Static colliders, never mutated during a race
    pub obstacles: Vec<Rect>,
}

impl Course {
    /// A course with no obstacles
    pub fn empty(config: &RaceConfig) -> Self {
        Self::with_obstacles(config, Vec::new())
    }

    /// A course with a fixed obstacle set
    pub fn with_obstacles(config: &RaceConfig, obstacles: Vec<Rect>) -> Self {
        Self {
            width: config.course_width,
            height: config.course_height,
            finish_y: config.finish_y(),
            layout: config.course.layout,
            obstacles,
        }
    }

    /// Generate a fresh layout for `config`
    pub fn generate<R: Rng + ?Sized>(config: &RaceConfig, rng: &mut R) -> Self {
        let params = &config.course;
        let (width, height) = (config.course_width, config.course_height);
        let obstacles = match params.layout {
            CourseLayout::Banded => generate_banded(params, width, height, rng),
            CourseLayout::Lattice => generate_lattice(params, width, height, rng),
        };

        log::info!(
            "Generated {:?} course {}x{}: {} obstacles",
            params.layout,
            width,
            height,
            obstacles.len()
        );

        Self::with_obstacles(config, obstacles)
    }
}

/// Sample from a range that may be inverted or negative without panicking
fn sample<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    let (lo, hi) = (a.min(b).max(0.0), a.max(b).max(0.0));
    rng.random_range(lo..=hi)
}

fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random_bool(if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) })
}

/// Build a rectangle, shrinking and shifting it to stay within `[0, course_width]`
fn fit(x: f32, y: f32, width: f32, height: f32, course_width: f32) -> Rect {
    let width = width.clamp(0.0, course_width);
    let x = clamp_range(x, 0.0, course_width - width);
    Rect::new(x, y, width, height.max(0.0))
}

/// Randomized-height bands, each independently sampling its features
fn generate_banded<R: Rng + ?Sized>(
    p: &CourseParams,
    width: f32,
    height: f32,
    rng: &mut R,
) -> Vec<Rect> {
    let mut obstacles = Vec::new();
    let end = height - p.bottom_margin;
    let band_lo = p.band_min.max(MIN_BAND_HEIGHT);
    let band_hi = p.band_max.max(band_lo);
    let thickness = p.platform_thickness;

    let mut y = p.top_margin;
    while y < end {
        let band = rng.random_range(band_lo..=band_hi);

        if chance(rng, p.p_left) {
            let w = sample(rng, p.side_width_min, p.side_width_max);
            let row = y + sample(rng, 0.0, band * 0.5);
            obstacles.push(fit(p.side_margin, row, w, thickness, width));
        }

        if chance(rng, p.p_right) {
            let w = sample(rng, p.side_width_min, p.side_width_max);
            let row = y + sample(rng, 0.0, band * 0.5);
            obstacles.push(fit(width - p.side_margin - w, row, w, thickness, width));
        }

        if chance(rng, p.p_center) {
            let w = sample(rng, p.center_width_min, p.center_width_max);
            let shift = sample(rng, 0.0, 2.0 * p.center_jitter) - p.center_jitter;
            let row = y + band * 0.5;
            obstacles.push(fit(width / 2.0 - w / 2.0 + shift, row, w, thickness, width));
        }

        if chance(rng, p.p_funnel) {
            let (wall_w, wall_h) = (p.funnel_wall_width, p.funnel_wall_height);
            obstacles.push(fit(p.funnel_inset, y, wall_w, wall_h, width));
            obstacles.push(fit(width - p.funnel_inset - wall_w, y, wall_w, wall_h, width));
        }

        if chance(rng, p.p_zigzag) {
            let mut left = rng.random_bool(0.5);
            for step in 0..p.zigzag_steps {
                let w = sample(rng, p.zigzag_width_min, p.zigzag_width_max);
                let x = if left {
                    p.side_margin
                } else {
                    width - p.side_margin - w
                };
                let row = y + step as f32 * p.zigzag_step_gap;
                obstacles.push(fit(x, row, w, thickness, width));
                left = !left;
            }
        }

        let next = y + band;
        if next <= y {
            break;
        }
        y = next;
    }

    obstacles
}

/// Fixed-spacing rows: side platforms, centre platforms, then funnel pairs
fn generate_lattice<R: Rng + ?Sized>(
    p: &CourseParams,
    width: f32,
    height: f32,
    rng: &mut R,
) -> Vec<Rect> {
    let mut obstacles = Vec::new();
    let end = height - p.bottom_margin;
    let thickness = p.platform_thickness;

    for y in rows(LATTICE_SIDE_ROWS, end) {
        if chance(rng, LATTICE_SIDE_CHANCE) {
            let w = sample(rng, p.side_width_min, p.side_width_max);
            let x = if rng.random_bool(0.5) {
                p.side_margin
            } else {
                width - p.side_margin - w
            };
            obstacles.push(fit(x, y, w, thickness, width));
        }
    }

    for y in rows(LATTICE_CENTER_ROWS, end) {
        if chance(rng, LATTICE_CENTER_CHANCE) {
            let shift = sample(rng, 0.0, 2.0 * p.center_jitter) - p.center_jitter;
            let w = sample(rng, p.center_width_min, p.center_width_max);
            let x = width / 2.0 - LATTICE_CENTER_OFFSET + shift;
            obstacles.push(fit(x, y, w, thickness, width));
        }
    }

    for y in rows(LATTICE_FUNNEL_ROWS, end) {
        let (wall_w, wall_h) = (p.funnel_wall_width, p.funnel_wall_height);
        obstacles.push(fit(p.funnel_inset, y, wall_w, wall_h, width));
        obstacles.push(fit(width - p.funnel_inset - wall_w, y, wall_w, wall_h, width));
    }

    obstacles
}

/// Row positions `start, start + step, ...` strictly below `end`
fn rows((start, step): (f32, f32), end: f32) -> impl Iterator<Item = f32> {
    (0u32..)
        .map(move |i| start + i as f32 * step)
        .take_while(move |&y| y < end)
}
