//! Race simulation module
//!
//! All race logic lives here. It must stay free of rendering and platform code:
//! - Fixed ticks only (per-tick physics, race clock = ticks × dt)
//! - Seeded RNG only
//! - Stable iteration order (starting order)

pub mod camera;
pub mod collision;
pub mod course;
pub mod geometry;
pub mod marble;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{
    CollisionResult, marble_rect_collision, resolve_marble_collisions, resolve_marble_pair,
    resolve_obstacle, resolve_obstacles,
};
pub use course::Course;
pub use geometry::{Rect, circle_circle_intersects, circle_rect_intersects};
pub use marble::{Dynamics, Marble, leader};
pub use snapshot::{MarbleView, RaceSnapshot};
pub use state::{Race, RaceEvent, RacePhase};
pub use tick::tick;
