//! Race participants
//!
//! The engine treats labels as opaque: no deduplication, no validation.
//! Colors are carried through for the renderer and never read by the physics.

use serde::{Deserialize, Serialize};

/// RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const RED: Color = Color(255, 0, 0);
    pub const BLUE: Color = Color(0, 0, 255);
    pub const GREEN: Color = Color(0, 255, 0);
    pub const YELLOW: Color = Color(255, 255, 0);
    pub const PURPLE: Color = Color(128, 0, 128);
    pub const ORANGE: Color = Color(255, 165, 0);
    pub const PINK: Color = Color(255, 192, 203);
    pub const CYAN: Color = Color(0, 255, 255);
}

/// Marble colors, assigned round-robin in starting order
pub const PALETTE: [Color; 8] = [
    Color::RED,
    Color::BLUE,
    Color::GREEN,
    Color::YELLOW,
    Color::PURPLE,
    Color::ORANGE,
    Color::PINK,
    Color::CYAN,
];

/// Demo roster used when no participant list is supplied
pub const SAMPLE_LABELS: [&str; 20] = [
    "quartz", "ember", "tidepool", "sable", "juniper", "comet", "marlin", "saffron", "nimbus",
    "cobalt", "thistle", "onyx", "pebble", "zephyr", "lumen", "fennel", "basalt", "kestrel",
    "mica", "drift",
];

/// One racer: label plus display color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub label: String,
    pub color: Color,
}

impl Participant {
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// Build the field from an ordered label list, truncated to `max`
///
/// Order is preserved; it becomes the starting order and the tie-break order.
pub fn roster<S: AsRef<str>>(labels: &[S], max: usize) -> Vec<Participant> {
    labels
        .iter()
        .take(max)
        .enumerate()
        .map(|(i, label)| Participant::new(label.as_ref(), PALETTE[i % PALETTE.len()]))
        .collect()
}

/// Demo roster of up to `max` sample labels
pub fn sample_roster(max: usize) -> Vec<Participant> {
    roster(&SAMPLE_LABELS, max)
}
