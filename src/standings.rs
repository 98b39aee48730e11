//! Leaderboard over a race
//!
//! Lists ranked marbles in rank order. Marbles that finish after the race
//! completed carry no rank and never appear here.

use serde::Serialize;

use crate::participants::Color;
use crate::sim::Race;

/// Number of places shown on the live leaderboard
pub const LEADERBOARD_SIZE: usize = 5;

/// A single leaderboard entry
#[derive(Debug, Clone, Serialize)]
pub struct StandingEntry {
    pub rank: u32,
    pub label: String,
    pub color: Color,
    /// Race clock (seconds) at the finish
    pub finish_time: f32,
    /// Index into the race's marbles
    pub marble: usize,
}

/// Ranked finishers, best first
#[derive(Debug, Clone, Serialize, Default)]
pub struct Standings {
    pub entries: Vec<StandingEntry>,
}

impl Standings {
    /// Collect every ranked marble of `race`
    pub fn from_race(race: &Race) -> Self {
        let mut entries: Vec<StandingEntry> = race
            .marbles()
            .iter()
            .enumerate()
            .filter_map(|(index, m)| {
                m.rank.map(|rank| StandingEntry {
                    rank,
                    label: m.label.clone(),
                    color: m.color,
                    finish_time: m.finish_time.unwrap_or_default(),
                    marble: index,
                })
            })
            .collect();
        entries.sort_by_key(|e| e.rank);
        Self { entries }
    }

    /// The first `n` places
    pub fn top(&self, n: usize) -> &[StandingEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `"1. label (12.3s)"` lines for the first `n` places
    pub fn podium_lines(&self, n: usize) -> Vec<String> {
        self.top(n)
            .iter()
            .map(|e| format!("{}. {} ({:.1}s)", e.rank, e.label, e.finish_time))
            .collect()
    }
}

/// Winner banner text once the race is complete
pub fn winner_banner(race: &Race) -> Option<String> {
    if !race.is_complete() {
        return None;
    }
    race.winners()
        .next()
        .map(|m| format!("WINNER: {}!", m.label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RaceConfig;
    use crate::participants::Participant;
    use crate::sim::{Course, Marble};
    use glam::Vec2;

    fn race_with_drops(heights: &[f32], threshold: usize) -> Race {
        let config = RaceConfig {
            winner_threshold: threshold,
            ..RaceConfig::short_course()
        };
        let marbles = heights
            .iter()
            .enumerate()
            .map(|(i, &y)| {
                Marble::new(
                    i as u32,
                    &Participant::new(format!("m{i}"), Color::CYAN),
                    Vec2::new(100.0 + 40.0 * i as f32, y),
                    Vec2::ZERO,
                    8.0,
                )
            })
            .collect();
        let course = Course::empty(&config);
        Race::from_parts(config, course, marbles, 0).unwrap()
    }

    #[test]
    fn test_empty_before_anyone_finishes() {
        let race = race_with_drops(&[100.0, 200.0], 1);
        let standings = Standings::from_race(&race);
        assert!(standings.is_empty());
        assert!(standings.top(3).is_empty());
        assert!(winner_banner(&race).is_none());
    }

    #[test]
    fn test_sorted_by_rank() {
        let mut race = race_with_drops(&[400.0, 700.0, 600.0, 100.0], 3);
        while !race.is_complete() {
            race.advance();
        }
        let standings = Standings::from_race(&race);
        assert_eq!(standings.len(), 3);
        let labels: Vec<_> = standings.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["m1", "m2", "m0"]);
        assert_eq!(standings.entries[0].marble, 1);
        assert_eq!(standings.top(2).len(), 2);
        assert_eq!(standings.top(10).len(), 3);
        assert_eq!(winner_banner(&race).as_deref(), Some("WINNER: m1!"));
    }

    #[test]
    fn test_podium_lines() {
        let mut race = race_with_drops(&[700.0, 650.0], 2);
        while !race.is_complete() {
            race.advance();
        }
        let lines = Standings::from_race(&race).podium_lines(3);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1. m0 ("));
        assert!(lines[1].starts_with("2. m1 ("));
    }
}
