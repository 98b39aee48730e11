//! Race invariants checked over random seeds

use marble_race::participants::sample_roster;
use marble_race::sim::{Course, Race, RacePhase};
use marble_race::{CourseLayout, Profile, RaceConfig};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Tick `race` and assert every invariant after each tick, including that
/// collision resolution leaves no racing marble inside an obstacle
fn run_checked(race: &mut Race, ticks: u32) -> Result<(), TestCaseError> {
    let width = race.config().course_width;
    let mut finished: Vec<bool> = race.marbles().iter().map(|m| m.finished).collect();
    let mut ranks: Vec<Option<u32>> = race.marbles().iter().map(|m| m.rank).collect();
    let mut winners: Option<Vec<usize>> = None;

    for _ in 0..ticks {
        race.advance();

        for (i, m) in race.marbles().iter().enumerate() {
            // Finished never reverts, ranks never change once given
            prop_assert!(!finished[i] || m.finished);
            if let Some(rank) = ranks[i] {
                prop_assert_eq!(m.rank, Some(rank));
            }
            finished[i] = m.finished;
            ranks[i] = m.rank;

            if m.is_racing() {
                prop_assert!(
                    m.pos.x >= m.radius && m.pos.x <= width - m.radius,
                    "marble {} escaped at x = {}",
                    i,
                    m.pos.x
                );
                prop_assert!(m.pos.is_finite() && m.vel.is_finite());
                for (o, obstacle) in race.course().obstacles.iter().enumerate() {
                    prop_assert!(
                        obstacle.distance_to(m.pos) >= m.radius - 1e-2,
                        "tick {}: marble {} inside obstacle {} at {:?}",
                        race.ticks(),
                        i,
                        o,
                        m.pos
                    );
                }
            }
        }

        // Ranks are 1..=k with no gaps, ordered by finish time
        let mut ranked: Vec<_> = race
            .marbles()
            .iter()
            .filter_map(|m| m.rank.map(|r| (r, m.finish_time.unwrap())))
            .collect();
        ranked.sort_by_key(|(r, _)| *r);
        for (expected, (rank, _)) in ranked.iter().enumerate() {
            prop_assert_eq!(*rank, expected as u32 + 1);
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].1 <= pair[1].1);
        }

        // Completion is terminal and the winners never change afterwards
        if let Some(previous) = &winners {
            prop_assert_eq!(race.phase(), RacePhase::Complete);
            prop_assert_eq!(race.winner_indices(), previous.as_slice());
        } else if race.is_complete() {
            prop_assert_eq!(race.winner_indices().len(), race.config().winner_threshold);
            winners = Some(race.winner_indices().to_vec());
        }

        if let Some(max) = race.config().max_speed {
            for m in race.marbles() {
                // Collision response may add a little on top of the cap
                prop_assert!(m.vel.y.abs() <= max * 2.0);
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn short_course_invariants(seed in any::<u64>()) {
        let mut race = Race::new(RaceConfig::short_course(), &sample_roster(15), seed).unwrap();
        run_checked(&mut race, 900)?;
    }

    #[test]
    fn long_course_invariants(seed in any::<u64>()) {
        let mut race = Race::new(RaceConfig::long_course(), &sample_roster(20), seed).unwrap();
        run_checked(&mut race, 1200)?;
    }

    #[test]
    fn generator_always_terminates(
        seed in any::<u64>(),
        band_min in 0.0f32..400.0,
        band_max in 0.0f32..400.0,
        lattice in any::<bool>(),
        profile in prop_oneof![Just(Profile::Short), Just(Profile::Long)],
    ) {
        let mut config = profile.config();
        config.course.band_min = band_min;
        config.course.band_max = band_max;
        if lattice {
            config.course.layout = CourseLayout::Lattice;
        }
        let course = Course::generate(&config, &mut Pcg32::seed_from_u64(seed));
        for rect in &course.obstacles {
            prop_assert!(rect.x >= 0.0);
            prop_assert!(rect.right() <= config.course_width + 1e-3);
        }
    }
}
