//! End-to-end race scenarios

use glam::Vec2;
use marble_race::participants::{Color, Participant, sample_roster};
use marble_race::sim::{Course, Marble, Race, RaceEvent, RacePhase, Rect};
use marble_race::{Profile, RaceConfig};

fn marble(label: &str, x: f32, y: f32) -> Marble {
    Marble::new(
        0,
        &Participant::new(label, Color::PURPLE),
        Vec2::new(x, y),
        Vec2::ZERO,
        8.0,
    )
}

fn open_race(config: RaceConfig, marbles: Vec<Marble>) -> Race {
    let course = Course::empty(&config);
    Race::from_parts(config, course, marbles, 42).expect("valid scenario")
}

#[test]
fn single_marble_free_fall_matches_integration_rule() {
    let config = RaceConfig {
        course_height: 200.0,
        winner_threshold: 1,
        ..RaceConfig::short_course()
    };
    assert_eq!(config.finish_y(), 150.0);
    let mut race = open_race(config, vec![marble("solo", 600.0, 0.0)]);

    let mut vy = 0.0f32;
    let mut y = 0.0f32;
    while !race.is_complete() {
        race.advance();
        vy += 0.3;
        y += vy;
        let m = &race.marbles()[0];
        assert!((m.pos.y - y).abs() < 1e-3, "tick {}: {} vs {}", race.ticks(), m.pos.y, y);
        assert_eq!(m.pos.x, 600.0);
        assert!(race.ticks() <= 100, "marble never finished");
    }

    // 0.3 * n(n+1)/2 first exceeds 150 at n = 32
    assert_eq!(race.ticks(), 32);
    let m = &race.marbles()[0];
    assert_eq!(m.finish_tick, Some(32));
    assert_eq!(m.rank, Some(1));
    assert!((m.finish_time.unwrap() - 32.0 / 60.0).abs() < 1e-5);
}

#[test]
fn overlapping_pair_collides_once_and_separates() {
    let config = RaceConfig {
        winner_threshold: 2,
        ..RaceConfig::long_course()
    };
    let mut race = open_race(
        config,
        vec![marble("left", 600.0, 100.0), marble("right", 610.0, 100.0)],
    );

    let mut collisions = 0;
    for _ in 0..120 {
        race.advance();
        collisions += race
            .events()
            .iter()
            .filter(|e| matches!(e, RaceEvent::MarbleCollision { a: 0, b: 1 }))
            .count();
        let [a, b] = [&race.marbles()[0], &race.marbles()[1]];
        assert!(a.pos.distance(b.pos) >= a.radius + b.radius);
    }
    assert_eq!(collisions, 1);
}

#[test]
fn race_completes_on_the_tick_the_threshold_is_reached() {
    let config = RaceConfig {
        winner_threshold: 3,
        ..RaceConfig::short_course()
    };
    let marbles = vec![
        marble("a", 100.0, 700.0),
        marble("b", 140.0, 650.0),
        marble("c", 180.0, 600.0),
        marble("d", 220.0, 300.0),
        marble("e", 260.0, 200.0),
    ];
    let mut race = open_race(config, marbles);

    loop {
        race.advance();
        let finished = race.finished_count();
        if finished < 3 {
            assert_eq!(race.phase(), RacePhase::Running);
        } else {
            assert_eq!(finished, 3);
            assert_eq!(race.phase(), RacePhase::Complete);
            break;
        }
        assert!(race.ticks() < 1000);
    }

    let winners: Vec<_> = race.winners().map(|m| m.label.as_str()).collect();
    assert_eq!(winners, vec!["a", "b", "c"]);
    assert!(!race.marbles()[3].finished);
    assert!(!race.marbles()[4].finished);

    // Stragglers keep falling but the result is frozen
    for _ in 0..300 {
        race.advance();
    }
    assert!(race.all_finished());
    assert_eq!(race.winner_indices(), &[0, 1, 2]);
    assert!(race.marbles()[3].rank.is_none());
}

#[test]
fn simultaneous_finishers_ranked_in_starting_order() {
    let config = RaceConfig {
        winner_threshold: 5,
        ..RaceConfig::short_course()
    };
    let labels = ["v", "w", "x", "y", "z"];
    let marbles = labels
        .iter()
        .enumerate()
        .map(|(i, l)| marble(l, 100.0 + 40.0 * i as f32, 700.0))
        .collect();
    let mut race = open_race(config, marbles);
    while !race.is_complete() {
        race.advance();
    }

    let times: Vec<_> = race.marbles().iter().map(|m| m.finish_time).collect();
    assert!(times.windows(2).all(|w| w[0] == w[1]));
    let ranks: Vec<_> = race.marbles().iter().map(|m| m.rank.unwrap()).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    let winners: Vec<_> = race.winners().map(|m| m.label.as_str()).collect();
    assert_eq!(winners, labels);
}

#[test]
fn restart_discards_everything() {
    for profile in [Profile::Short, Profile::Long] {
        let config = profile.config();
        let mut race = Race::new(config.clone(), &sample_roster(20), 1000).unwrap();
        for _ in 0..400 {
            race.advance();
        }

        let fresh = race.reset(2000);
        assert_eq!(fresh.ticks(), 0);
        assert_eq!(fresh.elapsed(), 0.0);
        assert_eq!(fresh.phase(), RacePhase::Running);
        assert!(fresh.winner_indices().is_empty());
        assert!(fresh.events().is_empty());
        assert_eq!(fresh.marbles().len(), config.max_marbles.min(20));
        assert_ne!(fresh.course().obstacles, race.course().obstacles);
        for (i, m) in fresh.marbles().iter().enumerate() {
            assert_eq!(m.pos, config.start_position(i));
            assert!(!m.finished);
            assert!(m.rank.is_none());
            assert!(m.finish_time.is_none());
        }
        if let Some(camera) = fresh.camera() {
            assert_eq!(camera.y, 0.0);
        }
    }
}

#[test]
fn marble_resting_on_platform_stays_outside() {
    let config = RaceConfig {
        winner_threshold: 1,
        ..RaceConfig::short_course()
    };
    let platform = Rect::new(400.0, 300.0, 400.0, 20.0);
    let course = Course::with_obstacles(&config, vec![platform]);
    let mut race = Race::from_parts(config, course, vec![marble("rest", 600.0, 200.0)], 9).unwrap();

    for _ in 0..600 {
        race.advance();
        let m = &race.marbles()[0];
        if m.is_racing() {
            assert!(
                platform.distance_to(m.pos) >= m.radius - 1e-3,
                "tick {}: marble at {:?} inside platform",
                race.ticks(),
                m.pos
            );
        }
    }
}

#[test]
fn long_course_camera_follows_and_settles() {
    let config = RaceConfig {
        winner_threshold: 1,
        ..RaceConfig::long_course()
    };
    let mut race = open_race(config, vec![marble("cam", 600.0, 40.0)]);

    let mut last_y = 0.0;
    for _ in 0..2000 {
        race.advance();
        let camera = race.camera().unwrap();
        assert!(camera.y >= 0.0 && camera.y <= camera.max_y());
        if race.marbles()[0].is_racing() {
            // Falling marble: camera never moves back up
            assert!(camera.y >= last_y);
        }
        last_y = camera.y;
    }
    assert!(race.all_finished());
    let camera = race.camera().unwrap();
    assert!((camera.y - camera.max_y()).abs() < 1.0);
}
