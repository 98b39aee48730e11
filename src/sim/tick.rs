//! Fixed timestep simulation tick
//!
//! Phase order within a tick:
//! 1. integrate every racing marble (gravity, friction, speed cap, walls)
//! 2. marble vs. marble (when enabled)
//! 3. marble vs. obstacle
//! 4. finish detection, ranking and the completion check
//! 5. camera

use super::collision::{resolve_marble_collisions, resolve_obstacles};
use super::state::{Race, RaceEvent, RacePhase};

/// Advance the race by one fixed tick
pub fn tick(race: &mut Race) {
    race.events.clear();
    race.time_ticks += 1;

    let dynamics = race.dynamics;
    let width = race.config.course_width;
    let damping = race.config.bounce_damping;

    for marble in &mut race.marbles {
        marble.integrate(&dynamics);
    }

    if race.config.marble_collisions {
        let events = &mut race.events;
        resolve_marble_collisions(&mut race.marbles, race.config.restitution, |a, b| {
            log::trace!("tick {}: marbles {} and {} collided", race.time_ticks, a, b);
            events.push(RaceEvent::MarbleCollision { a, b });
        });
        for marble in &mut race.marbles {
            marble.keep_inside(width, damping);
        }
    }

    let jitter = race.config.obstacle_jitter;
    for (index, marble) in race.marbles.iter_mut().enumerate() {
        if !marble.is_racing() {
            continue;
        }
        resolve_obstacles(
            marble,
            &race.course.obstacles,
            damping,
            jitter,
            &mut race.rng,
            |obstacle| {
                log::trace!(
                    "tick {}: marble {} hit obstacle {}",
                    race.time_ticks,
                    index,
                    obstacle
                );
                race.events.push(RaceEvent::ObstacleHit {
                    marble: index,
                    obstacle,
                })
            },
        );
        marble.keep_inside(width, damping);
    }

    detect_finishes(race);

    if race.phase == RacePhase::Running {
        assign_ranks(race);
        check_completion(race);
    }

    if let Some(camera) = race.camera.as_mut() {
        camera.update(&race.marbles);
    }
}

/// Stamp every marble that crossed the finish boundary this tick
fn detect_finishes(race: &mut Race) {
    let finish_y = race.course.finish_y;
    let elapsed = race.elapsed();
    let tick = race.time_ticks;

    for (index, marble) in race.marbles.iter_mut().enumerate() {
        if marble.check_finish(finish_y, elapsed, tick) {
            log::debug!("{} finished at {:.2}s (tick {})", marble.label, elapsed, tick);
            race.events.push(RaceEvent::Finished {
                marble: index,
                time: elapsed,
            });
        }
    }
}

/// Rank unranked finishers by finish time, continuing from the ranks already
/// handed out. Equal finish times keep starting order (stable sort).
fn assign_ranks(race: &mut Race) {
    let mut pending: Vec<usize> = race
        .marbles
        .iter()
        .enumerate()
        .filter(|(_, m)| m.finished && m.rank.is_none())
        .map(|(i, _)| i)
        .collect();
    if pending.is_empty() {
        return;
    }

    let finish_time = |i: usize| race.marbles[i].finish_time.unwrap_or(f32::INFINITY);
    pending.sort_by(|&a, &b| finish_time(a).total_cmp(&finish_time(b)));

    let mut next = race.ranked_count() as u32 + 1;
    for index in pending {
        let marble = &mut race.marbles[index];
        if marble.assign_rank(next) {
            log::debug!("{} takes position {}", marble.label, next);
            race.events.push(RaceEvent::Ranked {
                marble: index,
                rank: next,
            });
            next += 1;
        }
    }
}

/// Complete the race once the winner threshold is reached or everyone is in
fn check_completion(race: &mut Race) {
    let finished = race.finished_count();
    let threshold = race.config.winner_threshold;
    if finished < threshold && finished < race.marbles.len() {
        return;
    }

    let mut ranked: Vec<usize> = (0..race.marbles.len())
        .filter(|&i| race.marbles[i].rank.is_some())
        .collect();
    ranked.sort_by_key(|&i| race.marbles[i].rank);
    ranked.truncate(threshold);

    race.phase = RacePhase::Complete;
    race.winners = ranked;

    if let Some(first) = race.winners().next() {
        log::info!(
            "Race complete after {:.2}s: {} wins ({} of {} finished)",
            race.elapsed(),
            first.label,
            finished,
            race.marbles.len()
        );
    }
    race.events.push(RaceEvent::RaceComplete {
        winners: race.winners.clone(),
    });
}
