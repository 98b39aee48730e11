//! Race state and core simulation types
//!
//! A `Race` owns everything a single race needs: the course, the marbles, the
//! camera and the RNG stream used by collisions. Restarting never mutates a
//! race in place; `Race::reset` builds a new one and the caller swaps it in.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::course::Course;
use super::marble::{Dynamics, Marble};
use crate::config::RaceConfig;
use crate::error::ConfigError;
use crate::participants::Participant;

/// Mixed into the race seed for the physics stream so it is independent of
/// the course generation stream
const PHYSICS_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Race progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// Marbles are racing and ranks are being handed out
    Running,
    /// Enough marbles finished; ranks and winners are frozen
    Complete,
}

/// Something that happened during the last tick (indices into `Race::marbles`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    /// Two marbles touched and were pushed apart
    MarbleCollision { a: usize, b: usize },
    /// A marble bounced off an obstacle
    ObstacleHit { marble: usize, obstacle: usize },
    /// A marble crossed the finish boundary
    Finished { marble: usize, time: f32 },
    /// A finished marble received its position
    Ranked { marble: usize, rank: u32 },
    /// The race reached its winner threshold
    RaceComplete { winners: Vec<usize> },
}

/// Complete race state
#[derive(Debug, Clone)]
pub struct Race {
    /// Seed the course and physics streams derive from
    pub(crate) seed: u64,
    pub(crate) config: RaceConfig,
    pub(crate) dynamics: Dynamics,
    /// Field in starting order
    pub(crate) roster: Vec<Participant>,
    pub(crate) course: Course,
    /// Marbles in starting order (stable for the renderer)
    pub(crate) marbles: Vec<Marble>,
    pub(crate) camera: Option<Camera>,
    pub(crate) phase: RacePhase,
    /// Indices of the first `winner_threshold` marbles by rank
    pub(crate) winners: Vec<usize>,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    /// Events from the most recent tick
    pub(crate) events: Vec<RaceEvent>,
    /// Collision jitter source
    pub(crate) rng: Pcg32,
}

impl Race {
    /// Start a race for `participants` (truncated to `config.max_marbles`)
    pub fn new(
        config: RaceConfig,
        participants: &[Participant],
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let count = config.population(participants.len());
        let roster = participants[..count].to_vec();
        config.validate(roster.len())?;
        Ok(Self::build(config, roster, seed))
    }

    /// Start a race from an explicit course and marble set
    ///
    /// The marbles keep their positions and velocities; starting order is the
    /// slice order. Useful for scripted scenarios.
    pub fn from_parts(
        config: RaceConfig,
        course: Course,
        mut marbles: Vec<Marble>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate(marbles.len())?;
        for (i, marble) in marbles.iter_mut().enumerate() {
            marble.id = i as u32;
        }
        let roster = marbles
            .iter()
            .map(|m| Participant::new(m.label.clone(), m.color))
            .collect();
        log::info!(
            "Race {:#x} assembled: {} marbles, {} obstacles",
            seed,
            marbles.len(),
            course.obstacles.len()
        );
        Ok(Self::assemble(config, roster, course, marbles, seed))
    }

    /// A brand-new race with the same configuration and field
    ///
    /// Nothing carries over: new course, new marbles, clock and camera at zero.
    pub fn reset(&self, seed: u64) -> Self {
        log::info!("Restarting race with seed {:#x}", seed);
        Self::build(self.config.clone(), self.roster.clone(), seed)
    }

    fn build(config: RaceConfig, roster: Vec<Participant>, seed: u64) -> Self {
        let mut course_rng = Pcg32::seed_from_u64(seed);
        let course = Course::generate(&config, &mut course_rng);

        let mut rng = Pcg32::seed_from_u64(seed ^ PHYSICS_STREAM);
        let spread = config.launch_spread;
        let marbles = roster
            .iter()
            .enumerate()
            .map(|(i, participant)| {
                let vel = glam::Vec2::new(rng.random_range(-spread..=spread), 0.0);
                Marble::new(
                    i as u32,
                    participant,
                    config.start_position(i),
                    vel,
                    config.marble_radius,
                )
            })
            .collect::<Vec<_>>();

        log::info!(
            "Race {:#x} ({} course): {} marbles, {} obstacles, top {} win",
            seed,
            config.profile.as_str(),
            marbles.len(),
            course.obstacles.len(),
            config.winner_threshold
        );

        let mut race = Self::assemble(config, roster, course, marbles, seed);
        race.rng = rng;
        race
    }

    fn assemble(
        config: RaceConfig,
        roster: Vec<Participant>,
        course: Course,
        marbles: Vec<Marble>,
        seed: u64,
    ) -> Self {
        Self {
            seed,
            dynamics: Dynamics::from_config(&config),
            camera: Camera::for_config(&config),
            config,
            roster,
            course,
            marbles,
            phase: RacePhase::Running,
            winners: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed ^ PHYSICS_STREAM),
        }
    }

    /// Advance the race by one tick
    pub fn advance(&mut self) {
        super::tick::tick(self);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    /// Marbles in starting order
    pub fn marbles(&self) -> &[Marble] {
        &self.marbles
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RacePhase::Complete
    }

    /// Winner indices in rank order (empty until the race completes)
    pub fn winner_indices(&self) -> &[usize] {
        &self.winners
    }

    /// Winning marbles in rank order
    pub fn winners(&self) -> impl Iterator<Item = &Marble> {
        self.winners.iter().map(|&i| &self.marbles[i])
    }

    pub fn ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Race clock in seconds (ticks × dt, independent of wall-clock time)
    pub fn elapsed(&self) -> f32 {
        self.time_ticks as f32 * self.config.dt
    }

    /// Events recorded during the most recent tick
    pub fn events(&self) -> &[RaceEvent] {
        &self.events
    }

    pub fn finished_count(&self) -> usize {
        self.marbles.iter().filter(|m| m.finished).count()
    }

    pub fn ranked_count(&self) -> usize {
        self.marbles.iter().filter(|m| m.rank.is_some()).count()
    }

    /// Every marble has crossed the finish
    pub fn all_finished(&self) -> bool {
        self.marbles.iter().all(|m| m.finished)
    }
}
