//! Octree Simulation Demo
//!
//! Headless run of the loose octree with:
//! - Ships moving around triggering dynamic octree restructuring
//! - Broad-phase collision candidates gathered through the octree each tick
//! - Tree statistics logged at a fixed interval
//!
//! Usage: `octree_demo [config.toml|config.ron]`

use loose_octree::foundation::logging;
use loose_octree::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

// Octree bounds: -50 to +50 on each axis
const OCTREE_SIZE: f32 = 100.0;

// Ship counts
const NUM_SMALL_SHIPS: u64 = 40;
const NUM_LARGE_SHIPS: u64 = 8;

// Movement speeds
const SMALL_SHIP_SPEED: f32 = 6.0;
const LARGE_SHIP_SPEED: f32 = 3.0;
const SMALL_SHIP_SIZE: f32 = 0.8;
const LARGE_SHIP_SIZE: f32 = 2.0;

// Simulation timing
const TICKS: u32 = 600;
const DELTA_TIME: f32 = 1.0 / 60.0;
const REPORT_INTERVAL: u32 = 60;
const RNG_SEED: u64 = 2024;

/// Size class of a ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShipClass {
    Small,
    Large,
}

struct Ship {
    object: Object<ShipClass>,
    velocity: Vec3,
}

#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Octree error: {0}")]
    Octree(#[from] OctreeError),
}

struct OctreeSimulation {
    octree: Octree<Object<ShipClass>>,
    ships: Vec<Ship>,
    rng: StdRng,
}

impl OctreeSimulation {
    fn new(config: OctreeConfig) -> Result<Self, DemoError> {
        let half = OCTREE_SIZE * 0.5;
        let world = AABB::new(Vec3::new(-half, -half, -half), Vec3::new(half, half, half));

        Ok(Self {
            octree: Octree::with_config(world, config)?,
            ships: Vec::new(),
            rng: StdRng::seed_from_u64(RNG_SEED),
        })
    }

    fn spawn_ships(&mut self) -> Result<(), DemoError> {
        let fleet = (0..NUM_SMALL_SHIPS)
            .map(|_| ShipClass::Small)
            .chain((0..NUM_LARGE_SHIPS).map(|_| ShipClass::Large));

        for (id, class) in (0_u64..).zip(fleet) {
            let (size, speed) = match class {
                ShipClass::Small => (SMALL_SHIP_SIZE, SMALL_SHIP_SPEED),
                ShipClass::Large => (LARGE_SHIP_SIZE, LARGE_SHIP_SPEED),
            };

            let limit = OCTREE_SIZE * 0.5 - size;
            let position = Vec3::new(
                self.rng.gen_range(-limit..limit),
                self.rng.gen_range(-limit..limit),
                self.rng.gen_range(-limit..limit),
            );
            let direction = Vec3::new(
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
            );
            let velocity = direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::x) * speed;

            let object = Object::new(ObjectId(id), AABB::from_center_size(position, size), class);
            self.octree.try_insert(object.clone())?;
            self.ships.push(Ship { object, velocity });
        }

        log::info!("Spawned {} ships", self.ships.len());
        Ok(())
    }

    /// Advance every ship, bouncing off the world walls
    fn update(&mut self, delta_time: f32) {
        let world = *self.octree.region();

        for ship in &mut self.ships {
            let half = ship.object.bounds.extents();
            let mut center = ship.object.bounds.center() + ship.velocity * delta_time;

            for axis in 0..3 {
                let low = world.min[axis] + half[axis];
                let high = world.max[axis] - half[axis];
                if center[axis] < low || center[axis] > high {
                    ship.velocity[axis] = -ship.velocity[axis];
                    center[axis] = center[axis].clamp(low, high);
                }
            }

            if !self.octree.move_object(&mut ship.object, &[center.x, center.y, center.z]) {
                log::warn!("Ship {:?} could not be moved to {:?}", ship.object.id, center);
            }
        }
    }

    /// Count unordered pairs of ships whose bounds overlap
    fn collision_pairs(&self) -> usize {
        self.ships
            .iter()
            .map(|ship| {
                self.octree
                    .query_nearby(&ship.object)
                    .into_iter()
                    .filter(|other| other.id > ship.object.id)
                    .count()
            })
            .sum()
    }

    fn report(&self, tick: u32) {
        log::info!(
            "tick {:4}: height {}, nodes {}, objects {}, usage {:.3}, collision pairs {}",
            tick,
            self.octree.height(),
            self.octree.node_count(),
            self.octree.object_count(),
            self.octree.usage(),
            self.collision_pairs(),
        );
        log::debug!("\n{}", self.octree.dump(false));
    }
}

fn load_config() -> Result<OctreeConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading octree configuration from {}", path);
            Ok(OctreeConfig::load_from_file(&path)?)
        }
        None => Ok(OctreeConfig::default()),
    }
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    log::info!("Octree capacity: {}", config.capacity);

    let mut simulation = OctreeSimulation::new(config)?;
    simulation.spawn_ships()?;
    simulation.report(0);

    for tick in 1..=TICKS {
        simulation.update(DELTA_TIME);
        if tick % REPORT_INTERVAL == 0 {
            simulation.report(tick);
        }
    }

    let leaves = simulation.octree.leaves();
    let occupied = leaves.iter().filter(|leaf| !leaf.objects().is_empty()).count();
    log::info!("Finished: {} of {} leaves occupied", occupied, leaves.len());
    Ok(())
}

fn main() {
    logging::init();

    if let Err(err) = run() {
        log::error!("Octree demo failed: {}", err);
        std::process::exit(1);
    }
}
