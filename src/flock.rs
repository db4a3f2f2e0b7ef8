//! ═══════════════════════════════════════════════════════════════════════════════
//! FLOCK — Boids Flocking Engine
//! ═══════════════════════════════════════════════════════════════════════════════
//! Craig Reynolds' three steering rules (separation, alignment, cohesion)
//! over a fixed agent set on a toroidal 2D domain. Neighbor search is a
//! brute-force O(n²) scan over the full set; spatial partitioning is a
//! deliberate non-goal at this scale.
//!
//! Each tick steers against a snapshot of all positions/velocities taken
//! before any agent is mutated, so steering decisions are order-independent.
//! ═══════════════════════════════════════════════════════════════════════════════

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::profile::SteeringProfile;
use crate::vec2::Vec2;

/// Engine tunables (domain geometry and agent population)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlockConfig {
    /// Domain width (toroidal)
    pub width: f64,
    /// Domain height (toroidal)
    pub height: f64,
    /// Number of agents, fixed for the run's lifetime
    pub boid_count: usize,
    /// Distance within which another agent counts as a neighbor
    pub perception_radius: f64,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            boid_count: 50,
            perception_radius: 50.0,
        }
    }
}

/// A single agent. Owned exclusively by the engine; agents never hold
/// references to each other, only read-only visibility during a tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Boid {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Transient: accumulated each tick, zeroed after integration
    pub acceleration: Vec2,
}

impl Boid {
    /// Heading angle in radians, for renderers drawing direction markers
    pub fn heading(&self) -> f64 {
        self.velocity.heading()
    }
}

/// Kinematic snapshot of one agent, taken before any mutation in a tick
#[derive(Debug, Clone, Copy)]
struct BoidView {
    position: Vec2,
    velocity: Vec2,
}

/// The flocking engine: owns the agent set and advances it one tick at a
/// time under whatever steering profile the caller hands in.
#[derive(Debug, Clone)]
pub struct FlockEngine {
    config: FlockConfig,
    boids: Vec<Boid>,
}

impl FlockEngine {
    /// Spawn `boid_count` agents with uniform random positions and random
    /// headings with speed in [1, initial max speed]. Seeded for
    /// reproducibility.
    pub fn new(config: FlockConfig, initial: &SteeringProfile, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let boids = (0..config.boid_count)
            .map(|_| {
                let position = Vec2::new(
                    rng.gen_range(0.0..config.width),
                    rng.gen_range(0.0..config.height),
                );
                let angle = rng.gen_range(0.0..std::f64::consts::TAU);
                let speed = rng.gen_range(1.0..initial.max_speed.max(1.0 + f64::EPSILON));
                Boid {
                    position,
                    velocity: Vec2::from_angle(angle) * speed,
                    acceleration: Vec2::ZERO,
                }
            })
            .collect();
        Self { config, boids }
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Advance every agent by one tick under `profile`. The profile is
    /// immutable for the whole tick: every agent sees the same weights.
    pub fn tick(&mut self, profile: &SteeringProfile) {
        // Snapshot before mutating anything: steering is order-independent
        let snapshot: Vec<BoidView> = self
            .boids
            .iter()
            .map(|b| BoidView {
                position: b.position,
                velocity: b.velocity,
            })
            .collect();

        for (i, boid) in self.boids.iter_mut().enumerate() {
            let sep = separation(i, &snapshot, self.config.perception_radius, profile);
            let ali = alignment(i, &snapshot, self.config.perception_radius, profile);
            let coh = cohesion(i, &snapshot, self.config.perception_radius, profile);

            boid.acceleration = sep * profile.separation_weight
                + ali * profile.alignment_weight
                + coh * profile.cohesion_weight;
        }

        for boid in &mut self.boids {
            integrate(boid, profile);
            wrap(boid, self.config.width, self.config.height);
        }
    }
}

/// Shared steer-towards rule: scale the target to max speed, subtract the
/// current velocity, clamp the delta's magnitude to max force. A zero
/// target yields zero force by definition, not by exception.
fn steer_towards(velocity: Vec2, target: Vec2, profile: &SteeringProfile) -> Vec2 {
    if target.is_zero() {
        return Vec2::ZERO;
    }
    let desired = target.with_magnitude(profile.max_speed);
    (desired - velocity).limit(profile.max_force)
}

/// Steer away from crowding flockmates. Each neighbor within the perception
/// radius (excluding self, distance > 0) contributes the unit vector
/// pointing away from it; the average is steered towards.
fn separation(i: usize, flock: &[BoidView], radius: f64, profile: &SteeringProfile) -> Vec2 {
    let me = flock[i];
    let mut steer = Vec2::ZERO;
    let mut total = 0usize;

    for (j, other) in flock.iter().enumerate() {
        if j == i {
            continue;
        }
        let diff = me.position - other.position;
        let d = diff.length();
        if d > 0.0 && d < radius {
            steer += diff / d;
            total += 1;
        }
    }

    if total == 0 {
        return Vec2::ZERO;
    }
    steer_towards(me.velocity, steer / total as f64, profile)
}

/// Steer towards the average heading of flockmates within the radius
fn alignment(i: usize, flock: &[BoidView], radius: f64, profile: &SteeringProfile) -> Vec2 {
    let me = flock[i];
    let mut avg_vel = Vec2::ZERO;
    let mut total = 0usize;

    for (j, other) in flock.iter().enumerate() {
        if j == i {
            continue;
        }
        if me.position.distance(other.position) < radius {
            avg_vel += other.velocity;
            total += 1;
        }
    }

    if total == 0 {
        return Vec2::ZERO;
    }
    steer_towards(me.velocity, avg_vel / total as f64, profile)
}

/// Steer towards the centroid of flockmates within the radius
fn cohesion(i: usize, flock: &[BoidView], radius: f64, profile: &SteeringProfile) -> Vec2 {
    let me = flock[i];
    let mut centre = Vec2::ZERO;
    let mut total = 0usize;

    for (j, other) in flock.iter().enumerate() {
        if j == i {
            continue;
        }
        if me.position.distance(other.position) < radius {
            centre += other.position;
            total += 1;
        }
    }

    if total == 0 {
        return Vec2::ZERO;
    }
    let desired = centre / total as f64 - me.position;
    steer_towards(me.velocity, desired, profile)
}

/// velocity += acceleration; rescale to max speed exactly if exceeded;
/// position += velocity; acceleration reset
fn integrate(boid: &mut Boid, profile: &SteeringProfile) {
    boid.velocity += boid.acceleration;
    if boid.velocity.length() > profile.max_speed {
        boid.velocity = boid.velocity.with_magnitude(profile.max_speed);
    }
    boid.position += boid.velocity;
    boid.acceleration = Vec2::ZERO;
}

/// Toroidal wrap: a coordinate past the upper bound resets to the opposite
/// bound's minimum and vice versa. Velocity is untouched.
fn wrap(boid: &mut Boid, width: f64, height: f64) {
    if boid.position.x > width {
        boid.position.x = 0.0;
    } else if boid.position.x < 0.0 {
        boid.position.x = width;
    }
    if boid.position.y > height {
        boid.position.y = 0.0;
    } else if boid.position.y < 0.0 {
        boid.position.y = height;
    }
}
