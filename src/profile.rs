//! ═══════════════════════════════════════════════════════════════════════════════
//! PROFILE — Steering Profiles and the State → Parameter Mapper
//! ═══════════════════════════════════════════════════════════════════════════════
//! A steering profile is an immutable bundle of flocking weights and kinematic
//! limits. Exactly one profile is active at a time; the driver swaps it
//! between ticks, never mid-tick. Replaces the global mutable tunables of the
//! usual boids formulation.
//! ═══════════════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

/// Discrete physiological state emitted by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CognitiveState {
    Relaxed,
    Stressed,
}

impl CognitiveState {
    pub fn name(&self) -> &'static str {
        match self {
            CognitiveState::Relaxed => "RELAXED",
            CognitiveState::Stressed => "STRESSED",
        }
    }
}

/// RGB display color carried by a profile (for the rendering collaborator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const CYAN: Rgb = Rgb { r: 0, g: 255, b: 255 };
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
}

/// Named bundle of flocking weights and kinematic limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringProfile {
    /// Weight on the separation rule
    pub separation_weight: f64,
    /// Weight on the alignment rule
    pub alignment_weight: f64,
    /// Weight on the cohesion rule. Negative means agents actively repel
    /// from the flock centroid.
    pub cohesion_weight: f64,
    /// Velocity magnitude cap after integration
    pub max_speed: f64,
    /// Steering force magnitude cap before summation
    pub max_force: f64,
    /// Display color
    pub color: Rgb,
}

impl SteeringProfile {
    /// Calm flock: balanced weights, slow, gentle steering
    pub fn relaxed() -> Self {
        Self {
            separation_weight: 1.0,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            max_speed: 4.0,
            max_force: 0.1,
            color: Rgb::CYAN,
        }
    }

    /// Agitated flock: strong repulsion, weak alignment, anti-cohesion,
    /// fast and twitchy
    pub fn stressed() -> Self {
        Self {
            separation_weight: 10.0,
            alignment_weight: 0.2,
            cohesion_weight: -2.0,
            max_speed: 10.0,
            max_force: 0.5,
            color: Rgb::RED,
        }
    }
}

/// Configurable state → profile table. The mapping itself is pure: no side
/// effects beyond returning a profile value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileTable {
    pub relaxed: SteeringProfile,
    pub stressed: SteeringProfile,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            relaxed: SteeringProfile::relaxed(),
            stressed: SteeringProfile::stressed(),
        }
    }
}

impl ProfileTable {
    /// Map a classified state to its steering profile
    pub fn profile_for(&self, state: CognitiveState) -> SteeringProfile {
        match state {
            CognitiveState::Relaxed => self.relaxed,
            CognitiveState::Stressed => self.stressed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapper_is_pure() {
        let table = ProfileTable::default();
        let a = table.profile_for(CognitiveState::Stressed);
        let b = table.profile_for(CognitiveState::Stressed);
        assert_eq!(a, b);
    }

    #[test]
    fn test_relaxed_profile_values() {
        let p = ProfileTable::default().profile_for(CognitiveState::Relaxed);
        assert_eq!(p.separation_weight, 1.0);
        assert_eq!(p.alignment_weight, 1.0);
        assert_eq!(p.cohesion_weight, 1.0);
        assert_eq!(p.max_speed, 4.0);
        assert_eq!(p.max_force, 0.1);
        assert_eq!(p.color, Rgb::CYAN);
    }

    #[test]
    fn test_stressed_profile_has_negative_cohesion() {
        let p = ProfileTable::default().profile_for(CognitiveState::Stressed);
        assert_eq!(p.separation_weight, 10.0);
        assert_eq!(p.alignment_weight, 0.2);
        assert_eq!(p.cohesion_weight, -2.0);
        assert_eq!(p.max_speed, 10.0);
        assert_eq!(p.max_force, 0.5);
        assert_eq!(p.color, Rgb::RED);
    }
}
