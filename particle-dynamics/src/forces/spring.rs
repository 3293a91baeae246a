// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Mass-spring networks
//!
//! A [`SpringNetwork`] is a static edge list plus a set of pinned particles.
//! [`SpringSystem`] turns it into a force law: Hookean springs, gravity and
//! linear drag, divided by per-particle mass.
//!
//! # Spring force
//!
//! For an edge (i, j) with stiffness k and rest length L:
//!
//! ```text
//! d = x_i - x_j
//! F = -k * (|d| - L) * d / |d|
//! ```
//!
//! F acts on particle i and -F on particle j. Coincident endpoints produce
//! no force.

use super::{assert_mass_count, assert_valid_masses, ForceSystem, STANDARD_GRAVITY};
use crate::state::ParticleState;
use glam::DVec3;

/// A spring between two particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringEdge {
    /// First endpoint
    pub i: usize,
    /// Second endpoint
    pub j: usize,
    /// Hooke constant
    pub stiffness: f64,
    /// Length at which the spring exerts no force
    pub rest_length: f64,
}

impl SpringEdge {
    /// Create a spring edge
    ///
    /// # Panics
    ///
    /// Panics if both endpoints are the same particle, or if stiffness or
    /// rest length is negative or not finite
    pub fn new(i: usize, j: usize, stiffness: f64, rest_length: f64) -> Self {
        assert_ne!(i, j, "Spring endpoints must be distinct particles");
        assert!(
            stiffness >= 0.0 && stiffness.is_finite(),
            "Spring stiffness must be non-negative and finite"
        );
        assert!(
            rest_length >= 0.0 && rest_length.is_finite(),
            "Spring rest length must be non-negative and finite"
        );
        SpringEdge {
            i,
            j,
            stiffness,
            rest_length,
        }
    }

    /// Force exerted on endpoint `i`; endpoint `j` receives the negation
    pub fn force(&self, x_i: DVec3, x_j: DVec3) -> DVec3 {
        let d = x_i - x_j;
        let length = d.length();
        if length == 0.0 {
            return DVec3::ZERO;
        }
        -self.stiffness * (length - self.rest_length) * (d / length)
    }
}

/// Edge list and pinned particles of a spring-coupled body
#[derive(Debug, Clone, Default)]
pub struct SpringNetwork {
    springs: Vec<SpringEdge>,
    fixed: Vec<usize>,
}

impl SpringNetwork {
    /// Create an empty network
    pub fn new() -> Self {
        SpringNetwork::default()
    }

    /// Add a spring
    pub fn add_spring(&mut self, edge: SpringEdge) {
        self.springs.push(edge);
    }

    /// Pin a particle in place
    ///
    /// Pinning the same particle twice has no further effect.
    pub fn add_fixed(&mut self, index: usize) {
        if !self.fixed.contains(&index) {
            self.fixed.push(index);
        }
    }

    /// All springs
    pub fn springs(&self) -> &[SpringEdge] {
        &self.springs
    }

    /// Pinned particle indices
    pub fn fixed(&self) -> &[usize] {
        &self.fixed
    }

    /// Whether a particle is pinned
    pub fn is_fixed(&self, index: usize) -> bool {
        self.fixed.contains(&index)
    }

    /// Highest particle index referenced by any spring or pin
    pub fn max_index(&self) -> Option<usize> {
        self.springs
            .iter()
            .flat_map(|s| [s.i, s.j])
            .chain(self.fixed.iter().copied())
            .max()
    }

    /// Springs touching a given particle
    pub fn incident(&self, index: usize) -> impl Iterator<Item = &SpringEdge> {
        self.springs
            .iter()
            .filter(move |s| s.i == index || s.j == index)
    }

    /// Sum the spring forces on every particle of `positions`
    pub fn accumulate_forces(&self, positions: &[DVec3]) -> Vec<DVec3> {
        let mut forces = vec![DVec3::ZERO; positions.len()];
        for spring in &self.springs {
            let f = spring.force(positions[spring.i], positions[spring.j]);
            forces[spring.i] += f;
            forces[spring.j] -= f;
        }
        forces
    }

    /// Elastic potential energy stored in the springs
    pub fn potential_energy(&self, positions: &[DVec3]) -> f64 {
        self.springs
            .iter()
            .map(|s| {
                let stretch = positions[s.i].distance(positions[s.j]) - s.rest_length;
                0.5 * s.stiffness * stretch * stretch
            })
            .sum()
    }
}

/// Force law for a spring network under gravity and drag
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use particle_dynamics::forces::{ForceSystem, SpringEdge, SpringNetwork, SpringSystem};
/// use particle_dynamics::state::ParticleState;
///
/// let mut network = SpringNetwork::new();
/// network.add_spring(SpringEdge::new(0, 1, 30.0, 1.0));
/// network.add_fixed(0);
/// let system = SpringSystem::new(vec![1.0, 1.0], network);
///
/// let state = ParticleState::from_positions(vec![DVec3::ZERO, DVec3::new(1.5, 0.0, 0.0)]);
/// let d = system.derivative(&state, 0.0);
/// assert_eq!(d.velocities()[0], DVec3::ZERO);
/// ```
#[derive(Debug, Clone)]
pub struct SpringSystem {
    network: SpringNetwork,
    masses: Vec<f64>,
    gravity: DVec3,
    drag: f64,
    wind: DVec3,
    wind_enabled: bool,
}

impl SpringSystem {
    /// Create a spring system with standard gravity and a drag of 0.2
    ///
    /// # Panics
    ///
    /// Panics if any mass is invalid, or if a spring endpoint or pinned
    /// index is out of range for the mass array
    pub fn new(masses: Vec<f64>, network: SpringNetwork) -> Self {
        assert_valid_masses(&masses);
        if let Some(max) = network.max_index() {
            assert!(
                max < masses.len(),
                "Spring network references particle {} but only {} particles exist",
                max,
                masses.len()
            );
        }
        SpringSystem {
            network,
            masses,
            gravity: DVec3::new(0.0, -STANDARD_GRAVITY, 0.0),
            drag: 0.2,
            wind: DVec3::ZERO,
            wind_enabled: false,
        }
    }

    /// Set gravitational acceleration
    pub fn with_gravity(mut self, gravity: DVec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the linear drag coefficient
    ///
    /// # Panics
    ///
    /// Panics if drag is negative or not finite
    pub fn with_drag(mut self, drag: f64) -> Self {
        assert!(
            drag >= 0.0 && drag.is_finite(),
            "Drag coefficient must be non-negative and finite"
        );
        self.drag = drag;
        self
    }

    /// Set the wind force applied to every free particle and enable it
    ///
    /// # Panics
    ///
    /// Panics if any wind component is not finite
    pub fn with_wind(mut self, wind: DVec3) -> Self {
        assert!(wind.is_finite(), "Wind force must be finite");
        self.wind = wind;
        self.wind_enabled = true;
        self
    }

    /// Switch the wind on or off, returning the new setting
    pub fn toggle_wind(&mut self) -> bool {
        self.wind_enabled = !self.wind_enabled;
        self.wind_enabled
    }

    /// Whether the wind force is currently applied
    pub fn wind_enabled(&self) -> bool {
        self.wind_enabled
    }

    /// The underlying network
    pub fn network(&self) -> &SpringNetwork {
        &self.network
    }

    /// Per-particle masses
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }
}

impl ForceSystem for SpringSystem {
    fn derivative(&self, state: &ParticleState, _time: f64) -> ParticleState {
        assert_mass_count(&self.masses, state);

        let spring_forces = self.network.accumulate_forces(state.positions());
        let wind = if self.wind_enabled { self.wind } else { DVec3::ZERO };
        let mut rates = state.velocities().to_vec();
        let mut accelerations: Vec<DVec3> = state
            .velocities()
            .iter()
            .zip(&spring_forces)
            .zip(&self.masses)
            .map(|((v, spring), &m)| (m * self.gravity - self.drag * *v + *spring + wind) / m)
            .collect();

        // Pinned particles override whatever the physics computed
        for &index in self.network.fixed() {
            rates[index] = DVec3::ZERO;
            accelerations[index] = DVec3::ZERO;
        }

        ParticleState::new(rates, accelerations)
    }

    fn name(&self) -> &str {
        "spring_network"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_particle(rest: f64) -> SpringSystem {
        let mut network = SpringNetwork::new();
        network.add_spring(SpringEdge::new(0, 1, 30.0, rest));
        network.add_fixed(0);
        SpringSystem::new(vec![1.0, 1.0], network)
            .with_gravity(DVec3::ZERO)
            .with_drag(0.0)
    }

    #[test]
    fn test_stretched_spring_pulls_back() {
        let system = two_particle(1.0);
        let state = ParticleState::from_positions(vec![DVec3::ZERO, DVec3::new(1.5, 0.0, 0.0)]);
        let d = system.derivative(&state, 0.0);
        // F = -30 * 0.5 along +x
        assert!(d.velocities()[1].abs_diff_eq(DVec3::new(-15.0, 0.0, 0.0), 1e-12));
        assert_eq!(d.velocities()[0], DVec3::ZERO);
        assert_eq!(d.positions()[0], DVec3::ZERO);
    }

    #[test]
    fn test_fixed_particle_ignores_velocity_and_gravity() {
        let system = two_particle(1.0).with_gravity(DVec3::new(0.0, -9.8, 0.0));
        let state = ParticleState::new(
            vec![DVec3::ZERO, DVec3::new(0.0, -2.0, 0.0)],
            vec![DVec3::new(3.0, 3.0, 3.0), DVec3::ZERO],
        );
        let d = system.derivative(&state, 0.0);
        assert_eq!(d.positions()[0], DVec3::ZERO);
        assert_eq!(d.velocities()[0], DVec3::ZERO);
    }

    #[test]
    fn test_wind_toggle() {
        let mut system = SpringSystem::new(vec![1.0, 2.0], {
            let mut network = SpringNetwork::new();
            network.add_fixed(0);
            network
        })
        .with_gravity(DVec3::ZERO)
        .with_drag(0.0)
        .with_wind(DVec3::new(0.0, 0.0, 4.0));
        let state = ParticleState::zeros(2);

        assert!(system.wind_enabled());
        let d = system.derivative(&state, 0.0);
        assert_eq!(d.velocities()[1], DVec3::new(0.0, 0.0, 2.0));
        assert_eq!(d.velocities()[0], DVec3::ZERO);

        assert!(!system.toggle_wind());
        let d = system.derivative(&state, 0.0);
        assert_eq!(d.velocities()[1], DVec3::ZERO);
    }

    #[test]
    fn test_coincident_endpoints_produce_no_force() {
        let edge = SpringEdge::new(0, 1, 100.0, 1.0);
        assert_eq!(edge.force(DVec3::ONE, DVec3::ONE), DVec3::ZERO);
    }

    #[test]
    fn test_forces_are_equal_and_opposite() {
        let mut network = SpringNetwork::new();
        network.add_spring(SpringEdge::new(0, 1, 5.0, 0.5));
        let forces = network.accumulate_forces(&[DVec3::ZERO, DVec3::new(0.0, 2.0, 1.0)]);
        assert!((forces[0] + forces[1]).abs_diff_eq(DVec3::ZERO, 1e-12));
    }

    #[test]
    fn test_potential_energy() {
        let mut network = SpringNetwork::new();
        network.add_spring(SpringEdge::new(0, 1, 4.0, 1.0));
        let energy = network.potential_energy(&[DVec3::ZERO, DVec3::new(3.0, 0.0, 0.0)]);
        assert!((energy - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_pins_collapse() {
        let mut network = SpringNetwork::new();
        network.add_fixed(2);
        network.add_fixed(2);
        assert_eq!(network.fixed(), &[2]);
    }

    #[test]
    #[should_panic(expected = "Spring network references particle 5")]
    fn test_out_of_range_fixed_index() {
        let mut network = SpringNetwork::new();
        network.add_fixed(5);
        SpringSystem::new(vec![1.0; 2], network);
    }

    #[test]
    #[should_panic(expected = "Spring endpoints must be distinct particles")]
    fn test_self_spring_rejected() {
        SpringEdge::new(1, 1, 1.0, 1.0);
    }
}
