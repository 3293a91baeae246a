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
//! Particle state vectors
//!
//! A [`ParticleState`] holds the positions and velocities of N point masses
//! as two parallel arrays. It forms a vector space under elementwise addition
//! and scalar multiplication, which is all an explicit integrator needs.
//!
//! The same type doubles as a *derivative*: a force system returns a state
//! whose `positions` hold dx/dt (velocities) and whose `velocities` hold
//! dv/dt (accelerations).

use glam::DVec3;
use std::ops::{Add, AddAssign, Mul};

/// Positions and velocities of a set of particles
///
/// Both arrays always have the same length. Fields are private so the
/// length can only be fixed at construction; the slice accessors allow
/// elements to be edited in place without resizing.
///
/// # Examples
///
/// ```
/// use glam::DVec3;
/// use particle_dynamics::state::ParticleState;
///
/// let a = ParticleState::new(vec![DVec3::X], vec![DVec3::Y]);
/// let b = 2.0 * &a;
/// assert_eq!(b.positions()[0], DVec3::new(2.0, 0.0, 0.0));
/// assert_eq!(b.velocities()[0], DVec3::new(0.0, 2.0, 0.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleState {
    positions: Vec<DVec3>,
    velocities: Vec<DVec3>,
}

impl ParticleState {
    /// Create a state from parallel position and velocity arrays
    ///
    /// # Panics
    ///
    /// Panics if the arrays have different lengths
    pub fn new(positions: Vec<DVec3>, velocities: Vec<DVec3>) -> Self {
        assert_eq!(
            positions.len(),
            velocities.len(),
            "Position and velocity arrays must have equal length"
        );
        ParticleState { positions, velocities }
    }

    /// Create a state of `n` particles at the origin, at rest
    pub fn zeros(n: usize) -> Self {
        ParticleState {
            positions: vec![DVec3::ZERO; n],
            velocities: vec![DVec3::ZERO; n],
        }
    }

    /// Create a state at the given positions with zero velocity
    pub fn from_positions(positions: Vec<DVec3>) -> Self {
        let velocities = vec![DVec3::ZERO; positions.len()];
        ParticleState { positions, velocities }
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the state holds no particles
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Particle positions
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Particle velocities
    pub fn velocities(&self) -> &[DVec3] {
        &self.velocities
    }

    /// Mutable access to positions (length cannot change)
    pub fn positions_mut(&mut self) -> &mut [DVec3] {
        &mut self.positions
    }

    /// Mutable access to velocities (length cannot change)
    pub fn velocities_mut(&mut self) -> &mut [DVec3] {
        &mut self.velocities
    }

    /// Mutable access to both arrays at once
    pub fn split_mut(&mut self) -> (&mut [DVec3], &mut [DVec3]) {
        (&mut self.positions, &mut self.velocities)
    }

    /// Check if every component is finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.positions.iter().all(|p| p.is_finite()) && self.velocities.iter().all(|v| v.is_finite())
    }

    /// Add `scale * other` to this state in place
    ///
    /// # Panics
    ///
    /// Panics if the particle counts differ
    pub fn add_scaled(&mut self, other: &ParticleState, scale: f64) {
        assert_same_len(self, other);
        for (p, dp) in self.positions.iter_mut().zip(&other.positions) {
            *p += scale * *dp;
        }
        for (v, dv) in self.velocities.iter_mut().zip(&other.velocities) {
            *v += scale * *dv;
        }
    }

    /// Return `self + scale * other` without modifying either operand
    pub fn scaled_sum(&self, other: &ParticleState, scale: f64) -> ParticleState {
        let mut out = self.clone();
        out.add_scaled(other, scale);
        out
    }
}

fn assert_same_len(a: &ParticleState, b: &ParticleState) {
    assert_eq!(
        a.len(),
        b.len(),
        "State vectors must have the same particle count"
    );
}

impl Add for &ParticleState {
    type Output = ParticleState;

    fn add(self, rhs: &ParticleState) -> ParticleState {
        self.scaled_sum(rhs, 1.0)
    }
}

impl Add for ParticleState {
    type Output = ParticleState;

    fn add(mut self, rhs: ParticleState) -> ParticleState {
        self.add_scaled(&rhs, 1.0);
        self
    }
}

impl AddAssign<&ParticleState> for ParticleState {
    fn add_assign(&mut self, rhs: &ParticleState) {
        self.add_scaled(rhs, 1.0);
    }
}

impl Mul<&ParticleState> for f64 {
    type Output = ParticleState;

    fn mul(self, rhs: &ParticleState) -> ParticleState {
        ParticleState {
            positions: rhs.positions.iter().map(|p| self * *p).collect(),
            velocities: rhs.velocities.iter().map(|v| self * *v).collect(),
        }
    }
}

impl Mul<ParticleState> for f64 {
    type Output = ParticleState;

    fn mul(self, mut rhs: ParticleState) -> ParticleState {
        rhs.positions.iter_mut().for_each(|p| *p *= self);
        rhs.velocities.iter_mut().for_each(|v| *v *= self);
        rhs
    }
}

impl Mul<f64> for ParticleState {
    type Output = ParticleState;

    fn mul(self, rhs: f64) -> ParticleState {
        rhs * self
    }
}
