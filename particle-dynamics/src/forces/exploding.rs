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
//! Fragment explosion driven by a bomb registry
//!
//! The state is a sequence of fragments, three particles each. Every
//! fragment moves as a unit under the blast: the bomb field is sampled at
//! its three vertices and the average is applied to all three, so fragments
//! translate without being torn apart. Gravity and drag act per particle.

use super::{assert_mass_count, assert_valid_masses, ForceSystem};
use crate::bombs::{BombRegistry, BombSettings};
use crate::state::ParticleState;
use glam::DVec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Particles per fragment
pub const FRAGMENT_STRIDE: usize = 3;

/// Force law for bomb-driven fragments
#[derive(Debug, Clone)]
pub struct ExplodingSystem {
    gravity: DVec3,
    drag: f64,
    masses: Vec<f64>,
    bombs: BombRegistry,
}

impl ExplodingSystem {
    /// Create an exploding system with no gravity, no drag and unit masses
    pub fn new(settings: BombSettings) -> Self {
        ExplodingSystem {
            gravity: DVec3::ZERO,
            drag: 0.0,
            masses: Vec::new(),
            bombs: BombRegistry::new(settings),
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

    /// Use explicit per-particle masses
    ///
    /// # Panics
    ///
    /// Panics if any mass is non-positive or not finite
    pub fn with_masses(mut self, masses: Vec<f64>) -> Self {
        assert_valid_masses(&masses);
        self.masses = masses;
        self
    }

    /// Registered bombs
    pub fn bombs(&self) -> &BombRegistry {
        &self.bombs
    }

    /// Mutable access to the bombs, for collision response and reset
    pub fn bombs_mut(&mut self) -> &mut BombRegistry {
        &mut self.bombs
    }

    /// Average bomb acceleration over one fragment's vertices
    pub fn fragment_blast(&self, vertices: &[DVec3], time: f64) -> DVec3 {
        let sum = vertices
            .iter()
            .fold(DVec3::ZERO, |acc, p| acc + self.bombs.acceleration_at(*p, time));
        let blast = sum / vertices.len() as f64;
        if blast.is_finite() {
            blast
        } else {
            log::warn!("Non-finite blast acceleration at t={}, ignoring", time);
            DVec3::ZERO
        }
    }

    /// Blast acceleration of every fragment, computed on the calling thread
    pub fn fragment_blasts_sequential(&self, positions: &[DVec3], time: f64) -> Vec<DVec3> {
        positions
            .chunks(FRAGMENT_STRIDE)
            .map(|fragment| self.fragment_blast(fragment, time))
            .collect()
    }

    /// Blast acceleration of every fragment, computed across the rayon pool
    #[cfg(feature = "parallel")]
    pub fn fragment_blasts_parallel(&self, positions: &[DVec3], time: f64) -> Vec<DVec3> {
        positions
            .par_chunks(FRAGMENT_STRIDE)
            .map(|fragment| self.fragment_blast(fragment, time))
            .collect()
    }

    fn fragment_blasts(&self, positions: &[DVec3], time: f64) -> Vec<DVec3> {
        if self.bombs.active_at(time).next().is_none() {
            return vec![DVec3::ZERO; positions.len() / FRAGMENT_STRIDE];
        }

        #[cfg(feature = "parallel")]
        {
            self.fragment_blasts_parallel(positions, time)
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.fragment_blasts_sequential(positions, time)
        }
    }

    fn mass(&self, index: usize) -> f64 {
        self.masses.get(index).copied().unwrap_or(1.0)
    }
}

impl Default for ExplodingSystem {
    fn default() -> Self {
        ExplodingSystem::new(BombSettings::default())
    }
}

impl ForceSystem for ExplodingSystem {
    fn derivative(&self, state: &ParticleState, time: f64) -> ParticleState {
        assert_eq!(
            state.len() % FRAGMENT_STRIDE,
            0,
            "Exploding state must hold whole fragments of 3 particles"
        );
        if !self.masses.is_empty() {
            assert_mass_count(&self.masses, state);
        }

        let blasts = self.fragment_blasts(state.positions(), time);
        let accelerations = state
            .velocities()
            .iter()
            .enumerate()
            .map(|(i, v)| {
                self.gravity - (self.drag / self.mass(i)) * *v + blasts[i / FRAGMENT_STRIDE]
            })
            .collect();

        ParticleState::new(state.velocities().to_vec(), accelerations)
    }

    fn name(&self) -> &str {
        "exploding"
    }
}
