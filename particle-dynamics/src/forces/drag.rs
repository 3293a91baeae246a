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
//! Uniform gravity with linear drag

use super::{assert_mass_count, assert_valid_masses, ForceSystem, STANDARD_GRAVITY};
use crate::state::ParticleState;
use glam::DVec3;

/// Gravity plus linear drag: a = g - (drag / m) * v
///
/// Masses default to 1.0 for every particle. With an empty mass list the
/// system accepts any particle count and treats every mass as 1.0.
#[derive(Debug, Clone)]
pub struct DragGravity {
    gravity: DVec3,
    drag: f64,
    masses: Vec<f64>,
}

impl DragGravity {
    /// Create a drag/gravity system with unit masses
    ///
    /// # Panics
    ///
    /// Panics if drag is negative or not finite
    pub fn new(gravity: DVec3, drag: f64) -> Self {
        assert!(
            drag >= 0.0 && drag.is_finite(),
            "Drag coefficient must be non-negative and finite"
        );
        DragGravity {
            gravity,
            drag,
            masses: Vec::new(),
        }
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

    /// Gravitational acceleration
    pub fn gravity(&self) -> DVec3 {
        self.gravity
    }

    /// Linear drag coefficient
    pub fn drag(&self) -> f64 {
        self.drag
    }

    fn mass(&self, index: usize) -> f64 {
        self.masses.get(index).copied().unwrap_or(1.0)
    }
}

impl Default for DragGravity {
    fn default() -> Self {
        DragGravity::new(DVec3::new(0.0, -STANDARD_GRAVITY, 0.0), 0.0)
    }
}

impl ForceSystem for DragGravity {
    fn derivative(&self, state: &ParticleState, _time: f64) -> ParticleState {
        if !self.masses.is_empty() {
            assert_mass_count(&self.masses, state);
        }
        let accelerations = state
            .velocities()
            .iter()
            .enumerate()
            .map(|(i, v)| self.gravity - (self.drag / self.mass(i)) * *v)
            .collect();
        ParticleState::new(state.velocities().to_vec(), accelerations)
    }

    fn name(&self) -> &str {
        "drag_gravity"
    }
}
