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
//! Force laws without per-particle parameters

use super::ForceSystem;
use crate::state::ParticleState;
use glam::DVec3;

/// Zero acceleration: every particle keeps its velocity
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantVelocity;

impl ForceSystem for ConstantVelocity {
    fn derivative(&self, state: &ParticleState, _time: f64) -> ParticleState {
        ParticleState::new(state.velocities().to_vec(), vec![DVec3::ZERO; state.len()])
    }

    fn name(&self) -> &str {
        "constant_velocity"
    }
}

/// Circular flow in the xy-plane: dx/dt = (-y, x, 0)
///
/// Velocities are ignored and never change. Exact trajectories are circles
/// about the z-axis with angular speed 1 rad/s, which makes this a handy
/// integrator accuracy check.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rotational;

impl ForceSystem for Rotational {
    fn derivative(&self, state: &ParticleState, _time: f64) -> ParticleState {
        let rates = state
            .positions()
            .iter()
            .map(|p| DVec3::new(-p.y, p.x, 0.0))
            .collect();
        ParticleState::new(rates, vec![DVec3::ZERO; state.len()])
    }

    fn name(&self) -> &str {
        "rotational"
    }
}

/// Every particle is pulled toward a single anchor: a = k * (anchor - x)
#[derive(Debug, Clone, Copy)]
pub struct AnchorSpring {
    anchor: DVec3,
    stiffness: f64,
}

impl AnchorSpring {
    /// Create an anchor spring
    ///
    /// # Panics
    ///
    /// Panics if stiffness is negative or not finite
    pub fn new(anchor: DVec3, stiffness: f64) -> Self {
        assert!(
            stiffness >= 0.0 && stiffness.is_finite(),
            "Spring stiffness must be non-negative and finite"
        );
        AnchorSpring { anchor, stiffness }
    }

    /// Move the anchor point
    pub fn set_anchor(&mut self, anchor: DVec3) {
        self.anchor = anchor;
    }

    /// Current anchor point
    pub fn anchor(&self) -> DVec3 {
        self.anchor
    }
}

impl Default for AnchorSpring {
    fn default() -> Self {
        AnchorSpring::new(DVec3::ZERO, 1.0)
    }
}

impl ForceSystem for AnchorSpring {
    fn derivative(&self, state: &ParticleState, _time: f64) -> ParticleState {
        let accelerations = state
            .positions()
            .iter()
            .map(|p| self.stiffness * (self.anchor - *p))
            .collect();
        ParticleState::new(state.velocities().to_vec(), accelerations)
    }

    fn name(&self) -> &str {
        "anchor_spring"
    }
}
