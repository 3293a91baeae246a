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
//! Force laws
//!
//! A force system maps a particle state and a time to the time derivative of
//! that state. Integrators only ever talk to the [`ForceSystem`] trait, so any
//! force law can be swapped in for testing.
//!
//! # Variants
//!
//! - [`ConstantVelocity`]: no acceleration, straight-line motion
//! - [`DragGravity`]: uniform gravity with linear drag
//! - [`SpringSystem`]: Hookean spring network with pinned particles
//! - [`ExplodingSystem`]: fragments pushed apart by expanding bombs
//! - [`Rotational`]: circular flow field in the xy-plane
//! - [`AnchorSpring`]: each particle tethered to a fixed anchor point
//!
//! [`ForceLaw`] closes the set so a driver can pick a law at construction
//! time without boxing.

use crate::state::ParticleState;

mod drag;
mod exploding;
mod simple;
mod spring;

pub use drag::DragGravity;
pub use exploding::{ExplodingSystem, FRAGMENT_STRIDE};
pub use simple::{AnchorSpring, ConstantVelocity, Rotational};
pub use spring::{SpringEdge, SpringNetwork, SpringSystem};

/// Standard gravitational acceleration used by the default configurations (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.8;

/// Trait for force laws that supply the time derivative of a particle state
///
/// The returned state's `positions` hold velocities (dx/dt) and its
/// `velocities` hold accelerations (dv/dt). Implementations must return a
/// state with the same particle count as the input and must not retain the
/// input.
pub trait ForceSystem: Send + Sync {
    /// Compute the derivative of `state` at `time`
    fn derivative(&self, state: &ParticleState, time: f64) -> ParticleState;

    /// Get a descriptive name for this force law
    fn name(&self) -> &str;
}

/// Closed set of the built-in force laws
#[derive(Debug, Clone)]
pub enum ForceLaw {
    /// Straight-line motion
    ConstantVelocity(ConstantVelocity),
    /// Gravity plus linear drag
    DragGravity(DragGravity),
    /// Spring network
    Spring(SpringSystem),
    /// Bomb-driven fragment explosion
    Exploding(ExplodingSystem),
    /// Circular flow field
    Rotational(Rotational),
    /// Tether to an anchor point
    AnchorSpring(AnchorSpring),
}

impl ForceLaw {
    fn inner(&self) -> &dyn ForceSystem {
        match self {
            ForceLaw::ConstantVelocity(s) => s,
            ForceLaw::DragGravity(s) => s,
            ForceLaw::Spring(s) => s,
            ForceLaw::Exploding(s) => s,
            ForceLaw::Rotational(s) => s,
            ForceLaw::AnchorSpring(s) => s,
        }
    }
}

impl ForceSystem for ForceLaw {
    fn derivative(&self, state: &ParticleState, time: f64) -> ParticleState {
        self.inner().derivative(state, time)
    }

    fn name(&self) -> &str {
        self.inner().name()
    }
}

impl From<SpringSystem> for ForceLaw {
    fn from(system: SpringSystem) -> Self {
        ForceLaw::Spring(system)
    }
}

impl From<DragGravity> for ForceLaw {
    fn from(system: DragGravity) -> Self {
        ForceLaw::DragGravity(system)
    }
}

impl From<ExplodingSystem> for ForceLaw {
    fn from(system: ExplodingSystem) -> Self {
        ForceLaw::Exploding(system)
    }
}

impl From<ConstantVelocity> for ForceLaw {
    fn from(system: ConstantVelocity) -> Self {
        ForceLaw::ConstantVelocity(system)
    }
}

impl From<Rotational> for ForceLaw {
    fn from(system: Rotational) -> Self {
        ForceLaw::Rotational(system)
    }
}

impl From<AnchorSpring> for ForceLaw {
    fn from(system: AnchorSpring) -> Self {
        ForceLaw::AnchorSpring(system)
    }
}

/// Check that every mass is positive and finite
///
/// # Panics
///
/// Panics on the first invalid mass
pub(crate) fn assert_valid_masses(masses: &[f64]) {
    for &m in masses {
        assert!(m > 0.0 && m.is_finite(), "Mass must be positive and finite");
    }
}

/// Check that a mass array matches the state it is applied to
pub(crate) fn assert_mass_count(masses: &[f64], state: &ParticleState) {
    assert_eq!(
        masses.len(),
        state.len(),
        "Mass array length must match particle count"
    );
}
