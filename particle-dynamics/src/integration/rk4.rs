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
//! Runge-Kutta 4th order (RK4) integrator implementation
//!
//! The RK4 method is a classical explicit integrator that provides fourth-order
//! accuracy for smooth ordinary differential equations. It is widely used for
//! high-precision simulations where forces vary smoothly.
//!
//! # Algorithm
//!
//! The RK4 method computes four intermediate derivatives per timestep:
//!
//! ```text
//! k1 = f(y, t)
//! k2 = f(y + k1*dt/2, t + dt/2)
//! k3 = f(y + k2*dt/2, t + dt/2)
//! k4 = f(y + k3*dt, t + dt)
//! y(t + dt) = y(t) + (k1 + 2*k2 + 2*k3 + k4)*dt/6
//! ```
//!
//! Here `y` is the whole [`ParticleState`], so coupled systems (springs,
//! fragments sharing a blast) are staged globally: every particle sees the
//! same intermediate configuration at each stage.
//!
//! # Properties
//!
//! - **Fourth-order accurate**: Local error O(dt⁵), global error O(dt⁴)
//! - **Explicit method**: Easy to implement, no implicit solve needed
//! - **Not symplectic**: Energy may drift over long simulations
//! - **Four evaluations per step**
//!
//! Force fields with hard temporal cutoffs, such as a bomb's decay window,
//! are sampled on both sides of the cutoff within one step. The resulting
//! artifacts are accepted.
//!
//! # References
//!
//! - Butcher, J. C. (2016). Numerical Methods for Ordinary Differential Equations
//!   (3rd ed.). Wiley. Chapter 3.
//! - Press, W. H., Teukolsky, S. A., Vetterling, W. T., & Flannery, B. P. (2007).
//!   Numerical Recipes: The Art of Scientific Computing (3rd ed.). Cambridge
//!   University Press. Section 17.1.

use super::Integrator;
use crate::forces::ForceSystem;
use crate::state::ParticleState;

/// Runge-Kutta 4th order integrator
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use particle_dynamics::forces::ConstantVelocity;
/// use particle_dynamics::integration::{Integrator, RK4Integrator};
/// use particle_dynamics::state::ParticleState;
///
/// let state = ParticleState::new(vec![DVec3::ZERO], vec![DVec3::X]);
/// let next = RK4Integrator.integrate(&ConstantVelocity, &state, 0.0, 0.5);
/// assert!(next.positions()[0].abs_diff_eq(DVec3::new(0.5, 0.0, 0.0), 1e-12));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Integrator;

impl Integrator for RK4Integrator {
    fn name(&self) -> &str {
        "Runge-Kutta 4"
    }

    fn integrate<S: ForceSystem + ?Sized>(
        &self,
        system: &S,
        state: &ParticleState,
        start_time: f64,
        dt: f64,
    ) -> ParticleState {
        let dt_2 = dt * 0.5;
        let dt_6 = dt / 6.0;

        let k1 = system.derivative(state, start_time);
        let k2 = system.derivative(&state.scaled_sum(&k1, dt_2), start_time + dt_2);
        let k3 = system.derivative(&state.scaled_sum(&k2, dt_2), start_time + dt_2);
        let k4 = system.derivative(&state.scaled_sum(&k3, dt), start_time + dt);

        let mut next = state.clone();
        next.add_scaled(&k1, dt_6);
        next.add_scaled(&k2, 2.0 * dt_6);
        next.add_scaled(&k3, 2.0 * dt_6);
        next.add_scaled(&k4, dt_6);

        if !next.is_valid() {
            log::warn!("Invalid state after RK4 update at t={}", start_time);
        }
        next
    }
}
