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
//! Forward Euler and explicit trapezoid integrators
//!
//! ```text
//! Euler:      y(t + dt) = y + dt*f(y, t)
//! Trapezoid:  k1 = f(y, t)
//!             k2 = f(y + dt*k1, t + dt)
//!             y(t + dt) = y + dt/2*(k1 + k2)
//! ```
//!
//! Euler is first order and gains energy on oscillators; the trapezoid rule
//! (Heun's method) is second order. Both are mainly useful as baselines
//! against RK4.

use super::Integrator;
use crate::forces::ForceSystem;
use crate::state::ParticleState;

/// Forward Euler integrator
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerIntegrator;

impl Integrator for EulerIntegrator {
    fn name(&self) -> &str {
        "Forward Euler"
    }

    fn integrate<S: ForceSystem + ?Sized>(
        &self,
        system: &S,
        state: &ParticleState,
        start_time: f64,
        dt: f64,
    ) -> ParticleState {
        let k1 = system.derivative(state, start_time);
        state.scaled_sum(&k1, dt)
    }
}

/// Explicit trapezoid (Heun) integrator
#[derive(Debug, Clone, Copy, Default)]
pub struct TrapezoidIntegrator;

impl Integrator for TrapezoidIntegrator {
    fn name(&self) -> &str {
        "Trapezoid"
    }

    fn integrate<S: ForceSystem + ?Sized>(
        &self,
        system: &S,
        state: &ParticleState,
        start_time: f64,
        dt: f64,
    ) -> ParticleState {
        let k1 = system.derivative(state, start_time);
        let k2 = system.derivative(&state.scaled_sum(&k1, dt), start_time + dt);
        let mut next = state.clone();
        next.add_scaled(&k1, 0.5 * dt);
        next.add_scaled(&k2, 0.5 * dt);
        next
    }
}
