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
//! Numerical integration methods for particle simulation
//!
//! Integrators advance a [`ParticleState`] by one step using the derivative
//! supplied by a [`ForceSystem`]. They hold no state of their own: the caller
//! owns the particle state and the fixed-step bookkeeping (see
//! [`TimeAccumulator`]).
//!
//! # Integrators
//!
//! - **RK4 (Runge-Kutta 4th order)**: Default. High accuracy for smooth dynamics
//! - **Trapezoid**: Second order, two evaluations per step
//! - **Forward Euler**: First order, one evaluation per step
//!
//! # Timestep Guidelines
//!
//! - Too small: Numerical precision issues and wasted computation
//! - Too large: Instability and inaccuracy
//! - Stiff spring networks need small steps with every explicit method here

use crate::forces::ForceSystem;
use crate::state::ParticleState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod accumulator;
mod euler;
mod rk4;

pub use accumulator::TimeAccumulator;
pub use euler::{EulerIntegrator, TrapezoidIntegrator};
pub use rk4::RK4Integrator;

/// Trait for explicit one-step integrators
///
/// `integrate` returns the state at `start_time + dt` and never mutates its
/// input. Implementations are generic over the force system so calls are
/// statically dispatched.
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Advance `state` from `start_time` to `start_time + dt`
    fn integrate<S: ForceSystem + ?Sized>(
        &self,
        system: &S,
        state: &ParticleState,
        start_time: f64,
        dt: f64,
    ) -> ParticleState;
}

/// Validate a timestep for stability
///
/// Returns an error for non-positive or non-finite steps, and a warning
/// message for steps that are extremely small (< 1e-9) or large (> 1.0).
pub fn validate_timestep(dt: f64) -> Result<(), String> {
    if dt <= 0.0 || !dt.is_finite() {
        return Err(format!("Invalid timestep: {}. Must be positive and finite.", dt));
    }

    if dt < 1e-9 {
        return Err(format!(
            "Warning: Timestep {} is extremely small and may cause precision loss with f64. \
            Consider using larger timestep.",
            dt
        ));
    }

    if dt > 1.0 {
        return Err(format!(
            "Warning: Timestep {} is large and may cause instability. \
            Consider using smaller timesteps for better accuracy.",
            dt
        ));
    }

    Ok(())
}

/// Selectable integration scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// Forward Euler
    Euler,
    /// Explicit trapezoid (Heun)
    Trapezoid,
    /// Classic Runge-Kutta 4
    #[default]
    Rk4,
}

impl IntegratorKind {
    /// Parse a one-letter code: `e`, `t` or `r`
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            'e' => Some(IntegratorKind::Euler),
            't' => Some(IntegratorKind::Trapezoid),
            'r' => Some(IntegratorKind::Rk4),
            _ => None,
        }
    }
}

impl FromStr for IntegratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" | "e" => Ok(IntegratorKind::Euler),
            "trapezoid" | "trapezoidal" | "heun" | "t" => Ok(IntegratorKind::Trapezoid),
            "rk4" | "runge-kutta" | "r" => Ok(IntegratorKind::Rk4),
            other => Err(format!("Unrecognized integrator type: {}", other)),
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Integrator for IntegratorKind {
    fn name(&self) -> &str {
        match self {
            IntegratorKind::Euler => EulerIntegrator.name(),
            IntegratorKind::Trapezoid => TrapezoidIntegrator.name(),
            IntegratorKind::Rk4 => RK4Integrator.name(),
        }
    }

    fn integrate<S: ForceSystem + ?Sized>(
        &self,
        system: &S,
        state: &ParticleState,
        start_time: f64,
        dt: f64,
    ) -> ParticleState {
        match self {
            IntegratorKind::Euler => EulerIntegrator.integrate(system, state, start_time, dt),
            IntegratorKind::Trapezoid => TrapezoidIntegrator.integrate(system, state, start_time, dt),
            IntegratorKind::Rk4 => RK4Integrator.integrate(system, state, start_time, dt),
        }
    }
}

/// Total kinetic energy, KE = Σ 0.5 * m * v²
///
/// # Panics
///
/// Panics if `masses` does not match the particle count
pub fn kinetic_energy(state: &ParticleState, masses: &[f64]) -> f64 {
    assert_eq!(
        masses.len(),
        state.len(),
        "Mass array length must match particle count"
    );
    state
        .velocities()
        .iter()
        .zip(masses)
        .map(|(v, m)| 0.5 * m * v.length_squared())
        .sum()
}
