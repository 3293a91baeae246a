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
//! # Particle Dynamics
//!
//! Fixed-step simulation of point masses under pluggable force laws, with a
//! sphere-versus-triangle fracture scenario built on top.
//!
//! ## Features
//!
//! - **Force laws**: constant velocity, drag and gravity, spring networks,
//!   bomb-driven explosions, rotational and anchor fields behind one trait
//! - **Integrators**: RK4 by default, forward Euler and trapezoid for comparison
//! - **Fixed stepping**: a time accumulator turns jittery frame times into
//!   whole fixed steps
//! - **Fracture**: a moving sphere smashes mesh triangles and sets off bombs
//! - **Parallelization**: Optional Rayon integration for the explosion field
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use particle_dynamics::forces::{SpringEdge, SpringNetwork, SpringSystem};
//! use particle_dynamics::integration::IntegratorKind;
//! use particle_dynamics::simulation::Simulation;
//! use particle_dynamics::state::ParticleState;
//!
//! let mut network = SpringNetwork::new();
//! network.add_spring(SpringEdge::new(0, 1, 30.0, 1.0));
//! network.add_fixed(0);
//! let system = SpringSystem::new(vec![1.0, 1.0], network);
//! let initial = ParticleState::from_positions(vec![DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0)]);
//!
//! let mut sim = Simulation::new(system, initial, IntegratorKind::Rk4, 0.001);
//! sim.update(1.0 / 60.0, false);
//! assert_eq!(sim.state().positions()[0], DVec3::ZERO);
//! ```

#![warn(missing_docs)]

/// Particle state vectors
pub mod state;

/// Force laws supplying state derivatives
pub mod forces;

/// Numerical integration methods
pub mod integration;

/// Explosion events
pub mod bombs;

/// Sphere-triangle collision detection
pub mod collision;

/// Triangle meshes and fragments
pub mod mesh;

/// Spring topology builders
pub mod topology;

/// Frame-driven drivers
pub mod simulation;

/// Serializable configuration
pub mod config;

pub use config::SimulationConfig;
pub use forces::{ForceLaw, ForceSystem};
pub use integration::{Integrator, IntegratorKind, TimeAccumulator};
pub use simulation::{ExplosionScene, FrameCommands, Simulation};
pub use state::ParticleState;
