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
//! Frame-driven simulation drivers
//!
//! Drivers own the particle state and turn per-frame wall-clock deltas into
//! fixed integration steps through a [`TimeAccumulator`].
//!
//! - [`Simulation`]: any force system, always running, with reset
//! - [`ExplosionScene`]: a triangle mesh shattered by a moving sphere
//!
//! # Frame loop
//!
//! ```text
//! update(frame_time, commands)
//!   reset?    -> restore initial state, clear bombs and smashed flags, pause
//!   trigger?  -> toggle exploding mode
//!   paused?   -> return (remainder untouched)
//!   for each fixed step:
//!       test un-smashed fragments against the sphere at time t
//!       integrate t -> t + dt
//!   recompute fragment normals
//! ```

use crate::collision::CollisionDetector;
use crate::config::SimulationConfig;
use crate::forces::{ExplodingSystem, ForceSystem, FRAGMENT_STRIDE};
use crate::integration::{Integrator, IntegratorKind, TimeAccumulator};
use crate::mesh::{fragment_normals, TriangleMesh};
use crate::state::ParticleState;
use anyhow::Result;
use glam::DVec3;

/// Receives updated fragment geometry
pub trait FragmentSink {
    /// Store the three vertices of fragment `index`
    fn set_fragment(&mut self, index: usize, vertices: [DVec3; 3]);
}

impl FragmentSink for Vec<[DVec3; 3]> {
    fn set_fragment(&mut self, index: usize, vertices: [DVec3; 3]) {
        if index >= self.len() {
            self.resize(index + 1, [DVec3::ZERO; 3]);
        }
        self[index] = vertices;
    }
}

/// Discrete user commands for one frame, already edge-detected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCommands {
    /// Restore the initial scene
    pub reset: bool,
    /// Toggle exploding mode
    pub trigger: bool,
}

/// Turns a held button level into a single rising edge
///
/// ```
/// use particle_dynamics::simulation::EdgeTrigger;
///
/// let mut key = EdgeTrigger::new();
/// assert!(key.rising(true));
/// assert!(!key.rising(true));
/// assert!(!key.rising(false));
/// assert!(key.rising(true));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTrigger {
    held: bool,
}

impl EdgeTrigger {
    /// Create a trigger in the released state
    pub fn new() -> Self {
        EdgeTrigger::default()
    }

    /// Feed the current level; true only on a released-to-pressed change
    pub fn rising(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.held;
        self.held = pressed;
        edge
    }
}

/// Fixed-step driver for an arbitrary force system
#[derive(Debug, Clone)]
pub struct Simulation<S> {
    system: S,
    integrator: IntegratorKind,
    accumulator: TimeAccumulator,
    initial: ParticleState,
    state: ParticleState,
    steps_taken: u64,
}

impl<S: ForceSystem> Simulation<S> {
    /// Create a driver starting from `initial` at time zero
    ///
    /// # Panics
    ///
    /// Panics if `fixed_step` is not positive and finite
    pub fn new(system: S, initial: ParticleState, integrator: IntegratorKind, fixed_step: f64) -> Self {
        Simulation {
            system,
            integrator,
            accumulator: TimeAccumulator::new(fixed_step),
            state: initial.clone(),
            initial,
            steps_taken: 0,
        }
    }

    /// Current particle state
    pub fn state(&self) -> &ParticleState {
        &self.state
    }

    /// The force system
    pub fn system(&self) -> &S {
        &self.system
    }

    /// Integration scheme in use
    pub fn integrator(&self) -> IntegratorKind {
        self.integrator
    }

    /// Fixed step size
    pub fn fixed_step(&self) -> f64 {
        self.accumulator.fixed_step()
    }

    /// Simulation time, always a whole number of fixed steps
    pub fn time(&self) -> f64 {
        self.steps_taken as f64 * self.accumulator.fixed_step()
    }

    /// Advance by exactly one fixed step
    pub fn step(&mut self) {
        let dt = self.accumulator.fixed_step();
        self.state = self
            .integrator
            .integrate(&self.system, &self.state, self.time(), dt);
        self.steps_taken += 1;
    }

    /// Consume a frame's elapsed time, returning the number of steps taken
    ///
    /// With `reset` set the initial state is restored before any stepping.
    pub fn update(&mut self, frame_time: f64, reset: bool) -> usize {
        if reset {
            self.reset();
        }
        let steps = self.accumulator.advance(frame_time);
        for _ in 0..steps {
            self.step();
        }
        log::trace!("{}: {} step(s), t={:.4}", self.system.name(), steps, self.time());
        steps
    }

    /// Restore the initial state and rewind time
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        self.steps_taken = 0;
        self.accumulator.reset();
        log::debug!("{} simulation reset", self.system.name());
    }
}

/// A triangle mesh that shatters when a moving sphere passes through it
///
/// Every triangle becomes an independent fragment of three particles. The
/// sphere travels in a straight line from its start point while the scene
/// is exploding; the first time it touches a fragment, the fragment picks
/// up the sphere's velocity, is pushed out of the sphere, and a bomb is
/// set off at the contact point.
#[derive(Debug, Clone)]
pub struct ExplosionScene {
    mesh: TriangleMesh,
    initial: ParticleState,
    state: ParticleState,
    system: ExplodingSystem,
    detector: CollisionDetector,
    integrator: IntegratorKind,
    accumulator: TimeAccumulator,
    sphere_start: DVec3,
    sphere_velocity: DVec3,
    strength_exponent: f64,
    smashed: Vec<bool>,
    normals: Vec<DVec3>,
    exploding: bool,
    steps_taken: u64,
}

impl ExplosionScene {
    /// Build a resting scene from a mesh and a configuration
    ///
    /// Fragment vertices start with a velocity of
    /// `initial_normal_speed` along the shared mesh vertex normal.
    pub fn new(mesh: TriangleMesh, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let speed = config.initial_normal_speed;
        let velocities = mesh
            .fragment_vertex_normals()
            .into_iter()
            .map(|n| n * speed)
            .collect();
        let initial = ParticleState::new(mesh.fragment_positions(), velocities);
        let fragment_count = mesh.triangle_count();
        let normals = fragment_normals(initial.positions());

        log::debug!(
            "Explosion scene: {} fragments, {} integrator, step {}",
            fragment_count,
            config.integrator,
            config.fixed_step
        );

        Ok(ExplosionScene {
            mesh,
            state: initial.clone(),
            initial,
            system: config.exploding_system(),
            detector: config.detector(),
            integrator: config.integrator,
            accumulator: TimeAccumulator::new(config.fixed_step),
            sphere_start: config.sphere.start,
            sphere_velocity: config.sphere.velocity,
            strength_exponent: config.strength_exponent,
            smashed: vec![false; fragment_count],
            normals,
            exploding: false,
            steps_taken: 0,
        })
    }

    /// Process one frame, returning the number of fixed steps run
    pub fn update(&mut self, frame_time: f64, commands: FrameCommands) -> usize {
        if commands.reset {
            self.reset();
        }
        if commands.trigger {
            self.exploding = !self.exploding;
            log::debug!(
                "Exploding mode {} at t={:.4}",
                if self.exploding { "on" } else { "off" },
                self.time()
            );
        }
        if !self.exploding {
            return 0;
        }

        let steps = self.accumulator.advance(frame_time);
        for _ in 0..steps {
            self.step();
        }
        if steps > 0 {
            self.normals = fragment_normals(self.state.positions());
        }
        log::trace!("Explosion frame: {} step(s), t={:.4}", steps, self.time());
        steps
    }

    /// Run one fixed step regardless of mode: collisions, then integration
    pub fn step(&mut self) {
        let t = self.time();
        let dt = self.accumulator.fixed_step();
        self.resolve_collisions(t);
        self.state = self.integrator.integrate(&self.system, &self.state, t, dt);
        self.steps_taken += 1;
    }

    /// Restore the initial mesh, clear bombs and smashed flags, and pause
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        self.smashed.fill(false);
        self.system.bombs_mut().clear();
        self.exploding = false;
        self.steps_taken = 0;
        self.accumulator.reset();
        self.normals = fragment_normals(self.state.positions());
        log::debug!("Explosion scene reset");
    }

    fn resolve_collisions(&mut self, time: f64) {
        let center = self.sphere_center_at(time);
        let direction = self.sphere_velocity.normalize_or_zero();

        for fragment in 0..self.smashed.len() {
            if self.smashed[fragment] {
                continue;
            }
            let vertices = self.fragment_vertices(fragment);
            let Some(contact) = self.detector.test_fragment(&vertices, center) else {
                continue;
            };

            self.smashed[fragment] = true;
            let base = fragment * FRAGMENT_STRIDE;
            let (positions, velocities) = self.state.split_mut();
            for k in base..base + FRAGMENT_STRIDE {
                velocities[k] += self.sphere_velocity;
                positions[k] += contact.correction;
            }

            let strength = contact.normal.dot(direction).abs().powf(self.strength_exponent);
            log::debug!(
                "Fragment {} hit at {:?}, t={:.4}, strength {:.3}",
                fragment,
                contact.point,
                time,
                strength
            );
            // Edge-on hits carry no blast
            if strength > 0.0 {
                self.system.bombs_mut().add(time, contact.point, strength);
            }
        }
    }

    /// Whether the simulation is running
    pub fn is_exploding(&self) -> bool {
        self.exploding
    }

    /// Simulation time since the last reset
    pub fn time(&self) -> f64 {
        self.steps_taken as f64 * self.accumulator.fixed_step()
    }

    /// Sphere centre at the current simulation time
    pub fn sphere_center(&self) -> DVec3 {
        self.sphere_center_at(self.time())
    }

    fn sphere_center_at(&self, time: f64) -> DVec3 {
        self.sphere_start + self.sphere_velocity * time
    }

    /// Sphere radius
    pub fn sphere_radius(&self) -> f64 {
        self.detector.radius()
    }

    /// The mesh the scene was built from
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Current fragment particles
    pub fn state(&self) -> &ParticleState {
        &self.state
    }

    /// Force system, including the bomb registry
    pub fn system(&self) -> &ExplodingSystem {
        &self.system
    }

    /// Number of fragments
    pub fn fragment_count(&self) -> usize {
        self.smashed.len()
    }

    /// Number of fragments the sphere has already hit
    pub fn smashed_count(&self) -> usize {
        self.smashed.iter().filter(|&&s| s).count()
    }

    /// Whether fragment `index` has been hit since the last reset
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range
    pub fn is_smashed(&self, index: usize) -> bool {
        self.smashed[index]
    }

    /// The three vertices of fragment `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range
    pub fn fragment_vertices(&self, index: usize) -> [DVec3; 3] {
        let base = index * FRAGMENT_STRIDE;
        let p = &self.state.positions()[base..base + FRAGMENT_STRIDE];
        [p[0], p[1], p[2]]
    }

    /// Unit normal per fragment, as of the last update
    pub fn fragment_normals(&self) -> &[DVec3] {
        &self.normals
    }

    /// Write every fragment's vertices to `sink`
    pub fn publish<K: FragmentSink + ?Sized>(&self, sink: &mut K) {
        for index in 0..self.fragment_count() {
            sink.set_fragment(index, self.fragment_vertices(index));
        }
    }
}
