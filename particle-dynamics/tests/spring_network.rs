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
//! End-to-end spring network scenarios
//!
//! Pinned particles must stay exactly where they started, free particles
//! must oscillate around their rest configuration without blowing up.

use approx::assert_abs_diff_eq;
use glam::DVec3;
use particle_dynamics::forces::{ForceSystem, SpringEdge, SpringNetwork, SpringSystem};
use particle_dynamics::integration::{kinetic_energy, Integrator, IntegratorKind, RK4Integrator};
use particle_dynamics::simulation::Simulation;
use particle_dynamics::state::ParticleState;
use particle_dynamics::topology::{cloth_grid, pendulum_chain, ClothStiffness};
use std::sync::atomic::{AtomicUsize, Ordering};

fn two_particle_system() -> (SpringSystem, ParticleState) {
    let mut network = SpringNetwork::new();
    network.add_spring(SpringEdge::new(0, 1, 30.0, 1.0));
    network.add_fixed(0);
    let system = SpringSystem::new(vec![1.0, 1.0], network);
    let state = ParticleState::from_positions(vec![DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0)]);
    (system, state)
}

/// Two particles, k=30, L=1, particle 0 pinned at the origin
///
/// Under gravity and drag particle 1 swings below the pin. Energy bounds
/// the stretch to about 1.2 (all of m*g*(L + s) stored as k*s²/2), so the
/// distance from the origin stays inside a loose envelope around L.
#[test]
fn test_pinned_two_particle_spring() {
    let (system, state) = two_particle_system();
    let mut sim = Simulation::new(system, state, IntegratorKind::Rk4, 0.001);

    for _ in 0..1000 {
        sim.step();
        let s = sim.state();
        assert_eq!(s.positions()[0], DVec3::ZERO);
        assert_eq!(s.velocities()[0], DVec3::ZERO);
        let distance = s.positions()[1].length();
        assert!(
            distance > 0.2 && distance < 2.5,
            "particle 1 left the envelope: {}",
            distance
        );
    }
    assert_abs_diff_eq!(sim.time(), 1.0, epsilon = 1e-12);
    assert!(sim.state().is_valid());
}

/// Wraps a force system and checks every derivative it hands out
struct PinnedCheck<'a> {
    inner: &'a SpringSystem,
    pinned: usize,
    calls: AtomicUsize,
}

impl ForceSystem for PinnedCheck<'_> {
    fn derivative(&self, state: &ParticleState, time: f64) -> ParticleState {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let d = self.inner.derivative(state, time);
        assert_eq!(d.positions()[self.pinned], DVec3::ZERO, "pinned rate at t={}", time);
        assert_eq!(d.velocities()[self.pinned], DVec3::ZERO, "pinned acceleration at t={}", time);
        d
    }

    fn name(&self) -> &str {
        "pinned_check"
    }
}

/// Particle 1 released from rest at L + 0.3 with no gravity or drag
///
/// The pinned particle's derivative must be exactly zero at every RK4
/// stage, and the free particle oscillates between 0.7 and 1.3.
#[test]
fn test_released_spring_keeps_pin_at_every_stage() {
    let (system, _) = two_particle_system();
    let system = system.with_gravity(DVec3::ZERO).with_drag(0.0);
    let checked = PinnedCheck {
        inner: &system,
        pinned: 0,
        calls: AtomicUsize::new(0),
    };
    let dt = 0.001;
    let mut state = ParticleState::from_positions(vec![DVec3::ZERO, DVec3::new(1.3, 0.0, 0.0)]);
    let (mut shortest, mut longest) = (f64::MAX, f64::MIN);

    for i in 0..1000 {
        state = RK4Integrator.integrate(&checked, &state, i as f64 * dt, dt);
        assert_eq!(state.positions()[0], DVec3::ZERO);
        let distance = state.positions()[1].length();
        shortest = shortest.min(distance);
        longest = longest.max(distance);
    }

    assert_eq!(checked.calls.load(Ordering::Relaxed), 4000);
    assert!(shortest > 0.7 - 1e-6 && longest < 1.3 + 1e-6, "envelope [{}, {}]", shortest, longest);
    // Period is 2π/√30 ≈ 1.15 s, so the run reaches both turning points
    assert!(shortest < 0.71 && longest > 1.29, "envelope [{}, {}]", shortest, longest);
}

/// Without gravity or drag a stretched spring conserves energy under RK4
#[test]
fn test_free_spring_conserves_energy() {
    let mut network = SpringNetwork::new();
    network.add_spring(SpringEdge::new(0, 1, 30.0, 1.0));
    let masses = vec![1.0, 2.0];
    let system = SpringSystem::new(masses.clone(), network.clone())
        .with_gravity(DVec3::ZERO)
        .with_drag(0.0);
    let start = ParticleState::from_positions(vec![DVec3::ZERO, DVec3::new(1.4, 0.0, 0.0)]);
    let energy = |s: &ParticleState| kinetic_energy(s, &masses) + network.potential_energy(s.positions());
    let e0 = energy(&start);

    let mut sim = Simulation::new(system, start, IntegratorKind::Rk4, 0.001);
    for _ in 0..2000 {
        sim.step();
    }
    let drift = (energy(sim.state()) - e0).abs() / e0;
    assert!(drift < 1e-6, "relative energy drift {}", drift);
}

#[test]
fn test_fixed_particle_derivative_is_zero_under_load() {
    let (system, _) = two_particle_system();
    // Pinned particle given a velocity and a stretched spring
    let state = ParticleState::new(
        vec![DVec3::new(0.3, 0.0, 0.0), DVec3::new(5.0, 5.0, 0.0)],
        vec![DVec3::new(4.0, 0.0, 0.0), DVec3::ZERO],
    );
    let d = system.derivative(&state, 0.0);
    assert_eq!(d.positions()[0], DVec3::ZERO);
    assert_eq!(d.velocities()[0], DVec3::ZERO);
}

#[test]
fn test_pendulum_chain_swings_from_pin() {
    let body = pendulum_chain();
    let pin = body.state.positions()[0];
    let mut sim = Simulation::new(body.system(), body.state.clone(), IntegratorKind::Rk4, 0.001);

    let steps = sim.update(2.0, false);
    assert_eq!(steps, 2000);
    assert_eq!(sim.state().positions()[0], pin);
    assert!(sim.state().is_valid());
    // Free particles actually moved
    assert!(sim.state().positions()[3].distance(body.state.positions()[3]) > 1e-3);
}

#[test]
fn test_cloth_sags_but_corners_hold() {
    let (body, mesh) = cloth_grid(
        6,
        6,
        DVec3::new(0.0, 1.0, 0.0),
        DVec3::new(0.0, 0.0, 0.05),
        DVec3::new(0.05, 0.0, 0.0),
        0.03,
        ClothStiffness {
            structural: 200.0,
            ..ClothStiffness::default()
        },
    );
    assert_eq!(mesh.triangle_count(), 2 * 5 * 5);

    let mut sim = Simulation::new(body.system(), body.state.clone(), IntegratorKind::Rk4, 0.001);
    for _ in 0..500 {
        sim.step();
    }
    let s = sim.state();
    assert_eq!(s.positions()[0], body.state.positions()[0]);
    assert_eq!(s.positions()[5], body.state.positions()[5]);
    // The far edge drops under gravity
    assert!(s.positions()[35].y < 1.0);
    assert!(s.is_valid());
}

#[test]
fn test_simulation_reset_restores_spring_state() {
    let (system, state) = two_particle_system();
    let mut sim = Simulation::new(system, state.clone(), IntegratorKind::Trapezoid, 0.001);
    sim.update(0.1, false);
    assert_ne!(sim.state(), &state);
    sim.update(0.0, true);
    assert_eq!(sim.state(), &state);
    assert_eq!(sim.time(), 0.0);
}
