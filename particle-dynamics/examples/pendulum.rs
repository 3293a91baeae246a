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
//! Pendulum chain example comparing integrators
//!
//! Runs the same four-particle spring chain with every integrator and
//! prints positions and total energy side by side.

use particle_dynamics::integration::{kinetic_energy, IntegratorKind};
use particle_dynamics::simulation::Simulation;
use particle_dynamics::topology::pendulum_chain;

fn main() {
    env_logger::init();

    println!("Particle Dynamics - Pendulum Chain Example");
    println!("==========================================\n");

    let body = pendulum_chain();
    let dt = 0.005;
    let frame_time = 1.0 / 60.0;

    for kind in [IntegratorKind::Euler, IntegratorKind::Trapezoid, IntegratorKind::Rk4] {
        let mut sim = Simulation::new(body.system(), body.state.clone(), kind, dt);
        println!("{} (dt = {} s)", kind, dt);

        for frame in 0..=300 {
            if frame > 0 {
                sim.update(frame_time, false);
            }
            if frame % 60 == 0 {
                let state = sim.state();
                let energy = kinetic_energy(state, &body.masses)
                    + body.network.potential_energy(state.positions());
                let tail = state.positions()[3];
                println!(
                    "  t={:5.2}s  tail=({:7.3}, {:7.3}, {:7.3})  KE+spring PE={:9.3}",
                    sim.time(),
                    tail.x,
                    tail.y,
                    tail.z,
                    energy
                );
            }
        }
        println!();
    }
}
