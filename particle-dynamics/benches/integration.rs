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
//! Benchmarks comparing integrator performance
//!
//! These benchmarks measure:
//! - Raw throughput of each integrator on a cloth spring network
//! - Cost of simulating one oscillator period at a fixed step

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::DVec3;
use particle_dynamics::forces::AnchorSpring;
use particle_dynamics::integration::{Integrator, IntegratorKind};
use particle_dynamics::state::ParticleState;
use particle_dynamics::topology::{cloth_grid, ClothStiffness};

const KINDS: [IntegratorKind; 3] = [
    IntegratorKind::Euler,
    IntegratorKind::Trapezoid,
    IntegratorKind::Rk4,
];

fn bench_integrator_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrator_throughput");

    for side in [5usize, 10, 20].iter() {
        let (body, _) = cloth_grid(
            *side,
            *side,
            DVec3::ZERO,
            DVec3::new(0.0, -0.05, 0.0),
            DVec3::new(0.05, 0.0, 0.0),
            0.03,
            ClothStiffness::default(),
        );
        let system = body.system();
        group.throughput(Throughput::Elements((side * side) as u64));

        for kind in KINDS {
            group.bench_with_input(BenchmarkId::new(kind.to_string(), side), side, |b, _| {
                b.iter(|| kind.integrate(black_box(&system), black_box(&body.state), 0.0, 0.001));
            });
        }
    }

    group.finish();
}

fn bench_oscillator_period(c: &mut Criterion) {
    let mut group = c.benchmark_group("oscillator_period");
    group.sample_size(20);

    let k = 100.0_f64;
    let omega = k.sqrt();
    let period = 2.0 * std::f64::consts::PI / omega;
    let dt = period / 100.0;
    let system = AnchorSpring::new(DVec3::ZERO, k);

    for kind in KINDS {
        group.bench_function(kind.to_string(), |b| {
            b.iter(|| {
                let mut state = ParticleState::from_positions(vec![DVec3::new(1.0, 0.0, 0.0)]);
                for i in 0..100 {
                    state = kind.integrate(&system, &state, i as f64 * dt, dt);
                }
                black_box(state.positions()[0].x)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_integrator_throughput, bench_oscillator_period);
criterion_main!(benches);
