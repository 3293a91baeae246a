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
//! Benchmarks for the explosion field and the shatter scene
//!
//! Run with `--no-default-features` to compare against the sequential
//! fragment loop.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::DVec3;
use particle_dynamics::forces::{ExplodingSystem, ForceSystem};
use particle_dynamics::mesh::TriangleMesh;
use particle_dynamics::simulation::{ExplosionScene, FrameCommands};
use particle_dynamics::state::ParticleState;
use particle_dynamics::SimulationConfig;

fn plate(side: usize) -> TriangleMesh {
    let spacing = 1.0 / side as f64;
    TriangleMesh::grid(
        side,
        side,
        DVec3::new(0.0, 0.7, -0.5),
        DVec3::new(0.0, -spacing, 0.0),
        DVec3::new(0.0, 0.0, spacing),
    )
}

fn bench_exploding_derivative(c: &mut Criterion) {
    let mut group = c.benchmark_group("exploding_derivative");

    for side in [10usize, 30, 60].iter() {
        let mesh = plate(*side);
        let state = ParticleState::from_positions(mesh.fragment_positions());
        let mut system = ExplodingSystem::default();
        for i in 0..8 {
            let t = i as f64 * 0.01;
            system
                .bombs_mut()
                .add(t, DVec3::new(0.0, 0.2 + 0.01 * i as f64, 0.0), 1.0);
        }
        group.throughput(Throughput::Elements(mesh.triangle_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), side, |b, _| {
            b.iter(|| system.derivative(black_box(&state), black_box(0.1)));
        });
    }

    group.finish();
}

fn bench_scene_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("shatter_scene");
    group.sample_size(20);

    let config = SimulationConfig {
        fixed_step: 0.005,
        ..SimulationConfig::default()
    };

    group.bench_function("one_second_at_60hz", |b| {
        b.iter(|| {
            let mut scene = ExplosionScene::new(plate(30), &config).unwrap();
            scene.update(0.0, FrameCommands { reset: false, trigger: true });
            for _ in 0..60 {
                scene.update(1.0 / 60.0, FrameCommands::default());
            }
            black_box(scene.smashed_count())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_exploding_derivative, bench_scene_frame);
criterion_main!(benches);
