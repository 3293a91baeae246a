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
//! Shatter example: a sphere smashes through a triangulated plate
//!
//! Usage: `cargo run --example shatter -- [e|t|r] [timestep] [config.json]`
//!
//! The host loop is simulated at 60 Hz with a little frame jitter. The
//! trigger key is "pressed" on the first frame and reset on frame 150.
//! Set `RUST_LOG=debug` to see impacts and bombs as they happen.

use anyhow::{bail, Context, Result};
use glam::DVec3;
use particle_dynamics::integration::IntegratorKind;
use particle_dynamics::mesh::TriangleMesh;
use particle_dynamics::simulation::{EdgeTrigger, ExplosionScene, FragmentSink, FrameCommands};
use particle_dynamics::SimulationConfig;

/// Collects the published fragments, standing in for a renderer
#[derive(Default)]
struct FrameBuffer {
    fragments: Vec<[DVec3; 3]>,
}

impl FragmentSink for FrameBuffer {
    fn set_fragment(&mut self, index: usize, vertices: [DVec3; 3]) {
        self.fragments.set_fragment(index, vertices);
    }
}

impl FrameBuffer {
    fn spread(&self) -> f64 {
        let count = self.fragments.len().max(1) as f64;
        let centroid = self
            .fragments
            .iter()
            .map(|f| (f[0] + f[1] + f[2]) / 3.0)
            .fold(DVec3::ZERO, |a, b| a + b)
            / count;
        self.fragments
            .iter()
            .map(|f| ((f[0] + f[1] + f[2]) / 3.0).distance(centroid))
            .fold(0.0, f64::max)
    }
}

fn load_config() -> Result<SimulationConfig> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = match args.get(2) {
        Some(path) => SimulationConfig::load_from_file(path)?,
        None => SimulationConfig::default(),
    };
    config.apply_env_overrides();

    if let Some(code) = args.first() {
        let Some(kind) = code.chars().next().and_then(IntegratorKind::from_code) else {
            bail!("Unrecognized integrator type: {}", code);
        };
        config.integrator = kind;
    }
    if let Some(step) = args.get(1) {
        config.fixed_step = step
            .parse()
            .with_context(|| format!("Invalid timestep: {}", step))?;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config()?;
    println!("Particle Dynamics - Shatter Example");
    println!("===================================\n");
    println!("Integrator: {}", config.integrator);
    println!("Fixed step: {} s", config.fixed_step);
    println!("Sphere: r={} from {:?} at {:?}\n", config.sphere.radius, config.sphere.start, config.sphere.velocity);

    // 16 × 16 plate in the x = 0 plane, centred on the sphere path
    let mesh = TriangleMesh::grid(
        16,
        16,
        DVec3::new(0.0, 0.5, -0.3),
        DVec3::new(0.0, -0.04, 0.0),
        DVec3::new(0.0, 0.0, 0.04),
    );
    let mut scene = ExplosionScene::new(mesh, &config)?;
    println!("Fragments: {}\n", scene.fragment_count());

    let mut trigger_key = EdgeTrigger::new();
    let mut reset_key = EdgeTrigger::new();
    let mut buffer = FrameBuffer::default();

    for frame in 0..180 {
        // Roughly 60 Hz, never exactly a whole number of steps
        let jitter = if frame % 3 == 0 { 0.002 } else { -0.001 };
        let frame_time = 1.0 / 60.0 + jitter;

        let commands = FrameCommands {
            reset: reset_key.rising(frame == 150),
            trigger: trigger_key.rising(frame < 3),
        };
        let steps = scene.update(frame_time, commands);
        scene.publish(&mut buffer);

        if frame % 15 == 0 || commands.reset {
            println!(
                "frame {:3}  t={:.3}  steps={}  exploding={}  smashed={:3}  bombs={:3}  spread={:.3}",
                frame,
                scene.time(),
                steps,
                scene.is_exploding(),
                scene.smashed_count(),
                scene.system().bombs().len(),
                buffer.spread(),
            );
        }
    }

    Ok(())
}
