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
//! Ready-made spring topologies
//!
//! Each builder returns a [`SpringBody`]: the initial particle state, the
//! per-particle masses and the spring network, ready to be handed to
//! [`SpringSystem::new`](crate::forces::SpringSystem::new).

use crate::forces::{SpringEdge, SpringNetwork, SpringSystem};
use crate::mesh::TriangleMesh;
use crate::state::ParticleState;
use glam::DVec3;

/// Initial state, masses and springs of a spring-coupled body
#[derive(Debug, Clone)]
pub struct SpringBody {
    /// Initial positions and velocities
    pub state: ParticleState,
    /// Per-particle masses
    pub masses: Vec<f64>,
    /// Springs and pinned particles
    pub network: SpringNetwork,
}

impl SpringBody {
    /// Build the spring force system for this body with default gravity and drag
    pub fn system(&self) -> SpringSystem {
        SpringSystem::new(self.masses.clone(), self.network.clone())
    }
}

/// Four-particle chain pinned at particle 0
///
/// Masses are 1, 3, 5 and 2; rest lengths grow 1, 2, 3 along the chain.
/// The free particles start displaced and moving so the chain swings.
pub fn pendulum_chain() -> SpringBody {
    let positions = vec![
        DVec3::new(-2.5, 0.0, 0.0),
        DVec3::new(-0.5, 0.0, 0.0),
        DVec3::new(0.0, 3.0, 0.0),
        DVec3::new(-4.0, 0.0, 0.0),
    ];
    let velocities = vec![
        DVec3::ZERO,
        DVec3::new(0.0, -2.0, 0.0),
        DVec3::new(1.0, 0.0, -1.0),
        DVec3::new(-1.0, 3.0, 0.0),
    ];
    let mut network = SpringNetwork::new();
    network.add_spring(SpringEdge::new(0, 1, 30.0, 1.0));
    network.add_spring(SpringEdge::new(1, 2, 30.0, 2.0));
    network.add_spring(SpringEdge::new(2, 3, 30.0, 3.0));
    network.add_fixed(0);

    SpringBody {
        state: ParticleState::new(positions, velocities),
        masses: vec![1.0, 3.0, 5.0, 2.0],
        network,
    }
}

/// Stiffness of the three spring families in a cloth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClothStiffness {
    /// Nearest neighbours along rows and columns
    pub structural: f64,
    /// Cell diagonals
    pub shear: f64,
    /// Second neighbours along rows and columns
    pub flex: f64,
}

impl Default for ClothStiffness {
    fn default() -> Self {
        ClothStiffness {
            structural: 100.0,
            shear: 100.0,
            flex: 100.0,
        }
    }
}

/// Rectangular cloth with the first and last particle of row 0 pinned
///
/// The grid layout matches [`TriangleMesh::grid`], so the returned mesh and
/// body share particle indices (`r * cols + c`).
///
/// # Panics
///
/// Panics if either dimension is below 3 or `mass` is not positive
pub fn cloth_grid(
    rows: usize,
    cols: usize,
    origin: DVec3,
    row_step: DVec3,
    col_step: DVec3,
    mass: f64,
    stiffness: ClothStiffness,
) -> (SpringBody, TriangleMesh) {
    assert!(rows >= 3 && cols >= 3, "Cloth needs at least 3 rows and 3 columns");
    assert!(mass > 0.0 && mass.is_finite(), "Mass must be positive and finite");

    let mesh = TriangleMesh::grid(rows, cols, origin, row_step, col_step);
    let index = |r: usize, c: usize| r * cols + c;
    let row_rest = row_step.length();
    let col_rest = col_step.length();
    let diagonal_rest = (row_step + col_step).length();
    let anti_diagonal_rest = (row_step - col_step).length();

    let mut network = SpringNetwork::new();
    for r in 0..rows {
        for c in 0..cols {
            let here = index(r, c);
            if r + 1 < rows {
                network.add_spring(SpringEdge::new(here, index(r + 1, c), stiffness.structural, row_rest));
            }
            if c + 1 < cols {
                network.add_spring(SpringEdge::new(here, index(r, c + 1), stiffness.structural, col_rest));
            }
            if r + 1 < rows && c + 1 < cols {
                network.add_spring(SpringEdge::new(here, index(r + 1, c + 1), stiffness.shear, diagonal_rest));
                network.add_spring(SpringEdge::new(
                    index(r + 1, c),
                    index(r, c + 1),
                    stiffness.shear,
                    anti_diagonal_rest,
                ));
            }
            if r + 2 < rows {
                network.add_spring(SpringEdge::new(here, index(r + 2, c), stiffness.flex, 2.0 * row_rest));
            }
            if c + 2 < cols {
                network.add_spring(SpringEdge::new(here, index(r, c + 2), stiffness.flex, 2.0 * col_rest));
            }
        }
    }
    network.add_fixed(index(0, 0));
    network.add_fixed(index(0, cols - 1));

    let body = SpringBody {
        state: ParticleState::from_positions(mesh.positions().to_vec()),
        masses: vec![mass; rows * cols],
        network,
    };
    (body, mesh)
}

/// Hanging tube of stacked rhombic rings, pinned by its top ring
///
/// Each of the `levels + 1` rings holds `4 * side` particles walked around a
/// rhombus with edges `scale` along x and along the 60° direction in the
/// xz-plane. Rings are stacked `10 * scale` apart along a tilted axis, and
/// only vertical springs join a particle to the one above it. Their rest
/// length is a thousandth of `scale`, so the tube pulls itself up toward
/// the pinned ring. Level `i` starts falling at `2 * (levels - i)` m/s.
///
/// The mesh wraps around each ring and shares the body's particle indices
/// (`level * 4 * side + k`).
///
/// # Panics
///
/// Panics if `levels` or `side` is zero, or `mass` is not positive
pub fn slime_tube(
    levels: usize,
    side: usize,
    origin: DVec3,
    scale: f64,
    mass: f64,
    stiffness: f64,
) -> (SpringBody, TriangleMesh) {
    assert!(levels >= 1 && side >= 1, "Tube needs at least one level and one particle per side");
    assert!(mass > 0.0 && mass.is_finite(), "Mass must be positive and finite");

    let first = scale * DVec3::X;
    let second = scale * DVec3::new(0.5, 0.0, 0.866).normalize();
    let up = 10.0 * scale * DVec3::new(0.5, 0.1, 0.289).normalize();
    let ring = 4 * side;
    let count = (levels + 1) * ring;

    let mut positions = Vec::with_capacity(count);
    let mut velocities = Vec::with_capacity(count);
    for level in 0..=levels {
        let lift = level as f64 * up + origin;
        let n = side as f64;
        let rhombus = (0..side)
            .map(|j| j as f64 * first)
            .chain((0..side).map(|j| n * first + j as f64 * second))
            .chain((1..=side).rev().map(|j| j as f64 * first + n * second))
            .chain((1..=side).rev().map(|j| j as f64 * second));
        let velocity = DVec3::new(0.0, -2.0 * (levels - level) as f64, 0.0);
        for p in rhombus {
            positions.push(p + lift);
            velocities.push(velocity);
        }
    }

    let mut network = SpringNetwork::new();
    let mut triangles = Vec::with_capacity(2 * levels * ring);
    for level in 0..levels {
        for k in 0..ring {
            let here = level * ring + k;
            let next = level * ring + (k + 1) % ring;
            network.add_spring(SpringEdge::new(here, here + ring, stiffness, 0.001 * scale));
            triangles.push([here, here + ring, next]);
            triangles.push([next + ring, next, here + ring]);
        }
    }
    for k in 0..ring {
        network.add_fixed(levels * ring + k);
    }

    let mesh = TriangleMesh::new(positions.clone(), triangles);
    let body = SpringBody {
        state: ParticleState::new(positions, velocities),
        masses: vec![mass; count],
        network,
    };
    (body, mesh)
}
