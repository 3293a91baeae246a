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
//! Triangle meshes and fragment geometry
//!
//! A [`TriangleMesh`] is the immutable surface handed to the simulation at
//! start-up. For fracture it is expanded into *fragments*: every triangle
//! gets its own three particles, stored contiguously, so triangles can fly
//! apart independently.

use glam::DVec3;

/// Vertex positions plus triangle index triples
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<DVec3>,
    triangles: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a mesh
    ///
    /// # Panics
    ///
    /// Panics if there are no triangles or an index is out of range
    pub fn new(positions: Vec<DVec3>, triangles: Vec<[usize; 3]>) -> Self {
        assert!(!triangles.is_empty(), "Mesh must contain at least one triangle");
        for tri in &triangles {
            for &index in tri {
                assert!(
                    index < positions.len(),
                    "Triangle index {} out of range for {} vertices",
                    index,
                    positions.len()
                );
            }
        }
        TriangleMesh { positions, triangles }
    }

    /// Create a mesh from a flat index list, three indices per triangle
    ///
    /// # Panics
    ///
    /// Panics if the index count is not a multiple of 3, or on the same
    /// conditions as [`TriangleMesh::new`]
    pub fn from_flat_indices(positions: Vec<DVec3>, indices: &[u32]) -> Self {
        assert_eq!(
            indices.len() % 3,
            0,
            "Index list length must be a multiple of 3"
        );
        let triangles = indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
            .collect();
        TriangleMesh::new(positions, triangles)
    }

    /// Regular grid of `rows` × `cols` vertices, two triangles per cell
    ///
    /// Vertex (r, c) sits at `origin + r*row_step + c*col_step` and has
    /// index `r * cols + c`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is below 2
    pub fn grid(rows: usize, cols: usize, origin: DVec3, row_step: DVec3, col_step: DVec3) -> Self {
        assert!(rows >= 2 && cols >= 2, "Grid needs at least 2 rows and 2 columns");
        let index = |r: usize, c: usize| r * cols + c;

        let mut positions = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                positions.push(origin + r as f64 * row_step + c as f64 * col_step);
            }
        }

        let mut triangles = Vec::with_capacity(2 * (rows - 1) * (cols - 1));
        for r in 0..rows - 1 {
            for c in 0..cols - 1 {
                triangles.push([index(r, c), index(r + 1, c), index(r, c + 1)]);
                triangles.push([index(r + 1, c + 1), index(r, c + 1), index(r + 1, c)]);
            }
        }
        TriangleMesh::new(positions, triangles)
    }

    /// Vertex positions
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Triangle index triples
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Area-weighted vertex normals of the shared mesh
    pub fn vertex_normals(&self) -> Vec<DVec3> {
        vertex_normals(&self.positions, &self.triangles)
    }

    /// Three particles per triangle, in triangle order
    pub fn fragment_positions(&self) -> Vec<DVec3> {
        self.triangles
            .iter()
            .flat_map(|tri| tri.map(|i| self.positions[i]))
            .collect()
    }

    /// Shared-mesh vertex normals laid out like [`fragment_positions`]
    ///
    /// [`fragment_positions`]: TriangleMesh::fragment_positions
    pub fn fragment_vertex_normals(&self) -> Vec<DVec3> {
        let normals = self.vertex_normals();
        self.triangles
            .iter()
            .flat_map(|tri| tri.map(|i| normals[i]))
            .collect()
    }
}

/// Area-weighted vertex normals
///
/// Each triangle (v1, v2, v3) contributes `(v3 - v2) × (v1 - v2)` to its
/// three vertices; the sums are normalized. Vertices with no (or only
/// degenerate) incident triangles get a zero normal.
pub fn vertex_normals(positions: &[DVec3], triangles: &[[usize; 3]]) -> Vec<DVec3> {
    let mut sums = vec![DVec3::ZERO; positions.len()];
    for &[i1, i2, i3] in triangles {
        let (v1, v2, v3) = (positions[i1], positions[i2], positions[i3]);
        let face = (v3 - v2).cross(v1 - v2);
        sums[i1] += face;
        sums[i2] += face;
        sums[i3] += face;
    }
    sums.into_iter().map(DVec3::normalize_or_zero).collect()
}

/// Unit normal of every fragment in a stride-3 position array
///
/// For disjoint fragments this is also each vertex's area-weighted normal.
pub fn fragment_normals(positions: &[DVec3]) -> Vec<DVec3> {
    positions
        .chunks_exact(3)
        .map(|f| (f[2] - f[1]).cross(f[0] - f[1]).normalize_or_zero())
        .collect()
}
