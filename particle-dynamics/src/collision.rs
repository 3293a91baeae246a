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
//! Sphere-versus-triangle collision detection
//!
//! The detector is a pure geometric test: given a triangle and the sphere
//! centre at some instant, it reports whether they overlap, where they touch,
//! and how far the triangle must move to stop overlapping. Responding to a
//! hit (impulses, bombs, smashed flags) is up to the caller.
//!
//! # Algorithm
//!
//! 1. Project the centre onto the triangle's plane by solving the 2×2 Gram
//!    system of the edges `e1 = b - a`, `e2 = c - a` for barycentric (u, v).
//! 2. If the perpendicular distance exceeds the radius there is no contact.
//! 3. If (u, v) lies inside the triangle the contact is the projection and
//!    the triangle is pushed back along the plane normal by the penetration.
//! 4. Otherwise the contact is the closest point on the nearest edge, and
//!    the push-back uses the sphere's height above the plane at that point.

use glam::DVec3;

/// Tolerance on barycentric coordinates and degenerate determinants
const GEOMETRY_EPSILON: f64 = 1e-12;

/// Result of a sphere-triangle overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Point on the triangle where the sphere touches it
    pub point: DVec3,
    /// Translation to apply to the triangle to resolve the overlap
    pub correction: DVec3,
    /// Unit normal of the triangle, following the winding (b - a) × (c - a)
    pub normal: DVec3,
}

/// Closest point on the segment `a`-`b` to `point`
///
/// A zero-length segment returns `a`.
pub fn closest_point_on_segment(point: DVec3, a: DVec3, b: DVec3) -> DVec3 {
    let edge = b - a;
    let length = edge.length();
    if length == 0.0 {
        return a;
    }
    let direction = edge / length;
    let d = (point - a).dot(direction).clamp(0.0, length);
    a + d * direction
}

/// Unit normal of a triangle, or zero if it is degenerate
pub fn triangle_normal(triangle: &[DVec3; 3]) -> DVec3 {
    let [a, b, c] = *triangle;
    (b - a).cross(c - a).normalize_or_zero()
}

/// Collision test for a sphere of fixed radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionDetector {
    radius: f64,
}

impl CollisionDetector {
    /// Create a detector for a sphere of the given radius
    ///
    /// # Panics
    ///
    /// Panics if the radius is non-positive or not finite
    pub fn new(radius: f64) -> Self {
        assert!(
            radius > 0.0 && radius.is_finite(),
            "Sphere radius must be positive and finite"
        );
        CollisionDetector { radius }
    }

    /// Sphere radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Test a triangle against the sphere centred at `center`
    ///
    /// Degenerate triangles never collide.
    pub fn test_fragment(&self, triangle: &[DVec3; 3], center: DVec3) -> Option<Contact> {
        let [a, b, c] = *triangle;
        let e1 = b - a;
        let e2 = c - a;
        let w = center - a;

        let g11 = e1.dot(e1);
        let g12 = e1.dot(e2);
        let g22 = e2.dot(e2);
        let det = g11 * g22 - g12 * g12;
        // det >= 0 by Cauchy-Schwarz; zero means collinear or collapsed edges
        if det <= GEOMETRY_EPSILON * g11 * g22 {
            return None;
        }

        let r1 = w.dot(e1);
        let r2 = w.dot(e2);
        let u = (g22 * r1 - g12 * r2) / det;
        let v = (g11 * r2 - g12 * r1) / det;

        let projection = a + u * e1 + v * e2;
        let plane_vec = center - projection;
        let perp = plane_vec.length();
        if perp > self.radius {
            return None;
        }
        let normal = e1.cross(e2).normalize_or_zero();

        let inside = u >= -GEOMETRY_EPSILON
            && v >= -GEOMETRY_EPSILON
            && u + v <= 1.0 + GEOMETRY_EPSILON;
        if inside {
            return Some(Contact {
                point: projection,
                correction: self.push_back(plane_vec, perp, self.radius, normal),
                normal,
            });
        }

        let (edge_point, distance) = [(a, b), (b, c), (c, a)]
            .iter()
            .map(|&(p, q)| {
                let closest = closest_point_on_segment(center, p, q);
                (closest, closest.distance(center))
            })
            .fold((a, f64::INFINITY), |best, candidate| {
                if candidate.1 < best.1 {
                    candidate
                } else {
                    best
                }
            });
        if distance > self.radius {
            return None;
        }

        // Height of the sphere surface above the plane at the edge point.
        // The perpendicular distance reused below comes from plane_vec, not
        // from the edge point itself; this is an approximation of the true
        // separation along the contact direction.
        let in_plane = edge_point.distance_squared(projection);
        let depth = (self.radius * self.radius - in_plane).max(0.0).sqrt();
        Some(Contact {
            point: edge_point,
            correction: self.push_back(plane_vec, perp, depth, normal),
            normal,
        })
    }

    /// Translation moving the plane so it sits `depth` away from the centre
    fn push_back(&self, plane_vec: DVec3, perp: f64, depth: f64, normal: DVec3) -> DVec3 {
        if perp > GEOMETRY_EPSILON {
            (1.0 - depth / perp) * plane_vec
        } else {
            -depth * normal
        }
    }
}
