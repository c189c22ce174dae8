use crate::error::{ContractError, Result};
use crate::math::{Point3, Vector3};

/// Number of octahedron vertices.
pub const VERTEX_COUNT: usize = 6;

/// Wireframe edges as index pairs into the vertex array.
///
/// Nine of the twelve octahedron edges; every vertex has degree 3 and no
/// pair joins antipodal vertices.
pub const EDGE_INDICES: [(usize, usize); 9] = [
    (0, 3),
    (0, 2),
    (0, 4),
    (1, 3),
    (1, 5),
    (2, 5),
    (2, 4),
    (3, 5),
    (1, 4),
];

/// A regular octahedron described by its center and circumradius.
///
/// Vertex `i` always plays the same geometric role:
///
/// | index | direction |
/// |-------|-----------|
/// | 0     | +X        |
/// | 1     | −X        |
/// | 2     | +Y        |
/// | 3     | −Y        |
/// | 4     | +Z        |
/// | 5     | −Z        |
///
/// Fractal labels refer to these indices, so the order must never change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Octahedron {
    center: Point3,
    radius: f64,
}

impl Octahedron {
    /// Creates a new octahedron.
    ///
    /// Any radius is accepted; a negative radius mirrors every vertex
    /// through the center.
    #[must_use]
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Returns the center of the octahedron.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius of the octahedron.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the six vertices in `+X, −X, +Y, −Y, +Z, −Z` order.
    #[must_use]
    pub fn vertices(&self) -> [Point3; VERTEX_COUNT] {
        let r = self.radius;
        let c = self.center;
        [
            c + Vector3::new(r, 0.0, 0.0),
            c - Vector3::new(r, 0.0, 0.0),
            c + Vector3::new(0.0, r, 0.0),
            c - Vector3::new(0.0, r, 0.0),
            c + Vector3::new(0.0, 0.0, r),
            c - Vector3::new(0.0, 0.0, r),
        ]
    }

    /// Returns the wireframe of this octahedron as flattened segment endpoints.
    #[must_use]
    pub fn wireframe(&self) -> Vec<Point3> {
        expand_edges(&self.vertices())
    }
}

/// Expands [`EDGE_INDICES`] into explicit segment endpoints.
///
/// The result holds two points per edge (18 in total); segment `k` is
/// `[out[2k], out[2k + 1]]`.
///
/// # Errors
///
/// Returns [`ContractError::VertexCount`] if fewer than six vertices are given.
pub fn edges(vertices: &[Point3]) -> Result<Vec<Point3>> {
    if vertices.len() < VERTEX_COUNT {
        return Err(ContractError::VertexCount {
            expected: VERTEX_COUNT,
            actual: vertices.len(),
        }
        .into());
    }
    Ok(expand_edges(vertices))
}

fn expand_edges(vertices: &[Point3]) -> Vec<Point3> {
    EDGE_INDICES
        .iter()
        .flat_map(|&(a, b)| [vertices[a], vertices[b]])
        .collect()
}
