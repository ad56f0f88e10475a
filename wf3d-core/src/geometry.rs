/// Geometry primitives for wireframe rendering
use nalgebra::{Point2, Point3};
use thiserror::Error;

/// A point in world space, before any transform is applied
pub type WorldPoint = Point3<f32>;

/// A point after the depth has been consumed (NDC or surface pixels)
pub type ScreenPoint = Point2<f32>;

/// A vertex at either side of the perspective divide.
///
/// `World` carries depth and is still in the 3D stage of the pipeline.
/// `Screen` has lost its depth; stage functions treat it as a degenerate
/// input rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Vertex {
    World(WorldPoint),
    Screen(ScreenPoint),
}

impl Vertex {
    pub fn world(x: f32, y: f32, z: f32) -> Self {
        Vertex::World(Point3::new(x, y, z))
    }

    pub fn screen(x: f32, y: f32) -> Self {
        Vertex::Screen(Point2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        match self {
            Vertex::World(p) => p.x,
            Vertex::Screen(p) => p.x,
        }
    }

    pub fn y(&self) -> f32 {
        match self {
            Vertex::World(p) => p.y,
            Vertex::Screen(p) => p.y,
        }
    }

    /// Depth, if the vertex still has one
    pub fn z(&self) -> Option<f32> {
        match self {
            Vertex::World(p) => Some(p.z),
            Vertex::Screen(_) => None,
        }
    }

    /// Drop the depth, keeping x and y
    pub fn flatten(&self) -> ScreenPoint {
        Point2::new(self.x(), self.y())
    }
}

impl From<WorldPoint> for Vertex {
    fn from(p: WorldPoint) -> Self {
        Vertex::World(p)
    }
}

impl From<ScreenPoint> for Vertex {
    fn from(p: ScreenPoint) -> Self {
        Vertex::Screen(p)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("polyline {polyline} position {position}: index {index} out of range for {len} vertices")]
    IndexOutOfRange {
        polyline: usize,
        position: usize,
        index: usize,
        len: usize,
    },
}

/// An ordered list of indices into a mesh's vertex pool, always drawn as a
/// closed loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    indices: Vec<usize>,
}

impl Polyline {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Edges `(i, (i + 1) mod n)` including the wrap-around edge.
    ///
    /// A two-index polyline yields the same segment twice, once per
    /// direction.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.indices.len();
        (0..n).map(move |i| (self.indices[i], self.indices[(i + 1) % n]))
    }
}

impl From<&[usize]> for Polyline {
    fn from(indices: &[usize]) -> Self {
        Self::new(indices.to_vec())
    }
}

/// A wireframe mesh: a vertex pool plus polylines indexing into it.
///
/// Immutable once built; every index is checked against the pool at
/// construction.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<WorldPoint>,
    polylines: Vec<Polyline>,
}

impl Mesh {
    pub fn new(vertices: Vec<WorldPoint>, polylines: Vec<Polyline>) -> Result<Self, MeshError> {
        let len = vertices.len();
        for (polyline, line) in polylines.iter().enumerate() {
            for (position, &index) in line.indices().iter().enumerate() {
                if index >= len {
                    return Err(MeshError::IndexOutOfRange {
                        polyline,
                        position,
                        index,
                        len,
                    });
                }
            }
        }

        log::debug!(
            "built mesh with {} vertices and {} polylines",
            vertices.len(),
            polylines.len()
        );

        Ok(Self { vertices, polylines })
    }

    pub fn vertices(&self) -> &[WorldPoint] {
        &self.vertices
    }

    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    /// Every edge of every polyline, in polyline order then edge order
    pub fn edges(&self) -> impl Iterator<Item = (WorldPoint, WorldPoint)> + '_ {
        self.polylines.iter().flat_map(move |line| {
            line.edges()
                .map(move |(a, b)| (self.vertices[a], self.vertices[b]))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.polylines.iter().map(Polyline::len).sum()
    }

    /// The built-in scene: a unit cube with a smaller box sitting on top of
    /// its front face, each joined top to bottom by four connectors.
    pub fn reference() -> Self {
        let vertices = vec![
            // Cube, front face (z = +0.5)
            Point3::new(0.5, 0.5, 0.5),
            Point3::new(-0.5, 0.5, 0.5),
            Point3::new(-0.5, -0.5, 0.5),
            Point3::new(0.5, -0.5, 0.5),
            // Cube, back face (z = -0.5)
            Point3::new(0.5, 0.5, -0.5),
            Point3::new(-0.5, 0.5, -0.5),
            Point3::new(-0.5, -0.5, -0.5),
            Point3::new(0.5, -0.5, -0.5),
            // Box, front face
            Point3::new(0.25, 0.75, 0.5),
            Point3::new(-0.25, 0.75, 0.5),
            Point3::new(-0.25, 0.5, 0.5),
            Point3::new(0.25, 0.5, 0.5),
            // Box, back face
            Point3::new(0.25, 0.75, 0.25),
            Point3::new(-0.25, 0.75, 0.25),
            Point3::new(-0.25, 0.5, 0.25),
            Point3::new(0.25, 0.5, 0.25),
        ];

        let polylines: [&[usize]; 12] = [
            &[0, 1, 2, 3],
            &[4, 5, 6, 7],
            &[0, 4],
            &[1, 5],
            &[2, 6],
            &[3, 7],
            &[8, 9, 10, 11],
            &[12, 13, 14, 15],
            &[8, 12],
            &[9, 13],
            &[10, 14],
            &[11, 15],
        ];

        Self {
            vertices,
            polylines: polylines.into_iter().map(Polyline::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vertex_depth_tag() {
        assert_eq!(Vertex::world(1.0, 2.0, 3.0).z(), Some(3.0));
        assert_eq!(Vertex::screen(1.0, 2.0).z(), None);
        assert_eq!(Vertex::world(1.0, 2.0, 3.0).flatten(), Point2::new(1.0, 2.0));
    }

    #[test]
    fn test_closed_loop_edges() {
        let line = Polyline::new(vec![0, 1, 2, 3]);
        let edges: Vec<_> = line.edges().collect();
        assert_eq!(edges, vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
    }

    #[test]
    fn test_two_point_polyline_wraps() {
        let line = Polyline::new(vec![0, 4]);
        let edges: Vec<_> = line.edges().collect();
        assert_eq!(edges, vec![(0, 4), (4, 0)]);
    }

    #[test]
    fn test_degenerate_polylines() {
        assert_eq!(Polyline::new(vec![]).edges().count(), 0);
        let single: Vec<_> = Polyline::new(vec![2]).edges().collect();
        assert_eq!(single, vec![(2, 2)]);
    }

    #[test]
    fn test_mesh_rejects_bad_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 0.0, 1.0)];
        let err = Mesh::new(vertices, vec![Polyline::new(vec![0, 1]), Polyline::new(vec![1, 2])])
            .unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                polyline: 1,
                position: 1,
                index: 2,
                len: 2,
            }
        );
    }

    #[test]
    fn test_reference_mesh_shape() {
        let mesh = Mesh::reference();
        assert_eq!(mesh.vertices().len(), 16);
        assert_eq!(mesh.polylines().len(), 12);
        assert_eq!(mesh.edge_count(), 32);

        // Revalidating through the checked constructor must succeed
        assert!(Mesh::new(mesh.vertices().to_vec(), mesh.polylines().to_vec()).is_ok());
    }

    #[test]
    fn test_reference_mesh_distinct_edges() {
        let mesh = Mesh::reference();
        let distinct: HashSet<(usize, usize)> = mesh
            .polylines()
            .iter()
            .flat_map(|line| line.edges())
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        assert_eq!(distinct.len(), 24);
    }
}
