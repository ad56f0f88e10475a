/// World-space transforms: rotation in the x/z plane and depth translation
use nalgebra::{Point3, Rotation2, Vector2};

use crate::geometry::{Vertex, WorldPoint};

/// Rotate a point about the vertical axis by `angle` radians.
///
/// `x' = x·cos − z·sin`, `z' = x·sin + z·cos`, `y` is untouched.
pub fn rotate_xz(p: &WorldPoint, angle: f32) -> WorldPoint {
    let xz = Rotation2::new(angle) * Vector2::new(p.x, p.z);
    Point3::new(xz.x, p.y, xz.y)
}

/// Shift a point along the depth axis
pub fn translate_z(p: &WorldPoint, dz: f32) -> WorldPoint {
    Point3::new(p.x, p.y, p.z + dz)
}

impl Vertex {
    /// Rotation in the x/z plane; identity on a vertex without depth.
    pub fn rotate_xz(self, angle: f32) -> Vertex {
        match self {
            Vertex::World(p) => Vertex::World(rotate_xz(&p, angle)),
            screen => screen,
        }
    }

    /// Depth translation; a vertex without depth passes through.
    pub fn translate_z(self, dz: f32) -> Vertex {
        match self {
            Vertex::World(p) => Vertex::World(translate_z(&p, dz)),
            screen => screen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn samples() -> Vec<WorldPoint> {
        vec![
            Point3::new(0.5, 0.5, 0.5),
            Point3::new(-0.25, 0.75, 0.25),
            Point3::new(3.0, -1.0, -2.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_rotation_preserves_radius() {
        for p in samples() {
            for step in 0..16 {
                let angle = step as f32 * 0.37 - 2.0;
                let r = rotate_xz(&p, angle);
                let before = p.x * p.x + p.z * p.z;
                let after = r.x * r.x + r.z * r.z;
                assert!((before - after).abs() < 1e-5, "{p:?} at {angle}");
                assert_eq!(r.y, p.y);
            }
        }
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        for p in samples() {
            assert_eq!(rotate_xz(&p, 0.0), p);
        }
    }

    #[test]
    fn test_quarter_turn() {
        // x' = x·cos − z·sin, z' = x·sin + z·cos
        let r = rotate_xz(&Point3::new(1.0, 0.0, 0.0), PI / 2.0);
        assert!(r.x.abs() < 1e-6);
        assert!((r.z - 1.0).abs() < 1e-6);

        let r = rotate_xz(&Point3::new(0.0, 0.0, 1.0), PI / 2.0);
        assert!((r.x + 1.0).abs() < 1e-6);
        assert!(r.z.abs() < 1e-6);
    }

    #[test]
    fn test_zero_translation_is_identity() {
        for p in samples() {
            assert_eq!(translate_z(&p, 0.0), p);
        }
        let t = translate_z(&Point3::new(1.0, 2.0, 3.0), 2.0);
        assert_eq!(t, Point3::new(1.0, 2.0, 5.0));
    }

    #[test]
    fn test_zero_depth_world_point_still_rotates() {
        let v = Vertex::world(1.0, 0.5, 0.0);
        let r = v.rotate_xz(PI / 2.0);
        assert_ne!(r, v);
        assert_eq!(r.z().map(|z| (z - 1.0).abs() < 1e-6), Some(true));
        assert_eq!(v.translate_z(2.0), Vertex::world(1.0, 0.5, 2.0));
    }

    #[test]
    fn test_depthless_vertex_passes_through() {
        let v = Vertex::screen(0.3, -0.7);
        for step in 0..8 {
            assert_eq!(v.rotate_xz(step as f32 * 0.9), v);
        }
        assert_eq!(v.translate_z(2.0), v);
    }

    #[test]
    fn test_world_vertex_delegates() {
        let v = Vertex::world(1.0, 2.0, 3.0);
        assert_eq!(v.translate_z(1.0), Vertex::world(1.0, 2.0, 4.0));
        assert_eq!(v.rotate_xz(0.0), v);
    }
}
