/// Perspective divide, surface mapping and the full per-vertex pipeline
use nalgebra::Point2;

use crate::geometry::{ScreenPoint, Vertex, WorldPoint};
use crate::transform::{rotate_xz, translate_z};

/// Pixel dimensions of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Perspective divide into normalized device coordinates.
///
/// Depth at or near zero, or behind the viewer, is not guarded: the result
/// is large or mirrored and is passed on unchanged.
pub fn project(p: &WorldPoint) -> ScreenPoint {
    Point2::new(p.x / p.z, p.y / p.z)
}

/// Map NDC (-1..1 on both axes) to surface pixels, flipping the vertical
/// axis. Points outside NDC land outside the surface; nothing is clamped.
pub fn to_screen(p: &ScreenPoint, viewport: &Viewport) -> ScreenPoint {
    Point2::new(
        (p.x + 1.0) / 2.0 * viewport.width,
        (1.0 - (p.y + 1.0) / 2.0) * viewport.height,
    )
}

impl Vertex {
    /// Perspective divide; a vertex that has already lost its depth collapses
    /// to the origin.
    pub fn project(self) -> ScreenPoint {
        match self {
            Vertex::World(p) => project(&p),
            Vertex::Screen(_) => Point2::origin(),
        }
    }
}

/// The fixed rotate → translate → project → map chain for one vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipeline {
    pub depth_offset: f32,
    pub viewport: Viewport,
}

impl Pipeline {
    pub fn new(depth_offset: f32, viewport: Viewport) -> Self {
        Self {
            depth_offset,
            viewport,
        }
    }

    pub fn world_to_screen(&self, p: &WorldPoint, angle: f32) -> ScreenPoint {
        let rotated = rotate_xz(p, angle);
        let translated = translate_z(&rotated, self.depth_offset);
        to_screen(&project(&translated), &self.viewport)
    }

    /// Same chain on an untyped vertex, with the degenerate fallbacks of
    /// each stage.
    pub fn vertex_to_screen(&self, v: Vertex, angle: f32) -> ScreenPoint {
        let ndc = v.rotate_xz(angle).translate_z(self.depth_offset).project();
        to_screen(&ndc, &self.viewport)
    }
}
