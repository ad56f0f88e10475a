/// Wireframe render pass: mesh through the pipeline onto a surface
use crate::config::RenderMode;
use crate::geometry::Mesh;
use crate::projection::Pipeline;
use crate::surface::Surface;

/// Draw every edge of `mesh` as a line.
///
/// Both endpoints of each edge go through the whole pipeline on their own;
/// shared vertices are recomputed for every edge they appear in.
pub fn render_lines<S: Surface + ?Sized>(
    mesh: &Mesh,
    pipeline: &Pipeline,
    angle: f32,
    surface: &mut S,
) {
    for (a, b) in mesh.edges() {
        surface.draw_line(
            pipeline.world_to_screen(&a, angle),
            pipeline.world_to_screen(&b, angle),
        );
    }
}

/// Draw every pool vertex as a square
pub fn render_points<S: Surface + ?Sized>(
    mesh: &Mesh,
    pipeline: &Pipeline,
    angle: f32,
    surface: &mut S,
) {
    for vertex in mesh.vertices() {
        surface.draw_point(pipeline.world_to_screen(vertex, angle));
    }
}

pub fn render_mesh<S: Surface + ?Sized>(
    mesh: &Mesh,
    pipeline: &Pipeline,
    angle: f32,
    mode: RenderMode,
    surface: &mut S,
) {
    match mode {
        RenderMode::Lines => render_lines(mesh, pipeline, angle, surface),
        RenderMode::Points => render_points(mesh, pipeline, angle, surface),
    }
}
