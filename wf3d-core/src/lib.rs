/// WF3D Core Library - Wireframe geometry, projection and animation
///
/// This library holds everything that does not depend on where frames end
/// up: the vertex and mesh model, the rotate/translate/project/map pipeline,
/// the drawing surface trait and the fixed-rate animation loop.

pub mod animation;
pub mod color;
pub mod config;
pub mod geometry;
pub mod projection;
pub mod render;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use animation::{Animation, AnimationState, Driver, FixedRateTicker, ManualTicker, StopHandle, Ticker};
pub use color::{ColorError, Rgba};
pub use config::{Config, ConfigError, Palette, RenderMode};
pub use geometry::{Mesh, MeshError, Polyline, ScreenPoint, Vertex, WorldPoint};
pub use projection::{Pipeline, Viewport};
pub use surface::{Surface, POINT_SIZE};
