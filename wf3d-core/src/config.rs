/// Start-time configuration shared by every front-end

use thiserror::Error;

use crate::color::{ColorError, Rgba};
use crate::projection::{Pipeline, Viewport};

/// Which primitive a render pass emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// One line per polyline edge
    #[default]
    Lines,
    /// One square per pool vertex
    Points,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("surface must be at least 1x1, got {width}x{height}")]
    EmptySurface { width: u32, height: u32 },
    #[error("target frame rate must be positive")]
    ZeroFrameRate,
    #[error("foreground: {0}")]
    Foreground(ColorError),
    #[error("background: {0}")]
    Background(ColorError),
}

/// Configuration for the animation and its drawing surface
#[derive(Debug, Clone)]
pub struct Config {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Frames per second the driver aims for
    pub target_fps: u32,
    /// Added to every depth before the perspective divide
    pub depth_offset: f32,
    /// Revolutions per second
    pub angular_speed: f32,
    /// Stroke and fill color, as a hex string
    pub foreground: String,
    /// Clear color, as a hex string
    pub background: String,
    pub render_mode: RenderMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            target_fps: 60,
            depth_offset: 2.0,
            angular_speed: 0.5,
            foreground: "#61e552ff".to_string(),
            background: "#101010".to_string(),
            render_mode: RenderMode::Lines,
        }
    }
}

/// The two surface colors, parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Rgba,
    pub background: Rgba,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptySurface {
                width: self.width,
                height: self.height,
            });
        }
        if self.target_fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        self.palette()?;
        Ok(())
    }

    pub fn palette(&self) -> Result<Palette, ConfigError> {
        Ok(Palette {
            foreground: Rgba::parse_hex(&self.foreground).map_err(ConfigError::Foreground)?,
            background: Rgba::parse_hex(&self.background).map_err(ConfigError::Background)?,
        })
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.depth_offset, self.viewport())
    }

    /// Seconds between frames
    pub fn frame_delta(&self) -> f64 {
        1.0 / self.target_fps as f64
    }

    /// Radians added to the angle every frame
    pub fn angle_step(&self) -> f64 {
        std::f64::consts::TAU * self.frame_delta() * self.angular_speed as f64
    }

    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.target_fps as f64)
    }
}
