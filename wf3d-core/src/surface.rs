/// Drawing surface abstraction
///
/// A surface knows three primitives and its own two colors. A surface that
/// failed to initialize must accept every call and draw nothing.

use crate::geometry::ScreenPoint;

/// Edge length, in surface pixels, of the square drawn for a point
pub const POINT_SIZE: f32 = 10.0;

pub trait Surface {
    /// Fill the whole surface with the background color
    fn clear(&mut self);

    /// Fill a `POINT_SIZE` square centred on `p` with the foreground color
    fn draw_point(&mut self, p: ScreenPoint);

    /// Stroke a segment from `a` to `b` with the foreground color
    fn draw_line(&mut self, a: ScreenPoint, b: ScreenPoint);

    /// Make the frame drawn since the last `clear` visible. Surfaces that
    /// draw immediately keep the default.
    fn present(&mut self) {}
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn draw_point(&mut self, p: ScreenPoint) {
        (**self).draw_point(p);
    }

    fn draw_line(&mut self, a: ScreenPoint, b: ScreenPoint) {
        (**self).draw_line(a, b);
    }

    fn present(&mut self) {
        (**self).present();
    }
}

/// One primitive call captured by a [`Recorder`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCall {
    Clear,
    Point(ScreenPoint),
    Line(ScreenPoint, ScreenPoint),
}

/// Surface that keeps every call instead of drawing it
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<DrawCall>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = (ScreenPoint, ScreenPoint)> + '_ {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Line(a, b) => Some((*a, *b)),
            _ => None,
        })
    }

    pub fn points(&self) -> impl Iterator<Item = ScreenPoint> + '_ {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Point(p) => Some(*p),
            _ => None,
        })
    }

    pub fn clears(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Clear))
            .count()
    }
}

impl Surface for Recorder {
    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn draw_point(&mut self, p: ScreenPoint) {
        self.calls.push(DrawCall::Point(p));
    }

    fn draw_line(&mut self, a: ScreenPoint, b: ScreenPoint) {
        self.calls.push(DrawCall::Line(a, b));
    }
}
