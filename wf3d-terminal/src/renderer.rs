/// Character-cell drawing surface for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::{self, Write};
use std::time::Instant;
use wf3d_core::{Config, ConfigError, Palette, Rgba, ScreenPoint, Surface, POINT_SIZE};

const POINT_GLYPH: char = '@';
const EMPTY: char = ' ';

/// Terminal framebuffer that maps surface pixels onto character cells.
///
/// Drawing only touches the buffer; `present` writes the whole frame to the
/// wrapped writer. A surface built without a usable size, or whose writer has
/// failed, ignores every call.
pub struct TerminalSurface<W: Write> {
    writer: W,
    cols: usize,
    rows: usize,
    width: f32,
    height: f32,
    cells: Vec<char>,
    palette: Palette,
    available: bool,
    status: bool,
    fps: Fps,
}

impl<W: Write> TerminalSurface<W> {
    /// Size the framebuffer to the current terminal
    pub fn new(writer: W, config: &Config) -> Result<Self, ConfigError> {
        match crossterm::terminal::size() {
            Ok((cols, rows)) => Self::with_size(writer, cols as usize, rows as usize, config),
            Err(e) => {
                log::warn!("terminal size unavailable, drawing disabled: {}", e);
                let mut surface = Self::with_size(writer, 0, 0, config)?;
                surface.available = false;
                Ok(surface)
            }
        }
    }

    pub fn with_size(writer: W, cols: usize, rows: usize, config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            writer,
            cols,
            rows,
            width: config.width as f32,
            height: config.height as f32,
            cells: vec![EMPTY; cols * rows],
            palette: config.palette()?,
            available: cols > 0 && rows > 0,
            status: false,
            fps: Fps::new(),
        })
    }

    /// Reserve the top row for a frame-rate readout
    pub fn with_status_line(mut self) -> Self {
        self.status = true;
        self
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<char> {
        if col < self.cols && row < self.rows {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Row strings, top to bottom
    pub fn lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().collect())
            .collect()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Surface pixels to fractional cell coordinates
    fn to_cells(&self, p: ScreenPoint) -> (f32, f32) {
        (
            p.x / self.width * self.cols as f32,
            p.y / self.height * self.rows as f32,
        )
    }

    fn plot(&mut self, col: i64, row: i64, glyph: char) {
        if col >= 0 && row >= 0 && (col as usize) < self.cols && (row as usize) < self.rows {
            self.cells[row as usize * self.cols + col as usize] = glyph;
        }
    }

    fn write_frame(&mut self) -> io::Result<()> {
        let fg = to_color(self.palette.foreground);
        let bg = to_color(self.palette.background);

        self.writer.queue(SetBackgroundColor(bg))?;
        self.writer.queue(SetForegroundColor(fg))?;
        for row in 0..self.rows {
            let start = row * self.cols;
            let line: String = self.cells[start..start + self.cols].iter().collect();
            self.writer.queue(cursor::MoveTo(0, row as u16))?;
            self.writer.queue(Print(line))?;
        }

        if self.status {
            let text = format!("WF3D Terminal Renderer | FPS: {:.1} | Q/Esc=Quit", self.fps.value());
            let text: String = text.chars().take(self.cols).collect();
            self.writer.queue(cursor::MoveTo(0, 0))?;
            self.writer.queue(SetForegroundColor(Color::Yellow))?;
            self.writer.queue(Print(text))?;
        }

        self.writer.queue(ResetColor)?;
        self.writer.flush()
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn clear(&mut self) {
        if !self.available {
            return;
        }
        self.cells.fill(EMPTY);
    }

    fn draw_point(&mut self, p: ScreenPoint) {
        if !self.available || !p.x.is_finite() || !p.y.is_finite() {
            return;
        }

        let half = POINT_SIZE / 2.0;
        let (x0, y0) = self.to_cells(ScreenPoint::new(p.x - half, p.y - half));
        let (x1, y1) = self.to_cells(ScreenPoint::new(p.x + half, p.y + half));

        // At least one cell, even when the square is smaller than a cell
        let (c0, r0) = (x0.floor() as i64, y0.floor() as i64);
        let c1 = (x1.ceil() as i64 - 1).max(c0);
        let r1 = (y1.ceil() as i64 - 1).max(r0);
        let c0 = c0.max(0);
        let r0 = r0.max(0);
        let c1 = c1.min(self.cols as i64 - 1);
        let r1 = r1.min(self.rows as i64 - 1);

        for row in r0..=r1 {
            for col in c0..=c1 {
                self.plot(col, row, POINT_GLYPH);
            }
        }
    }

    fn draw_line(&mut self, a: ScreenPoint, b: ScreenPoint) {
        if !self.available {
            return;
        }

        let a = self.to_cells(a);
        let b = self.to_cells(b);
        let bounds = ((self.cols - 1) as f32, (self.rows - 1) as f32);
        let Some(((x0, y0), (x1, y1))) = clip_segment(a, b, bounds) else {
            return;
        };

        let glyph = line_glyph(x1 - x0, y1 - y0);
        bresenham(
            (x0.round() as i64, y0.round() as i64),
            (x1.round() as i64, y1.round() as i64),
            |col, row| self.plot(col, row, glyph),
        );
    }

    fn present(&mut self) {
        if !self.available {
            return;
        }
        self.fps.tick();
        if let Err(e) = self.write_frame() {
            log::warn!("terminal write failed, drawing disabled: {}", e);
            self.available = false;
        }
    }
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

/// Pick a glyph from the slope in cell space (y grows downwards)
fn line_glyph(dx: f32, dy: f32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay <= ax * 0.5 {
        '-'
    } else if ax <= ay * 0.5 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Liang-Barsky clip of a segment to `[0, max.0] x [0, max.1]`.
///
/// Returns `None` when nothing is left to draw, including for non-finite
/// endpoints from a perspective divide at zero depth.
fn clip_segment(
    a: (f32, f32),
    b: (f32, f32),
    max: (f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
        return None;
    }

    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    for (p, q) in [
        (-dx, a.0),
        (dx, max.0 - a.0),
        (-dy, a.1),
        (dy, max.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

fn bresenham(from: (i64, i64), to: (i64, i64), mut plot: impl FnMut(i64, i64)) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(x, y);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Frames-per-second counter, refreshed once a second
struct Fps {
    since: Instant,
    frames: u32,
    value: f32,
}

impl Fps {
    fn new() -> Self {
        Self {
            since: Instant::now(),
            frames: 0,
            value: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed.as_secs() >= 1 {
            self.value = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.since = Instant::now();
        }
    }

    fn value(&self) -> f32 {
        self.value
    }
}
