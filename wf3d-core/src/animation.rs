/// Fixed-rate animation: angle state, the per-frame transition, and the
/// tick-driven loop that repeats it.
///
/// The per-frame transition is a plain method on `Animation`, so a frame can
/// be stepped in a test without any timer. `Driver` pulls ticks from a
/// `Ticker` and runs one transition per tick until the ticker runs dry or a
/// `StopHandle` is triggered.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::{Config, ConfigError, RenderMode};
use crate::geometry::Mesh;
use crate::projection::{Pipeline, Viewport};
use crate::render::render_mesh;
use crate::surface::Surface;

/// Rotation angle and depth offset owned by the animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    frames: u64,
    step: f64,
    angle: f64,
    depth_offset: f32,
}

impl AnimationState {
    pub fn new(step: f64, depth_offset: f32) -> Self {
        Self {
            frames: 0,
            step,
            angle: 0.0,
            depth_offset,
        }
    }

    /// Move one frame forward and return the new angle.
    ///
    /// The angle is derived from the frame count so it never accumulates
    /// rounding error; it is not wrapped.
    pub fn advance(&mut self) -> f64 {
        self.frames += 1;
        self.angle = self.frames as f64 * self.step;
        self.angle
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The angle reduced to one turn, at pipeline precision
    pub fn render_angle(&self) -> f32 {
        self.angle.rem_euclid(std::f64::consts::TAU) as f32
    }

    pub fn depth_offset(&self) -> f32 {
        self.depth_offset
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No frame drawn yet
    Idle,
    Running,
}

/// A mesh spinning at a fixed rate
pub struct Animation {
    mesh: Mesh,
    viewport: Viewport,
    mode: RenderMode,
    state: AnimationState,
    phase: Phase,
}

impl Animation {
    pub fn new(mesh: Mesh, config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mesh,
            viewport: config.viewport(),
            mode: config.render_mode,
            state: AnimationState::new(config.angle_step(), config.depth_offset),
            phase: Phase::Idle,
        })
    }

    /// One frame: clear, advance the angle, draw the mesh
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear();
        self.state.advance();
        let angle = self.state.render_angle();
        let pipeline = Pipeline::new(self.state.depth_offset(), self.viewport);
        render_mesh(&self.mesh, &pipeline, angle, self.mode, surface);
        surface.present();

        if self.phase == Phase::Idle {
            log::debug!("first frame drawn");
            self.phase = Phase::Running;
        }
        log::trace!("frame {} at angle {:.4}", self.state.frames(), angle);
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

/// Source of frame ticks
pub trait Ticker {
    /// Block until the next frame is due. `false` ends the loop.
    fn wait(&mut self) -> bool;
}

/// Ticks every `interval`, sleeping out whatever time a frame did not use.
///
/// The first tick also waits a full interval. A frame that overruns its slot
/// pushes the schedule back instead of triggering catch-up frames.
pub struct FixedRateTicker {
    interval: Duration,
    next: Option<Instant>,
}

impl FixedRateTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left until the next tick is due, starting the schedule if needed
    pub fn remaining(&mut self) -> Duration {
        let now = Instant::now();
        let next = *self.next.get_or_insert(now + self.interval);
        next.saturating_duration_since(now)
    }

    /// Mark the current tick as consumed and schedule the next one
    pub fn schedule_next(&mut self) {
        let now = Instant::now();
        let next = self.next.map_or(now, |due| due.max(now));
        self.next = Some(next + self.interval);
    }
}

impl Ticker for FixedRateTicker {
    fn wait(&mut self) -> bool {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
        self.schedule_next();
        true
    }
}

/// Yields a fixed number of ticks immediately
#[derive(Debug, Clone)]
pub struct ManualTicker {
    remaining: u64,
}

impl ManualTicker {
    pub fn new(ticks: u64) -> Self {
        Self { remaining: ticks }
    }
}

impl Ticker for ManualTicker {
    fn wait(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Stops a running [`Driver`] before its next frame
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Single-threaded loop: one [`Animation::frame`] per tick
pub struct Driver<T: Ticker> {
    ticker: T,
    stop: StopHandle,
}

impl<T: Ticker> Driver<T> {
    pub fn new(ticker: T) -> Self {
        Self {
            ticker,
            stop: StopHandle::new(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run until the ticker ends or the stop handle fires. Returns the
    /// number of frames drawn.
    pub fn run<S: Surface + ?Sized>(&mut self, animation: &mut Animation, surface: &mut S) -> u64 {
        log::debug!("animation loop started");
        let mut drawn = 0;

        while !self.stop.is_stopped() && self.ticker.wait() {
            if self.stop.is_stopped() {
                break;
            }
            animation.frame(surface);
            drawn += 1;
        }

        log::debug!("animation loop finished after {} frames", drawn);
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCall, Recorder};

    fn animation() -> Animation {
        Animation::new(Mesh::reference(), &Config::default()).unwrap()
    }

    #[test]
    fn test_angle_after_n_frames() {
        let mut state = AnimationState::new(Config::default().angle_step(), 2.0);
        let step = std::f64::consts::TAU * (1.0 / 60.0) * 0.5;
        for n in 1..=600u64 {
            state.advance();
            assert_eq!(state.angle(), n as f64 * step);
        }
        assert_eq!(state.frames(), 600);
        assert_eq!(state.depth_offset(), 2.0);
    }

    #[test]
    fn test_angle_is_not_wrapped() {
        let mut state = AnimationState::new(1.0, 2.0);
        for _ in 0..10 {
            state.advance();
        }
        assert_eq!(state.angle(), 10.0);
    }

    #[test]
    fn test_long_run_advances_by_one_step() {
        let step = Config::default().angle_step();
        for start in [1u64 << 24, 1 << 32, 60 * 60 * 60 * 24 * 365] {
            let mut state = AnimationState::new(step, 2.0);
            state.frames = start;
            let mut previous = state.frames as f64 * step;
            for _ in 0..6 {
                let angle = state.advance();
                assert!(((angle - previous) - step).abs() < 1e-6, "at frame {}", state.frames());
                previous = angle;
            }
        }
    }

    #[test]
    fn test_render_angle_stays_within_one_turn() {
        let step = Config::default().angle_step();
        let mut state = AnimationState::new(step, 2.0);
        state.frames = 1 << 40;
        state.advance();

        let reduced = state.render_angle() as f64;
        assert!((0.0..std::f64::consts::TAU + 1e-6).contains(&reduced));
        assert!((reduced.sin() - state.angle().sin()).abs() < 1e-4);
        assert!((reduced.cos() - state.angle().cos()).abs() < 1e-4);
    }

    #[test]
    fn test_frame_clears_then_draws() {
        let mut animation = animation();
        assert_eq!(animation.phase(), Phase::Idle);

        let mut recorder = Recorder::new();
        animation.frame(&mut recorder);

        assert_eq!(animation.phase(), Phase::Running);
        assert_eq!(recorder.calls[0], DrawCall::Clear);
        assert_eq!(recorder.clears(), 1);
        assert_eq!(recorder.lines().count(), 32);
        assert_eq!(animation.state().frames(), 1);
    }

    #[test]
    fn test_frame_uses_advanced_angle() {
        let mut animation = animation();
        let pipeline = Config::default().pipeline();
        let mut recorder = Recorder::new();
        animation.frame(&mut recorder);

        let angle = animation.state().render_angle();
        assert!(angle > 0.0);
        let (a, _) = recorder.lines().next().unwrap();
        assert_eq!(a, pipeline.world_to_screen(&animation.mesh().vertices()[0], angle));
    }

    #[test]
    fn test_driver_runs_every_tick() {
        let mut animation = animation();
        let mut recorder = Recorder::new();
        let mut driver = Driver::new(ManualTicker::new(5));

        assert_eq!(driver.run(&mut animation, &mut recorder), 5);
        assert_eq!(recorder.clears(), 5);
        assert_eq!(recorder.lines().count(), 5 * 32);
        assert_eq!(animation.state().frames(), 5);
    }

    struct StopAfter {
        ticks: u64,
        stop: StopHandle,
    }

    impl Ticker for StopAfter {
        fn wait(&mut self) -> bool {
            if self.ticks == 0 {
                self.stop.stop();
            } else {
                self.ticks -= 1;
            }
            true
        }
    }

    #[test]
    fn test_stop_prevents_next_frame() {
        let stop = StopHandle::new();
        let mut driver = Driver {
            ticker: StopAfter {
                ticks: 3,
                stop: stop.clone(),
            },
            stop,
        };
        let mut animation = animation();
        let mut recorder = Recorder::new();

        assert_eq!(driver.run(&mut animation, &mut recorder), 3);
        assert!(driver.stop_handle().is_stopped());
    }

    #[test]
    fn test_stopped_driver_draws_nothing() {
        let mut driver = Driver::new(ManualTicker::new(10));
        driver.stop_handle().stop();

        let mut animation = animation();
        let mut recorder = Recorder::new();
        assert_eq!(driver.run(&mut animation, &mut recorder), 0);
        assert!(recorder.calls.is_empty());
        assert_eq!(animation.phase(), Phase::Idle);
    }

    #[test]
    fn test_fixed_rate_ticker_schedule() {
        let mut ticker = FixedRateTicker::new(Duration::from_millis(5));
        let first = ticker.remaining();
        assert!(first <= Duration::from_millis(5));

        let start = Instant::now();
        assert!(ticker.wait());
        assert!(ticker.wait());
        assert!(start.elapsed() >= Duration::from_millis(5));
        assert_eq!(ticker.interval(), Duration::from_millis(5));
    }
}
