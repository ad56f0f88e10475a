/// Terminal front-end: crossterm surface plus a fixed-rate driver
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{self},
};
use std::io::{self, stdout};
use thiserror::Error;
use wf3d_core::{Animation, Config, ConfigError, Driver, FixedRateTicker, Mesh, StopHandle, Ticker};

pub mod renderer;

pub use renderer::TerminalSurface;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Fixed-rate ticker that spends its idle time watching for quit keys.
///
/// `q`, `Esc` and `Ctrl-C` end the loop; other events are dropped.
pub struct TerminalTicker {
    inner: FixedRateTicker,
}

impl TerminalTicker {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: FixedRateTicker::new(config.frame_interval()),
        }
    }
}

impl Ticker for TerminalTicker {
    fn wait(&mut self) -> bool {
        loop {
            let remaining = self.inner.remaining();
            match event::poll(remaining) {
                Ok(true) => match event::read() {
                    Ok(event) if is_quit(&event) => return false,
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("reading terminal event failed: {}", e);
                        return false;
                    }
                },
                Ok(false) => break,
                Err(e) => {
                    log::warn!("polling terminal events failed: {}", e);
                    std::thread::sleep(remaining);
                    break;
                }
            }
            if remaining.is_zero() {
                break;
            }
        }

        self.inner.schedule_next();
        true
    }
}

pub fn is_quit(event: &Event) -> bool {
    match event {
        Event::Key(KeyEvent {
            code, modifiers, ..
        }) => match code {
            KeyCode::Char('q') | KeyCode::Esc => true,
            KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        },
        _ => false,
    }
}

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    config: Config,
    animation: Animation,
    driver: Driver<TerminalTicker>,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: Config) -> Result<Self, AppError> {
        let animation = Animation::new(mesh, &config)?;
        let driver = Driver::new(TerminalTicker::new(&config));
        Ok(Self {
            config,
            animation,
            driver,
        })
    }

    /// Handle that ends the loop before its next frame
    pub fn stop_handle(&self) -> StopHandle {
        self.driver.stop_handle()
    }

    pub fn run(&mut self) -> Result<u64, AppError> {
        let mut surface = TerminalSurface::new(stdout(), &self.config)?.with_status_line();

        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let frames = self.driver.run(&mut self.animation, &mut surface);

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        log::info!(
            "drew {} frames, final angle {:.3} rad",
            frames,
            self.animation.state().angle()
        );
        Ok(frames)
    }
}
