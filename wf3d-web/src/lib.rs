/// WF3D Web - Wireframe animation on an HTML canvas
///
/// Draws through a `CanvasRenderingContext2d` and drives frames with a
/// `setTimeout` chain, since the browser cannot block between ticks.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wf3d_core::{Animation, Config, Mesh, ScreenPoint, Surface, POINT_SIZE};

/// Canvas-backed drawing surface.
///
/// Holds no context when the canvas or its 2D context could not be obtained;
/// every primitive is then a no-op.
pub struct CanvasSurface {
    ctx: Option<CanvasRenderingContext2d>,
    width: f64,
    height: f64,
    foreground: String,
    background: String,
}

impl CanvasSurface {
    /// Look up `canvas_id`, size it from the config and take its 2D context
    pub fn from_canvas_id(canvas_id: &str, config: &Config) -> Result<Self, JsValue> {
        let mut surface = Self::unavailable(config)?;
        match canvas_context(canvas_id, config) {
            Some(ctx) => surface.ctx = Some(ctx),
            None => log::warn!("canvas #{} has no 2d context, drawing disabled", canvas_id),
        }
        Ok(surface)
    }

    pub fn unavailable(config: &Config) -> Result<Self, JsValue> {
        let palette = config
            .palette()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            ctx: None,
            width: config.width as f64,
            height: config.height as f64,
            foreground: palette.foreground.to_css(),
            background: palette.background.to_css(),
        })
    }

    pub fn is_available(&self) -> bool {
        self.ctx.is_some()
    }
}

fn canvas_context(canvas_id: &str, config: &Config) -> Option<CanvasRenderingContext2d> {
    let document = web_sys::window()?.document()?;
    let canvas = document
        .get_element_by_id(canvas_id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    canvas.set_width(config.width);
    canvas.set_height(config.height);

    canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        ctx.set_fill_style(&JsValue::from_str(&self.background));
        ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw_point(&mut self, p: ScreenPoint) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        let size = POINT_SIZE as f64;
        ctx.set_fill_style(&JsValue::from_str(&self.foreground));
        ctx.fill_rect(
            p.x as f64 - size / 2.0,
            p.y as f64 - size / 2.0,
            size,
            size,
        );
    }

    fn draw_line(&mut self, a: ScreenPoint, b: ScreenPoint) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        ctx.set_stroke_style(&JsValue::from_str(&self.foreground));
        ctx.begin_path();
        ctx.move_to(a.x as f64, a.y as f64);
        ctx.line_to(b.x as f64, b.y as f64);
        ctx.stroke();
    }
}

struct LoopState {
    animation: Animation,
    surface: CanvasSurface,
    interval_ms: i32,
    timeout: Option<i32>,
    stopped: bool,
}

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Browser handle for the spinning wireframe
#[wasm_bindgen]
pub struct WebRenderer {
    state: Rc<RefCell<LoopState>>,
    callback: Callback,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Bind to the canvas with the given element id, using the default config
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        let config = Config::default();
        let animation = Animation::new(Mesh::reference(), &config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let surface = CanvasSurface::from_canvas_id(canvas_id, &config)?;

        let state = Rc::new(RefCell::new(LoopState {
            animation,
            surface,
            interval_ms: config.frame_interval().as_millis() as i32,
            timeout: None,
            stopped: true,
        }));

        Ok(WebRenderer {
            state,
            callback: Rc::new(RefCell::new(None)),
        })
    }

    /// Start the frame chain; the first frame fires after one interval
    pub fn start(&mut self) {
        {
            let mut state = self.state.borrow_mut();
            if !state.stopped {
                return;
            }
            state.stopped = false;
        }

        let weak_state = Rc::downgrade(&self.state);
        let weak_callback = Rc::downgrade(&self.callback);
        *self.callback.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
            on_timeout(&weak_state, &weak_callback);
        }));

        log::debug!("web animation started");
        schedule(&self.state, &self.callback);
    }

    /// Cancel the pending frame; nothing is drawn after this returns
    pub fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.stopped = true;
        if let (Some(handle), Some(window)) = (state.timeout.take(), web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
        log::debug!("web animation stopped at frame {}", state.animation.state().frames());
    }

    /// Draw one frame immediately
    pub fn step(&mut self) {
        let mut state = self.state.borrow_mut();
        let LoopState {
            animation, surface, ..
        } = &mut *state;
        animation.frame(surface);
    }

    pub fn angle(&self) -> f64 {
        self.state.borrow().animation.state().angle()
    }

    pub fn is_running(&self) -> bool {
        !self.state.borrow().stopped
    }
}

impl Drop for WebRenderer {
    fn drop(&mut self) {
        // A pending timeout must not fire into a dropped closure
        self.stop();
    }
}

fn on_timeout(
    state: &Weak<RefCell<LoopState>>,
    callback: &Weak<RefCell<Option<Closure<dyn FnMut()>>>>,
) {
    let (Some(state), Some(callback)) = (state.upgrade(), callback.upgrade()) else {
        return;
    };

    {
        let mut guard = state.borrow_mut();
        guard.timeout = None;
        if guard.stopped {
            return;
        }
        let LoopState {
            animation, surface, ..
        } = &mut *guard;
        animation.frame(surface);
    }

    schedule(&state, &callback);
}

fn schedule(state: &Rc<RefCell<LoopState>>, callback: &Callback) {
    let mut state = state.borrow_mut();
    if state.stopped {
        return;
    }
    let Some(window) = web_sys::window() else {
        log::warn!("no window to schedule frames on");
        return;
    };
    let callback = callback.borrow();
    let Some(closure) = callback.as_ref() else {
        return;
    };

    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        state.interval_ms,
    ) {
        Ok(handle) => state.timeout = Some(handle),
        Err(e) => log::error!("setTimeout failed: {:?}", e),
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // A second init (hot reload) leaves the first logger in place
    let _ = console_log::init_with_level(log::Level::Info);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_surface_runs_frames() {
        let config = Config::default();
        let mut surface = CanvasSurface::unavailable(&config).unwrap();
        assert!(!surface.is_available());

        let mut animation = Animation::new(Mesh::reference(), &config).unwrap();
        for _ in 0..3 {
            animation.frame(&mut surface);
        }
        assert_eq!(animation.state().frames(), 3);
    }
}
