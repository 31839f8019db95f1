/// Globe Web - WASM globe viewer rendered with WebGL2
///
/// Draws a textured sphere into a canvas and lets the user rotate it by
/// dragging and zoom it with the mouse wheel.

use std::cell::RefCell;
use std::rc::Rc;

use globe_core::{GlobeError, ViewerConfig};
use wasm_bindgen::prelude::*;

pub mod app;
pub mod buffers;
pub mod dom;
pub mod logging;
pub mod renderer;
pub mod shader;
pub mod texture;

use app::Scene;

/// Where a viewer is in its init/start lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Ready,
    Running,
}

impl Phase {
    fn of(has_scene: bool, running: bool) -> Self {
        match (has_scene, running) {
            (false, _) => Phase::Created,
            (true, false) => Phase::Ready,
            (true, true) => Phase::Running,
        }
    }

    /// A scene is built once; listeners and the frame loop keep the first one
    fn check_init(self) -> Result<(), GlobeError> {
        match self {
            Phase::Created => Ok(()),
            Phase::Ready | Phase::Running => Err(GlobeError::AlreadyInitialized),
        }
    }
}

fn check_canvas(bound: &str, requested: &str) -> Result<(), GlobeError> {
    if bound == requested {
        Ok(())
    } else {
        Err(GlobeError::CanvasMismatch {
            bound: bound.to_string(),
            requested: requested.to_string(),
        })
    }
}

#[wasm_bindgen]
pub struct GlobeViewer {
    config: ViewerConfig,
    scene: Option<Rc<RefCell<Scene>>>,
    running: bool,
}

#[wasm_bindgen]
impl GlobeViewer {
    /// Create a viewer, optionally overriding defaults with a JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<GlobeViewer, JsValue> {
        let config = match config_json {
            Some(json) => ViewerConfig::from_json(&json).map_err(dom::to_js)?,
            None => ViewerConfig::default(),
        };

        Ok(GlobeViewer {
            config,
            scene: None,
            running: false,
        })
    }

    /// Initialize the renderer with a canvas element. Fails if already initialized.
    pub fn init(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        self.phase().check_init().map_err(dom::to_js)?;

        let scene = dom::canvas_by_id(canvas_id)
            .and_then(|canvas| Scene::setup(&canvas, &self.config))
            .map_err(|err| {
                log::error!("globe setup failed: {}", err);
                dom::to_js(err)
            })?;

        self.scene = Some(Rc::new(RefCell::new(scene)));
        Ok(())
    }

    /// Wire canvas input and draw on every animation frame.
    ///
    /// Initializes on `canvas_id` if needed; otherwise `canvas_id` must name
    /// the canvas the viewer was initialized with.
    pub fn start(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        if self.phase() == Phase::Created {
            self.init(canvas_id)?;
        }

        let scene = self.scene()?.clone();
        let canvas = scene.borrow().canvas().clone();
        check_canvas(&canvas.id(), canvas_id).map_err(dom::to_js)?;
        if self.phase() == Phase::Running {
            return Ok(());
        }

        app::attach_listeners(&canvas, &scene).map_err(dom::to_js)?;
        app::start_render_loop(scene).map_err(dom::to_js)?;

        self.running = true;
        Ok(())
    }

    /// Render a single frame
    pub fn render(&self) -> Result<(), JsValue> {
        self.scene()?.borrow().render();
        Ok(())
    }

    pub fn pointer_down(&self, x: f32, y: f32) -> Result<(), JsValue> {
        self.scene()?.borrow_mut().pointer_down(x, y);
        Ok(())
    }

    /// Returns whether the globe rotated
    pub fn pointer_move(&self, x: f32, y: f32) -> Result<bool, JsValue> {
        Ok(self.scene()?.borrow_mut().pointer_move(x, y))
    }

    pub fn pointer_up(&self) -> Result<(), JsValue> {
        self.scene()?.borrow_mut().pointer_up();
        Ok(())
    }

    /// Returns whether the globe was rescaled
    pub fn wheel(&self, delta_y: f32) -> Result<bool, JsValue> {
        Ok(self.scene()?.borrow_mut().wheel(delta_y))
    }

    pub fn texture_ready(&self) -> bool {
        self.scene
            .as_ref()
            .map(|scene| scene.borrow().texture_ready())
            .unwrap_or(false)
    }

    /// Current model-view matrix, column-major
    pub fn model_view(&self) -> Result<Vec<f32>, JsValue> {
        Ok(self.scene()?.borrow().transform().as_slice().to_vec())
    }
}

impl GlobeViewer {
    fn phase(&self) -> Phase {
        Phase::of(self.scene.is_some(), self.running)
    }

    fn scene(&self) -> Result<&Rc<RefCell<Scene>>, JsValue> {
        self.scene
            .as_ref()
            .ok_or_else(|| dom::to_js(GlobeError::NotInitialized))
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init(log::LevelFilter::Info);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_from_parts() {
        assert_eq!(Phase::of(false, false), Phase::Created);
        assert_eq!(Phase::of(true, false), Phase::Ready);
        assert_eq!(Phase::of(true, true), Phase::Running);
    }

    #[test]
    fn test_init_only_once() {
        assert!(Phase::Created.check_init().is_ok());
        assert!(matches!(
            Phase::Ready.check_init(),
            Err(GlobeError::AlreadyInitialized)
        ));
        // Listeners and the frame loop hold the running scene
        assert!(matches!(
            Phase::Running.check_init(),
            Err(GlobeError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_start_requires_bound_canvas() {
        assert!(check_canvas("globe", "globe").is_ok());
        match check_canvas("a", "b") {
            Err(GlobeError::CanvasMismatch { bound, requested }) => {
                assert_eq!(bound, "a");
                assert_eq!(requested, "b");
            }
            other => panic!("expected canvas mismatch, got {:?}", other),
        }
    }
}
