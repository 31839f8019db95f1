/// Application shell: context setup, event wiring and the render loop
use std::cell::RefCell;
use std::rc::Rc;

use globe_core::{GlobeError, InteractionController, Mesh, ModelView, Projection, ViewerConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as GL};

use crate::buffers::GlobeBuffers;
use crate::dom;
use crate::renderer::FrameRenderer;
use crate::shader::{self, ProgramInfo};
use crate::texture::GlobeTexture;

/// Everything one globe view owns.
///
/// Event handlers and the frame callback share it through
/// `Rc<RefCell<Scene>>`; they all run on the browser's UI thread and never
/// overlap.
pub struct Scene {
    canvas: HtmlCanvasElement,
    gl: GL,
    renderer: FrameRenderer,
    transform: ModelView,
    controller: InteractionController,
}

impl Scene {
    pub fn setup(canvas: &HtmlCanvasElement, config: &ViewerConfig) -> Result<Self, GlobeError> {
        let width = config.canvas.width;
        let height = config.canvas.height;
        canvas.set_width(width);
        canvas.set_height(height);

        let gl = canvas
            .get_context("webgl2")
            .map_err(dom::js_error)?
            .ok_or_else(|| {
                GlobeError::ContextUnavailable("canvas does not provide WebGL2".to_string())
            })?
            .dyn_into::<GL>()
            .map_err(|_| {
                GlobeError::ContextUnavailable("context is not WebGL2".to_string())
            })?;
        gl.viewport(0, 0, width as i32, height as i32);

        let program = shader::build_program(&gl, shader::VERTEX_SHADER, shader::FRAGMENT_SHADER)?;
        let program = ProgramInfo::locate(&gl, program)?;

        let sphere = &config.sphere;
        let mesh = Mesh::uv_sphere(sphere.radius, sphere.latitude_bands, sphere.longitude_bands);
        let buffers = GlobeBuffers::upload(&gl, &mesh)?;
        let texture = GlobeTexture::load(&gl, &config.texture)?;

        let projection = Projection::from_settings(&config.camera, width, height);
        let renderer = FrameRenderer::new(
            program,
            buffers,
            texture,
            projection.matrix(),
            config.clear_color.0,
        );

        log::info!(
            "globe view ready: {}x{} canvas, {} triangles",
            width,
            height,
            mesh.triangle_count()
        );

        Ok(Self {
            canvas: canvas.clone(),
            gl,
            renderer,
            transform: ModelView::at_distance(config.camera.distance),
            controller: InteractionController::new(config.interaction.clone()),
        })
    }

    /// Canvas the context was created on
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn render(&self) {
        self.renderer.draw(&self.gl, &self.transform);
    }

    pub fn transform(&self) -> &ModelView {
        &self.transform
    }

    pub fn texture_ready(&self) -> bool {
        self.renderer.texture().is_ready()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.controller.pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.controller.pointer_move(x, y, &mut self.transform)
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    pub fn wheel(&mut self, delta_y: f32) -> bool {
        self.controller.wheel(delta_y, &mut self.transform)
    }
}

/// Route canvas mouse and wheel events into the scene
pub fn attach_listeners(
    canvas: &HtmlCanvasElement,
    scene: &Rc<RefCell<Scene>>,
) -> Result<(), GlobeError> {
    let target = scene.clone();
    dom::on_mouse(canvas, "mousedown", move |event| {
        target
            .borrow_mut()
            .pointer_down(event.client_x() as f32, event.client_y() as f32);
    })?;

    let target = scene.clone();
    dom::on_mouse(canvas, "mousemove", move |event| {
        target
            .borrow_mut()
            .pointer_move(event.client_x() as f32, event.client_y() as f32);
    })?;

    let target = scene.clone();
    dom::on_mouse(canvas, "mouseup", move |_| {
        target.borrow_mut().pointer_up();
    })?;

    let target = scene.clone();
    dom::on_wheel(canvas, move |event| {
        event.prevent_default();
        target.borrow_mut().wheel(event.delta_y() as f32);
    })?;

    Ok(())
}

/// Draw the scene once per display refresh for the lifetime of the page
pub fn start_render_loop(scene: Rc<RefCell<Scene>>) -> Result<(), GlobeError> {
    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();

    *frame.borrow_mut() = Some(Closure::new(move || {
        scene.borrow().render();

        if let Some(callback) = next.borrow().as_ref() {
            if let Err(err) = dom::request_animation_frame(callback) {
                log::error!("render loop stopped: {}", err);
            }
        }
    }));

    let first = frame.borrow();
    match first.as_ref() {
        Some(callback) => dom::request_animation_frame(callback).map(|_| ()),
        None => Ok(()),
    }
}
