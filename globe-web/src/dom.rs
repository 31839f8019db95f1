/// Browser DOM helpers
use globe_core::GlobeError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

/// Wrap a JavaScript exception
pub fn js_error(err: JsValue) -> GlobeError {
    GlobeError::Dom(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// Surface a library error to JavaScript callers
pub fn to_js(err: GlobeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub fn window() -> Result<Window, GlobeError> {
    web_sys::window().ok_or_else(|| GlobeError::Dom("no global `window`".to_string()))
}

pub fn document() -> Result<Document, GlobeError> {
    window()?
        .document()
        .ok_or_else(|| GlobeError::Dom("window has no document".to_string()))
}

pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, GlobeError> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| GlobeError::Dom(format!("no element with id `{}`", id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| GlobeError::Dom(format!("element `{}` is not a canvas", id)))
}

/// Schedule `callback` to run before the next repaint
pub fn request_animation_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, GlobeError> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(js_error)
}

/// Register a mouse handler that lives as long as the page
pub fn on_mouse(
    canvas: &HtmlCanvasElement,
    event: &str,
    handler: impl FnMut(MouseEvent) + 'static,
) -> Result<(), GlobeError> {
    let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
    canvas
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(js_error)?;
    closure.forget();
    Ok(())
}

pub fn on_wheel(
    canvas: &HtmlCanvasElement,
    handler: impl FnMut(WheelEvent) + 'static,
) -> Result<(), GlobeError> {
    let closure = Closure::<dyn FnMut(WheelEvent)>::new(handler);
    canvas
        .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref())
        .map_err(js_error)?;
    closure.forget();
    Ok(())
}
