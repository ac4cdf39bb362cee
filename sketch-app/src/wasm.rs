//! Browser bindings.
//!
//! Mouse and touch events are converted once into [`PointerEvent`]s; the
//! raster is pushed back to the `<canvas>` through `ImageData` after every
//! event that changed it.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Promise};
use sketch_core::{
    CanvasRect, PointerEvent, PointerPhase, TouchEvent as SketchTouchEvent,
    TouchPhase, TouchPoint, UserIdentity,
};
use sketch_renderer::SurfaceConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::Clamped;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, MouseEvent, TouchEvent};

use crate::{HistoryClient, HistoryGallery, SaveError, SketchPad};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("DrawMotion WASM initialized");
}

fn to_js(err: &impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[allow(clippy::cast_possible_truncation)]
fn canvas_rect(canvas: &HtmlCanvasElement) -> CanvasRect {
    let rect = canvas.get_bounding_client_rect();
    CanvasRect::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

#[allow(clippy::cast_precision_loss)]
fn mouse_event(phase: PointerPhase, ev: &MouseEvent) -> PointerEvent {
    PointerEvent::mouse(phase, ev.offset_x() as f32, ev.offset_y() as f32)
}

#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn touch_event(phase: TouchPhase, ev: &TouchEvent) -> PointerEvent {
    let list = ev.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| TouchPoint::new(t.identifier() as u32, t.client_x() as f32, t.client_y() as f32))
        .collect();
    PointerEvent::touch(SketchTouchEvent::new(phase, touches))
}

/// Drawing pad bound to a `<canvas>` element.
#[wasm_bindgen]
pub struct WebSketchPad {
    pad: SketchPad,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    client: HistoryClient,
    owner: Option<UserIdentity>,
    gallery: Rc<RefCell<HistoryGallery>>,
}

#[wasm_bindgen]
impl WebSketchPad {
    /// Attach to the canvas with the given element ID and talk to the
    /// history server at `api_base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas element is not found, the 2D context
    /// fails, or `api_base` is not a valid URL.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, api_base: &str) -> Result<WebSketchPad, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object"))?;

        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("Canvas element '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("Element is not a canvas"))?;

        let ctx = canvas
            .get_context("2d")
            .map_err(|_| JsValue::from_str("Failed to get 2D context"))?
            .ok_or_else(|| JsValue::from_str("2D context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Failed to cast to 2D context"))?;

        let config = SurfaceConfig::default();
        canvas.set_width(config.width);
        canvas.set_height(config.height);

        let mut pad = SketchPad::new();
        pad.mount(config, canvas_rect(&canvas)).map_err(|e| to_js(&e))?;

        let client = HistoryClient::new(api_base).map_err(|e| to_js(&e))?;

        let this = Self {
            pad,
            canvas,
            ctx,
            client,
            owner: None,
            gallery: Rc::new(RefCell::new(HistoryGallery::new())),
        };
        this.blit();
        Ok(this)
    }

    /// Set or clear the signed-in user.
    #[wasm_bindgen(js_name = setOwner)]
    pub fn set_owner(&mut self, owner_id: Option<String>) {
        self.owner = owner_id.map(UserIdentity::new);
    }

    /// `mousedown` handler.
    #[wasm_bindgen(js_name = mouseDown)]
    pub fn mouse_down(&mut self, ev: &MouseEvent) {
        self.dispatch(&mouse_event(PointerPhase::Down, ev));
    }

    /// `mousemove` handler.
    #[wasm_bindgen(js_name = mouseMove)]
    pub fn mouse_move(&mut self, ev: &MouseEvent) {
        self.dispatch(&mouse_event(PointerPhase::Move, ev));
    }

    /// `mouseup` handler.
    #[wasm_bindgen(js_name = mouseUp)]
    pub fn mouse_up(&mut self, ev: &MouseEvent) {
        self.dispatch(&mouse_event(PointerPhase::Up, ev));
    }

    /// `mouseout` handler.
    #[wasm_bindgen(js_name = mouseOut)]
    pub fn mouse_out(&mut self, ev: &MouseEvent) {
        self.dispatch(&mouse_event(PointerPhase::Leave, ev));
    }

    /// `touchstart` handler.
    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&mut self, ev: &TouchEvent) {
        ev.prevent_default();
        self.dispatch(&touch_event(TouchPhase::Start, ev));
    }

    /// `touchmove` handler.
    #[wasm_bindgen(js_name = touchMove)]
    pub fn touch_move(&mut self, ev: &TouchEvent) {
        ev.prevent_default();
        self.dispatch(&touch_event(TouchPhase::Move, ev));
    }

    /// `touchend` handler.
    #[wasm_bindgen(js_name = touchEnd)]
    pub fn touch_end(&mut self, ev: &TouchEvent) {
        ev.prevent_default();
        self.dispatch(&touch_event(TouchPhase::End, ev));
    }

    /// Whether a stroke is in progress.
    #[wasm_bindgen(js_name = isDrawing)]
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.pad.capture().is_drawing()
    }

    /// Wipe the canvas.
    pub fn clear(&mut self) {
        self.pad.clear();
        self.blit();
    }

    /// The current drawing as a data URI.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    #[wasm_bindgen(js_name = toDataUrl)]
    pub fn to_data_url(&self) -> Result<String, JsValue> {
        self.pad
            .snapshot()
            .map(sketch_core::DrawingArtifact::into_string)
            .map_err(|e| to_js(&e))
    }

    /// Save the drawing for the signed-in user.
    ///
    /// Resolves to the server's acknowledgment message.
    pub fn save(&self) -> Promise {
        let owner = self.owner.clone();
        let client = self.client.clone();
        let artifact = self.pad.snapshot();

        future_to_promise(async move {
            let owner = owner.ok_or_else(|| to_js(&SaveError::NoIdentity))?;
            let artifact = artifact.map_err(|e| to_js(&SaveError::from(e)))?;
            let ack = client
                .save(&owner, &artifact)
                .await
                .map_err(|e| to_js(&SaveError::from(e)))?;
            Ok(JsValue::from_str(&ack.message))
        })
    }

    /// Refresh the gallery for the signed-in user.
    ///
    /// Resolves to the list of data URIs. On failure the previous list is
    /// returned and the error is available from `historyError()`.
    #[wasm_bindgen(js_name = refreshHistory)]
    pub fn refresh_history(&self) -> Promise {
        let owner = self.owner.clone();
        let client = self.client.clone();
        let gallery = Rc::clone(&self.gallery);

        future_to_promise(async move {
            let owner = owner.ok_or_else(|| to_js(&SaveError::NoIdentity))?;
            let result = client.fetch(&owner).await;

            let mut gallery = gallery.borrow_mut();
            gallery.apply(result);
            let list: Array = gallery
                .artifacts()
                .iter()
                .map(|artifact| JsValue::from_str(artifact.as_str()))
                .collect();
            Ok(list.into())
        })
    }

    /// Error from the last history refresh, if it failed.
    #[wasm_bindgen(js_name = historyError)]
    #[must_use]
    pub fn history_error(&self) -> Option<String> {
        self.gallery.borrow().last_error().map(ToString::to_string)
    }
}

impl WebSketchPad {
    fn dispatch(&mut self, event: &PointerEvent) {
        self.pad.set_canvas_rect(canvas_rect(&self.canvas));
        if self.pad.handle_event(event).rendered() {
            self.blit();
        }
    }

    fn blit(&self) {
        let Some(surface) = self.pad.surface() else {
            return;
        };
        let pixels = surface.to_rgba();
        match ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&pixels[..]),
            surface.width(),
            surface.height(),
        ) {
            Ok(image_data) => {
                if let Err(e) = self.ctx.put_image_data(&image_data, 0.0, 0.0) {
                    tracing::warn!("Failed to draw canvas: {:?}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to build image data: {:?}", e),
        }
    }
}
