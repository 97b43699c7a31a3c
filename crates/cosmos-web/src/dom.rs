use cosmos_core::{Preset, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub const CANVAS_ID: &str = "cosmos-canvas";
pub const OPEN_IMAGE_EVENT: &str = "cosmos-open-image";

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

pub fn find_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("#{CANVAS_ID} is not a canvas: {:?}", e))
}

/// `data-preset` on the canvas, falling back to the default preset.
pub fn preset_from_canvas(canvas: &web::HtmlCanvasElement) -> Preset {
    match canvas.dataset().get("preset") {
        Some(name) => name.parse().unwrap_or_else(|e| {
            log::warn!("[dom] {e}; using {}", Preset::default());
            Preset::default()
        }),
        None => Preset::default(),
    }
}

/// Match the canvas backing store to its CSS size times the device pixel ratio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> Option<Viewport> {
    let window = web::window()?;
    let dpr = window.device_pixel_ratio() as f32;
    let rect = canvas.get_bounding_client_rect();
    let (css_w, css_h) = if rect.width() > 0.0 && rect.height() > 0.0 {
        (rect.width() as f32, rect.height() as f32)
    } else {
        let w = window.inner_width().ok()?.as_f64()? as f32;
        let h = window.inner_height().ok()?.as_f64()? as f32;
        (w, h)
    };
    let viewport = Viewport::new(css_w, css_h, dpr).ok()?;
    let (w_px, h_px) = viewport.physical_size();
    if canvas.width() != w_px || canvas.height() != h_px {
        canvas.set_width(w_px);
        canvas.set_height(h_px);
    }
    Some(viewport)
}

/// Pointer position relative to the canvas, in CSS pixels.
pub fn pointer_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    (
        (ev.client_x() as f64 - rect.left()) as f32,
        (ev.client_y() as f64 - rect.top()) as f32,
    )
}

pub fn set_css_var(document: &web::Document, name: &str, value: &str) {
    if let Some(root) = document
        .document_element()
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
    {
        let _ = root.style().set_property(name, value);
    }
}

pub fn set_cursor(canvas: &web::HtmlCanvasElement, pointer: bool) {
    let _ = canvas
        .style()
        .set_property("cursor", if pointer { "pointer" } else { "default" });
}

/// Ask the page to open its gallery modal at `index`.
pub fn dispatch_open_image(window: &web::Window, index: usize) {
    let init = web::CustomEventInit::new();
    init.set_detail(&JsValue::from(index as u32));
    match web::CustomEvent::new_with_event_init_dict(OPEN_IMAGE_EVENT, &init) {
        Ok(ev) => {
            let _ = window.dispatch_event(&ev);
        }
        Err(e) => log::error!("[dom] {OPEN_IMAGE_EVENT} event: {:?}", e),
    }
}
