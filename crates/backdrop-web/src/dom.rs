use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Pin the canvas to the full viewport behind all content, with input
/// passing through to the page.
pub fn style_backdrop_layer(canvas: &web::HtmlCanvasElement) {
    let _ = canvas.set_attribute(
        "style",
        "position:fixed;top:0;left:0;width:100vw;height:100vh;z-index:-1;pointer-events:none",
    );
}

/// Convert viewport (client) pixel coordinates into the canvas' backing
/// store space.
#[inline]
pub fn client_to_canvas_px(canvas: &web::HtmlCanvasElement, x: f32, y: f32) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    let x_css = x - rect.left() as f32;
    let y_css = y - rect.top() as f32;
    let sx = (x_css / rect.width().max(1.0) as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height().max(1.0) as f32) * canvas.height() as f32;
    (sx, sy)
}

/// Replace or restore the platform pointer glyph for the whole document.
/// Applied on the root element and body so it wins everywhere.
pub fn set_document_cursor_hidden(document: &web::Document, hidden: bool) {
    use wasm_bindgen::JsCast;
    let value = if hidden { "none" } else { "" };
    if let Some(root) = document.document_element() {
        if let Some(el) = root.dyn_ref::<web::HtmlElement>() {
            let _ = el.style().set_property("cursor", value);
        }
    }
    if let Some(body) = document.body() {
        let _ = body.style().set_property("cursor", value);
    }
}
