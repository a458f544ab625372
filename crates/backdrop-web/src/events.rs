use backdrop_core::{hoverable_tag, PointerState, HOVERABLE_CLASS};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::cursor::CursorSystem;
use crate::dom;

/// Document-level pointer wiring. Listeners are retained here (not leaked)
/// so `teardown` can remove every one of them.
pub struct PointerWiring {
    window: web::Window,
    document: web::Document,
    on_move: Closure<dyn FnMut(web::PointerEvent)>,
    on_over: Closure<dyn FnMut(web::PointerEvent)>,
    on_out: Closure<dyn FnMut(web::PointerEvent)>,
    on_resize: Closure<dyn FnMut()>,
    torn_down: Cell<bool>,
}

pub fn wire_pointer(
    canvas: &web::HtmlCanvasElement,
    pointer: Rc<RefCell<PointerState>>,
    cursor: CursorSystem,
) -> anyhow::Result<PointerWiring> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    // pointermove: update velocity + position, then hand the fresh state to
    // the cursor before the next frame is scheduled.
    let on_move = {
        let pointer = pointer.clone();
        let cursor = cursor.clone();
        Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            pointer
                .borrow_mut()
                .observe(ev.client_x() as f32, ev.client_y() as f32);
            cursor.on_pointer_move(&pointer.borrow());
        }) as Box<dyn FnMut(_)>)
    };

    // pointerover/pointerout share one classification pass; the out handler
    // re-checks because the pointer may have left onto another hoverable.
    let on_over = make_hover_closure(pointer.clone(), cursor.clone());
    let on_out = make_hover_closure(pointer, cursor);

    let on_resize = {
        let canvas = canvas.clone();
        Closure::wrap(Box::new(move || {
            dom::sync_canvas_backing_size(&canvas);
        }) as Box<dyn FnMut()>)
    };

    window
        .add_event_listener_with_callback("pointermove", on_move.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    document
        .add_event_listener_with_callback("pointerover", on_over.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    document
        .add_event_listener_with_callback("pointerout", on_out.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    Ok(PointerWiring {
        window,
        document,
        on_move,
        on_over,
        on_out,
        on_resize,
        torn_down: Cell::new(false),
    })
}

impl PointerWiring {
    /// Remove every listener this wiring installed. Idempotent.
    pub fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        let _ = self
            .window
            .remove_event_listener_with_callback("pointermove", self.on_move.as_ref().unchecked_ref());
        let _ = self
            .document
            .remove_event_listener_with_callback("pointerover", self.on_over.as_ref().unchecked_ref());
        let _ = self
            .document
            .remove_event_listener_with_callback("pointerout", self.on_out.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
    }
}

fn make_hover_closure(
    pointer: Rc<RefCell<PointerState>>,
    cursor: CursorSystem,
) -> Closure<dyn FnMut(web::PointerEvent)> {
    Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let flag = event_is_hoverable(&ev);
        // Only touch the DOM when the classification actually changes.
        if pointer.borrow_mut().set_over_interactive(flag) {
            cursor.set_hover(flag);
        }
    }) as Box<dyn FnMut(_)>)
}

/// Walk the ancestor chain of the event target looking for an interactive
/// tag or the hoverable marker class.
fn event_is_hoverable(ev: &web::PointerEvent) -> bool {
    let mut current = ev
        .target()
        .and_then(|t| t.dyn_into::<web::Element>().ok());
    while let Some(el) = current {
        if hoverable_tag(&el.tag_name()) || el.class_list().contains(HOVERABLE_CLASS) {
            return true;
        }
        current = el.parent_element();
    }
    false
}
