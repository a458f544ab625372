#![cfg(target_arch = "wasm32")]
//! Browser entry point: mounts the particle backdrop onto `#backdrop-canvas`
//! and installs the custom cursor. `Backdrop::mount` returns a handle whose
//! `unmount` cancels every timer, listener, and animation frame it created.

use backdrop_core::{FieldConfig, ParticleField, PointerState};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod cursor;
mod dom;
mod events;
mod frame;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("backdrop-web loaded");
    Ok(())
}

/// Live backdrop instance. Dropping it without calling `unmount` leaks the
/// animation loop; callers hold it for the lifetime of the page section.
#[wasm_bindgen]
pub struct Backdrop {
    alive: Rc<Cell<bool>>,
    cursor: cursor::CursorSystem,
    events: events::PointerWiring,
}

#[wasm_bindgen]
impl Backdrop {
    /// Acquire the canvas, build the particle field, bring up WebGPU, install
    /// the cursor glyphs and pointer listeners, and start the frame loop.
    pub async fn mount() -> Result<Backdrop, JsValue> {
        mount_inner().await.map_err(|e| {
            log::error!("mount failed: {e:?}");
            JsValue::from_str(&format!("{e:?}"))
        })
    }

    /// Stop the frame loop, cancel pending trail and reveal timers, remove
    /// every listener and injected element, and restore the platform cursor.
    pub fn unmount(self) {
        self.alive.set(false);
        self.cursor.teardown();
        self.events.teardown();
        log::info!("backdrop unmounted");
    }
}

async fn mount_inner() -> anyhow::Result<Backdrop> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas_el = document
        .get_element_by_id("backdrop-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #backdrop-canvas"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::style_backdrop_layer(&canvas);
    dom::sync_canvas_backing_size(&canvas);

    let seed = js_sys::Date::now() as u64;
    let field = ParticleField::build(FieldConfig::default(), seed)?;
    let gpu = frame::init_gpu(&canvas, &field).await?;

    let pointer = Rc::new(RefCell::new(PointerState::default()));
    let cursor = cursor::CursorSystem::mount(&document)?;
    let wiring = events::wire_pointer(&canvas, pointer.clone(), cursor.clone())?;

    let alive = Rc::new(Cell::new(true));
    let ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        gpu,
        field,
        pointer,
        canvas,
    )));
    frame::start_loop(ctx, alive.clone());
    log::info!("backdrop mounted");

    Ok(Backdrop {
        alive,
        cursor,
        events: wiring,
    })
}
