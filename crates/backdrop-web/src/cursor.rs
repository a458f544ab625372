//! DOM cursor replacement: a velocity-scaled outer ring, an inner dot, and a
//! chain of delayed trail segments.
//!
//! The glyph elements are owned drawable handles: transforms are written
//! directly to their styles on every pointer event, bypassing any retained
//! re-render cycle. That is a deliberate latency exception; everything else
//! in the crate goes through the frame loop.

use backdrop_core::{
    glyph_transform, initial_glyph_position, outer_scale, plan_updates, segment_opacity,
    segment_scale, segment_size_px, CursorPhase, PointerState, TrailUpdate,
    CURSOR_REVEAL_DELAY_MS, TRAIL_COUNT,
};
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;

struct PendingTimer {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

struct CursorInner {
    document: web::Document,
    outer: web::HtmlElement,
    dot: web::HtmlElement,
    trails: Vec<web::HtmlElement>,
    phase: Rc<Cell<CursorPhase>>,
    torn_down: Rc<Cell<bool>>,
    pending: Rc<RefCell<Vec<PendingTimer>>>,
    reveal: RefCell<Option<PendingTimer>>,
}

#[derive(Clone)]
pub struct CursorSystem {
    inner: Rc<CursorInner>,
}

impl CursorSystem {
    /// Create the glyph elements (hidden), hide the platform cursor, and arm
    /// the one-shot reveal timer. The platform-glyph override happens here
    /// exactly once per mount.
    pub fn mount(document: &web::Document) -> anyhow::Result<Self> {
        dom::set_document_cursor_hidden(document, true);

        let body = document
            .body()
            .ok_or_else(|| anyhow::anyhow!("no document body"))?;

        // Every glyph starts parked offscreen, so the reveal cannot flash
        // them at an undefined position before the first pointer sample.
        let park = glyph_transform(initial_glyph_position(), None);
        let outer = make_layer(
            document,
            "backdrop-cursor-outer",
            &format!(
                "position:fixed;top:0;left:0;width:30px;height:30px;border:1.5px solid #7000FF;\
                 border-radius:50%;pointer-events:none;z-index:10000;will-change:transform;\
                 transform:{park};display:none"
            ),
        )?;
        let dot = make_layer(
            document,
            "backdrop-cursor-dot",
            &format!(
                "position:fixed;top:0;left:0;width:4px;height:4px;background:#7000FF;\
                 border-radius:50%;pointer-events:none;z-index:10001;will-change:transform;\
                 transform:{park};display:none"
            ),
        )?;
        let mut trails = Vec::with_capacity(TRAIL_COUNT);
        for i in 0..TRAIL_COUNT {
            let size = segment_size_px(i);
            let style = format!(
                "position:fixed;top:0;left:0;width:{size}px;height:{size}px;background:#7000FF;\
                 border-radius:50%;pointer-events:none;z-index:{};opacity:{};\
                 transition:opacity 0.2s ease-out, transform 0.1s ease-out;\
                 will-change:transform,opacity;transform:{park};display:none",
                9998 - i as i32,
                segment_opacity(i),
            );
            trails.push(make_layer(document, "backdrop-cursor-trail", &style)?);
        }

        body.append_child(&outer)
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        body.append_child(&dot)
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        for t in &trails {
            body.append_child(t)
                .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        }

        let system = Self {
            inner: Rc::new(CursorInner {
                document: document.clone(),
                outer,
                dot,
                trails,
                phase: Rc::new(Cell::new(CursorPhase::Hidden)),
                torn_down: Rc::new(Cell::new(false)),
                pending: Rc::new(RefCell::new(Vec::new())),
                reveal: RefCell::new(None),
            }),
        };
        system.arm_reveal_timer()?;
        Ok(system)
    }

    // Hidden -> Visible, once, after the startup delay; avoids flashing the
    // glyph at an undefined position before the first pointer sample.
    fn arm_reveal_timer(&self) -> anyhow::Result<()> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let phase = self.inner.phase.clone();
        let torn_down = self.inner.torn_down.clone();
        let elements = self.all_elements();
        let closure = Closure::wrap(Box::new(move || {
            if torn_down.get() {
                return;
            }
            // The unhide is driven by the Hidden -> Visible transition.
            let mut p = phase.get();
            if p.is_visible() {
                return;
            }
            p.reveal();
            phase.set(p);
            for el in &elements {
                let _ = el.style().remove_property("display");
            }
        }) as Box<dyn FnMut()>);
        let id = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                CURSOR_REVEAL_DELAY_MS,
            )
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        *self.inner.reveal.borrow_mut() = Some(PendingTimer {
            id,
            _closure: closure,
        });
        Ok(())
    }

    /// Called synchronously on every pointer-move: position the primary glyph
    /// and dot with no smoothing, then schedule the delayed trail writes.
    pub fn on_pointer_move(&self, state: &PointerState) {
        if self.inner.torn_down.get() {
            return;
        }
        let Some(pos) = state.position() else { return };
        let scale = outer_scale(state.speed(), state.over_interactive());
        set_transform(&self.inner.outer, pos, Some(scale));
        set_transform(&self.inner.dot, pos, None);
        for upd in plan_updates(pos) {
            self.schedule_trail(upd);
        }
    }

    /// Toggle hover styling; the scale override itself is applied on the next
    /// pointer-move through `outer_scale`.
    pub fn set_hover(&self, hovering: bool) {
        for el in [&self.inner.outer, &self.inner.dot] {
            let _ = if hovering {
                el.class_list().add_1("hover")
            } else {
                el.class_list().remove_1("hover")
            };
        }
    }

    // One cancellable one-shot timer per segment, carrying the position
    // captured at the triggering event. The fired callback removes its own
    // entry; teardown cancels whatever is still outstanding.
    fn schedule_trail(&self, upd: TrailUpdate) {
        let Some(window) = web::window() else { return };
        let Some(el) = self.inner.trails.get(upd.segment).cloned() else {
            return;
        };
        let torn_down = self.inner.torn_down.clone();
        let pending = self.inner.pending.clone();
        let id_slot = Rc::new(Cell::new(-1_i32));
        let id_for_cb = id_slot.clone();
        let segment = upd.segment;
        let pos = upd.position;
        let closure = Closure::wrap(Box::new(move || {
            if !torn_down.get() {
                set_transform(&el, pos, Some(segment_scale(segment)));
                let _ = el
                    .style()
                    .set_property("opacity", &segment_opacity(segment).to_string());
            }
            let id = id_for_cb.get();
            pending.borrow_mut().retain(|p| p.id != id);
        }) as Box<dyn FnMut()>);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            upd.delay_ms,
        ) {
            Ok(id) => {
                id_slot.set(id);
                self.inner.pending.borrow_mut().push(PendingTimer {
                    id,
                    _closure: closure,
                });
            }
            Err(e) => log::warn!("trail timer failed: {:?}", e),
        }
    }

    /// Cancel every pending timer, drop the glyph elements, and restore the
    /// platform cursor. Idempotent; no side effects may escape after this.
    pub fn teardown(&self) {
        if self.inner.torn_down.replace(true) {
            return;
        }
        if let Some(window) = web::window() {
            if let Some(t) = self.inner.reveal.borrow_mut().take() {
                window.clear_timeout_with_handle(t.id);
            }
            for t in self.inner.pending.borrow_mut().drain(..) {
                window.clear_timeout_with_handle(t.id);
            }
        }
        for el in self.all_elements() {
            el.remove();
        }
        dom::set_document_cursor_hidden(&self.inner.document, false);
    }

    fn all_elements(&self) -> Vec<web::HtmlElement> {
        let mut els = vec![self.inner.outer.clone(), self.inner.dot.clone()];
        els.extend(self.inner.trails.iter().cloned());
        els
    }
}

fn make_layer(
    document: &web::Document,
    class: &str,
    style: &str,
) -> anyhow::Result<web::HtmlElement> {
    let el = document
        .create_element("div")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    el.set_class_name(class);
    let _ = el.set_attribute("style", style);
    el.dyn_into::<web::HtmlElement>()
        .map_err(|_| anyhow::anyhow!("cursor layer is not an HtmlElement"))
}

fn set_transform(el: &web::HtmlElement, pos: Vec2, scale: Option<f32>) {
    let _ = el
        .style()
        .set_property("transform", &glyph_transform(pos, scale));
}
