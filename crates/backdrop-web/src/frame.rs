use backdrop_core::{pointer_to_field, Camera, ParticleField, PointerState};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;
use crate::render;

pub struct FrameContext {
    pub gpu: render::GpuState<'static>,
    pub field: ParticleField,
    pub pointer: Rc<RefCell<PointerState>>,
    pub canvas: web::HtmlCanvasElement,
    last_instant: Instant,
    elapsed_secs: f32,
    frame_counter: u32,
}

impl FrameContext {
    pub fn new(
        gpu: render::GpuState<'static>,
        field: ParticleField,
        pointer: Rc<RefCell<PointerState>>,
        canvas: web::HtmlCanvasElement,
    ) -> Self {
        Self {
            gpu,
            field,
            pointer,
            canvas,
            last_instant: Instant::now(),
            elapsed_secs: 0.0,
            frame_counter: 0,
        }
    }

    /// One animation-frame step: project the latest pointer sample into field
    /// space, advance the field, and draw.
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_instant).as_secs_f32();
        self.last_instant = now;
        self.elapsed_secs += dt;
        self.frame_counter = self.frame_counter.wrapping_add(1);
        if self.frame_counter % 300 == 0 {
            log::debug!("frame dt {:.1} ms", dt * 1000.0);
        }

        let width = self.canvas.width();
        let height = self.canvas.height();
        self.gpu.resize_if_needed(width, height);

        let pointer_world = self.pointer.borrow().position().and_then(|p| {
            let (sx, sy) = dom::client_to_canvas_px(&self.canvas, p.x, p.y);
            let camera = Camera::backdrop(width as f32 / height.max(1) as f32);
            pointer_to_field(&camera, width as f32, height as f32, sx, sy)
        });
        self.field.update(pointer_world);

        match self.gpu.render(&mut self.field, self.elapsed_secs) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                self.gpu.reconfigure();
            }
            Err(e) => log::error!("render error: {:?}", e),
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    field: &ParticleField,
) -> anyhow::Result<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    render::GpuState::new(leaked_canvas, field).await
}

/// Schedule the requestAnimationFrame loop. When `alive` goes false the tick
/// stops rescheduling and drops its own closure, so nothing outlives the
/// mount handle.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>, alive: Rc<Cell<bool>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !alive.get() {
            tick_clone.borrow_mut().take();
            return;
        }
        frame_ctx.borrow_mut().frame();
        if let Some(w) = web::window() {
            if let Some(cb) = tick_clone.borrow().as_ref() {
                let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        if let Some(cb) = tick.borrow().as_ref() {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}
