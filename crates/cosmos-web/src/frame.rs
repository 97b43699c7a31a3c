use crate::{dom, overlay, Shared};
use cosmos_core::{FieldEvent, SceneEvent};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub shared: Rc<Shared>,
    pub window: web::Window,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub last_instant: Instant,
    pub events: Vec<SceneEvent>,
    pub shown_percent: Option<u32>,
}

impl FrameContext {
    pub fn new(
        shared: Rc<Shared>,
        window: web::Window,
        document: web::Document,
        canvas: web::HtmlCanvasElement,
    ) -> Self {
        Self {
            shared,
            window,
            document,
            canvas,
            last_instant: Instant::now(),
            events: Vec::new(),
            shown_percent: None,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;

        if self.shared.resize_pending.take() {
            self.apply_resize();
        }

        self.events.append(&mut self.shared.events.borrow_mut());
        {
            let mut scene = self.shared.scene.borrow_mut();
            scene.tick(dt, &mut self.events);
            let offset = scene.pointer().gradient_offset();
            dom::set_css_var(&self.document, "--bg-x", &format!("{:.2}%", offset.x));
            dom::set_css_var(&self.document, "--bg-y", &format!("{:.2}%", -offset.y));
        }
        for ev in std::mem::take(&mut self.events) {
            self.handle(ev);
        }
        if !self.shared.alive.get() {
            // unmounted by a page handler above
            return;
        }
        self.update_progress();

        let scene = self.shared.scene.borrow();
        if let Err(e) = self.shared.renderer.borrow_mut().render(&scene) {
            log::error!("render error: {}", e);
        }
    }

    fn handle(&mut self, ev: SceneEvent) {
        match ev {
            SceneEvent::Field(FieldEvent::LoadingComplete) => overlay::hide(&self.document),
            SceneEvent::Field(FieldEvent::AnimationComplete) => {
                log::info!("[frame] burst animation complete");
            }
            SceneEvent::Field(_) => {}
            SceneEvent::HoverChanged { sprite } => dom::set_cursor(&self.canvas, sprite.is_some()),
            SceneEvent::OpenImage { image_index } => {
                log::info!("[frame] open image {}", image_index);
                dom::dispatch_open_image(&self.window, image_index);
            }
        }
    }

    fn update_progress(&mut self) {
        let scene = self.shared.scene.borrow();
        if scene.loading_complete() {
            return;
        }
        let percent = scene.progress_percent();
        if self.shown_percent != Some(percent) {
            overlay::set_progress(&self.document, percent);
            self.shown_percent = Some(percent);
        }
    }

    fn apply_resize(&mut self) {
        if let Some(viewport) = dom::sync_canvas_backing_size(&self.canvas) {
            let (w, h) = viewport.physical_size();
            self.shared.renderer.borrow_mut().resize(w, h);
            self.shared.scene.borrow_mut().resize(viewport);
        }
    }
}

/// Handle to a running requestAnimationFrame loop.
pub struct FrameLoop {
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    handle: Rc<Cell<Option<i32>>>,
    stopped: Rc<Cell<bool>>,
}

impl FrameLoop {
    pub fn start(ctx: FrameContext) -> Self {
        let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let stopped = Rc::new(Cell::new(false));
        let tick_clone = tick.clone();
        let handle_clone = handle.clone();
        let stopped_clone = stopped.clone();
        let mut ctx = ctx;
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            handle_clone.set(None);
            if stopped_clone.get() {
                return;
            }
            ctx.frame();
            // The page may have unmounted us from inside this frame.
            if stopped_clone.get() {
                return;
            }
            let next = tick_clone.borrow().as_ref().and_then(request_frame);
            handle_clone.set(next);
        }) as Box<dyn FnMut()>));
        handle.set(tick.borrow().as_ref().and_then(request_frame));
        Self {
            tick,
            handle,
            stopped,
        }
    }

    /// Cancel the pending callback and release the loop closure.
    pub fn cancel(&self) {
        self.stopped.set(true);
        if let (Some(id), Some(w)) = (self.handle.take(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        // Dropped on the next microtask in case we are inside the callback.
        let tick = self.tick.clone();
        wasm_bindgen_futures::spawn_local(async move {
            tick.borrow_mut().take();
        });
    }
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Option<i32> {
    web::window()?
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .ok()
}
