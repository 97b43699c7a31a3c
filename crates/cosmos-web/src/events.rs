use crate::Shared;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Bound {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

/// Event listeners that are removed again when dropped.
#[derive(Default)]
pub struct Listeners {
    bound: Vec<Bound>,
}

impl Listeners {
    pub fn add(
        &mut self,
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        match target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
            Ok(()) => self.bound.push(Bound {
                target: target.clone(),
                kind,
                closure,
            }),
            Err(e) => log::error!("[events] could not listen for {kind}: {:?}", e),
        }
    }

    pub fn remove_all(&mut self) {
        for b in self.bound.drain(..) {
            let _ = b
                .target
                .remove_event_listener_with_callback(b.kind, b.closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.remove_all();
    }
}

/// Pointer and resize listeners on the window; the canvas sits behind page content.
pub fn wire(shared: &Rc<Shared>, window: &web::Window, canvas: &web::HtmlCanvasElement) -> Listeners {
    let mut listeners = Listeners::default();
    let target: &web::EventTarget = window.as_ref();

    {
        let shared = shared.clone();
        let canvas = canvas.clone();
        listeners.add(target, "pointermove", move |ev| {
            if let Some(ev) = ev.dyn_ref::<web::MouseEvent>() {
                let (x, y) = crate::dom::pointer_canvas_px(ev, &canvas);
                shared.scene.borrow_mut().on_pointer_move_px(x, y);
            }
        });
    }
    {
        let shared = shared.clone();
        let canvas = canvas.clone();
        listeners.add(target, "click", move |ev| {
            let mut scene = shared.scene.borrow_mut();
            if let Some(ev) = ev.dyn_ref::<web::MouseEvent>() {
                let (x, y) = crate::dom::pointer_canvas_px(ev, &canvas);
                scene.on_pointer_move_px(x, y);
            }
            if let Some(slot) = scene.on_click() {
                log::debug!("[events] pulse on sprite {}", slot);
            }
        });
    }
    {
        let shared = shared.clone();
        listeners.add(target, "resize", move |_| {
            shared.resize_pending.set(true);
        });
    }
    listeners
}
