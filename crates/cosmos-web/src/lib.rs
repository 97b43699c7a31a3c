#![cfg(target_arch = "wasm32")]
//! Browser entry point: mounts the background into `#cosmos-canvas`.

mod dom;
mod events;
mod frame;
mod loader;
mod overlay;

use cosmos_core::{Scene, SceneEvent};
use cosmos_render::Renderer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// State shared between the frame loop, input listeners and loaders.
pub(crate) struct Shared {
    pub(crate) scene: RefCell<Scene>,
    pub(crate) renderer: RefCell<Renderer>,
    /// Events raised outside the frame loop, drained on the next frame.
    pub(crate) events: RefCell<Vec<SceneEvent>>,
    pub(crate) resize_pending: Cell<bool>,
    pub(crate) alive: Cell<bool>,
}

struct Host {
    shared: Rc<Shared>,
    listeners: events::Listeners,
    frame_loop: frame::FrameLoop,
}

impl Host {
    fn shutdown(mut self) {
        self.frame_loop.cancel();
        self.listeners.remove_all();
        self.shared.alive.set(false);
        self.shared.scene.borrow_mut().teardown();
        self.shared.renderer.borrow_mut().release_textures();
        log::info!("cosmos-web unmounted");
    }
}

thread_local! {
    static HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("cosmos-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
            if let Some((_, document)) = dom::window_document() {
                overlay::hide(&document);
            }
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let (window, document) =
        dom::window_document().ok_or_else(|| anyhow::anyhow!("no window/document"))?;
    let canvas = dom::find_canvas(&document)?;
    let viewport = dom::sync_canvas_backing_size(&canvas)
        .ok_or_else(|| anyhow::anyhow!("canvas has no usable size"))?;

    let preset = dom::preset_from_canvas(&canvas);
    let config = preset.config();
    log::info!("[init] preset {} with {} images", preset, config.catalog.len());
    let scene = Scene::new(config, viewport, StdRng::from_entropy())?;

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    let (w, h) = viewport.physical_size();
    let renderer = Renderer::new(&instance, surface, w, h).await?;

    overlay::show(&document);
    overlay::set_progress(&document, 0);

    let shared = Rc::new(Shared {
        scene: RefCell::new(scene),
        renderer: RefCell::new(renderer),
        events: RefCell::new(Vec::new()),
        resize_pending: Cell::new(false),
        alive: Cell::new(true),
    });
    let listeners = events::wire(&shared, &window, &canvas);
    loader::spawn_all(&shared);
    let ctx = frame::FrameContext::new(shared.clone(), window, document, canvas);
    let frame_loop = frame::FrameLoop::start(ctx);

    let previous = HOST.with(|h| {
        h.borrow_mut().replace(Host {
            shared,
            listeners,
            frame_loop,
        })
    });
    if let Some(old) = previous {
        old.shutdown();
    }
    Ok(())
}

/// Stop the frame loop, detach listeners and free GPU textures.
#[wasm_bindgen]
pub fn unmount() {
    if let Some(host) = HOST.with(|h| h.borrow_mut().take()) {
        host.shutdown();
    }
}

/// Enable or disable hover and click picking, e.g. while a modal is open.
#[wasm_bindgen]
pub fn set_interactive(enabled: bool) {
    HOST.with(|h| {
        if let Some(host) = h.borrow().as_ref() {
            host.shared.scene.borrow_mut().set_interactive(enabled);
        }
    });
}

#[wasm_bindgen]
pub fn loaded_count() -> u32 {
    with_scene(|s| s.loaded() as u32)
}

#[wasm_bindgen]
pub fn total_images() -> u32 {
    with_scene(|s| s.total_images() as u32)
}

fn with_scene(f: impl FnOnce(&Scene) -> u32) -> u32 {
    HOST.with(|h| {
        h.borrow()
            .as_ref()
            .map(|host| f(&host.shared.scene.borrow()))
            .unwrap_or(0)
    })
}
