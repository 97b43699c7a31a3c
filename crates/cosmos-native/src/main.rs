//! Desktop window running the floating photo field on local files.

mod loader;

use anyhow::Context;
use clap::Parser;
use cosmos_core::{FieldEvent, Preset, Scene, SceneEvent, Viewport};
use cosmos_render::Renderer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Instant;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{CursorIcon, Window, WindowBuilder};

const TITLE: &str = "COSMOS";

#[derive(Parser, Debug)]
#[command(version, about = "Floating photo planes in a desktop window")]
struct Args {
    /// Directory holding the DSCF*.JPG photos.
    #[arg(long, default_value = "public/images")]
    images: PathBuf,

    /// classic, cinematic or gallery.
    #[arg(long, default_value_t = Preset::Cinematic)]
    preset: Preset,

    /// Disable hover and click handling.
    #[arg(long)]
    no_interaction: bool,

    /// Decoder threads.
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Fixed RNG seed for a reproducible burst.
    #[arg(long)]
    seed: Option<u64>,
}

struct App {
    window: Arc<Window>,
    scene: Scene,
    renderer: Renderer,
    images: Option<Receiver<loader::Loaded>>,
    events: Vec<SceneEvent>,
    last_frame: Instant,
    shown_percent: Option<u32>,
}

fn viewport_of(size: PhysicalSize<u32>, scale_factor: f64) -> Option<Viewport> {
    let logical = size.to_logical::<f32>(scale_factor);
    Viewport::new(logical.width, logical.height, scale_factor as f32).ok()
}

impl App {
    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(viewport) = viewport_of(size, self.window.scale_factor()) else {
            // minimized
            return;
        };
        self.renderer.resize(size.width, size.height);
        self.scene.resize(viewport);
    }

    fn drain_loader(&mut self) {
        let Some(rx) = self.images.take() else {
            return;
        };
        loop {
            match rx.try_recv() {
                Ok(loader::Loaded { index, result }) => match result {
                    Ok(image) => {
                        let slot = self.scene.on_image_loaded(
                            index,
                            image.width,
                            image.height,
                            &mut self.events,
                        );
                        if let Some(slot) = slot {
                            self.renderer.upload_texture(slot, &image);
                        }
                    }
                    Err(e) => {
                        log::warn!("[loader] {e:#}");
                        self.scene.on_image_failed(index);
                    }
                },
                Err(TryRecvError::Empty) => {
                    self.images = Some(rx);
                    return;
                }
                Err(TryRecvError::Disconnected) => {
                    log::info!(
                        "[loader] finished: {}/{} images",
                        self.scene.loaded(),
                        self.scene.total_images()
                    );
                    return;
                }
            }
        }
    }

    fn handle_events(&mut self) {
        for event in self.events.drain(..) {
            match event {
                SceneEvent::Field(FieldEvent::LoadingComplete) => {
                    log::info!("[app] all images loaded");
                    self.window.set_title(TITLE);
                    self.shown_percent = Some(100);
                }
                SceneEvent::Field(FieldEvent::AnimationComplete) => {
                    log::info!("[app] burst settled");
                }
                SceneEvent::Field(_) => {}
                SceneEvent::HoverChanged { sprite } => {
                    let icon = if sprite.is_some() {
                        CursorIcon::Pointer
                    } else {
                        CursorIcon::Default
                    };
                    self.window.set_cursor_icon(icon);
                }
                SceneEvent::OpenImage { image_index } => {
                    let name = self
                        .scene
                        .catalog()
                        .file_name(image_index)
                        .unwrap_or_default();
                    log::info!("[app] open image {image_index} ({name})");
                    self.window.set_title(&format!("{TITLE} - {name}"));
                }
            }
        }
    }

    fn update_progress(&mut self) {
        if self.scene.loading_complete() {
            return;
        }
        let percent = self.scene.progress_percent();
        if self.shown_percent != Some(percent) {
            self.shown_percent = Some(percent);
            self.window
                .set_title(&format!("{TITLE} - Loading images: {percent}%"));
        }
    }

    /// One displayed frame. Returns `false` when the surface is unusable.
    fn frame(&mut self) -> bool {
        self.drain_loader();
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.scene.tick(dt, &mut self.events);
        self.handle_events();
        self.update_progress();
        match self.renderer.render(&self.scene) {
            Ok(()) => true,
            Err(cosmos_render::RenderError::Surface(wgpu::SurfaceError::Timeout)) => {
                log::warn!("[render] surface timeout");
                true
            }
            Err(e) => {
                log::error!("[render] {e}");
                false
            }
        }
    }

    fn shutdown(&mut self) {
        self.images = None;
        self.scene.teardown();
        self.renderer.release_textures();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = args.preset.config();
    if args.no_interaction {
        config.interactive = false;
    }
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(1280.0, 800.0))
            .with_transparent(true)
            .build(&event_loop)?,
    );
    let size = window.inner_size();
    let viewport = viewport_of(size, window.scale_factor())
        .context("window has no drawable area")?;

    let scene = Scene::new(config, viewport, rng)?;
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window.clone())?;
    let renderer = pollster::block_on(Renderer::new(
        &instance,
        surface,
        size.width,
        size.height,
    ))?;
    let images = loader::spawn(&args.images, scene.catalog(), args.threads);

    let mut app = App {
        window,
        scene,
        renderer,
        images: Some(images),
        events: Vec::new(),
        last_frame: Instant::now(),
        shown_percent: None,
    };
    log::info!("[app] preset {} from {}", args.preset, args.images.display());

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => app.resize(size),
            WindowEvent::ScaleFactorChanged { .. } => app.resize(app.window.inner_size()),
            WindowEvent::CursorMoved { position, .. } => {
                let p = position.to_logical::<f32>(app.window.scale_factor());
                app.scene.on_pointer_move_px(p.x, p.y);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                app.scene.on_click();
            }
            WindowEvent::CloseRequested => {
                app.shutdown();
                elwt.exit();
            }
            _ => {}
        },
        Event::AboutToWait => {
            if !app.frame() {
                app.shutdown();
                elwt.exit();
                return;
            }
            app.window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}
