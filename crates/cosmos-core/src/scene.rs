//! The scene context owned by a host: camera, lights, sprites and input.
//!
//! Hosts construct one [`Scene`], forward decoded images and input events
//! to it, call [`Scene::tick`] once per displayed frame with the elapsed
//! time, then draw what it exposes.

use crate::assets::ImageCatalog;
use crate::camera::{Camera, CameraRig, Viewport};
use crate::config::SceneConfig;
use crate::constants::HOVER_SCALE;
use crate::error::Result;
use crate::field::{FieldEvent, SpriteField};
use crate::lighting::LightRig;
use crate::picking::{pick_nearest, ClickPulse, HoverState};
use crate::pointer::PointerState;
use crate::sprite::Sprite;
use glam::Vec2;
use rand::rngs::StdRng;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    Field(FieldEvent),
    HoverChanged { sprite: Option<usize> },
    /// A click pulse finished; the page should show this catalog image.
    OpenImage { image_index: usize },
}

pub struct Scene {
    config: SceneConfig,
    camera: Camera,
    rig: CameraRig,
    lights: LightRig,
    field: SpriteField,
    pointer: PointerState,
    hover: HoverState,
    pulse: Option<ClickPulse>,
    viewport: Viewport,
    interactive: bool,
    field_events: Vec<FieldEvent>,
}

impl Scene {
    pub fn new(config: SceneConfig, viewport: Viewport, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let camera = Camera::from_config(&config.camera, viewport.aspect());
        let rig = CameraRig::new(&config.camera);
        let field = SpriteField::new(config.physics.clone(), config.catalog.len(), rng);
        log::info!(
            "[scene] {} images, camera z={:.1}, {:?}",
            config.catalog.len(),
            config.camera.distance,
            config.camera.mode
        );
        Ok(Self {
            camera,
            rig,
            lights: LightRig::standard(config.hemisphere),
            field,
            pointer: PointerState::default(),
            hover: HoverState::default(),
            pulse: None,
            viewport,
            interactive: config.interactive,
            field_events: Vec::new(),
            config,
        })
    }

    pub fn catalog(&self) -> &ImageCatalog {
        &self.config.catalog
    }

    /// Register a decoded photo and return the sprite slot it landed in,
    /// or `None` when that catalog entry already has a sprite.
    pub fn on_image_loaded(
        &mut self,
        image_index: usize,
        width: u32,
        height: u32,
        events: &mut Vec<SceneEvent>,
    ) -> Option<usize> {
        let aspect = width as f32 / height.max(1) as f32;
        let slot = self.field.spawn(image_index, aspect, &mut self.field_events);
        events.extend(self.field_events.drain(..).map(SceneEvent::Field));
        slot
    }

    pub fn on_image_failed(&mut self, image_index: usize) {
        self.field.register_failure(image_index);
    }

    pub fn on_pointer_move(&mut self, ndc: Vec2) {
        self.pointer.on_move(ndc);
    }

    /// Pointer position in logical pixels, origin top-left.
    pub fn on_pointer_move_px(&mut self, x: f32, y: f32) {
        self.pointer.on_move(self.viewport.to_ndc(x, y));
    }

    /// Start the click pulse on the sprite under the pointer, if any.
    pub fn on_click(&mut self) -> Option<usize> {
        if !self.interactive || !self.pointer.has_moved() {
            return None;
        }
        let ray = self.camera.ray_through(self.pointer.ndc());
        let hit = pick_nearest(&ray, self.field.sprites())?;
        let image_index = self.field.sprites()[hit.sprite].image_index;
        log::info!("[scene] click on sprite {} (image {})", hit.sprite, image_index);
        self.pulse = Some(ClickPulse::new(hit.sprite, image_index));
        Some(hit.sprite)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
    }

    pub fn set_interactive(&mut self, enabled: bool) {
        if !enabled {
            self.hover.clear(self.field.sprites_mut());
            self.pulse = None;
        }
        self.interactive = enabled;
    }

    pub fn tick(&mut self, dt: Duration, events: &mut Vec<SceneEvent>) {
        let dt_sec = dt.as_secs_f32();

        self.rig.update(&mut self.camera, &self.pointer, dt_sec);
        self.pointer.decay(dt_sec);

        self.field.tick(dt, &mut self.field_events);
        events.extend(self.field_events.drain(..).map(SceneEvent::Field));

        if self.interactive && self.pointer.has_moved() {
            let ray = self.camera.ray_through(self.pointer.ndc());
            let hit = pick_nearest(&ray, self.field.sprites()).map(|h| h.sprite);
            if self.hover.update(hit, self.field.sprites_mut()) {
                events.push(SceneEvent::HoverChanged { sprite: hit });
            }
        }

        if let Some(pulse) = self.pulse.as_mut() {
            if pulse.advance(dt_sec) {
                if let Some(image_index) = self.config.catalog.clamp_index(pulse.image_index) {
                    events.push(SceneEvent::OpenImage { image_index });
                }
                self.pulse = None;
            }
        }

        self.apply_scales();
    }

    fn apply_scales(&mut self) {
        let hovered = self.hover.current();
        let pulse = self.pulse;
        for (i, s) in self.field.sprites_mut().iter_mut().enumerate() {
            let mut scale = s.base_scale;
            if hovered == Some(i) {
                scale *= HOVER_SCALE;
            }
            if let Some(p) = pulse.filter(|p| p.sprite == i) {
                scale *= p.scale_factor();
            }
            s.transform.scale = scale;
        }
    }

    /// Sprite slots sorted far to near from the current eye.
    pub fn draw_order(&self, out: &mut Vec<usize>) {
        let view = self.camera.view_matrix();
        out.clear();
        out.extend(0..self.field.len());
        let depth = |i: usize| view.transform_point3(self.field.sprites()[i].position()).z;
        out.sort_by(|&a, &b| depth(a).total_cmp(&depth(b)));
    }

    /// Release every sprite. The host drops its GPU resources alongside.
    pub fn teardown(&mut self) {
        self.hover.clear(self.field.sprites_mut());
        self.pulse = None;
        self.field.clear();
        log::info!("[scene] torn down");
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn field(&self) -> &SpriteField {
        &self.field
    }

    pub fn sprites(&self) -> &[Sprite] {
        self.field.sprites()
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hover.current()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn loaded(&self) -> usize {
        self.field.loaded()
    }

    pub fn total_images(&self) -> usize {
        self.field.total()
    }

    pub fn progress_percent(&self) -> u32 {
        self.field.progress_percent()
    }

    pub fn loading_complete(&self) -> bool {
        self.field.loading_complete()
    }

    pub fn animation_complete(&self) -> bool {
        self.field.animation_complete()
    }
}
