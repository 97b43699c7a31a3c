//! Registry of loaded sprites plus the load-progress bookkeeping.

use crate::config::PhysicsConfig;
use crate::physics::{step_sprite, Step};
use crate::sprite::{centered, Phase, SpawnPhase, Sprite};
use glam::Vec3;
use rand::rngs::StdRng;
use std::time::Duration;

/// Counts resolved texture loads toward a fixed total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTracker {
    loaded: usize,
    failed: usize,
    total: usize,
    complete: bool,
}

impl LoadTracker {
    pub fn new(total: usize) -> Self {
        Self {
            loaded: 0,
            failed: 0,
            total,
            complete: false,
        }
    }

    /// Record one successful load. Returns `true` on the call that
    /// completes loading, and never again.
    pub fn record_loaded(&mut self) -> bool {
        if self.loaded >= self.total {
            return false;
        }
        self.loaded += 1;
        if self.loaded == self.total && !self.complete {
            self.complete = true;
            return true;
        }
        false
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whole percent shown by the loading overlay.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.loaded as f64 / self.total as f64) * 100.0).round() as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldEvent {
    LoadingComplete,
    /// Waiting sprites were switched to burst this frame.
    BurstReleased,
    SpriteSettled { sprite: usize },
    AnimationComplete,
}

pub struct SpriteField {
    config: PhysicsConfig,
    sprites: Vec<Sprite>,
    clusters: Vec<Vec3>,
    tracker: LoadTracker,
    /// Catalog indices that already have a sprite.
    seen: Vec<bool>,
    release_pending: bool,
    animation_complete: bool,
    elapsed_sec: f32,
    rng: StdRng,
}

impl SpriteField {
    pub fn new(config: PhysicsConfig, total_images: usize, mut rng: StdRng) -> Self {
        let clusters = (0..config.cluster_count)
            .map(|_| {
                config
                    .bounds
                    .clamp_inside(centered(&mut rng, config.target_extent), 1.0)
            })
            .collect();
        Self {
            sprites: Vec::with_capacity(total_images),
            clusters,
            tracker: LoadTracker::new(total_images),
            seen: vec![false; total_images],
            release_pending: false,
            animation_complete: false,
            elapsed_sec: 0.0,
            config,
            rng,
        }
    }

    /// Create the sprite for a decoded image and return its slot.
    ///
    /// Slots are dense and in arrival order, which need not match
    /// `image_index` order. A repeated or out-of-range `image_index` is
    /// ignored and returns `None`, so there is never more than one sprite
    /// per catalog entry.
    pub fn spawn(
        &mut self,
        image_index: usize,
        aspect: f32,
        events: &mut Vec<FieldEvent>,
    ) -> Option<usize> {
        match self.seen.get_mut(image_index) {
            Some(seen) if !*seen => *seen = true,
            _ => {
                log::warn!("[field] ignoring repeated load of image {}", image_index);
                return None;
            }
        }
        let start = if self.config.wait_for_all && !self.tracker.is_complete() {
            SpawnPhase::Waiting
        } else {
            SpawnPhase::Burst
        };
        let sprite = Sprite::spawn(
            image_index,
            aspect,
            &self.config,
            &self.clusters,
            start,
            &mut self.rng,
        );
        self.sprites.push(sprite);
        let slot = self.sprites.len() - 1;

        if self.tracker.record_loaded() {
            log::info!(
                "[field] all {} images loaded ({} failed)",
                self.tracker.total(),
                self.tracker.failed()
            );
            events.push(FieldEvent::LoadingComplete);
            if self.config.wait_for_all {
                self.release_pending = true;
            }
        }
        Some(slot)
    }

    pub fn register_failure(&mut self, image_index: usize) {
        self.tracker.record_failed();
        log::warn!(
            "[field] image {} failed to load; progress stays at {}%",
            image_index,
            self.tracker.percent()
        );
    }

    pub fn tick(&mut self, dt: Duration, events: &mut Vec<FieldEvent>) {
        let dt_sec = dt.as_secs_f32();
        self.elapsed_sec += dt_sec;
        let step = Step::new(&self.config, dt_sec, self.elapsed_sec);

        // Released sprites hold still for this frame and start moving on the next.
        let releasing = std::mem::take(&mut self.release_pending);
        if releasing {
            for s in &mut self.sprites {
                s.release();
            }
            log::info!("[field] burst released for {} sprites", self.sprites.len());
            events.push(FieldEvent::BurstReleased);
        }

        let mut all_drifting = !self.sprites.is_empty();
        for (i, sprite) in self.sprites.iter_mut().enumerate() {
            if releasing && sprite.phase() == Phase::Burst {
                sprite.transform.rotation += sprite.rotation_speed * step.frames;
                all_drifting = false;
                continue;
            }
            if let Some(Phase::Drift) = step_sprite(sprite, &self.config, step, &mut self.rng) {
                log::debug!("[field] sprite {} settled", i);
                events.push(FieldEvent::SpriteSettled { sprite: i });
            }
            if sprite.phase() != Phase::Drift {
                all_drifting = false;
            }
        }

        if all_drifting && !self.animation_complete {
            self.animation_complete = true;
            log::info!("[field] all {} sprites positioned", self.sprites.len());
            events.push(FieldEvent::AnimationComplete);
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn tracker(&self) -> &LoadTracker {
        &self.tracker
    }

    pub fn loaded(&self) -> usize {
        self.tracker.loaded()
    }

    pub fn total(&self) -> usize {
        self.tracker.total()
    }

    pub fn progress_percent(&self) -> u32 {
        self.tracker.percent()
    }

    pub fn loading_complete(&self) -> bool {
        self.tracker.is_complete()
    }

    pub fn animation_complete(&self) -> bool {
        self.animation_complete
    }

    pub fn elapsed_sec(&self) -> f32 {
        self.elapsed_sec
    }

    /// Drop every sprite. Load counters and completion flags are kept.
    pub fn clear(&mut self) {
        self.sprites.clear();
    }
}
