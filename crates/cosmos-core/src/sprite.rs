//! The floating image sprite record.

use crate::config::PhysicsConfig;
use crate::constants::{
    HOVER_EMISSIVE_BOOST, HOVER_ROUGHNESS_BOOST, MAX_PLANE_WIDTH, TARGET_MARGIN,
};
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use rand::Rng;
use std::f32::consts::PI;

/// Lifecycle stage, ordered: a sprite only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Waiting,
    Burst,
    Drift,
}

/// Phase-tagged motion state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Parked at the origin until every texture has loaded.
    Waiting,
    /// Flying out toward the target; velocity is per reference frame.
    Burst { velocity: Vec3 },
    /// Wandering slowly; movement is per reference frame.
    Drift { movement: Vec3 },
}

impl Motion {
    pub fn phase(&self) -> Phase {
        match self {
            Motion::Waiting => Phase::Waiting,
            Motion::Burst { .. } => Phase::Burst,
            Motion::Drift { .. } => Phase::Drift,
        }
    }
}

/// Axis-aligned box: |x| <= x, |y| <= y, min_z <= z <= z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub min_z: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, z: f32, min_z: f32) -> Self {
        Self { x, y, z, min_z }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x.abs() <= self.x && p.y.abs() <= self.y && p.z >= self.min_z && p.z <= self.z
    }

    /// Clamp `p` into the box shrunk by `margin` on every side.
    pub fn clamp_inside(&self, p: Vec3, margin: f32) -> Vec3 {
        let mx = (self.x - margin).max(0.0);
        let my = (self.y - margin).max(0.0);
        let (lo, hi) = if self.z - self.min_z > 2.0 * margin {
            (self.min_z + margin, self.z - margin)
        } else {
            let mid = 0.5 * (self.min_z + self.z);
            (mid, mid)
        };
        Vec3::new(p.x.clamp(-mx, mx), p.y.clamp(-my, my), p.z.clamp(lo, hi))
    }
}

/// Surface parameters for the lit, textured plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub opacity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
}

impl Material {
    /// The hovered variant: brighter and more diffuse.
    pub fn highlighted(&self) -> Self {
        Self {
            roughness: (self.roughness + HOVER_ROUGHNESS_BOOST).min(1.0),
            emissive_intensity: self.emissive_intensity + HOVER_EMISSIVE_BOOST,
            ..*self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialPreset {
    Glossy,
    Standard,
}

impl MaterialPreset {
    pub fn material(self) -> Material {
        match self {
            MaterialPreset::Glossy => Material {
                opacity: 0.95,
                roughness: 0.15,
                metalness: 0.12,
                emissive: rgb(0x080808),
                emissive_intensity: 0.2,
            },
            MaterialPreset::Standard => Material {
                opacity: 0.9,
                roughness: 0.45,
                metalness: 0.05,
                emissive: rgb(0x050505),
                emissive_intensity: 0.1,
            },
        }
    }
}

/// Convert a packed `0xRRGGBB` colour into linear-ish float components.
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Plane dimensions derived from the photo's aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneSize {
    pub width: f32,
    pub height: f32,
}

impl PlaneSize {
    pub fn from_aspect(aspect: f32) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        let width = aspect.min(MAX_PLANE_WIDTH);
        Self {
            width,
            height: width / aspect,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: f32,
}

impl Transform {
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation_quat(),
            self.position,
        )
    }
}

/// Sinusoidal bob applied on top of the drift movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatingEffect {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
}

impl FloatingEffect {
    /// (y, z) displacement at `time_sec`; Z lags Y by a quarter period.
    pub fn offset(&self, time_sec: f32) -> Vec2 {
        let a = self.frequency * time_sec + self.phase;
        Vec2::new(self.amplitude * a.sin(), 0.5 * self.amplitude * a.cos())
    }
}

/// One photo plane: render data plus its animation state.
#[derive(Clone, Debug)]
pub struct Sprite {
    /// Catalog index of the photo this plane shows.
    pub image_index: usize,
    pub size: PlaneSize,
    pub preset: MaterialPreset,
    pub material: Material,
    pub base_material: Material,
    pub transform: Transform,
    pub base_scale: f32,
    pub motion: Motion,
    pub initial_velocity: Vec3,
    pub rotation_speed: Vec3,
    pub bounds: Bounds,
    pub floating: Option<FloatingEffect>,
    /// Floating displacement applied so far (y, z).
    pub(crate) float_offset: Vec2,
    target: Vec3,
}

/// Where a freshly spawned sprite starts its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnPhase {
    Waiting,
    Burst,
}

impl Sprite {
    pub fn spawn<R: Rng + ?Sized>(
        image_index: usize,
        aspect: f32,
        config: &PhysicsConfig,
        clusters: &[Vec3],
        start: SpawnPhase,
        rng: &mut R,
    ) -> Self {
        let preset = if rng.gen::<f32>() < config.glossy_probability {
            MaterialPreset::Glossy
        } else {
            MaterialPreset::Standard
        };
        let material = preset.material();

        let (lo, hi) = config.scale_range;
        let scale = if hi > lo { rng.gen_range(lo..hi) } else { lo };

        let rotation = Vec3::new(rng.gen::<f32>() * PI, rng.gen::<f32>() * PI, 0.0);

        let target = Self::pick_target(config, clusters, rng);
        let initial_velocity = target * config.velocity_factor;
        let motion = match start {
            SpawnPhase::Waiting => Motion::Waiting,
            SpawnPhase::Burst => Motion::Burst {
                velocity: initial_velocity,
            },
        };

        let floating = config.floating.map(|f| FloatingEffect {
            amplitude: sample(rng, f.amplitude),
            frequency: sample(rng, f.frequency),
            phase: rng.gen::<f32>() * 2.0 * PI,
        });

        Self {
            image_index,
            size: PlaneSize::from_aspect(aspect),
            preset,
            material,
            base_material: material,
            transform: Transform {
                position: Vec3::ZERO,
                rotation,
                scale,
            },
            base_scale: scale,
            motion,
            initial_velocity,
            rotation_speed: centered(rng, config.rotation_speed),
            bounds: config.bounds,
            floating,
            float_offset: Vec2::ZERO,
            target,
        }
    }

    fn pick_target<R: Rng + ?Sized>(
        config: &PhysicsConfig,
        clusters: &[Vec3],
        rng: &mut R,
    ) -> Vec3 {
        let raw = if !clusters.is_empty() && rng.gen::<f32>() < config.cluster_probability {
            let center = clusters[rng.gen_range(0..clusters.len())];
            center + centered(rng, Vec3::splat(2.0 * config.cluster_spread))
        } else {
            centered(rng, config.target_extent)
        };
        config.bounds.clamp_inside(raw, TARGET_MARGIN)
    }

    /// Resting point the burst flies toward. Fixed at creation.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn phase(&self) -> Phase {
        self.motion.phase()
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Waiting -> Burst using the velocity computed at spawn.
    pub(crate) fn release(&mut self) -> bool {
        if let Motion::Waiting = self.motion {
            self.motion = Motion::Burst {
                velocity: self.initial_velocity,
            };
            true
        } else {
            false
        }
    }
}

/// Random vector with each component in `(-w/2, w/2)`.
pub(crate) fn centered<R: Rng + ?Sized>(rng: &mut R, width: Vec3) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * width.x,
        (rng.gen::<f32>() - 0.5) * width.y,
        (rng.gen::<f32>() - 0.5) * width.z,
    )
}

fn sample<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn plane_size_caps_width() {
        let wide = PlaneSize::from_aspect(3.0);
        assert_eq!(wide.width, 1.5);
        assert!((wide.height - 0.5).abs() < 1e-6);

        let portrait = PlaneSize::from_aspect(2.0 / 3.0);
        assert!((portrait.width - 2.0 / 3.0).abs() < 1e-6);
        assert!((portrait.height - 1.0).abs() < 1e-6);

        assert_eq!(PlaneSize::from_aspect(f32::NAN), PlaneSize::from_aspect(1.0));
    }

    #[test]
    fn spawned_sprites_respect_config_ranges() {
        let cfg = PhysicsConfig::cinematic();
        let clusters = [Vec3::new(2.0, 1.0, -1.0), Vec3::new(-3.0, -1.0, -2.0)];
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..200 {
            let s = Sprite::spawn(i, 1.5, &cfg, &clusters, SpawnPhase::Waiting, &mut rng);
            assert_eq!(s.phase(), Phase::Waiting);
            assert_eq!(s.position(), Vec3::ZERO);
            assert!(s.bounds.contains(s.target()), "target {:?}", s.target());
            assert!(s.base_scale >= 0.2 && s.base_scale <= 0.8);
            assert!(s.floating.is_some());
            assert_eq!(s.initial_velocity, s.target() * cfg.velocity_factor);
        }
    }

    #[test]
    fn release_only_moves_waiting_sprites() {
        let cfg = PhysicsConfig::classic();
        let mut rng = StdRng::seed_from_u64(1);
        let mut s = Sprite::spawn(0, 1.0, &cfg, &[], SpawnPhase::Waiting, &mut rng);
        assert!(s.release());
        assert_eq!(s.phase(), Phase::Burst);
        assert!(!s.release());
    }

    #[test]
    fn highlight_raises_emissive_and_roughness() {
        let base = MaterialPreset::Glossy.material();
        let hot = base.highlighted();
        assert!(hot.emissive_intensity > base.emissive_intensity);
        assert!(hot.roughness > base.roughness);
        assert_eq!(hot.opacity, base.opacity);
    }
}
