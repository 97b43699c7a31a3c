//! Tuning presets for the background.
//!
//! The page shipped in several revisions that differed only in their
//! constants. Each revision is a [`Preset`]; all of them feed the same
//! physics through a [`SceneConfig`].

use crate::assets::ImageCatalog;
use crate::constants::DEFAULT_IMAGE_COUNT;
use crate::error::{CosmosError, Result};
use crate::sprite::Bounds;
use glam::{Vec2, Vec3};
use std::fmt;
use std::str::FromStr;

/// Ranges for the optional sinusoidal float applied during drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatingConfig {
    /// World-space amplitude range of the Y displacement.
    pub amplitude: (f32, f32),
    /// Angular frequency range in radians per second.
    pub frequency: (f32, f32),
}

/// Every constant the burst/drift state machine depends on.
///
/// Random ranges written as a `Vec3` are full widths: a component is drawn
/// as `(r - 0.5) * width`.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub bounds: Bounds,
    /// Full widths of the box targets are drawn from, centered on the origin.
    pub target_extent: Vec3,
    /// Velocity kept after a wall bounce (sign flipped).
    pub elasticity: f32,
    /// Velocity kept after bouncing off the back wall (`bounds.min_z`).
    pub back_wall_bounce: f32,
    /// Velocity multiplier per reference frame during burst.
    pub damping: f32,
    /// Initial burst velocity as a fraction of the offset to the target.
    pub velocity_factor: f32,
    /// Pull toward the target per reference frame during burst.
    pub homing: f32,
    pub snap_distance: f32,
    pub snap_speed: f32,
    pub cluster_probability: f32,
    pub cluster_count: usize,
    pub cluster_spread: f32,
    pub rotation_speed: Vec3,
    pub drift_speed: Vec3,
    /// Magnitude of the random kick added on drift wall bounces.
    pub drift_jitter: f32,
    /// Extra forward speed given to sprites that hit the back wall in drift.
    pub back_wall_push: f32,
    pub scale_range: (f32, f32),
    pub glossy_probability: f32,
    pub floating: Option<FloatingConfig>,
    /// Scale integration by elapsed time instead of assuming one step per frame.
    pub frame_rate_independent: bool,
    /// Hold every sprite at the origin until all textures have loaded.
    pub wait_for_all: bool,
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<()> {
        let b = &self.bounds;
        if !(b.x > 0.0 && b.y > 0.0) {
            return Err(invalid(format!("bounds x/y must be positive, got {b:?}")));
        }
        if !(b.min_z < b.z) {
            return Err(invalid(format!("bounds min_z must be below z, got {b:?}")));
        }
        if !b.contains(Vec3::ZERO) {
            return Err(invalid("bounds must contain the origin".into()));
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(invalid(format!(
                "damping must be in (0, 1), got {}",
                self.damping
            )));
        }
        for (name, v) in [
            ("elasticity", self.elasticity),
            ("back_wall_bounce", self.back_wall_bounce),
            ("cluster_probability", self.cluster_probability),
            ("glossy_probability", self.glossy_probability),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(invalid(format!("{name} must be in [0, 1], got {v}")));
            }
        }
        if self.homing < 0.0 || self.homing > 0.05 {
            return Err(invalid(format!(
                "homing must be in [0, 0.05], got {}",
                self.homing
            )));
        }
        if self.snap_distance <= 0.0 || self.snap_speed <= 0.0 {
            return Err(invalid("snap thresholds must be positive".into()));
        }
        let (lo, hi) = self.scale_range;
        if !(lo > 0.0 && lo <= hi) {
            return Err(invalid(format!("bad scale range {lo}..{hi}")));
        }
        if self.cluster_probability > 0.0 && self.cluster_count == 0 {
            return Err(invalid("cluster_probability set without clusters".into()));
        }
        Ok(())
    }

    /// First revision: 35 glossy planes, fixed frame step, no waiting.
    pub fn classic() -> Self {
        Self {
            bounds: Bounds::new(4.0, 4.0, 4.0, -4.0),
            target_extent: Vec3::new(8.0, 8.0, 5.0),
            elasticity: 0.8,
            back_wall_bounce: 0.8,
            damping: 0.95,
            velocity_factor: 0.07,
            homing: 0.004,
            snap_distance: 0.5,
            snap_speed: 0.015,
            cluster_probability: 0.0,
            cluster_count: 0,
            cluster_spread: 0.0,
            rotation_speed: Vec3::new(0.005, 0.005, 0.003),
            drift_speed: Vec3::new(0.002, 0.002, 0.001),
            drift_jitter: 0.0005,
            back_wall_push: 0.0,
            scale_range: (0.2, 0.5),
            glossy_probability: 1.0,
            floating: None,
            frame_rate_independent: false,
            wait_for_all: false,
        }
    }

    /// Latest revision: clusters, floating, time-scaled steps, waiting phase.
    pub fn cinematic() -> Self {
        Self {
            bounds: Bounds::new(6.0, 4.0, 3.0, -6.0),
            target_extent: Vec3::new(10.0, 7.0, 7.0),
            elasticity: 0.65,
            back_wall_bounce: 0.9,
            damping: 0.96,
            velocity_factor: 0.08,
            homing: 0.004,
            snap_distance: 1.0,
            snap_speed: 0.02,
            cluster_probability: 0.4,
            cluster_count: 5,
            cluster_spread: 1.2,
            rotation_speed: Vec3::new(0.004, 0.006, 0.002),
            drift_speed: Vec3::new(0.003, 0.002, 0.0015),
            drift_jitter: 0.0008,
            back_wall_push: 0.001,
            scale_range: (0.2, 0.8),
            glossy_probability: 0.5,
            floating: Some(FloatingConfig {
                amplitude: (0.05, 0.15),
                frequency: (0.3, 0.8),
            }),
            frame_rate_independent: true,
            wait_for_all: true,
        }
    }

    /// Gallery revision: the first 35 images shown twice, no waiting.
    pub fn gallery() -> Self {
        Self {
            bounds: Bounds::new(5.0, 4.0, 4.0, -5.0),
            target_extent: Vec3::new(9.0, 7.0, 6.0),
            elasticity: 0.7,
            back_wall_bounce: 0.85,
            damping: 0.95,
            velocity_factor: 0.07,
            homing: 0.004,
            snap_distance: 1.0,
            snap_speed: 0.02,
            cluster_probability: 0.4,
            cluster_count: 4,
            cluster_spread: 1.0,
            rotation_speed: Vec3::new(0.005, 0.005, 0.003),
            drift_speed: Vec3::new(0.002, 0.002, 0.001),
            drift_jitter: 0.0005,
            back_wall_push: 0.0008,
            scale_range: (0.2, 0.6),
            glossy_probability: 0.5,
            floating: Some(FloatingConfig {
                amplitude: (0.03, 0.1),
                frequency: (0.2, 0.6),
            }),
            frame_rate_independent: true,
            wait_for_all: false,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::cinematic()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraMode {
    Fixed,
    /// Exponential smoothing of the eye toward a pointer-derived target.
    Eased { rate_per_sec: f32, sway: Vec2 },
    /// Damped spring toward a pointer-derived target.
    Spring {
        stiffness: f32,
        damping: f32,
        sway: Vec2,
        /// Gain on the last pointer move delta added to the target.
        momentum: f32,
        /// Extra distance at the edge of the screen.
        depth_variation: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Resting distance of the eye along +Z.
    pub distance: f32,
    pub mode: CameraMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: crate::constants::CAMERA_FOV_DEGREES,
            near: crate::constants::CAMERA_NEAR,
            far: crate::constants::CAMERA_FAR,
            distance: 6.0,
            mode: CameraMode::Fixed,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub catalog: ImageCatalog,
    /// Hover and click picking; the page chrome can switch this off.
    pub interactive: bool,
    /// Sky/ground fill light. The first page revision had none.
    pub hemisphere: bool,
}

impl SceneConfig {
    pub fn validate(&self) -> Result<()> {
        self.physics.validate()?;
        let c = &self.camera;
        if !(c.near > 0.0 && c.near < c.far) {
            return Err(invalid(format!("camera clip range {}..{}", c.near, c.far)));
        }
        if !(c.fov_degrees > 0.0 && c.fov_degrees < 180.0) {
            return Err(invalid(format!("camera fov {}", c.fov_degrees)));
        }
        if self.catalog.is_empty() {
            return Err(invalid("image catalog is empty".into()));
        }
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    Classic,
    #[default]
    Cinematic,
    Gallery,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Classic, Preset::Cinematic, Preset::Gallery];

    pub fn config(self) -> SceneConfig {
        match self {
            Preset::Classic => SceneConfig {
                physics: PhysicsConfig::classic(),
                camera: CameraConfig {
                    distance: 5.0,
                    ..CameraConfig::default()
                },
                catalog: ImageCatalog::sequential(DEFAULT_IMAGE_COUNT),
                interactive: false,
                hemisphere: false,
            },
            Preset::Cinematic => SceneConfig {
                physics: PhysicsConfig::cinematic(),
                camera: CameraConfig {
                    distance: 7.0,
                    mode: CameraMode::Spring {
                        stiffness: 18.0,
                        damping: 7.0,
                        sway: Vec2::new(1.2, 0.8),
                        momentum: 4.0,
                        depth_variation: 1.0,
                    },
                    ..CameraConfig::default()
                },
                catalog: ImageCatalog::sequential(DEFAULT_IMAGE_COUNT),
                interactive: true,
                hemisphere: true,
            },
            Preset::Gallery => SceneConfig {
                physics: PhysicsConfig::gallery(),
                camera: CameraConfig {
                    distance: 6.0,
                    mode: CameraMode::Eased {
                        rate_per_sec: 3.0,
                        sway: Vec2::new(0.8, 0.6),
                    },
                    ..CameraConfig::default()
                },
                catalog: ImageCatalog::duplicated(DEFAULT_IMAGE_COUNT),
                interactive: true,
                hemisphere: true,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Cinematic => "cinematic",
            Preset::Gallery => "gallery",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = CosmosError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CosmosError::UnknownPreset(s.to_string()))
    }
}

fn invalid(msg: String) -> CosmosError {
    CosmosError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_validates() {
        for p in Preset::ALL {
            p.config()
                .validate()
                .unwrap_or_else(|e| panic!("{p} failed: {e}"));
        }
    }

    #[test]
    fn preset_names_round_trip() {
        for p in Preset::ALL {
            assert_eq!(p.name().parse::<Preset>().unwrap(), p);
        }
        assert_eq!(" Gallery ".parse::<Preset>().unwrap(), Preset::Gallery);
        assert!(matches!(
            "vaporwave".parse::<Preset>(),
            Err(CosmosError::UnknownPreset(_))
        ));
    }

    #[test]
    fn rejects_damping_at_or_above_one() {
        let mut cfg = PhysicsConfig::classic();
        cfg.damping = 1.0;
        assert!(cfg.validate().is_err());
        cfg.damping = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_bounds_without_origin() {
        let mut cfg = PhysicsConfig::classic();
        cfg.bounds = Bounds::new(4.0, 4.0, 4.0, 1.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn only_classic_lacks_the_hemisphere_fill() {
        assert!(!Preset::Classic.config().hemisphere);
        assert!(Preset::Cinematic.config().hemisphere);
        assert!(Preset::Gallery.config().hemisphere);
    }

    #[test]
    fn gallery_shows_every_image_twice() {
        let cfg = Preset::Gallery.config();
        assert_eq!(cfg.catalog.len(), 2 * DEFAULT_IMAGE_COUNT);
    }
}
