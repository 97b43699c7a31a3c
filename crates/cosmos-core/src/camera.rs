//! Perspective camera, viewport bookkeeping and the pointer-driven rig.

use crate::config::{CameraConfig, CameraMode};
use crate::error::{CosmosError, Result};
use crate::picking::Ray;
use crate::pointer::PointerState;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, config.distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: config.fov_degrees.to_radians(),
            znear: config.near,
            zfar: config.far,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray from the eye through a point in normalized device
    /// coordinates (x right, y up, both in -1..1).
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far = far.truncate() / far.w;
        Ray::new(self.eye, far - self.eye)
    }
}

/// Drawable area in CSS/logical pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Result<Self> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(width) && ok(height) && ok(pixel_ratio) {
            Ok(Self {
                width,
                height,
                pixel_ratio,
            })
        } else {
            Err(CosmosError::InvalidViewport {
                width,
                height,
                pixel_ratio,
            })
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Backing-store size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let w = (self.width * self.pixel_ratio).round() as u32;
        let h = (self.height * self.pixel_ratio).round() as u32;
        (w.max(1), h.max(1))
    }

    /// Logical pixel position (origin top-left) to clamped NDC.
    pub fn to_ndc(&self, px: f32, py: f32) -> Vec2 {
        Vec2::new(
            (px / self.width * 2.0 - 1.0).clamp(-1.0, 1.0),
            (1.0 - py / self.height * 2.0).clamp(-1.0, 1.0),
        )
    }
}

/// Moves the eye toward a pointer-derived target each frame.
#[derive(Clone, Debug)]
pub struct CameraRig {
    mode: CameraMode,
    distance: f32,
    velocity: Vec3,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            mode: config.mode,
            distance: config.distance,
            velocity: Vec3::ZERO,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Where the eye wants to be for the current pointer state.
    pub fn desired_eye(&self, pointer: &PointerState) -> Vec3 {
        let p = pointer.ndc();
        match self.mode {
            CameraMode::Fixed => Vec3::new(0.0, 0.0, self.distance),
            CameraMode::Eased { sway, .. } => {
                Vec3::new(p.x * sway.x, p.y * sway.y, self.distance)
            }
            CameraMode::Spring {
                sway,
                momentum,
                depth_variation,
                ..
            } => {
                let boost = pointer.velocity() * momentum;
                Vec3::new(
                    p.x * sway.x + boost.x,
                    p.y * sway.y + boost.y,
                    self.distance + p.length().min(1.0) * depth_variation,
                )
            }
        }
    }

    pub fn update(&mut self, camera: &mut Camera, pointer: &PointerState, dt_sec: f32) {
        let dt = dt_sec.clamp(0.0, crate::constants::MAX_FRAME_DT_SEC);
        let desired = self.desired_eye(pointer);
        match self.mode {
            CameraMode::Fixed => {
                camera.eye = desired;
                self.velocity = Vec3::ZERO;
            }
            CameraMode::Eased { rate_per_sec, .. } => {
                let alpha = 1.0 - (-rate_per_sec * dt).exp();
                camera.eye += (desired - camera.eye) * alpha;
            }
            CameraMode::Spring {
                stiffness, damping, ..
            } => {
                let accel = (desired - camera.eye) * stiffness - self.velocity * damping;
                self.velocity += accel * dt;
                camera.eye += self.velocity * dt;
            }
        }
        camera.target = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_rejects_zero_size() {
        assert!(Viewport::new(0.0, 100.0, 1.0).is_err());
        assert!(Viewport::new(100.0, 100.0, f32::NAN).is_err());
        assert!(Viewport::new(100.0, 50.0, 2.0).is_ok());
    }

    #[test]
    fn viewport_maps_corners_to_ndc() {
        let vp = Viewport::new(800.0, 600.0, 1.0).unwrap();
        assert_eq!(vp.to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(vp.to_ndc(400.0, 300.0), Vec2::ZERO);
        assert_eq!(vp.to_ndc(-50.0, 9000.0), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn physical_size_uses_pixel_ratio() {
        let vp = Viewport::new(640.0, 360.0, 1.5).unwrap();
        assert_eq!(vp.physical_size(), (960, 540));
    }

    #[test]
    fn center_ray_points_at_origin() {
        let cam = Camera::from_config(&CameraConfig::default(), 16.0 / 9.0);
        let ray = cam.ray_through(Vec2::ZERO);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert_eq!(ray.origin, cam.eye);
    }

    #[test]
    fn spring_rig_settles_on_target() {
        let cfg = crate::config::Preset::Cinematic.config().camera;
        let mut cam = Camera::from_config(&cfg, 1.0);
        let mut rig = CameraRig::new(&cfg);
        let mut pointer = PointerState::default();
        pointer.on_move(Vec2::new(0.5, -0.5));
        let desired = rig.desired_eye(&pointer);
        for _ in 0..600 {
            rig.update(&mut cam, &pointer, 1.0 / 60.0);
        }
        assert!((cam.eye - desired).length() < 1e-2, "eye {:?}", cam.eye);
    }

    #[test]
    fn eased_rig_moves_toward_pointer() {
        let cfg = crate::config::Preset::Gallery.config().camera;
        let mut cam = Camera::from_config(&cfg, 1.0);
        let mut rig = CameraRig::new(&cfg);
        let mut pointer = PointerState::default();
        pointer.on_move(Vec2::new(1.0, 0.0));
        rig.update(&mut cam, &pointer, 1.0 / 60.0);
        assert!(cam.eye.x > 0.0 && cam.eye.x < 0.8);
    }
}
