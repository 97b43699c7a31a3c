use crate::sprite::rgb;
use glam::Vec3;
use std::f32::consts::FRAC_PI_4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Light position; it shines toward the origin.
    pub position: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
    /// Distance at which the contribution reaches zero.
    pub range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HemisphereLight {
    pub sky: [f32; 3],
    pub ground: [f32; 3],
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    /// Half-angle of the cone in radians.
    pub angle: f32,
    /// Fraction of the cone that fades out.
    pub penumbra: f32,
    pub range: f32,
}

impl SpotLight {
    /// Cosines of the inner (full strength) and outer cone edges.
    pub fn cone_cosines(&self) -> (f32, f32) {
        let outer = self.angle;
        let inner = self.angle * (1.0 - self.penumbra.clamp(0.0, 1.0));
        (inner.cos(), outer.cos())
    }
}

/// Fixed lighting for the photo field, built once per scene.
#[derive(Clone, Debug, PartialEq)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub points: [PointLight; 2],
    pub hemisphere: Option<HemisphereLight>,
    pub spot: SpotLight,
}

impl LightRig {
    pub fn standard(with_hemisphere: bool) -> Self {
        Self {
            // cool fill
            ambient: AmbientLight {
                color: rgb(0xe8f1ff),
                intensity: 0.3,
            },
            // warm key
            directional: DirectionalLight {
                color: rgb(0xfff0e8),
                intensity: 0.7,
                position: Vec3::new(5.0, 5.0, 7.0),
            },
            points: [
                PointLight {
                    color: rgb(0xf8e8ff),
                    intensity: 0.6,
                    position: Vec3::new(-5.0, 3.0, 2.0),
                    range: 10.0,
                },
                PointLight {
                    color: rgb(0xffffff),
                    intensity: 0.4,
                    position: Vec3::new(3.0, -2.0, 4.0),
                    range: 8.0,
                },
            ],
            hemisphere: with_hemisphere.then(|| HemisphereLight {
                sky: rgb(0xddeeff),
                ground: rgb(0x202030),
                intensity: 0.25,
            }),
            spot: SpotLight {
                color: rgb(0xffffff),
                intensity: 0.8,
                position: Vec3::new(0.0, 5.0, 5.0),
                target: Vec3::ZERO,
                angle: FRAC_PI_4,
                penumbra: 0.1,
                range: 200.0,
            },
        }
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::standard(true)
    }
}
