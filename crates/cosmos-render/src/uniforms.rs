//! GPU-side layouts shared with `sprite.wgsl`.
//!
//! Every field is a 16-byte vector so the Rust and WGSL uniform layouts
//! match without padding rules.

use cosmos_core::{Camera, LightRig, Sprite};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    /// Colors are premultiplied by intensity.
    pub ambient: [f32; 4],
    /// Unit vector toward the key light.
    pub key_dir: [f32; 4],
    pub key_color: [f32; 4],
    /// xyz position, w range.
    pub point_pos: [[f32; 4]; 2],
    pub point_color: [[f32; 4]; 2],
    /// Zero when the rig has no hemisphere fill.
    pub sky: [f32; 4],
    pub ground: [f32; 4],
    /// xyz position, w range.
    pub spot_pos: [f32; 4],
    pub spot_dir: [f32; 4],
    pub spot_color: [f32; 4],
    /// x inner cone cosine, y outer cone cosine, z alpha cutoff.
    pub spot_cone: [f32; 4],
}

impl Globals {
    pub fn new(camera: &Camera, lights: &LightRig) -> Self {
        let scaled = |c: [f32; 3], i: f32| [c[0] * i, c[1] * i, c[2] * i, 0.0];
        let key_dir = lights.directional.position.normalize_or_zero();
        let (sky, ground) = match lights.hemisphere {
            Some(h) => (scaled(h.sky, h.intensity), scaled(h.ground, h.intensity)),
            None => ([0.0; 4], [0.0; 4]),
        };
        let spot = &lights.spot;
        let (inner, outer) = spot.cone_cosines();
        let spot_dir = (spot.target - spot.position).normalize_or_zero();
        let [p0, p1] = &lights.points;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
            ambient: scaled(lights.ambient.color, lights.ambient.intensity),
            key_dir: key_dir.extend(0.0).to_array(),
            key_color: scaled(lights.directional.color, lights.directional.intensity),
            point_pos: [
                p0.position.extend(p0.range).to_array(),
                p1.position.extend(p1.range).to_array(),
            ],
            point_color: [
                scaled(p0.color, p0.intensity),
                scaled(p1.color, p1.intensity),
            ],
            sky,
            ground,
            spot_pos: spot.position.extend(spot.range).to_array(),
            spot_dir: spot_dir.extend(0.0).to_array(),
            spot_color: scaled(spot.color, spot.intensity),
            spot_cone: [inner, outer, crate::ALPHA_CUTOFF, 0.0],
        }
    }
}

/// Per-sprite vertex data, stepped once per instance.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteInstance {
    pub model: [[f32; 4]; 4],
    /// Plane width, height, opacity.
    pub size: [f32; 4],
    /// Roughness, metalness, emissive intensity.
    pub surface: [f32; 4],
    pub emissive: [f32; 4],
}

impl SpriteInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        0 => Float32x4,
        1 => Float32x4,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4
    ];

    pub fn from_sprite(sprite: &Sprite) -> Self {
        let m = &sprite.material;
        Self {
            model: sprite.transform.matrix().to_cols_array_2d(),
            size: [sprite.size.width, sprite.size.height, m.opacity, 0.0],
            surface: [m.roughness, m.metalness, m.emissive_intensity, 0.0],
            emissive: [m.emissive[0], m.emissive[1], m.emissive[2], 0.0],
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmos_core::{CameraConfig, MaterialPreset, PhysicsConfig, SpawnPhase};
    use glam::{Mat4, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn layouts_are_vec4_aligned() {
        assert_eq!(std::mem::size_of::<Globals>() % 16, 0);
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 7 * 16);
        assert_eq!(SpriteInstance::layout().array_stride, 112);
    }

    #[test]
    fn globals_zero_the_missing_hemisphere() {
        let cam = Camera::from_config(&CameraConfig::default(), 1.0);
        let g = Globals::new(&cam, &LightRig::standard(false));
        assert_eq!(g.sky, [0.0; 4]);
        assert_eq!(g.ground, [0.0; 4]);
        let g = Globals::new(&cam, &LightRig::standard(true));
        assert!(g.sky[0] > 0.0);
        assert!(g.spot_cone[0] > g.spot_cone[1]);
        assert_eq!(g.eye[2], cam.eye.z);
    }

    #[test]
    fn instance_carries_transform_and_material() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut s = Sprite::spawn(0, 1.5, &PhysicsConfig::classic(), &[], SpawnPhase::Burst, &mut rng);
        s.transform.position = Vec3::new(1.0, 2.0, -3.0);
        s.transform.rotation = Vec3::ZERO;
        s.transform.scale = 0.5;
        let inst = SpriteInstance::from_sprite(&s);
        let model = Mat4::from_cols_array_2d(&inst.model);
        assert_eq!(model.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, -3.0));
        assert_eq!(model.transform_vector3(Vec3::X), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(inst.size[0], 1.5);
        assert_eq!(inst.size[2], MaterialPreset::Glossy.material().opacity);
    }
}
