//! Ray casts against sprite planes, hover highlighting and the click pulse.

use crate::constants::{PULSE_DOWN_SEC, PULSE_SCALE, PULSE_UP_SEC};
use crate::sprite::Sprite;
use glam::Vec3;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub sprite: usize,
    pub distance: f32,
}

/// Distance along `ray` to the sprite's plane, if the ray crosses it
/// inside the photo rectangle. Both faces count.
pub fn intersect_sprite(ray: &Ray, sprite: &Sprite) -> Option<f32> {
    let model = sprite.transform.matrix();
    if model.determinant().abs() < f32::EPSILON {
        return None;
    }
    let inv = model.inverse();
    let o = inv.transform_point3(ray.origin);
    let d = inv.transform_vector3(ray.direction);
    // Relative, so float noise on an edge-on plane still counts as parallel.
    if d.z.abs() <= 1e-5 * d.length() {
        return None;
    }
    // Affine maps keep the ray parameter, so `t` is the world distance.
    let t = -o.z / d.z;
    if t < 0.0 {
        return None;
    }
    let p = o + d * t;
    let half_w = 0.5 * sprite.size.width;
    let half_h = 0.5 * sprite.size.height;
    (p.x.abs() <= half_w && p.y.abs() <= half_h).then_some(t)
}

/// Every sprite the ray crosses, nearest first.
pub fn intersect_all(ray: &Ray, sprites: &[Sprite]) -> SmallVec<[Hit; 8]> {
    let mut hits: SmallVec<[Hit; 8]> = sprites
        .iter()
        .enumerate()
        .filter_map(|(i, s)| intersect_sprite(ray, s).map(|distance| Hit { sprite: i, distance }))
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

pub fn pick_nearest(ray: &Ray, sprites: &[Sprite]) -> Option<Hit> {
    intersect_all(ray, sprites).first().copied()
}

/// Tracks the single highlighted sprite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverState {
    current: Option<usize>,
}

impl HoverState {
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Move the highlight to `hit`, restoring whatever was lit before.
    /// Returns `true` when the hovered sprite changed.
    pub fn update(&mut self, hit: Option<usize>, sprites: &mut [Sprite]) -> bool {
        if hit == self.current {
            return false;
        }
        if let Some(s) = self.current.and_then(|i| sprites.get_mut(i)) {
            s.material = s.base_material;
        }
        if let Some(s) = hit.and_then(|i| sprites.get_mut(i)) {
            s.material = s.base_material.highlighted();
        }
        self.current = hit.filter(|&i| i < sprites.len());
        true
    }

    pub fn clear(&mut self, sprites: &mut [Sprite]) {
        self.update(None, sprites);
    }
}

/// Two-stage grow/shrink played on a clicked sprite before the modal opens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickPulse {
    pub sprite: usize,
    pub image_index: usize,
    elapsed: f32,
}

impl ClickPulse {
    pub fn new(sprite: usize, image_index: usize) -> Self {
        Self {
            sprite,
            image_index,
            elapsed: 0.0,
        }
    }

    /// Returns `true` once both stages have played.
    pub fn advance(&mut self, dt_sec: f32) -> bool {
        self.elapsed += dt_sec.max(0.0);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= PULSE_UP_SEC + PULSE_DOWN_SEC
    }

    pub fn scale_factor(&self) -> f32 {
        let grow = PULSE_SCALE - 1.0;
        if self.elapsed < PULSE_UP_SEC {
            1.0 + grow * (self.elapsed / PULSE_UP_SEC)
        } else if self.elapsed < PULSE_UP_SEC + PULSE_DOWN_SEC {
            PULSE_SCALE - grow * ((self.elapsed - PULSE_UP_SEC) / PULSE_DOWN_SEC)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::sprite::SpawnPhase;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn facing_sprite(at: Vec3, rng: &mut StdRng) -> Sprite {
        let mut s = Sprite::spawn(0, 1.0, &PhysicsConfig::classic(), &[], SpawnPhase::Burst, rng);
        s.transform.position = at;
        s.transform.rotation = Vec3::ZERO;
        s.transform.scale = 1.0;
        s
    }

    #[test]
    fn ray_hits_facing_plane_at_distance() {
        let mut rng = StdRng::seed_from_u64(0);
        let s = facing_sprite(Vec3::new(0.0, 0.0, -2.0), &mut rng);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = intersect_sprite(&ray, &s).unwrap();
        assert!((t - 7.0).abs() < 1e-4);
    }

    #[test]
    fn ray_misses_outside_rectangle_and_behind_origin() {
        let mut rng = StdRng::seed_from_u64(0);
        let s = facing_sprite(Vec3::new(0.0, 0.0, -2.0), &mut rng);
        let beside = Ray::new(Vec3::new(0.6, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(intersect_sprite(&beside, &s), None);
        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert_eq!(intersect_sprite(&away, &s), None);
    }

    #[test]
    fn edge_on_plane_is_not_hit() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = facing_sprite(Vec3::ZERO, &mut rng);
        s.transform.rotation = Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(intersect_sprite(&ray, &s), None);
    }

    #[test]
    fn nearly_edge_on_scaled_plane_is_not_hit() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = facing_sprite(Vec3::new(0.0, 0.0, -1.0), &mut rng);
        s.transform.scale = 0.3;
        s.transform.rotation = Vec3::new(0.0, -std::f32::consts::FRAC_PI_2, 0.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(intersect_sprite(&ray, &s), None);
        assert!(intersect_all(&ray, std::slice::from_ref(&s)).is_empty());
    }

    #[test]
    fn nearest_of_stacked_planes_wins() {
        let mut rng = StdRng::seed_from_u64(0);
        let sprites = vec![
            facing_sprite(Vec3::new(0.0, 0.0, -3.0), &mut rng),
            facing_sprite(Vec3::new(0.0, 0.0, 1.0), &mut rng),
            facing_sprite(Vec3::new(0.0, 0.0, -1.0), &mut rng),
        ];
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hits = intersect_all(&ray, &sprites);
        let order: Vec<usize> = hits.iter().map(|h| h.sprite).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(pick_nearest(&ray, &sprites).map(|h| h.sprite), Some(1));
    }

    #[test]
    fn hover_moves_and_restores_material() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut sprites = vec![
            facing_sprite(Vec3::ZERO, &mut rng),
            facing_sprite(Vec3::ZERO, &mut rng),
        ];
        let mut hover = HoverState::default();
        assert!(hover.update(Some(0), &mut sprites));
        assert_ne!(sprites[0].material, sprites[0].base_material);
        assert!(!hover.update(Some(0), &mut sprites));
        assert!(hover.update(Some(1), &mut sprites));
        assert_eq!(sprites[0].material, sprites[0].base_material);
        assert_ne!(sprites[1].material, sprites[1].base_material);
        hover.clear(&mut sprites);
        assert_eq!(hover.current(), None);
        assert_eq!(sprites[1].material, sprites[1].base_material);
    }

    #[test]
    fn pulse_grows_then_shrinks() {
        let mut p = ClickPulse::new(0, 4);
        assert_eq!(p.scale_factor(), 1.0);
        assert!(!p.advance(PULSE_UP_SEC));
        assert!((p.scale_factor() - PULSE_SCALE).abs() < 1e-5);
        assert!(p.advance(PULSE_DOWN_SEC));
        assert_eq!(p.scale_factor(), 1.0);
    }
}
