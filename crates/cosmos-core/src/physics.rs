//! Per-frame integration of the burst/drift state machine.
//!
//! Velocities are expressed per reference frame (1/60 s). With
//! `frame_rate_independent` set, a step of `dt` seconds counts as
//! `dt * 60` reference frames; otherwise every call is one frame.

use crate::config::PhysicsConfig;
use crate::constants::{MAX_FRAME_DT_SEC, REFERENCE_FPS};
use crate::sprite::{centered, Bounds, Motion, Phase, Sprite};
use glam::Vec3;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// Reference frames covered by this step.
    pub frames: f32,
    /// Scene clock after this step, in seconds.
    pub time_sec: f32,
}

impl Step {
    pub fn new(config: &PhysicsConfig, dt_sec: f32, time_sec: f32) -> Self {
        let frames = if config.frame_rate_independent {
            dt_sec.clamp(0.0, MAX_FRAME_DT_SEC) * REFERENCE_FPS
        } else {
            1.0
        };
        Self { frames, time_sec }
    }
}

/// Advance one sprite. Returns the new phase when it changed.
pub fn step_sprite<R: Rng + ?Sized>(
    sprite: &mut Sprite,
    config: &PhysicsConfig,
    step: Step,
    rng: &mut R,
) -> Option<Phase> {
    let s = step.frames;
    sprite.transform.rotation += sprite.rotation_speed * s;

    match sprite.motion {
        Motion::Waiting => None,
        Motion::Burst { velocity } => step_burst(sprite, velocity, config, step, rng),
        Motion::Drift { movement } => {
            step_drift(sprite, movement, config, step, rng);
            None
        }
    }
}

fn step_burst<R: Rng + ?Sized>(
    sprite: &mut Sprite,
    mut velocity: Vec3,
    config: &PhysicsConfig,
    step: Step,
    rng: &mut R,
) -> Option<Phase> {
    let s = step.frames;
    let target = sprite.target();
    let mut pos = sprite.transform.position;

    velocity += (target - pos) * (config.homing * s);
    pos += velocity * s;
    bounce_burst(&mut pos, &mut velocity, &sprite.bounds, config);
    velocity *= config.damping.powf(s);

    let distance = (target - pos).length();
    if distance < config.snap_distance && velocity.length() < config.snap_speed {
        sprite.transform.position = target;
        // Floating starts from its current phase so the first drift frame
        // only moves by the change in offset.
        if let Some(f) = sprite.floating {
            sprite.float_offset = f.offset(step.time_sec);
        }
        sprite.motion = Motion::Drift {
            movement: centered(rng, config.drift_speed),
        };
        return Some(Phase::Drift);
    }

    sprite.transform.position = pos;
    sprite.motion = Motion::Burst { velocity };
    None
}

fn bounce_burst(pos: &mut Vec3, vel: &mut Vec3, b: &Bounds, config: &PhysicsConfig) {
    let e = config.elasticity;
    if pos.x.abs() > b.x {
        pos.x = b.x.copysign(pos.x);
        vel.x *= -e;
    }
    if pos.y.abs() > b.y {
        pos.y = b.y.copysign(pos.y);
        vel.y *= -e;
    }
    if pos.z > b.z {
        pos.z = b.z;
        vel.z *= -e;
    } else if pos.z < b.min_z {
        pos.z = b.min_z;
        vel.z *= -config.back_wall_bounce;
    }
}

fn step_drift<R: Rng + ?Sized>(
    sprite: &mut Sprite,
    mut movement: Vec3,
    config: &PhysicsConfig,
    step: Step,
    rng: &mut R,
) {
    let b = sprite.bounds;
    let mut pos = sprite.transform.position + movement * step.frames;

    if let Some(f) = sprite.floating {
        let offset = f.offset(step.time_sec);
        let delta = offset - sprite.float_offset;
        pos.y += delta.x;
        pos.z += delta.y;
        sprite.float_offset = offset;
    }

    let j = config.drift_jitter;
    if pos.x.abs() > b.x {
        pos.x = b.x.copysign(pos.x);
        movement.x = -pos.x.signum() * (movement.x.abs() + jitter(rng, j));
        sprite.rotation_speed.y += (rng.gen::<f32>() - 0.5) * j;
    }
    if pos.y.abs() > b.y {
        pos.y = b.y.copysign(pos.y);
        movement.y = -pos.y.signum() * (movement.y.abs() + jitter(rng, j));
    }
    if pos.z > b.z {
        pos.z = b.z;
        movement.z = -(movement.z.abs() + jitter(rng, j));
    } else if pos.z < b.min_z {
        pos.z = b.min_z;
        movement.z = movement.z.abs() + jitter(rng, j) + config.back_wall_push;
    }

    sprite.transform.position = pos;
    sprite.motion = Motion::Drift { movement };
}

#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, magnitude: f32) -> f32 {
    rng.gen::<f32>() * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::SpawnPhase;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn burst_sprite(cfg: &PhysicsConfig, seed: u64) -> (Sprite, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let s = Sprite::spawn(0, 1.3, cfg, &[], SpawnPhase::Burst, &mut rng);
        (s, rng)
    }

    #[test]
    fn fixed_step_ignores_dt() {
        let cfg = PhysicsConfig::classic();
        assert_eq!(Step::new(&cfg, 0.5, 0.0).frames, 1.0);
        let cfg = PhysicsConfig::cinematic();
        assert!((Step::new(&cfg, 1.0 / 60.0, 0.0).frames - 1.0).abs() < 1e-5);
        assert!((Step::new(&cfg, 5.0, 0.0).frames - MAX_FRAME_DT_SEC * REFERENCE_FPS).abs() < 1e-4);
    }

    #[test]
    fn waiting_sprite_only_rotates() {
        let cfg = PhysicsConfig::cinematic();
        let mut rng = StdRng::seed_from_u64(3);
        let mut s = Sprite::spawn(0, 1.0, &cfg, &[], SpawnPhase::Waiting, &mut rng);
        let rot0 = s.transform.rotation;
        for i in 0..10 {
            let step = Step::new(&cfg, 1.0 / 60.0, i as f32 / 60.0);
            assert_eq!(step_sprite(&mut s, &cfg, step, &mut rng), None);
        }
        assert_eq!(s.position(), Vec3::ZERO);
        assert_ne!(s.transform.rotation, rot0);
    }

    #[test]
    fn burst_bounces_off_wall_with_elasticity() {
        let cfg = PhysicsConfig::classic();
        let (mut s, mut rng) = burst_sprite(&cfg, 11);
        s.transform.position = Vec3::new(3.95, 0.0, 0.0);
        s.motion = Motion::Burst {
            velocity: Vec3::new(0.2, 0.0, 0.0),
        };
        step_sprite(&mut s, &cfg, Step::new(&cfg, 0.0, 0.0), &mut rng);
        assert_eq!(s.position().x, 4.0);
        match s.motion {
            Motion::Burst { velocity } => assert!(velocity.x < 0.0),
            other => panic!("unexpected motion {other:?}"),
        }
    }

    #[test]
    fn burst_snaps_exactly_onto_target() {
        let cfg = PhysicsConfig::classic();
        let (mut s, mut rng) = burst_sprite(&cfg, 5);
        let target = s.target();
        s.transform.position = target + Vec3::new(0.01, 0.0, 0.0);
        s.motion = Motion::Burst {
            velocity: Vec3::ZERO,
        };
        let changed = step_sprite(&mut s, &cfg, Step::new(&cfg, 0.0, 0.0), &mut rng);
        assert_eq!(changed, Some(Phase::Drift));
        assert_eq!(s.position(), target);
    }

    #[test]
    fn drift_back_wall_pushes_forward() {
        let cfg = PhysicsConfig::cinematic();
        let (mut s, mut rng) = burst_sprite(&cfg, 9);
        s.floating = None;
        s.transform.position = Vec3::new(0.0, 0.0, cfg.bounds.min_z + 0.001);
        s.motion = Motion::Drift {
            movement: Vec3::new(0.0, 0.0, -0.01),
        };
        step_sprite(&mut s, &cfg, Step::new(&cfg, 1.0 / 60.0, 0.0), &mut rng);
        assert_eq!(s.position().z, cfg.bounds.min_z);
        match s.motion {
            Motion::Drift { movement } => assert!(movement.z > 0.0),
            other => panic!("unexpected motion {other:?}"),
        }
    }

    #[test]
    fn drift_side_wall_reflects_inward() {
        let cfg = PhysicsConfig::classic();
        let (mut s, mut rng) = burst_sprite(&cfg, 2);
        s.transform.position = Vec3::new(-3.999, 3.999, 0.0);
        s.motion = Motion::Drift {
            movement: Vec3::new(-0.002, 0.002, 0.0),
        };
        step_sprite(&mut s, &cfg, Step::new(&cfg, 0.0, 0.0), &mut rng);
        assert_eq!(s.position().x, -4.0);
        assert_eq!(s.position().y, 4.0);
        match s.motion {
            Motion::Drift { movement } => {
                assert!(movement.x > 0.0);
                assert!(movement.y < 0.0);
            }
            other => panic!("unexpected motion {other:?}"),
        }
    }

    #[test]
    fn first_drift_frame_after_snap_stays_small() {
        let cfg = PhysicsConfig::cinematic();
        let dt = 1.0 / 60.0;
        for seed in 0..20 {
            let (mut s, mut rng) = burst_sprite(&cfg, seed);
            let f = s.floating.expect("cinematic sprites float");
            s.transform.position = s.target() + Vec3::new(0.001, 0.0, 0.0);
            s.motion = Motion::Burst {
                velocity: Vec3::ZERO,
            };
            let snapped = step_sprite(&mut s, &cfg, Step::new(&cfg, dt, 3.0), &mut rng);
            assert_eq!(snapped, Some(Phase::Drift));
            let before = s.position();
            let movement = match s.motion {
                Motion::Drift { movement } => movement,
                other => panic!("unexpected motion {other:?}"),
            };

            step_sprite(&mut s, &cfg, Step::new(&cfg, dt, 3.0 + dt), &mut rng);
            let moved = (s.position() - before).length();
            let limit = movement.length() + 1.2 * f.amplitude * f.frequency.abs() * dt + 1e-5;
            assert!(moved <= limit, "seed {seed}: moved {moved}, limit {limit}");
        }
    }
}
