use crate::constants::{GRADIENT_POSITION_WEIGHT, GRADIENT_VELOCITY_WEIGHT};
use glam::Vec2;

// Decay rate of the move delta once the pointer stops.
const VELOCITY_DECAY_PER_SEC: f32 = 6.0;

/// Pointer position in normalized device coordinates plus its last move delta.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    ndc: Vec2,
    velocity: Vec2,
    moved: bool,
}

impl PointerState {
    pub fn on_move(&mut self, ndc: Vec2) {
        let ndc = ndc.clamp(Vec2::NEG_ONE, Vec2::ONE);
        if self.moved {
            self.velocity = ndc - self.ndc;
        }
        self.ndc = ndc;
        self.moved = true;
    }

    /// Ease the move delta back to zero between pointer events.
    pub fn decay(&mut self, dt_sec: f32) {
        self.velocity *= (-VELOCITY_DECAY_PER_SEC * dt_sec.max(0.0)).exp();
    }

    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// False until the first move event; hover picking waits for it.
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Offset (in percent of the page) for the cosmetic background gradient.
    pub fn gradient_offset(&self) -> Vec2 {
        self.ndc * GRADIENT_POSITION_WEIGHT + self.velocity * GRADIENT_VELOCITY_WEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_move_has_no_velocity() {
        let mut p = PointerState::default();
        assert!(!p.has_moved());
        p.on_move(Vec2::new(0.5, 0.5));
        assert!(p.has_moved());
        assert_eq!(p.velocity(), Vec2::ZERO);
        p.on_move(Vec2::new(0.7, 0.4));
        assert!((p.velocity() - Vec2::new(0.2, -0.1)).length() < 1e-6);
    }

    #[test]
    fn positions_are_clamped() {
        let mut p = PointerState::default();
        p.on_move(Vec2::new(3.0, -7.0));
        assert_eq!(p.ndc(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn velocity_decays_toward_zero() {
        let mut p = PointerState::default();
        p.on_move(Vec2::ZERO);
        p.on_move(Vec2::new(0.4, 0.0));
        for _ in 0..120 {
            p.decay(1.0 / 60.0);
        }
        assert!(p.velocity().length() < 1e-3);
    }

    #[test]
    fn gradient_follows_pointer() {
        let mut p = PointerState::default();
        p.on_move(Vec2::new(1.0, 0.0));
        assert_eq!(p.gradient_offset(), Vec2::new(GRADIENT_POSITION_WEIGHT, 0.0));
    }
}
