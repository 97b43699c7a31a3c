pub mod error;
pub mod gpu;
mod helpers;
mod targets;
pub mod texture;
pub mod uniforms;

pub static SPRITE_WGSL: &str = include_str!("../shaders/sprite.wgsl");

/// Multisample count for the sprite pass.
pub const MSAA_SAMPLES: u32 = 4;
/// Longest texture edge kept after decoding.
pub const MAX_TEXTURE_DIM: u32 = 2048;
/// Fragments below this alpha are discarded.
pub const ALPHA_CUTOFF: f32 = 0.1;

pub use error::*;
pub use gpu::*;
pub use texture::*;
