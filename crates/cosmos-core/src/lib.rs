//! Platform-free model of the COSMOS floating photo background.
//!
//! Nothing in this crate touches the GPU or the DOM: hosts feed it decoded
//! image dimensions, pointer positions and frame times, and read back the
//! camera, the lights and the sprite transforms to draw.

pub mod assets;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod field;
pub mod lighting;
pub mod physics;
pub mod picking;
pub mod pointer;
pub mod scene;
pub mod sprite;

pub use assets::*;
pub use camera::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use field::*;
pub use lighting::*;
pub use picking::*;
pub use pointer::*;
pub use scene::*;
pub use sprite::*;
