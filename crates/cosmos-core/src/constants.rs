//! Scene and interaction tuning constants shared by every preset.
//!
//! Per-preset physics knobs live in `config.rs`; these are the values all
//! page revisions agreed on.

// Image naming: /images/DSCF{FIRST_FRAME_NUMBER + i}.JPG
pub const IMAGE_DIR: &str = "/images";
pub const FIRST_FRAME_NUMBER: usize = 3726;
pub const DEFAULT_IMAGE_COUNT: usize = 35;

// Camera
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

// Physics reference frame rate; velocities are expressed per reference frame
pub const REFERENCE_FPS: f32 = 60.0;
// Longest frame we integrate in one step (tab switches, debugger pauses)
pub const MAX_FRAME_DT_SEC: f32 = 0.1;

// Plane geometry
pub const MAX_PLANE_WIDTH: f32 = 1.5;
// Targets keep this far inside the bounds box
pub const TARGET_MARGIN: f32 = 0.25;

// Hover feedback
pub const HOVER_SCALE: f32 = 1.15;
pub const HOVER_EMISSIVE_BOOST: f32 = 0.35;
pub const HOVER_ROUGHNESS_BOOST: f32 = 0.2;

// Click pulse
pub const PULSE_SCALE: f32 = 1.2;
pub const PULSE_UP_SEC: f32 = 0.15;
pub const PULSE_DOWN_SEC: f32 = 0.15;

// Cosmetic background gradient offset (percent of the page per NDC unit)
pub const GRADIENT_POSITION_WEIGHT: f32 = 12.0;
pub const GRADIENT_VELOCITY_WEIGHT: f32 = 40.0;
