use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CosmosError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid viewport {width}x{height} @ {pixel_ratio}")]
    InvalidViewport {
        width: f32,
        height: f32,
        pixel_ratio: f32,
    },
    #[error("unknown preset `{0}` (expected classic, cinematic or gallery)")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, CosmosError>;
