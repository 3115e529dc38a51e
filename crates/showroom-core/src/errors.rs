//! Error types for the showroom engine.

use thiserror::Error;

/// Top-level error type for the showroom core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShowroomError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Texture(#[from] TextureLoadError),
}

/// Errors computing a texture transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    #[error("Invalid {what}: {value} (must be finite and greater than zero)")]
    InvalidDimension { what: &'static str, value: f64 },
}

/// Errors from surface registry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("Unknown surface: {id}")]
    UnknownSurface { id: String },

    #[error("Unknown tile: {id}")]
    UnknownTile { id: String },
}

/// An image could not be loaded into a texture.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Failed to load texture {image_ref}: {reason}")]
pub struct TextureLoadError {
    pub image_ref: String,
    pub reason: String,
}

impl TextureLoadError {
    pub fn new(image_ref: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            image_ref: image_ref.into(),
            reason: reason.into(),
        }
    }
}
