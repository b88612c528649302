//! Error types for stonescope-rs.

use thiserror::Error;

/// The main error type for stonescope-rs core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Stonescope has not been initialized.
    #[error("stonescope not initialized - call stonescope::init() first")]
    NotInitialized,

    /// Stonescope has already been initialized.
    #[error("stonescope already initialized")]
    AlreadyInitialized,

    /// A texture could not be fetched or decoded.
    ///
    /// This is the *recovered* texture failure class: callers fall back to
    /// procedural synthesis instead of surfacing it.
    #[error("texture load error for '{url}': {reason}")]
    TextureLoad { url: String, reason: String },

    /// A geometry asset could not be fetched or parsed.
    ///
    /// This is the *recovered* geometry failure class: callers fall back to
    /// a procedural slab primitive instead of surfacing it.
    #[error("geometry load error for '{path}': {reason}")]
    GeometryLoad { path: String, reason: String },

    /// Raster pixel data does not match its declared dimensions.
    #[error("raster size mismatch: expected {expected} bytes, got {actual}")]
    RasterSizeMismatch { expected: usize, actual: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error on a surface descriptor.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for stonescope-rs core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
