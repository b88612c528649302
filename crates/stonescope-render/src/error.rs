//! Rendering error types.

use thiserror::Error;

/// Errors that can occur during rendering operations.
///
/// Context-level failures (adapter, device, surface creation, device loss)
/// are unrecoverable: the viewer session treats them as fatal. Transient
/// surface conditions (`SurfaceLost`, `SurfaceOutdated`) are handled by
/// reconfiguring the swapchain inside the frame loop.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),

    /// Surface lost.
    #[error("surface lost")]
    SurfaceLost,

    /// Surface outdated.
    #[error("surface outdated")]
    SurfaceOutdated,

    /// Out of memory.
    #[error("out of memory")]
    OutOfMemory,

    /// Timeout waiting for GPU.
    #[error("timeout waiting for GPU")]
    Timeout,

    /// GPU readback buffer mapping failed.
    #[error("buffer mapping failed")]
    BufferMapFailed,
}

impl RenderError {
    /// Whether this error invalidates the whole graphics context.
    ///
    /// Fatal errors park the viewer in its failed state; everything else is
    /// retried on the next frame.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RenderError::AdapterCreationFailed
                | RenderError::DeviceCreationFailed(_)
                | RenderError::SurfaceCreationFailed(_)
                | RenderError::OutOfMemory
        )
    }
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
