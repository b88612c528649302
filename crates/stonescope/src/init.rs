//! Initialization and lifecycle management for stonescope-rs.

use std::path::Path;

use stonescope_core::descriptor::SurfaceDescriptor;
use stonescope_core::material::GeometryKind;
use stonescope_core::options::Options;

use crate::Result;

/// Initializes stonescope with default options.
///
/// This must be called before any other stonescope functions. It sets up
/// the global state: the viewer session and the resource caches.
///
/// # Errors
///
/// Returns an error if stonescope has already been initialized.
///
/// # Example
///
/// ```no_run
/// use stonescope::*;
///
/// fn main() -> Result<()> {
///     init()?;
///     let descriptor = load_descriptor("products/black-galaxy.json")?;
///     show(descriptor, GeometryKind::KitchenCounter)?;
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    init_with_options(Options::default())
}

/// Initializes stonescope with custom options.
pub fn init_with_options(options: Options) -> Result<()> {
    stonescope_core::state::init_context(options)?;
    log::info!("stonescope-rs initialized");
    Ok(())
}

/// Returns whether stonescope has been initialized.
#[must_use]
pub fn is_initialized() -> bool {
    stonescope_core::state::is_initialized()
}

/// Shuts down stonescope: resets the session and empties the caches.
///
/// Mainly useful for tests; resources are otherwise cleaned up on exit.
pub fn shutdown() {
    stonescope_core::state::shutdown_context();
    log::info!("stonescope-rs shut down");
}

/// Reads a product surface descriptor from a JSON file.
pub fn load_descriptor<P: AsRef<Path>>(path: P) -> Result<SurfaceDescriptor> {
    let contents = std::fs::read_to_string(path)?;
    let descriptor = serde_json::from_str(&contents)?;
    Ok(descriptor)
}

/// Opens the viewer window for one product surface.
///
/// Blocks until the window is closed. The full pipeline runs inside:
/// texture resolution, asset loading (with procedural fallbacks), material
/// binding, and interactive rendering.
///
/// # Errors
///
/// Returns [`stonescope_core::CoreError::NotInitialized`] if called before
/// [`init`].
pub fn show(descriptor: SurfaceDescriptor, kind: GeometryKind) -> Result<()> {
    if !is_initialized() {
        return Err(stonescope_core::CoreError::NotInitialized);
    }
    let _ = env_logger::try_init();
    crate::app::run_app(descriptor, kind);
    Ok(())
}
