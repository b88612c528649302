//! Global state management for stonescope.

use std::sync::{OnceLock, RwLock};

use crate::cache::ResourceCache;
use crate::error::{CoreError, Result};
use crate::geometry::GeometryTarget;
use crate::options::Options;
use crate::raster::Raster;
use crate::session::Session;

/// Global context singleton.
static CONTEXT: OnceLock<RwLock<Context>> = OnceLock::new();

/// The global context containing all viewer state.
pub struct Context {
    /// Whether stonescope has been initialized.
    pub initialized: bool,

    /// Global options.
    pub options: Options,

    /// The active viewer session.
    pub session: Session,

    /// Decoded surface textures, keyed by resolved URL.
    pub texture_cache: ResourceCache<Raster>,

    /// Parsed geometry graphs, keyed by asset path.
    pub geometry_cache: ResourceCache<GeometryTarget>,
}

impl Context {
    fn with_options(options: Options) -> Self {
        let budget = options.cache_budget_mb;
        Self {
            initialized: false,
            session: Session::new(options.clone()),
            options,
            texture_cache: ResourceCache::new(budget),
            geometry_cache: ResourceCache::new(budget),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::with_options(Options::default())
    }
}

/// Initializes the global context with the given options.
///
/// This should be called once at the start of the program.
pub fn init_context(options: Options) -> Result<()> {
    let context = RwLock::new(Context::with_options(options));

    CONTEXT
        .set(context)
        .map_err(|_| CoreError::AlreadyInitialized)?;

    with_context_mut(|ctx| {
        ctx.initialized = true;
    });

    Ok(())
}

/// Returns whether the context has been initialized.
pub fn is_initialized() -> bool {
    CONTEXT
        .get()
        .and_then(|lock| lock.read().ok())
        .is_some_and(|ctx| ctx.initialized)
}

/// Access the global context for reading.
///
/// # Panics
///
/// Panics if stonescope has not been initialized.
pub fn with_context<F, R>(f: F) -> R
where
    F: FnOnce(&Context) -> R,
{
    let lock = CONTEXT.get().expect("stonescope not initialized");
    let guard = lock.read().expect("context lock poisoned");
    f(&guard)
}

/// Access the global context for writing.
///
/// # Panics
///
/// Panics if stonescope has not been initialized.
pub fn with_context_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Context) -> R,
{
    let lock = CONTEXT.get().expect("stonescope not initialized");
    let mut guard = lock.write().expect("context lock poisoned");
    f(&mut guard)
}

/// Try to access the global context for reading.
///
/// Returns `None` if stonescope has not been initialized.
pub fn try_with_context<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&Context) -> R,
{
    let lock = CONTEXT.get()?;
    let guard = lock.read().ok()?;
    Some(f(&guard))
}

/// Try to access the global context for writing.
///
/// Returns `None` if stonescope has not been initialized.
pub fn try_with_context_mut<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut Context) -> R,
{
    let lock = CONTEXT.get()?;
    let mut guard = lock.write().ok()?;
    Some(f(&mut guard))
}

/// Shuts down the global context.
///
/// The session is reset and both caches are emptied. Note: due to
/// `OnceLock` semantics, the context cannot be re-initialized after
/// shutdown in the same process.
pub fn shutdown_context() {
    if let Some(lock) = CONTEXT.get() {
        if let Ok(mut ctx) = lock.write() {
            ctx.initialized = false;
            ctx.session.reset();
            ctx.texture_cache.clear();
            ctx.geometry_cache.clear();
        }
    }
}
