//! Viewer session state machine.
//!
//! A [`Session`] owns one resolved texture, one material, and one geometry
//! target for its lifetime, and moves strictly forward through the load
//! pipeline. The driver (event loop + loaders) performs the actual I/O:
//! `start` and the `*_loaded` events return [`LoadRequest`]s telling the
//! driver what to fetch next, and every completion carries the generation
//! it was issued under so results arriving after a reset are discarded.
//!
//! Failure policy (asymmetric by design - visual degradation always beats a
//! blocked viewer): texture and geometry load failures are *recovered*
//! inline via procedural fallbacks and never surface to the user; only
//! renderer/context failures are fatal and park the session in `Failed`
//! until a full restart.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::descriptor::SurfaceDescriptor;
use crate::error::CoreError;
use crate::geometry::{self, GeometryTarget};
use crate::material::{self, GeometryKind, MaterialDescriptor, ResolvedTexture, SourceKind};
use crate::options::Options;
use crate::raster::Raster;
use crate::resolver;
use crate::synth;

/// The lifecycle state of a viewer session.
///
/// Strictly forward-moving except `Failed`, which is reachable from any
/// state and terminal until a full restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created or reset; no loads issued yet.
    Initializing,
    /// Waiting on the surface image fetch.
    LoadingTexture,
    /// Waiting on the geometry asset fetch.
    LoadingGeometry,
    /// Synchronous material build and mesh binding in progress.
    ApplyingMaterial,
    /// Rendering; responds to resize/camera/export/reset events.
    Ready,
    /// A renderer/context-level fatal error occurred.
    Failed,
}

impl SessionState {
    /// State name for logs and error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Initializing => "initializing",
            SessionState::LoadingTexture => "loading-texture",
            SessionState::LoadingGeometry => "loading-geometry",
            SessionState::ApplyingMaterial => "applying-material",
            SessionState::Ready => "ready",
            SessionState::Failed => "failed",
        }
    }
}

/// An asynchronous fetch the driver must perform on behalf of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    /// Fetch and decode the surface image at `url`.
    FetchTexture {
        /// Session generation this request belongs to.
        generation: u64,
        /// Image address.
        url: String,
    },
    /// Fetch and parse the geometry asset at `path`.
    FetchGeometry {
        /// Session generation this request belongs to.
        generation: u64,
        /// Asset path.
        path: String,
    },
}

/// One viewer session: descriptor in, bound material + geometry out.
pub struct Session {
    options: Options,
    state: SessionState,
    generation: u64,
    progress: u8,
    descriptor: SurfaceDescriptor,
    kind: GeometryKind,
    resolved: Option<ResolvedTexture>,
    material: Option<Arc<MaterialDescriptor>>,
    geometry: Option<GeometryTarget>,
    meshes_bound: usize,
    error_message: Option<String>,
}

impl Session {
    /// Creates an idle session.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            options,
            state: SessionState::Initializing,
            generation: 0,
            progress: 0,
            descriptor: SurfaceDescriptor::default(),
            kind: GeometryKind::Slab,
            resolved: None,
            material: None,
            geometry: None,
            meshes_bound: 0,
            error_message: None,
        }
    }

    /// Starts loading a product surface onto a geometry class.
    ///
    /// Resolution happens synchronously; a degenerate descriptor skips the
    /// image fetch entirely and synthesizes the default stone. Calling this
    /// on a live session performs a full reset first.
    pub fn start(&mut self, descriptor: SurfaceDescriptor, kind: GeometryKind) -> LoadRequest {
        if self.state != SessionState::Initializing {
            self.reset();
        }
        self.generation += 1;
        self.descriptor = descriptor;
        self.kind = kind;
        self.state = SessionState::LoadingTexture;
        self.bump_progress(5);
        log::debug!(
            "session gen {} started for '{}' ({:?})",
            self.generation,
            self.descriptor.display_name,
            self.kind
        );

        match resolver::resolve(&self.descriptor, &self.options.texture_dir) {
            Some(url) => LoadRequest::FetchTexture {
                generation: self.generation,
                url,
            },
            None => {
                // Degenerate input: documented default behavior, not an
                // error. Default-seeded stone, straight to geometry.
                self.accept_texture(self.synthesize_fallback());
                self.request_geometry()
            }
        }
    }

    /// Delivers the result of a texture fetch.
    ///
    /// A failed fetch is recovered by synthesizing a procedural texture;
    /// the session keeps moving. Stale generations are discarded.
    pub fn texture_loaded(
        &mut self,
        generation: u64,
        result: Result<Raster, CoreError>,
    ) -> Option<LoadRequest> {
        if !self.accepts(generation, SessionState::LoadingTexture, "texture-loaded") {
            return None;
        }

        match result {
            Ok(raster) => {
                self.accept_texture(ResolvedTexture {
                    source_kind: SourceKind::Photograph,
                    raster,
                });
            }
            Err(err) => {
                log::warn!("texture load failed ({err}), synthesizing granite fallback");
                self.accept_texture(self.synthesize_fallback());
            }
        }

        Some(self.request_geometry())
    }

    /// Delivers the result of a geometry fetch, then runs the synchronous
    /// tail of the pipeline: material build, mesh binding, `Ready`.
    ///
    /// A failed fetch is recovered with the procedural slab primitive.
    /// Returns the number of meshes bound, or `None` for a discarded stale
    /// or out-of-state event.
    pub fn geometry_loaded(
        &mut self,
        generation: u64,
        result: Result<GeometryTarget, CoreError>,
    ) -> Option<usize> {
        if !self.accepts(generation, SessionState::LoadingGeometry, "geometry-loaded") {
            return None;
        }

        let mut target = match result {
            Ok(target) => target,
            Err(err) => {
                log::warn!("geometry load failed ({err}), using procedural slab");
                GeometryTarget::procedural_slab()
            }
        };
        self.bump_progress(70);

        self.state = SessionState::ApplyingMaterial;
        self.bump_progress(85);

        // Pipeline ordering guarantees a resolved texture here; synthesize
        // one anyway rather than panic if the invariant is ever broken.
        let resolved = self
            .resolved
            .take()
            .unwrap_or_else(|| self.synthesize_fallback());
        // Tiling follows the requested surface class even when the actual
        // geometry fell back to the procedural slab.
        let material = Arc::new(material::build(&resolved, self.kind));
        self.resolved = Some(resolved);
        let bound = geometry::apply(&material, &mut target);
        if bound == 0 {
            log::warn!("geometry graph contained no drawable meshes");
        }

        self.material = Some(material);
        self.geometry = Some(target);
        self.meshes_bound = bound;
        self.state = SessionState::Ready;
        self.bump_progress(100);
        log::info!(
            "session gen {} ready: {} meshes bound, source {:?}",
            self.generation,
            bound,
            self.source_kind()
        );

        Some(bound)
    }

    /// Records a renderer/context-level fatal error.
    ///
    /// The only remedy offered afterwards is a full restart; partial state
    /// after a context failure is not trusted.
    pub fn fatal(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("fatal viewer error: {message}");
        self.error_message = Some(message);
        self.state = SessionState::Failed;
    }

    /// Full session teardown: releases the texture, material, and geometry
    /// together and returns to `Initializing` under a new generation.
    /// In-flight loads from the old generation will be discarded on arrival.
    pub fn reset(&mut self) {
        log::debug!("session gen {} reset", self.generation);
        self.resolved = None;
        self.material = None;
        self.geometry = None;
        self.meshes_bound = 0;
        self.error_message = None;
        self.progress = 0;
        self.generation += 1;
        self.state = SessionState::Initializing;
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Monotonic load progress, 0-100.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Current session generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Human-readable message for the `Failed` state.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Provenance of the active surface texture, once resolved.
    #[must_use]
    pub fn source_kind(&self) -> Option<SourceKind> {
        self.resolved.as_ref().map(|r| r.source_kind)
    }

    /// The bound material, once ready.
    #[must_use]
    pub fn material(&self) -> Option<&Arc<MaterialDescriptor>> {
        self.material.as_ref()
    }

    /// The bound geometry, once ready.
    #[must_use]
    pub fn geometry(&self) -> Option<&GeometryTarget> {
        self.geometry.as_ref()
    }

    /// Mutable access to the bound geometry, for the render layer.
    pub fn geometry_mut(&mut self) -> Option<&mut GeometryTarget> {
        self.geometry.as_mut()
    }

    /// Number of meshes the applicator bound in this session.
    #[must_use]
    pub fn meshes_bound(&self) -> usize {
        self.meshes_bound
    }

    /// The geometry class this session was started with.
    #[must_use]
    pub fn geometry_kind(&self) -> GeometryKind {
        self.kind
    }

    // Gatekeeper for async completions: right generation, right state.
    fn accepts(&self, generation: u64, expected: SessionState, event: &str) -> bool {
        if generation != self.generation {
            log::debug!(
                "discarding stale {event} (gen {generation}, current {})",
                self.generation
            );
            return false;
        }
        if self.state != expected {
            log::debug!(
                "ignoring {event} in state '{}' (expected '{}')",
                self.state.name(),
                expected.name()
            );
            return false;
        }
        true
    }

    fn accept_texture(&mut self, resolved: ResolvedTexture) {
        self.resolved = Some(resolved);
        self.bump_progress(40);
    }

    fn request_geometry(&mut self) -> LoadRequest {
        self.state = SessionState::LoadingGeometry;
        self.bump_progress(45);
        LoadRequest::FetchGeometry {
            generation: self.generation,
            path: self.kind.asset_path(&self.options.model_dir),
        }
    }

    fn synthesize_fallback(&self) -> ResolvedTexture {
        let size = self.options.synth_texture_size;
        ResolvedTexture {
            source_kind: SourceKind::Procedural,
            raster: synth::synthesize(size, size, Some(self.synth_seed())),
        }
    }

    // Same product name always synthesizes the same stone; degenerate
    // descriptors share the configured default seed.
    fn synth_seed(&self) -> u64 {
        let name = self.descriptor.display_name.trim();
        if name.is_empty() {
            return self.options.default_synth_seed;
        }
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        hasher.finish()
    }

    fn bump_progress(&mut self, value: u8) {
        self.progress = self.progress.max(value.min(100));
    }
}
