//! stonescope-rs: an interactive 3D viewer for granite and marble product
//! surfaces.
//!
//! Given catalog data for a stone product (a descriptor with candidate
//! images), stonescope resolves the best texture address, loads and decodes
//! it, builds a polished-stone PBR material with per-geometry tiling, binds
//! it to a showroom model, and opens an orbitable viewer window. Every
//! load failure short of losing the graphics context is recovered with a
//! procedural fallback: a missing photo becomes synthesized granite, a
//! missing model becomes a generated slab.
//!
//! # Quick Start
//!
//! ```no_run
//! use stonescope::*;
//!
//! fn main() -> Result<()> {
//!     init()?;
//!
//!     let descriptor = SurfaceDescriptor::new(
//!         "bg-1",
//!         "Black Galaxy",
//!         vec![CandidateImage {
//!             url: "textures/black-galaxy.jpg".into(),
//!             role: ImageRole::Primary,
//!         }],
//!     );
//!
//!     // Blocks until the window is closed.
//!     show(descriptor, GeometryKind::KitchenCounter)?;
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! The session moves strictly forward through
//! `Initializing -> LoadingTexture -> LoadingGeometry -> ApplyingMaterial
//! -> Ready`; only renderer/context failures reach `Failed`, which is
//! terminal until a restart (the `R` key in the viewer).

mod app;
mod init;
pub mod loader;
pub mod viewer;

pub use init::{init, init_with_options, is_initialized, load_descriptor, show, shutdown};
pub use viewer::{error_message, load_progress, meshes_bound, texture_source, viewer_state};

// Re-export core types
pub use stonescope_core::{
    cache::ResourceCache,
    descriptor::{CandidateImage, ImageRole, SurfaceDescriptor},
    error::{CoreError, Result},
    material::{GeometryKind, MaterialDescriptor, SourceKind, StoneFinish, Tiling, POLISHED_STONE},
    options::Options,
    session::{Session, SessionState},
    state::{with_context, with_context_mut, Context},
    Mat4, Vec2, Vec3, Vec4,
};

// Re-export render types
pub use stonescope_render::{Camera, LightRig, RenderError, StoneRenderer};
