//! Core abstractions for stonescope-rs.
//!
//! This crate holds the renderer-independent half of the stone surface
//! viewer:
//! - [`SurfaceDescriptor`] and the texture [`resolver`] that picks an image
//!   address from catalog data
//! - The procedural granite [`synth`]esizer used when no photograph exists
//! - [`material`] construction with per-geometry tiling and the polished
//!   stone finish
//! - The scene [`geometry`] graph and material applicator
//! - The [`Session`] state machine driving the load pipeline
//! - A byte-budgeted [`ResourceCache`]
//!
//! Everything here is plain CPU data (`Raster` pixels, mesh buffers) so the
//! full pipeline is testable without a GPU; `stonescope-render` turns these
//! into wgpu resources.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod cache;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod material;
pub mod options;
pub mod raster;
pub mod resolver;
pub mod session;
pub mod state;
pub mod synth;

pub use cache::ResourceCache;
pub use descriptor::{CandidateImage, ImageRole, SurfaceDescriptor};
pub use error::{CoreError, Result};
pub use geometry::{GeometryTarget, MeshData, SceneNode};
pub use material::{
    GeometryKind, MaterialDescriptor, ResolvedTexture, SourceKind, StoneFinish, Tiling,
    POLISHED_STONE,
};
pub use options::Options;
pub use raster::Raster;
pub use session::{LoadRequest, Session, SessionState};
pub use state::{with_context, with_context_mut, Context};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
