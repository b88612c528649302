//! Rendering backend for stonescope-rs.
//!
//! This crate turns the CPU-side scene produced by `stonescope-core`
//! (rasters, material descriptor, mesh buffers) into wgpu resources and
//! draws it:
//! - Graphics context and swapchain management
//! - The polished-stone render pipeline (WGSL)
//! - Orbit camera and the fixed showroom light rig
//! - Frame capture and screenshot encoding

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod camera;
pub mod engine;
pub mod error;
pub mod lighting;
pub mod mesh_render;
pub mod screenshot;
pub mod stone_material;

pub use camera::Camera;
pub use engine::{CameraUniforms, StoneRenderer};
pub use error::{RenderError, RenderResult};
pub use lighting::{DirectionalLight, LightRig, LightUniforms};
pub use mesh_render::{MeshRenderData, MeshVertex};
pub use screenshot::{save_image, save_to_buffer, ScreenshotError};
pub use stone_material::{create_material_bind_group_layout, FinishUniforms, StoneMaterialGpu};
