//! Background asset loading.
//!
//! Fetches run on plain worker threads and report back over an mpsc
//! channel; the event loop drains the channel once per frame and feeds the
//! results into the session, which discards anything from a stale
//! generation. Image decoding uses the `image` crate, models are Wavefront
//! OBJ via `tobj`.

use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread;

use stonescope_core::error::CoreError;
use stonescope_core::geometry::{GeometryTarget, MeshData, SceneNode};
use stonescope_core::material::GeometryKind;
use stonescope_core::raster::Raster;
use stonescope_core::session::LoadRequest;

/// A completed background fetch, tagged with its session generation.
pub enum LoadResult {
    /// Texture fetch outcome.
    Texture {
        /// Session generation the fetch was issued under.
        generation: u64,
        /// The fetched address, used as the cache key.
        url: String,
        /// Decoded raster or the load error.
        result: Result<Raster, CoreError>,
    },
    /// Geometry fetch outcome.
    Geometry {
        /// Session generation the fetch was issued under.
        generation: u64,
        /// The fetched asset path, used as the cache key.
        path: String,
        /// Parsed graph or the load error.
        result: Result<GeometryTarget, CoreError>,
    },
}

/// Spawns a worker thread for one load request.
///
/// The result is delivered over `tx`; a dropped receiver (viewer shutting
/// down) is silently ignored.
pub fn spawn_fetch(request: LoadRequest, kind: GeometryKind, tx: Sender<LoadResult>) {
    thread::spawn(move || {
        let result = match request {
            LoadRequest::FetchTexture { generation, url } => {
                let result = fetch_texture(&url);
                LoadResult::Texture {
                    generation,
                    url,
                    result,
                }
            }
            LoadRequest::FetchGeometry { generation, path } => {
                let result = fetch_geometry(&path, kind);
                LoadResult::Geometry {
                    generation,
                    path,
                    result,
                }
            }
        };
        let _ = tx.send(result);
    });
}

/// Loads and decodes a surface image into an RGBA raster.
///
/// Addresses are local paths, optionally behind a `file://` scheme.
/// Remote `http(s)` URLs are rejected here; the session recovers by
/// synthesizing a procedural texture, so a missing CDN mirror degrades
/// visually instead of failing.
pub fn fetch_texture(url: &str) -> Result<Raster, CoreError> {
    let path = local_path(url).ok_or_else(|| CoreError::TextureLoad {
        url: url.to_string(),
        reason: "remote URLs are not fetched; mirror the asset locally".to_string(),
    })?;

    let image = image::open(Path::new(path)).map_err(|err| CoreError::TextureLoad {
        url: url.to_string(),
        reason: err.to_string(),
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_pixels(width, height, rgba.into_raw())
}

/// Loads a Wavefront OBJ asset into a geometry graph.
///
/// Every model in the file becomes one mesh node under a single group.
/// Meshes without authored normals get computed ones; missing UV channels
/// are left `None` for the applicator to synthesize.
pub fn fetch_geometry(path: &str, kind: GeometryKind) -> Result<GeometryTarget, CoreError> {
    let load_error = |reason: String| CoreError::GeometryLoad {
        path: path.to_string(),
        reason,
    };

    let (models, _materials) =
        tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|err| load_error(err.to_string()))?;

    if models.is_empty() {
        return Err(load_error("file contains no models".to_string()));
    }

    let children: Vec<SceneNode> = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            let positions: Vec<glam::Vec3> = mesh
                .positions
                .chunks_exact(3)
                .map(|p| glam::Vec3::new(p[0], p[1], p[2]))
                .collect();
            let normals: Vec<glam::Vec3> = mesh
                .normals
                .chunks_exact(3)
                .map(|n| glam::Vec3::new(n[0], n[1], n[2]))
                .collect();
            let uvs = if mesh.texcoords.is_empty() {
                None
            } else {
                Some(
                    mesh.texcoords
                        .chunks_exact(2)
                        .map(|uv| glam::Vec2::new(uv[0], uv[1]))
                        .collect(),
                )
            };

            let mut data = MeshData {
                name: model.name,
                positions,
                normals,
                uvs,
                indices: mesh.indices,
                ..MeshData::default()
            };
            if data.normals.len() != data.positions.len() {
                data.compute_vertex_normals();
            }
            SceneNode::Mesh(data)
        })
        .collect();

    Ok(GeometryTarget {
        kind,
        root: SceneNode::Group(children),
    })
}

/// Estimated in-memory size of a geometry graph, in megabytes.
#[must_use]
pub fn geometry_size_mb(target: &GeometryTarget) -> f32 {
    let mut bytes = 0usize;
    target.for_each_mesh(|mesh| {
        bytes += mesh.positions.len() * 12;
        bytes += mesh.normals.len() * 12;
        bytes += mesh.uvs.as_ref().map_or(0, |uvs| uvs.len() * 8);
        bytes += mesh.indices.len() * 4;
    });
    bytes as f32 / (1024.0 * 1024.0)
}

/// Resolves a texture address to a local filesystem path.
fn local_path(url: &str) -> Option<&str> {
    if let Some(stripped) = url.strip_prefix("file://") {
        return Some(stripped);
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return None;
    }
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_local_path_strips_file_scheme() {
        assert_eq!(local_path("file:///tmp/a.jpg"), Some("/tmp/a.jpg"));
        assert_eq!(local_path("textures/a.jpg"), Some("textures/a.jpg"));
    }

    #[test]
    fn test_remote_urls_rejected() {
        assert_eq!(local_path("https://cdn.example.com/a.jpg"), None);
        assert!(matches!(
            fetch_texture("https://cdn.example.com/a.jpg"),
            Err(CoreError::TextureLoad { .. })
        ));
    }

    #[test]
    fn test_missing_texture_file_is_load_error() {
        assert!(matches!(
            fetch_texture("/nonexistent/surface.jpg"),
            Err(CoreError::TextureLoad { .. })
        ));
    }

    #[test]
    fn test_fetch_geometry_parses_obj() {
        let path = std::env::temp_dir().join("stonescope_loader_test_quad.obj");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "o quad").unwrap();
        writeln!(file, "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0").unwrap();
        writeln!(file, "f 1 2 3\nf 1 3 4").unwrap();
        drop(file);

        let target = fetch_geometry(path.to_str().unwrap(), GeometryKind::Slab).unwrap();
        assert_eq!(target.kind, GeometryKind::Slab);
        assert_eq!(target.mesh_count(), 1);
        target.for_each_mesh(|mesh| {
            assert_eq!(mesh.indices.len(), 6);
            // No authored normals in the file, so they were computed.
            assert_eq!(mesh.normals.len(), mesh.positions.len());
            assert!(mesh.uvs.is_none());
        });

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_model_file_is_load_error() {
        assert!(matches!(
            fetch_geometry("/nonexistent/slab.obj", GeometryKind::Slab),
            Err(CoreError::GeometryLoad { .. })
        ));
    }

    #[test]
    fn test_geometry_size_estimate_positive() {
        let target = GeometryTarget::procedural_slab();
        assert!(geometry_size_mb(&target) > 0.0);
    }
}
