//! End-to-end pipeline tests for stonescope-rs, GPU-free.
//!
//! Note: Due to stonescope using global state that can only be initialized
//! once per process (OnceLock), all tests are combined into a single test
//! function. Tests that require a window (show()) are exercised manually.

use stonescope::loader::{self, LoadResult};
use stonescope::*;
use stonescope_core::session::LoadRequest;

fn descriptor(name: &str, url: &str) -> SurfaceDescriptor {
    SurfaceDescriptor::new(
        "p1",
        name,
        vec![CandidateImage {
            url: url.into(),
            role: ImageRole::Primary,
        }],
    )
}

/// Main integration test, structured as one function because the global
/// context cannot be re-initialized within the same process.
#[test]
fn test_pipeline() {
    init().expect("init failed");
    assert!(is_initialized());
    assert_eq!(viewer_state(), Some(SessionState::Initializing));

    // Test 1: degraded load reaches Ready; missing assets do not fail the
    // session, they fall back to procedural texture and slab.
    {
        let request = with_context_mut(|ctx| {
            ctx.session.start(
                descriptor("Kashmir White", "/nonexistent/kashmir.jpg"),
                GeometryKind::KitchenCounter,
            )
        });
        let LoadRequest::FetchTexture { generation, url } = request else {
            panic!("expected a texture fetch");
        };

        let texture_result = loader::fetch_texture(&url);
        assert!(texture_result.is_err());
        let follow_up =
            with_context_mut(|ctx| ctx.session.texture_loaded(generation, texture_result))
                .expect("live generation");
        assert_eq!(texture_source(), Some(SourceKind::Procedural));

        let LoadRequest::FetchGeometry { generation, path } = follow_up else {
            panic!("expected a geometry fetch");
        };
        assert!(path.ends_with("kitchen-counter.obj"));

        let geometry_result = loader::fetch_geometry(&path, GeometryKind::KitchenCounter);
        assert!(geometry_result.is_err());
        let bound = with_context_mut(|ctx| ctx.session.geometry_loaded(generation, geometry_result))
            .expect("live generation");

        assert_eq!(bound, 1);
        assert_eq!(viewer_state(), Some(SessionState::Ready));
        assert_eq!(load_progress(), Some(100));
        assert_eq!(meshes_bound(), Some(1));

        // Tiling follows the requested class despite both fallbacks.
        with_context(|ctx| {
            let material = ctx.session.material().expect("material bound");
            assert_eq!(material.tiling.repeat_u, 3.0);
            assert_eq!(material.tiling.repeat_v, 1.5);
        });
    }

    // Test 2: session restart discards the previous scene and in-flight
    // results from the old generation.
    {
        let old_generation = with_context(|ctx| ctx.session.generation());
        with_context_mut(|ctx| ctx.session.reset());
        assert_eq!(viewer_state(), Some(SessionState::Initializing));
        assert_eq!(texture_source(), None);

        let request = with_context_mut(|ctx| {
            ctx.session
                .start(descriptor("Tan Brown", "/missing/tan.jpg"), GeometryKind::Slab)
        });
        let LoadRequest::FetchTexture { generation, .. } = request else {
            panic!("expected a texture fetch");
        };
        assert_ne!(generation, old_generation);

        // Late delivery under the old generation is discarded.
        let stale = with_context_mut(|ctx| {
            ctx.session.texture_loaded(
                old_generation,
                Ok(stonescope_core::Raster::filled(8, 8, [9, 9, 9, 255])),
            )
        });
        assert!(stale.is_none());
        assert_eq!(viewer_state(), Some(SessionState::LoadingTexture));
    }

    // Test 3: load results route through the cache layer.
    {
        let target = stonescope_core::geometry::GeometryTarget::procedural_slab();
        let size = loader::geometry_size_mb(&target);
        with_context_mut(|ctx| {
            ctx.geometry_cache
                .set("models/slab.obj".to_string(), target, size);
        });
        let hit = with_context(|ctx| ctx.geometry_cache.get("models/slab.obj").is_some());
        assert!(hit);
    }

    // Test 4: a degenerate descriptor never issues a texture fetch.
    {
        with_context_mut(|ctx| ctx.session.reset());
        let request = with_context_mut(|ctx| {
            ctx.session
                .start(SurfaceDescriptor::default(), GeometryKind::Slab)
        });
        assert!(matches!(request, LoadRequest::FetchGeometry { .. }));
        assert_eq!(texture_source(), Some(SourceKind::Procedural));
    }

    // Test 5: worker threads deliver tagged results over the channel.
    {
        with_context_mut(|ctx| ctx.session.reset());
        let request = with_context_mut(|ctx| {
            ctx.session.start(
                descriptor("Absolute Black", "/missing/black.jpg"),
                GeometryKind::BathroomVanity,
            )
        });
        let expected_generation = with_context(|ctx| ctx.session.generation());

        let (tx, rx) = std::sync::mpsc::channel();
        loader::spawn_fetch(request, GeometryKind::BathroomVanity, tx);
        match rx.recv().expect("worker result") {
            LoadResult::Texture {
                generation,
                url,
                result,
            } => {
                assert_eq!(generation, expected_generation);
                assert_eq!(url, "/missing/black.jpg");
                assert!(result.is_err());
            }
            LoadResult::Geometry { .. } => panic!("expected a texture result"),
        }
    }

    // Test 6: a decodable image on disk reaches Ready as a photograph,
    // with the tiling of the requested geometry class.
    {
        let image_path = std::env::temp_dir().join("stonescope_pipeline_swatch.png");
        let swatch = image::RgbaImage::from_pixel(8, 8, image::Rgba([180, 172, 160, 255]));
        swatch.save(&image_path).expect("write test image");
        let url = image_path.to_str().expect("utf8 temp path").to_string();

        with_context_mut(|ctx| ctx.session.reset());
        let request = with_context_mut(|ctx| {
            ctx.session
                .start(descriptor("Crema Marfil", &url), GeometryKind::KitchenCounter)
        });
        let LoadRequest::FetchTexture { generation, url } = request else {
            panic!("expected a texture fetch");
        };

        let texture_result = loader::fetch_texture(&url);
        let raster = texture_result.as_ref().expect("decode test image");
        assert_eq!((raster.width(), raster.height()), (8, 8));

        let follow_up =
            with_context_mut(|ctx| ctx.session.texture_loaded(generation, texture_result))
                .expect("live generation");
        assert_eq!(texture_source(), Some(SourceKind::Photograph));

        let LoadRequest::FetchGeometry { generation, path } = follow_up else {
            panic!("expected a geometry fetch");
        };
        let geometry_result = loader::fetch_geometry(&path, GeometryKind::KitchenCounter);
        with_context_mut(|ctx| ctx.session.geometry_loaded(generation, geometry_result))
            .expect("live generation");

        assert_eq!(viewer_state(), Some(SessionState::Ready));
        assert_eq!(load_progress(), Some(100));
        with_context(|ctx| {
            let material = ctx.session.material().expect("material bound");
            assert_eq!(material.tiling.repeat_u, 3.0);
            assert_eq!(material.tiling.repeat_v, 1.5);
        });

        let _ = std::fs::remove_file(&image_path);
    }

    shutdown();
    assert!(!is_initialized());
}
