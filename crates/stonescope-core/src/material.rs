//! Material building: turns a resolved raster into a complete PBR-like
//! material description.
//!
//! The viewer always renders one stone type on one object, so a build
//! produces a single shared material instance: diffuse map, a normal map
//! derived from the diffuse, the fixed "polished stone" parameter set, and
//! a tiling policy chosen by the target geometry class. Materials are
//! rebuilt and swapped, never mutated while bound.

use serde::{Deserialize, Serialize};

use crate::raster::Raster;

/// The class of geometry the material will be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometryKind {
    /// A flat rectangular display piece showing the full pattern.
    Slab,
    /// A long, shallow countertop surface.
    KitchenCounter,
    /// A smaller vanity surface.
    BathroomVanity,
    /// The procedurally generated slab used when a model fails to load.
    ProceduralFallback,
}

impl GeometryKind {
    /// Conventional asset path for this geometry class, under the
    /// configured model directory.
    #[must_use]
    pub fn asset_path(self, model_dir: &str) -> String {
        let file = match self {
            GeometryKind::Slab | GeometryKind::ProceduralFallback => "slab.obj",
            GeometryKind::KitchenCounter => "kitchen-counter.obj",
            GeometryKind::BathroomVanity => "bathroom-vanity.obj",
        };
        format!("{model_dir}/{file}")
    }

    /// UV tiling policy for this geometry class.
    ///
    /// Domain-authored constants: a slab shows the full pattern untiled, a
    /// kitchen counter needs horizontal repetition across its length, a
    /// vanity sits in between.
    #[must_use]
    pub fn tiling(self) -> Tiling {
        match self {
            GeometryKind::Slab | GeometryKind::ProceduralFallback => Tiling {
                repeat_u: 1.0,
                repeat_v: 1.0,
            },
            GeometryKind::KitchenCounter => Tiling {
                repeat_u: 3.0,
                repeat_v: 1.5,
            },
            GeometryKind::BathroomVanity => Tiling {
                repeat_u: 2.0,
                repeat_v: 1.0,
            },
        }
    }
}

/// How many times the texture repeats across the UV range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tiling {
    /// Horizontal repeat count.
    pub repeat_u: f32,
    /// Vertical repeat count.
    pub repeat_v: f32,
}

/// Where a resolved texture came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// A fetched and decoded product photograph.
    Photograph,
    /// Synthesized granite (fetch failed or was never attempted).
    Procedural,
    /// A neutral placeholder raster.
    Placeholder,
}

/// Output of texture resolution, input to material build.
///
/// Created per viewer session and owned exclusively by the material builder
/// until consumed into a [`MaterialDescriptor`].
#[derive(Debug, Clone)]
pub struct ResolvedTexture {
    /// Provenance of the raster.
    pub source_kind: SourceKind,
    /// Decoded image data.
    pub raster: Raster,
}

/// Fixed surface parameters encoding "polished stone".
///
/// These are a visual target, not user input: low roughness and a strong
/// clear coat read as a polished granite finish. Tunable in one place,
/// applied uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoneFinish {
    pub roughness: f32,
    pub metalness: f32,
    pub reflectivity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub env_map_intensity: f32,
    /// Normal map strength, applied on both axes.
    pub normal_strength: f32,
}

/// The polished-granite finish constant table.
pub const POLISHED_STONE: StoneFinish = StoneFinish {
    roughness: 0.15,
    metalness: 0.05,
    reflectivity: 0.8,
    clearcoat: 0.9,
    clearcoat_roughness: 0.1,
    env_map_intensity: 0.6,
    normal_strength: 0.3,
};

/// A complete PBR-like material description, ready for GPU upload.
#[derive(Debug, Clone)]
pub struct MaterialDescriptor {
    /// Diffuse color map.
    pub diffuse: Raster,
    /// Normal map derived from the diffuse raster.
    pub normal: Raster,
    /// UV tiling policy for the target geometry class.
    pub tiling: Tiling,
    /// Surface finish parameters.
    pub finish: StoneFinish,
    /// Provenance of the diffuse map, for diagnostics.
    pub source_kind: SourceKind,
}

/// Builds a material from a resolved texture and a target geometry class.
///
/// The input raster is not mutated; the normal map is derived from a copy.
#[must_use]
pub fn build(resolved: &ResolvedTexture, kind: GeometryKind) -> MaterialDescriptor {
    let normal = derive_normal_map(&resolved.raster, POLISHED_STONE.normal_strength);
    MaterialDescriptor {
        diffuse: resolved.raster.clone(),
        normal,
        tiling: kind.tiling(),
        finish: POLISHED_STONE,
        source_kind: resolved.source_kind,
    }
}

/// Derives a tangent-space normal map from a diffuse raster, treating
/// luminance as height and applying a Sobel filter.
///
/// Output encodes XYZ in RGB as `[-1, 1] -> [0, 255]`; a flat surface maps
/// to the usual (128, 128, 255) blue.
#[must_use]
pub fn derive_normal_map(diffuse: &Raster, strength: f32) -> Raster {
    let (w, h) = diffuse.dimensions();
    let mut normal = Raster::filled(w, h, [128, 128, 255, 255]);

    // Clamped neighborhood sampling keeps the border well-defined without
    // assuming the texture tiles.
    let lum = |x: i64, y: i64| -> f32 {
        let cx = x.clamp(0, i64::from(w) - 1) as u32;
        let cy = y.clamp(0, i64::from(h) - 1) as u32;
        diffuse.luminance(cx, cy)
    };

    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (i64::from(x), i64::from(y));

            let tl = lum(xi - 1, yi - 1);
            let l = lum(xi - 1, yi);
            let bl = lum(xi - 1, yi + 1);
            let tr = lum(xi + 1, yi - 1);
            let r = lum(xi + 1, yi);
            let br = lum(xi + 1, yi + 1);
            let t = lum(xi, yi - 1);
            let b = lum(xi, yi + 1);

            // Sobel gradients; height increases with luminance.
            let gx = (tr + 2.0 * r + br) - (tl + 2.0 * l + bl);
            let gy = (bl + 2.0 * b + br) - (tl + 2.0 * t + tr);

            let nx = -gx * strength;
            let ny = -gy * strength;
            let nz = 1.0;
            let inv_len = 1.0 / (nx * nx + ny * ny + nz * nz).sqrt();

            let encode = |v: f32| -> u8 {
                ((v * inv_len * 0.5 + 0.5) * 255.0)
                    .round()
                    .clamp(0.0, 255.0) as u8
            };
            normal.put(x, y, [encode(nx), encode(ny), encode(nz), 255]);
        }
    }

    normal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(width: u32, height: u32, source_kind: SourceKind) -> ResolvedTexture {
        ResolvedTexture {
            source_kind,
            raster: Raster::filled(width, height, [180, 176, 170, 255]),
        }
    }

    #[test]
    fn test_tiling_table_exact_values() {
        let counter = build(&resolved(8, 8, SourceKind::Photograph), GeometryKind::KitchenCounter);
        assert_eq!(counter.tiling.repeat_u, 3.0);
        assert_eq!(counter.tiling.repeat_v, 1.5);

        let slab = build(&resolved(8, 8, SourceKind::Photograph), GeometryKind::Slab);
        assert_eq!(slab.tiling.repeat_u, 1.0);
        assert_eq!(slab.tiling.repeat_v, 1.0);

        let vanity = build(&resolved(8, 8, SourceKind::Photograph), GeometryKind::BathroomVanity);
        assert_eq!(vanity.tiling.repeat_u, 2.0);
        assert_eq!(vanity.tiling.repeat_v, 1.0);
    }

    #[test]
    fn test_polished_stone_constants() {
        assert_eq!(POLISHED_STONE.roughness, 0.15);
        assert_eq!(POLISHED_STONE.metalness, 0.05);
        assert_eq!(POLISHED_STONE.clearcoat, 0.9);
        assert_eq!(POLISHED_STONE.clearcoat_roughness, 0.1);
        assert_eq!(POLISHED_STONE.env_map_intensity, 0.6);
        // Polished stone means low roughness and a strong clear coat.
        assert!(POLISHED_STONE.roughness < 0.5);
        assert!(POLISHED_STONE.clearcoat > 0.5);
    }

    #[test]
    fn test_build_does_not_mutate_input() {
        let input = resolved(16, 16, SourceKind::Procedural);
        let before = input.raster.clone();
        let _ = build(&input, GeometryKind::Slab);
        assert_eq!(input.raster, before);
    }

    #[test]
    fn test_build_preserves_source_kind() {
        let mat = build(&resolved(8, 8, SourceKind::Procedural), GeometryKind::Slab);
        assert_eq!(mat.source_kind, SourceKind::Procedural);
    }

    #[test]
    fn test_flat_diffuse_gives_flat_normal() {
        let mat = build(&resolved(8, 8, SourceKind::Photograph), GeometryKind::Slab);
        // Uniform luminance has zero gradient everywhere.
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(mat.normal.get(x, y), [128, 128, 255, 255]);
            }
        }
    }

    #[test]
    fn test_normal_map_matches_diffuse_dimensions() {
        let mat = build(&resolved(32, 16, SourceKind::Photograph), GeometryKind::Slab);
        assert_eq!(mat.normal.dimensions(), mat.diffuse.dimensions());
    }

    #[test]
    fn test_normal_map_responds_to_edges() {
        let mut raster = Raster::filled(8, 8, [0, 0, 0, 255]);
        for y in 0..8 {
            for x in 4..8 {
                raster.put(x, y, [255, 255, 255, 255]);
            }
        }
        let input = ResolvedTexture {
            source_kind: SourceKind::Photograph,
            raster,
        };
        let mat = build(&input, GeometryKind::Slab);
        // The vertical luminance edge produces a non-neutral X component.
        let at_edge = mat.normal.get(4, 4);
        assert_ne!(at_edge[0], 128);
    }

    #[test]
    fn test_asset_paths() {
        assert_eq!(
            GeometryKind::KitchenCounter.asset_path("models"),
            "models/kitchen-counter.obj"
        );
        assert_eq!(GeometryKind::Slab.asset_path("assets"), "assets/slab.obj");
    }
}
