//! Configuration options for stonescope.

use serde::{Deserialize, Serialize};

/// Global configuration options for stonescope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Directory containing product surface photographs, used when a
    /// descriptor carries no usable image and the fallback path must be
    /// constructed from the product name.
    pub texture_dir: String,

    /// Directory containing geometry assets, addressed per geometry kind.
    pub model_dir: String,

    /// Edge length of synthesized fallback textures, in pixels.
    pub synth_texture_size: u32,

    /// Seed used for procedural synthesis when the input descriptor is
    /// degenerate (no images, no name). Fixed so degenerate products all
    /// render the same default stone.
    pub default_synth_seed: u64,

    /// Total budget for the shared resource cache, in megabytes.
    pub cache_budget_mb: f32,

    /// Background color of the viewer, linear RGB.
    pub background_color: [f32; 3],

    /// Maximum frames per second (0 = uncapped).
    pub max_fps: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            texture_dir: "textures".to_string(),
            model_dir: "models".to_string(),
            synth_texture_size: 512,
            default_synth_seed: 0x5705,
            cache_budget_mb: 256.0,
            background_color: [0.92, 0.92, 0.93],
            max_fps: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();
        assert_eq!(opts.texture_dir, "textures");
        assert_eq!(opts.synth_texture_size, 512);
        assert!(opts.cache_budget_mb > 0.0);
    }

    #[test]
    fn test_options_roundtrip_json() {
        let opts = Options::default();
        let json = serde_json::to_string(&opts).unwrap();
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back.texture_dir, opts.texture_dir);
        assert_eq!(back.cache_budget_mb, opts.cache_budget_mb);
    }
}
