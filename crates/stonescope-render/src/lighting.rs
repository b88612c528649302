//! Showroom light rig.
//!
//! A fixed three-point setup (key, fill, rim) tuned for polished stone:
//! the key light drives the clearcoat highlight, the fill keeps speckle
//! detail readable in shadowed areas, and the rim separates the piece from
//! the background.

use glam::Vec3;

/// One directional light.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Direction the light travels, normalized.
    pub direction: Vec3,
    /// Linear RGB color.
    pub color: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
}

/// The complete light rig for the viewer scene.
#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    /// Main light, above and in front of the piece.
    pub key: DirectionalLight,
    /// Soft opposite-side fill.
    pub fill: DirectionalLight,
    /// Back rim light for silhouette separation.
    pub rim: DirectionalLight,
    /// Ambient term, linear RGB.
    pub ambient: Vec3,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            key: DirectionalLight {
                direction: Vec3::new(-0.4, -1.0, -0.6).normalize(),
                color: Vec3::new(1.0, 0.98, 0.94),
                intensity: 1.6,
            },
            fill: DirectionalLight {
                direction: Vec3::new(0.7, -0.3, 0.4).normalize(),
                color: Vec3::new(0.9, 0.93, 1.0),
                intensity: 0.5,
            },
            rim: DirectionalLight {
                direction: Vec3::new(0.0, -0.2, 1.0).normalize(),
                color: Vec3::ONE,
                intensity: 0.35,
            },
            ambient: Vec3::splat(0.12),
        }
    }
}

impl LightRig {
    /// Packs the rig into the GPU uniform layout.
    #[must_use]
    pub fn to_uniforms(&self) -> LightUniforms {
        let pack = |light: &DirectionalLight| {
            let d = light.direction.normalize_or_zero();
            let c = light.color * light.intensity;
            ([d.x, d.y, d.z, 0.0], [c.x, c.y, c.z, 1.0])
        };
        let (key_dir, key_color) = pack(&self.key);
        let (fill_dir, fill_color) = pack(&self.fill);
        let (rim_dir, rim_color) = pack(&self.rim);
        LightUniforms {
            key_dir,
            key_color,
            fill_dir,
            fill_color,
            rim_dir,
            rim_color,
            ambient: [self.ambient.x, self.ambient.y, self.ambient.z, 1.0],
        }
    }
}

/// Light uniforms for GPU.
/// Note: layout must match WGSL `LightUniforms` exactly (112 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniforms {
    /// Key light direction (xyz, w unused).
    pub key_dir: [f32; 4],
    /// Key light color pre-multiplied by intensity.
    pub key_color: [f32; 4],
    /// Fill light direction.
    pub fill_dir: [f32; 4],
    /// Fill light color pre-multiplied by intensity.
    pub fill_color: [f32; 4],
    /// Rim light direction.
    pub rim_dir: [f32; 4],
    /// Rim light color pre-multiplied by intensity.
    pub rim_color: [f32; 4],
    /// Ambient color.
    pub ambient: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_uniforms_size() {
        let size = std::mem::size_of::<LightUniforms>();
        assert_eq!(size % 16, 0, "uniforms must be 16-byte aligned");
        assert_eq!(size, 112);
    }

    #[test]
    fn test_default_rig_directions_normalized() {
        let rig = LightRig::default();
        for light in [&rig.key, &rig.fill, &rig.rim] {
            assert!((light.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_uniforms_premultiply_intensity() {
        let rig = LightRig::default();
        let uniforms = rig.to_uniforms();
        let expected = rig.key.color * rig.key.intensity;
        assert!((uniforms.key_color[0] - expected.x).abs() < 1e-6);
    }
}
