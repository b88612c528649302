//! Surface descriptors: the input contract for one product's visual surface.
//!
//! A [`SurfaceDescriptor`] is produced by the surrounding catalog service and
//! consumed read-only by the viewer core. It carries an ordered list of
//! candidate images, each tagged with the role it plays in the product
//! listing.

use serde::{Deserialize, Serialize};

/// The role an image plays in a product listing.
///
/// Resolution gives `Primary` strict precedence; all other roles rank by
/// list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageRole {
    /// The authoritative product photograph. At most one per descriptor.
    Primary,
    /// An alternate product photograph.
    Secondary,
    /// A gallery/context shot.
    Gallery,
    /// A close-up surface texture photograph.
    Texture,
    /// A texture prepared specifically for the 3D viewer.
    #[serde(rename = "3d-texture")]
    Texture3d,
}

/// One candidate image for a product surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateImage {
    /// Image address (URL or local path).
    pub url: String,
    /// Role of this image in the listing.
    pub role: ImageRole,
}

/// The input contract for one product's visual surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurfaceDescriptor {
    /// Opaque product identifier.
    pub product_id: String,
    /// Human label. Used only for deterministic fallback path construction
    /// and UI captions.
    pub display_name: String,
    /// Ordered candidate images.
    pub candidate_images: Vec<CandidateImage>,
}

impl SurfaceDescriptor {
    /// Creates a descriptor with a name and candidate images.
    pub fn new(
        product_id: impl Into<String>,
        display_name: impl Into<String>,
        candidate_images: Vec<CandidateImage>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            display_name: display_name.into(),
            candidate_images,
        }
    }

    /// Returns true if the descriptor carries neither images nor a name.
    ///
    /// Degenerate descriptors resolve to no URL and go straight to
    /// procedural synthesis with the default seed.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.candidate_images.is_empty() && self.display_name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_descriptor() {
        assert!(SurfaceDescriptor::default().is_degenerate());

        let named = SurfaceDescriptor::new("p1", "Kashmir White", vec![]);
        assert!(!named.is_degenerate());

        let with_image = SurfaceDescriptor::new(
            "p2",
            "",
            vec![CandidateImage {
                url: "a.jpg".into(),
                role: ImageRole::Gallery,
            }],
        );
        assert!(!with_image.is_degenerate());

        let whitespace_name = SurfaceDescriptor::new("p3", "   ", vec![]);
        assert!(whitespace_name.is_degenerate());
    }

    #[test]
    fn test_role_serde_kebab_case() {
        let role: ImageRole = serde_json::from_str("\"3d-texture\"").unwrap();
        assert_eq!(role, ImageRole::Texture3d);
        let json = serde_json::to_string(&ImageRole::Primary).unwrap();
        assert_eq!(json, "\"primary\"");
    }
}
