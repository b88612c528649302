//! Texture resolution: decides which source image represents a product's
//! surface.
//!
//! Resolution is a pure function of the descriptor with a strict precedence
//! order; it never performs I/O. A returned path is not verified to exist -
//! a miss surfaces later as an image-load error, which the session recovers
//! from by synthesizing a procedural texture.

use crate::descriptor::{ImageRole, SurfaceDescriptor};

/// Resolves the image URL for a product surface.
///
/// Precedence, first match wins:
/// 1. the candidate with role `primary`;
/// 2. the first candidate in list order, any role;
/// 3. a deterministic fallback path built from the slugified display name
///    under `texture_dir`.
///
/// Returns `None` only for a degenerate descriptor (no images and no name);
/// callers treat `None` as "go straight to procedural synthesis".
#[must_use]
pub fn resolve(descriptor: &SurfaceDescriptor, texture_dir: &str) -> Option<String> {
    if let Some(primary) = descriptor
        .candidate_images
        .iter()
        .find(|c| c.role == ImageRole::Primary)
    {
        return Some(primary.url.clone());
    }

    if let Some(first) = descriptor.candidate_images.first() {
        return Some(first.url.clone());
    }

    let slug = slugify(&descriptor.display_name);
    if slug.is_empty() {
        return None;
    }
    Some(format!("{texture_dir}/{slug}.jpg"))
}

/// Slugifies a display name for fallback path construction.
///
/// Lowercases, keeps ASCII alphanumerics, and collapses every other run of
/// characters into a single `-`. Leading/trailing separators are trimmed.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CandidateImage;

    fn candidate(url: &str, role: ImageRole) -> CandidateImage {
        CandidateImage {
            url: url.into(),
            role,
        }
    }

    #[test]
    fn test_primary_wins_regardless_of_position() {
        let desc = SurfaceDescriptor::new(
            "p",
            "Black Galaxy",
            vec![
                candidate("sec.jpg", ImageRole::Secondary),
                candidate("prim.jpg", ImageRole::Primary),
                candidate("gal.jpg", ImageRole::Gallery),
            ],
        );
        assert_eq!(resolve(&desc, "textures").as_deref(), Some("prim.jpg"));
    }

    #[test]
    fn test_first_candidate_when_no_primary() {
        let desc = SurfaceDescriptor::new(
            "p",
            "Tan Brown",
            vec![
                candidate("gal.jpg", ImageRole::Gallery),
                candidate("tex.jpg", ImageRole::Texture),
            ],
        );
        assert_eq!(resolve(&desc, "textures").as_deref(), Some("gal.jpg"));
    }

    #[test]
    fn test_slug_fallback_from_display_name() {
        let desc = SurfaceDescriptor::new("p", "Kashmir White", vec![]);
        assert_eq!(
            resolve(&desc, "textures").as_deref(),
            Some("textures/kashmir-white.jpg")
        );
    }

    #[test]
    fn test_degenerate_resolves_to_none() {
        let desc = SurfaceDescriptor::default();
        assert_eq!(resolve(&desc, "textures"), None);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Kashmir White"), "kashmir-white");
        assert_eq!(slugify("  Black   Galaxy  "), "black-galaxy");
        assert_eq!(slugify("R/B-12 (Polished)"), "r-b-12-polished");
        assert_eq!(slugify("___"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_resolve_is_pure() {
        let desc = SurfaceDescriptor::new("p", "Alaska Gold", vec![]);
        let a = resolve(&desc, "textures");
        let b = resolve(&desc, "textures");
        assert_eq!(a, b);
    }
}
