//! Procedural granite texture synthesis.
//!
//! When a product photograph cannot be fetched or decoded (or the descriptor
//! never had one), the viewer synthesizes a plausible polished-granite
//! surface instead: a soft diagonal sheen gradient, a dense layer of dark
//! mineral speckles, and a handful of faint veins to break up the speckle
//! uniformity.
//!
//! Synthesis is driven by an explicit seedable PRNG so that a fixed seed
//! produces byte-identical output; the unseeded path draws a fresh entropy
//! seed and makes no such promise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::raster::Raster;

/// Number of speckle disks layered over the base gradient. Dominates the
/// visual cost of a synthesized texture.
pub const SPECKLE_COUNT: usize = 3000;

/// Number of vein polylines layered over the speckles.
pub const VEIN_COUNT: usize = 15;

/// Light neutral stops of the diagonal sheen gradient, corner to corner.
const GRADIENT_STOPS: [[u8; 3]; 4] = [
    [232, 228, 222],
    [210, 205, 198],
    [225, 221, 214],
    [201, 197, 191],
];

/// Dark-neutral mineral palette for speckles.
const SPECKLE_PALETTE: [[u8; 3]; 5] = [
    [40, 38, 36],
    [62, 58, 54],
    [30, 30, 33],
    [82, 76, 70],
    [52, 50, 48],
];

/// Vein stroke color.
const VEIN_COLOR: [u8; 3] = [196, 193, 188];

/// Synthesizes a granite-like raster.
///
/// With `Some(seed)` the output is byte-identical for identical arguments;
/// with `None` a fresh entropy seed is drawn and no determinism is promised.
#[must_use]
pub fn synthesize(width: u32, height: u32, seed: Option<u64>) -> Raster {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut raster = Raster::filled(width.max(1), height.max(1), [0, 0, 0, 255]);
    paint_gradient(&mut raster);
    paint_speckles(&mut raster, &mut rng);
    paint_veins(&mut raster, &mut rng);
    raster
}

/// Fills the base with a 4-stop gradient across the main diagonal,
/// simulating uneven polish sheen.
fn paint_gradient(raster: &mut Raster) {
    let (w, h) = raster.dimensions();
    let span = (w + h).saturating_sub(2).max(1) as f32;

    for y in 0..h {
        for x in 0..w {
            let t = (x + y) as f32 / span;
            raster.put(x, y, sample_gradient(t));
        }
    }
}

/// Samples the 4-stop gradient at `t` in `[0, 1]`.
fn sample_gradient(t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (GRADIENT_STOPS.len() - 1) as f32;
    let i = (scaled.floor() as usize).min(GRADIENT_STOPS.len() - 2);
    let frac = scaled - i as f32;

    let a = GRADIENT_STOPS[i];
    let b = GRADIENT_STOPS[i + 1];
    let lerp = |p: u8, q: u8| -> u8 {
        (f32::from(p) + (f32::from(q) - f32::from(p)) * frac + 0.5).floor() as u8
    };
    [lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2]), 255]
}

/// Layers randomly placed mineral speckle disks.
fn paint_speckles(raster: &mut Raster, rng: &mut StdRng) {
    let (w, h) = raster.dimensions();

    for _ in 0..SPECKLE_COUNT {
        let cx = rng.gen_range(0.0..w as f32);
        let cy = rng.gen_range(0.0..h as f32);
        let radius = rng.gen_range(0.4..2.4_f32);
        let opacity = rng.gen_range(0.25..0.85_f32);
        let color = SPECKLE_PALETTE[rng.gen_range(0..SPECKLE_PALETTE.len())];

        fill_disk(raster, cx, cy, radius, color, opacity);
    }
}

/// Layers faint open polylines ("veins"), each a short random walk.
fn paint_veins(raster: &mut Raster, rng: &mut StdRng) {
    let (w, h) = raster.dimensions();
    let step = (w.min(h) as f32 * 0.25).max(4.0);

    for _ in 0..VEIN_COUNT {
        let points = rng.gen_range(3..=5_usize);
        let opacity = rng.gen_range(0.08..0.2_f32);

        let mut x = rng.gen_range(0.0..w as f32);
        let mut y = rng.gen_range(0.0..h as f32);

        for _ in 1..points {
            let nx = x + rng.gen_range(-step..step);
            let ny = y + rng.gen_range(-step..step);
            draw_line(raster, x, y, nx, ny, VEIN_COLOR, opacity);
            x = nx;
            y = ny;
        }
    }
}

/// Fills a solid disk, alpha-blended.
fn fill_disk(raster: &mut Raster, cx: f32, cy: f32, radius: f32, color: [u8; 3], opacity: f32) {
    let r2 = radius * radius;
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(raster.width().saturating_sub(1));
    let y1 = ((cy + radius).ceil() as u32).min(raster.height().saturating_sub(1));

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                raster.blend(x, y, color, opacity);
            }
        }
    }
}

/// Draws a 1px line by uniform stepping, alpha-blended. Endpoints outside
/// the raster are clipped per pixel.
fn draw_line(raster: &mut Raster, x0: f32, y0: f32, x1: f32, y1: f32, color: [u8; 3], opacity: f32) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;

    let mut last: Option<(u32, u32)> = None;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = x0 + dx * t;
        let y = y0 + dy * t;
        if x < 0.0 || y < 0.0 {
            continue;
        }
        let px = (x.floor() as u32, y.floor() as u32);
        // Stepping can land on the same pixel twice; blending it twice
        // would double its weight.
        if last != Some(px) {
            raster.blend(px.0, px.1, color, opacity);
            last = Some(px);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_synthesize_dimensions() {
        let r = synthesize(64, 32, Some(1));
        assert_eq!(r.dimensions(), (64, 32));
    }

    #[test]
    fn test_seeded_synthesis_is_deterministic() {
        let a = synthesize(96, 96, Some(42));
        let b = synthesize(96, 96, Some(42));
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = synthesize(96, 96, Some(1));
        let b = synthesize(96, 96, Some(2));
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_zero_size_clamps_to_one() {
        let r = synthesize(0, 0, Some(7));
        assert_eq!(r.dimensions(), (1, 1));
    }

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(
            sample_gradient(0.0),
            [
                GRADIENT_STOPS[0][0],
                GRADIENT_STOPS[0][1],
                GRADIENT_STOPS[0][2],
                255
            ]
        );
        assert_eq!(
            sample_gradient(1.0),
            [
                GRADIENT_STOPS[3][0],
                GRADIENT_STOPS[3][1],
                GRADIENT_STOPS[3][2],
                255
            ]
        );
    }

    #[test]
    fn test_output_is_opaque() {
        let r = synthesize(32, 32, Some(5));
        for chunk in r.as_bytes().chunks_exact(4) {
            assert_eq!(chunk[3], 255);
        }
    }

    proptest! {
        // Determinism must hold for arbitrary seeds and sizes, not just
        // hand-picked ones.
        #[test]
        fn prop_seeded_determinism(seed in any::<u64>(), w in 1u32..64, h in 1u32..64) {
            let a = synthesize(w, h, Some(seed));
            let b = synthesize(w, h, Some(seed));
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }
    }
}
