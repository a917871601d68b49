use std::collections::HashMap;

use image::RgbaImage;

use super::types::{Palette, PaletteStrategy};

/// How many ranked colors the dominant sampler keeps.
const DOMINANT_KEEP: usize = 5;

/// Collects the distinct colors of the top-left sample region.
///
/// Checkerboard backgrounds and their anti-aliased variants collapse to a
/// handful of representative colors under the dedup tolerance.
pub struct CornerSampler {
    sample_size: u32,
    tolerance: u32,
}

impl CornerSampler {
    /// # Arguments
    /// * `sample_size` - Edge length of the corner region; clamped per axis
    ///   to the image dimensions
    /// * `tolerance` - Channel-sum distance below which two sampled colors
    ///   collapse into one palette entry
    pub fn new(sample_size: u32, tolerance: u32) -> Self {
        Self {
            sample_size,
            tolerance,
        }
    }
}

impl PaletteStrategy for CornerSampler {
    fn detect(&self, image: &RgbaImage) -> Palette {
        let (width, height) = image.dimensions();
        let sample_w = self.sample_size.min(width);
        let sample_h = self.sample_size.min(height);

        // Row-major scan keeps the palette order deterministic.
        let mut palette = Palette::default();
        for y in 0..sample_h {
            for x in 0..sample_w {
                palette.push_distinct(*image.get_pixel(x, y), self.tolerance);
            }
        }

        tracing::debug!(
            "Corner sample: {} distinct background colors: {:?}",
            palette.len(),
            palette.colors()
        );
        palette
    }
}

/// Ranks corner-region colors by frequency and keeps the most common few.
///
/// More forgiving than `CornerSampler` on noisy exports where compression
/// scatters one-off colors through the corner block.
pub struct DominantColorSampler {
    sample_size: u32,
}

impl DominantColorSampler {
    pub fn new(sample_size: u32) -> Self {
        Self { sample_size }
    }
}

impl PaletteStrategy for DominantColorSampler {
    fn detect(&self, image: &RgbaImage) -> Palette {
        let (width, height) = image.dimensions();
        let sample_w = self.sample_size.min(width);
        let sample_h = self.sample_size.min(height);

        let mut counts: HashMap<[u8; 4], usize> = HashMap::new();
        for y in 0..sample_h {
            for x in 0..sample_w {
                *counts.entry(image.get_pixel(x, y).0).or_insert(0) += 1;
            }
        }

        // Highest count first; color bytes break ties so the ranking is stable.
        let mut ranked: Vec<([u8; 4], usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut palette = Palette::default();
        for (color, _) in ranked.into_iter().take(DOMINANT_KEEP) {
            palette.push_distinct(image::Rgba(color), 0);
        }

        tracing::debug!(
            "Dominant sample: targeting {} background colors: {:?}",
            palette.len(),
            palette.colors()
        );
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const GRAY: Rgba<u8> = Rgba([200, 200, 200, 255]);

    #[test]
    fn oversize_region_clamps_to_image_bounds() {
        let img = RgbaImage::from_pixel(3, 3, WHITE);
        let palette = CornerSampler::new(20, 30).detect(&img);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.colors()[0], WHITE);
    }

    #[test]
    fn near_duplicates_collapse_to_one_entry() {
        let mut img = RgbaImage::from_pixel(2, 2, WHITE);
        img.put_pixel(1, 0, Rgba([250, 250, 250, 255]));
        let palette = CornerSampler::new(2, 30).detect(&img);
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn checkerboard_yields_both_colors_in_scan_order() {
        let img = RgbaImage::from_fn(4, 4, |x, y| if (x + y) % 2 == 0 { WHITE } else { GRAY });
        let palette = CornerSampler::new(4, 30).detect(&img);
        assert_eq!(palette.colors(), &[WHITE, GRAY]);
    }

    #[test]
    fn region_outside_sample_never_contributes() {
        let mut img = RgbaImage::from_pixel(8, 8, WHITE);
        img.put_pixel(6, 6, Rgba([10, 10, 10, 255]));
        let palette = CornerSampler::new(4, 30).detect(&img);
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn dominant_sampler_caps_the_palette_and_ranks_by_count() {
        // Six distinct colors in a 4x2 corner block; red appears three times.
        let red = Rgba([200, 0, 0, 255]);
        let mut img = RgbaImage::from_pixel(4, 2, red);
        img.put_pixel(1, 0, Rgba([0, 10, 0, 255]));
        img.put_pixel(2, 0, Rgba([0, 20, 0, 255]));
        img.put_pixel(3, 0, Rgba([0, 30, 0, 255]));
        img.put_pixel(1, 1, Rgba([0, 40, 0, 255]));
        img.put_pixel(2, 1, Rgba([0, 50, 0, 255]));

        let palette = DominantColorSampler::new(4).detect(&img);
        assert_eq!(palette.len(), 5);
        assert_eq!(palette.colors()[0], red);
    }

    #[test]
    fn zero_sample_size_yields_an_empty_palette() {
        let img = RgbaImage::from_pixel(4, 4, WHITE);
        assert!(CornerSampler::new(0, 30).detect(&img).is_empty());
    }
}
