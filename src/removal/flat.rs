use image::RgbaImage;

use super::types::{BackgroundRemover, RemovalStats, CLEARED};

/// Global threshold remover.
///
/// Classifies every pixel independently against the top-left reference
/// color: any pixel within the per-channel tolerance goes transparent no
/// matter where it sits. Subject pixels that happen to share the background
/// color are lost too, which is exactly the false positive the connected
/// remover exists to avoid.
pub struct FlatRemover {
    tolerance: u32,
}

impl FlatRemover {
    pub fn new(tolerance: u32) -> Self {
        Self { tolerance }
    }
}

impl BackgroundRemover for FlatRemover {
    fn remove(&self, image: &mut RgbaImage) -> RemovalStats {
        if image.width() == 0 || image.height() == 0 {
            return RemovalStats::default();
        }

        let reference = *image.get_pixel(0, 0);
        let mut cleared = 0usize;
        for pixel in image.pixels_mut() {
            let close = pixel
                .0
                .iter()
                .zip(reference.0.iter())
                .all(|(&a, &b)| u32::from(a.abs_diff(b)) < self.tolerance);
            if close {
                *pixel = CLEARED;
                cleared += 1;
            }
        }

        RemovalStats {
            palette_colors: 1,
            cleared_pixels: cleared,
        }
    }
}
