use std::collections::VecDeque;

use image::RgbaImage;
use ndarray::Array2;

use super::types::{BackgroundRemover, PaletteStrategy, RemovalStats, CLEARED};

/// Up, down, left, right. Diagonals do not connect regions.
const NEIGHBORS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Connected background remover.
///
/// Breadth-first traversal from the four image corners through pixels whose
/// color matches the detected background palette. Background visible only
/// inside an enclosed shape is never reached and stays opaque; that is what
/// separates this from global threshold replacement.
pub struct FloodRemover {
    strategy: Box<dyn PaletteStrategy>,
    tolerance: u32,
}

impl FloodRemover {
    /// # Arguments
    /// * `strategy` - Detects the background palette before traversal starts
    /// * `tolerance` - Channel-sum distance below which a pixel matches the
    ///   palette
    pub fn new(strategy: Box<dyn PaletteStrategy>, tolerance: u32) -> Self {
        Self {
            strategy,
            tolerance,
        }
    }

    fn seeds(width: u32, height: u32) -> [(u32, u32); 4] {
        [
            (0, 0),
            (width - 1, 0),
            (0, height - 1),
            (width - 1, height - 1),
        ]
    }
}

impl BackgroundRemover for FloodRemover {
    fn remove(&self, image: &mut RgbaImage) -> RemovalStats {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return RemovalStats::default();
        }

        let palette = self.strategy.detect(image);

        // Visited marks enqueued coordinates, so the queue never holds more
        // than width * height entries and every pixel is tested once.
        let mut visited = Array2::from_elem((height as usize, width as usize), false);
        let mut queue: VecDeque<(u32, u32)> = VecDeque::new();

        // Corners are background by convention and are cleared even when
        // they miss the palette. On degenerate images the corners coincide;
        // the mask keeps each coordinate enqueued once.
        for (x, y) in Self::seeds(width, height) {
            if !visited[[y as usize, x as usize]] {
                visited[[y as usize, x as usize]] = true;
                queue.push_back((x, y));
            }
        }

        let mut cleared = 0usize;
        while let Some((x, y)) = queue.pop_front() {
            image.put_pixel(x, y, CLEARED);
            cleared += 1;

            for (dx, dy) in NEIGHBORS {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                    continue;
                }
                let (nx, ny) = (nx as u32, ny as u32);
                if visited[[ny as usize, nx as usize]] {
                    continue;
                }
                if palette.matches(*image.get_pixel(nx, ny), self.tolerance) {
                    visited[[ny as usize, nx as usize]] = true;
                    queue.push_back((nx, ny));
                }
            }
        }

        RemovalStats {
            palette_colors: palette.len(),
            cleared_pixels: cleared,
        }
    }
}
