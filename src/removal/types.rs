use image::{Rgba, RgbaImage};

/// Color written over every removed pixel.
pub const CLEARED: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Channel-sum absolute difference between two colors.
///
/// All four RGBA channels participate. A cleared pixel (0,0,0,0) is at
/// least 255 away from every opaque color, so reprocessing an already
/// stripped asset cannot pull dark subject pixels into the background
/// class. On fully opaque inputs the alpha term is always zero.
pub fn color_distance(a: Rgba<u8>, b: Rgba<u8>) -> u32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| (i32::from(x) - i32::from(y)).unsigned_abs())
        .sum()
}

/// Ordered set of colors treated as background for matching.
#[derive(Debug, Default, Clone)]
pub struct Palette {
    colors: Vec<Rgba<u8>>,
}

impl Palette {
    /// Accept `color` only if it is distinct from every color already in
    /// the palette: not an exact duplicate, and at channel-sum distance of
    /// at least `tolerance`. Returns whether it was added.
    pub fn push_distinct(&mut self, color: Rgba<u8>, tolerance: u32) -> bool {
        let duplicate = self
            .colors
            .iter()
            .any(|&c| c == color || color_distance(c, color) < tolerance);
        if duplicate {
            return false;
        }
        self.colors.push(color);
        true
    }

    /// Whether `color` counts as background.
    ///
    /// Distance strictly below `tolerance` means background; a distance
    /// exactly equal to the tolerance is subject matter.
    pub fn matches(&self, color: Rgba<u8>, tolerance: u32) -> bool {
        self.colors
            .iter()
            .any(|&c| color_distance(c, color) < tolerance)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgba<u8>] {
        &self.colors
    }
}

/// Derives the set of colors to treat as background for one image.
///
/// The flood remover runs detection once per call, before traversal, so
/// strategies see the unmodified input.
pub trait PaletteStrategy {
    fn detect(&self, image: &RgbaImage) -> Palette;
}

/// One background-removal pass over an image buffer.
pub trait BackgroundRemover {
    /// Mutate `image` in place, clearing background pixels to transparent.
    fn remove(&self, image: &mut RgbaImage) -> RemovalStats;
}

/// Counters reported by one removal pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemovalStats {
    /// Distinct colors targeted as background.
    pub palette_colors: usize,
    /// Pixels written transparent.
    pub cleared_pixels: usize,
}
