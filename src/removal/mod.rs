mod flat;
mod flood;
mod sampler;
pub mod types;

pub use flat::FlatRemover;
pub use flood::FloodRemover;
pub use sampler::{CornerSampler, DominantColorSampler};
pub use types::{BackgroundRemover, PaletteStrategy, RemovalStats};

/// Create the default remover: connected flood fill seeded at the image
/// corners, with the distinct-color corner sampler.
pub fn create_default_remover(tolerance: u32, sample_size: u32) -> Box<dyn BackgroundRemover> {
    Box::new(FloodRemover::new(
        Box::new(CornerSampler::new(sample_size, tolerance)),
        tolerance,
    ))
}
