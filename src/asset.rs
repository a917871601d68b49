use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use thiserror::Error;

use crate::removal::{BackgroundRemover, RemovalStats};

/// Per-file failure kinds for the asset batch. Each failure is terminal for
/// its own file only; the batch loop reports it and moves on.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decode an on-disk asset into an RGBA buffer.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_owned(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_owned(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// Encode the processed buffer back over the source path as PNG, keeping
/// the alpha channel.
pub fn save_png(path: &Path, image: &RgbaImage) -> Result<(), AssetError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| AssetError::Encode {
            path: path.to_owned(),
            source,
        })
}

/// Load, run the remover, save in place. The on-disk file is untouched
/// unless the save step is reached.
pub fn process_file(
    path: &Path,
    remover: &dyn BackgroundRemover,
) -> Result<RemovalStats, AssetError> {
    let mut image = load_rgba(path)?;
    let stats = remover.remove(&mut image);
    save_png(path, &image)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::removal;
    use image::Rgba;

    #[test]
    fn processes_an_asset_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset.png");
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        img.put_pixel(4, 4, Rgba([180, 40, 40, 255]));
        img.save(&path).unwrap();

        let remover = removal::create_default_remover(30, 4);
        let stats = process_file(&path, remover.as_ref()).unwrap();
        assert_eq!(stats.cleared_pixels, 63);

        let processed = load_rgba(&path).unwrap();
        assert_eq!(processed.get_pixel(0, 0).0[3], 0);
        assert_eq!(*processed.get_pixel(4, 4), Rgba([180, 40, 40, 255]));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_rgba(Path::new("/nonexistent/asset.png")).unwrap_err();
        assert!(matches!(err, AssetError::Read { .. }));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = load_rgba(&path).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
        // The broken file is left as it was.
        assert_eq!(std::fs::read(&path).unwrap(), b"definitely not a png");
    }
}
