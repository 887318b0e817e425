//! Frame loading and saving for the command line driver.

use std::path::{Path, PathBuf};

use iris_core::Frame;

/// Load an image from disk as a display-encoded RGBA float frame.
///
/// Any format the `image` crate decodes is accepted; 8- and 16-bit sources
/// are normalized to `[0, 1]` without changing their transfer function.
pub fn load_frame(path: &Path) -> Result<Frame, ImageLoadError> {
    let img = image::open(path).map_err(|source| ImageLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let frame = Frame::from_dynamic(&img);
    tracing::info!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        frame.width,
        frame.height,
        img.color()
    );
    Ok(frame)
}

/// Quantize `frame` to RGBA8 and write it; the format follows the extension.
pub fn save_frame(frame: &Frame, path: &Path) -> Result<(), ImageLoadError> {
    let img = frame.to_rgba_image();
    let format = image::ImageFormat::from_path(path).map_err(|source| ImageLoadError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    // JPEG has no alpha channel.
    let result = if format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .save_with_format(path, format)
    } else {
        img.save_with_format(path, format)
    };
    result.map_err(|source| ImageLoadError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

/// Errors that can occur while reading or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}
