//! JPEG output for captured frames.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageError, ImageResult, RgbImage};

use crate::error::{ScaprError, ScaprResult};

/// Convert a captured frame to the 3-channel layout JPEG can hold.
///
/// Frames carrying an alpha channel come from external screenshot helpers
/// (gnome-screenshot and grim both return RGBA PNGs). JPEG has no alpha, so
/// the channel is dropped; color values are left untouched.
pub fn prepare_for_jpeg(image: DynamicImage) -> RgbImage {
    if image.color().has_alpha() {
        tracing::debug!(color = ?image.color(), "dropping alpha channel before JPEG encoding");
        return image.to_rgb8();
    }
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

/// Encode an RGB frame as JPEG into `writer`
pub fn encode_jpeg<W: Write>(image: &RgbImage, writer: W, quality: u8) -> ImageResult<()> {
    JpegEncoder::new_with_quality(writer, quality).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )
}

/// Write a captured frame to `path` as JPEG
pub fn save_jpeg(image: DynamicImage, path: &Path, quality: u8) -> ScaprResult<()> {
    let encode_error = |source: ImageError| ScaprError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let rgb = prepare_for_jpeg(image);
    let file = File::create(path).map_err(|e| encode_error(ImageError::IoError(e)))?;
    let mut writer = BufWriter::new(file);
    encode_jpeg(&rgb, &mut writer, quality).map_err(encode_error)?;
    writer
        .flush()
        .map_err(|e| encode_error(ImageError::IoError(e)))?;
    Ok(())
}
