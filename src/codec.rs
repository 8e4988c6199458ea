//! File loading and JPEG/PNG encoding around the compositing core.
//!
//! Thin plumbing: decoding sniffs the format from file content (never the
//! extension) via the `image` crate, encoding writes to any [`io::Write`]
//! sink. Failures propagate verbatim with the offending path attached;
//! nothing is logged and nothing is retried — a corrupt decode or a closed
//! descriptor cannot succeed on a second attempt.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use thiserror::Error;

use crate::compose::{MergeOptions, merge};
use crate::raster::{BoundsError, Color, PixelBuffer, Raster};

/// Fallback JPEG quality when the requested value is outside `1..=100`.
const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Failure at the file/format boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A pixel access failed while compositing or serializing a raster
    /// that violates its dimension contract.
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    /// File open or read failure. Loading stops at the first one; there
    /// are no partial results.
    #[error("failed to read {path}")]
    Io {
        /// Path of the file that failed to open or read.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: io::Error,
    },

    /// Unrecognized or corrupt image data.
    #[error("failed to decode {path}")]
    Decode {
        /// Path of the file that failed to decode.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: image::ImageError,
    },

    /// Sink write failure during encoding.
    #[error("failed to encode image")]
    Encode(#[source] image::ImageError),
}

/// Decoded images satisfy the raster contract directly, so files loaded
/// through the `image` crate mix with memory buffers in one compositing call.
impl Raster for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn color_at(&self, x: u32, y: u32) -> Result<Color, BoundsError> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return Err(BoundsError {
                x,
                y,
                width,
                height,
            });
        }
        let [r, g, b, a] = self.get_pixel(x, y).0;
        Ok(Color::rgba8(r, g, b, a))
    }
}

/// Load images from files and merge them.
///
/// Each file is read fully, decoded with content sniffing, and converted to
/// RGBA before being handed to [`merge`]. The first open, read, or decode
/// failure aborts the whole call with the offending path.
pub fn merge_paths<P: AsRef<Path>>(
    paths: &[P],
    opts: &MergeOptions,
) -> Result<PixelBuffer, CodecError> {
    let mut decoded = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let img = image::load_from_memory(&bytes).map_err(|source| CodecError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        decoded.push(img.to_rgba8());
    }
    let refs: Vec<&dyn Raster> = decoded.iter().map(|img| img as &dyn Raster).collect();
    Ok(merge(&refs, opts)?)
}

/// Encode a raster as JPEG into `sink`.
///
/// `quality` outside `1..=100` falls back to 85. JPEG carries no alpha
/// channel; the alpha of every pixel is dropped.
pub fn save_jpeg<W: Write>(raster: &dyn Raster, sink: W, quality: u8) -> Result<(), CodecError> {
    let quality = if (1..=100).contains(&quality) {
        quality
    } else {
        DEFAULT_JPEG_QUALITY
    };
    let (width, height, rgba) = rgba_bytes(raster)?;
    let rgb: Vec<u8> = rgba
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    JpegEncoder::new_with_quality(sink, quality)
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(CodecError::Encode)
}

/// Encode a raster as lossless RGBA PNG into `sink`.
pub fn save_png<W: Write>(raster: &dyn Raster, sink: W) -> Result<(), CodecError> {
    let (width, height, rgba) = rgba_bytes(raster)?;
    PngEncoder::new(sink)
        .write_image(&rgba, width, height, ExtendedColorType::Rgba8)
        .map_err(CodecError::Encode)
}

/// Serialize a raster to tightly packed 8-bit RGBA, row-major.
fn rgba_bytes(raster: &dyn Raster) -> Result<(u32, u32, Vec<u8>), BoundsError> {
    let (width, height) = (raster.width(), raster.height());
    let mut bytes = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            bytes.extend_from_slice(&raster.color_at(x, y)?.to_rgba8());
        }
    }
    Ok((width, height, bytes))
}
