//! Raster abstraction and the memory-backed pixel buffer.
//!
//! Compositing operations read and write pixels only through the [`Raster`]
//! and [`RasterMut`] contracts, never a concrete storage layout, so decoded
//! images, memory buffers, and test-synthetic sources all plug in uniformly.

use thiserror::Error;

/// An RGBA color sample with 16 bits of precision per channel.
///
/// Matches the 16-bit color model common raster APIs expose: 8-bit boundary
/// values expand by byte replication (`0xAB` → `0xABAB`), so 8-bit white maps
/// to full-scale white exactly and the round trip through
/// [`rgba8`](Self::rgba8)/[`to_rgba8`](Self::to_rgba8) is lossless.
///
/// Alpha `0` is fully transparent, [`MAX_CHANNEL`](Self::MAX_CHANNEL) fully
/// opaque. Equality is exact channel comparison, no tolerance.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u16,
    /// Green channel.
    pub g: u16,
    /// Blue channel.
    pub b: u16,
    /// Alpha channel. `0` = fully transparent.
    pub a: u16,
}

impl Color {
    /// Full-scale channel value (fully opaque alpha).
    pub const MAX_CHANNEL: u16 = u16::MAX;

    /// Transparent black `[0, 0, 0, 0]` — the zero value of a fresh buffer.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color from raw 16-bit channels.
    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit channels, expanding by byte replication.
    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: expand8(r),
            g: expand8(g),
            b: expand8(b),
            a: expand8(a),
        }
    }

    /// Contract to 8-bit channels `[r, g, b, a]` by truncating the low byte.
    pub const fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r >> 8) as u8,
            (self.g >> 8) as u8,
            (self.b >> 8) as u8,
            (self.a >> 8) as u8,
        ]
    }

    /// White, fully opaque.
    pub const fn white() -> Self {
        Self::rgba8(255, 255, 255, 255)
    }

    /// Black, fully opaque.
    pub const fn black() -> Self {
        Self::rgba8(0, 0, 0, 255)
    }
}

/// Expand an 8-bit channel to 16 bits by byte replication.
const fn expand8(c: u8) -> u16 {
    (c as u16) << 8 | c as u16
}

/// Pixel coordinate access outside a raster's extent.
///
/// A contract violation, fatal to the operation that hit it; never retried.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("pixel ({x}, {y}) outside raster extent {width}×{height}")]
pub struct BoundsError {
    /// Offending x coordinate.
    pub x: u32,
    /// Offending y coordinate.
    pub y: u32,
    /// Raster width at the time of access.
    pub width: u32,
    /// Raster height at the time of access.
    pub height: u32,
}

/// Read-only raster contract: fixed dimensions plus per-pixel color access.
///
/// Object-safe, so heterogeneous sources (decoded files, memory buffers,
/// synthetic test images) can share one compositing call.
pub trait Raster {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Color at `(x, y)`.
    ///
    /// Fails with [`BoundsError`] when the coordinate lies outside
    /// `[0, width) × [0, height)`.
    fn color_at(&self, x: u32, y: u32) -> Result<Color, BoundsError>;
}

/// Mutable raster contract.
pub trait RasterMut: Raster {
    /// Set the color at `(x, y)`, replacing the previous sample entirely.
    ///
    /// Same bounds contract as [`Raster::color_at`].
    fn set_color(&mut self, x: u32, y: u32, color: Color) -> Result<(), BoundsError>;
}

/// Row-major memory-backed raster.
///
/// Freshly allocated buffers are zero-filled, i.e. [`Color::TRANSPARENT`] —
/// this is the concrete "unset background" value seen by compositing
/// operations that receive no background color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Allocate a `width`×`height` buffer of transparent black pixels.
    ///
    /// Either dimension may be zero; zero-sized buffers hold no pixels and
    /// every access on them is out of bounds.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn index(&self, x: u32, y: u32) -> Result<usize, BoundsError> {
        if x >= self.width || y >= self.height {
            return Err(BoundsError {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }
}

impl Raster for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_at(&self, x: u32, y: u32) -> Result<Color, BoundsError> {
        Ok(self.pixels[self.index(x, y)?])
    }
}

impl RasterMut for PixelBuffer {
    fn set_color(&mut self, x: u32, y: u32, color: Color) -> Result<(), BoundsError> {
        let i = self.index(x, y)?;
        self.pixels[i] = color;
        Ok(())
    }
}
