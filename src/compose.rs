//! Compositing operations: linear merge, grid arrangement, and overlay.
//!
//! The core is layout arithmetic — dimension accumulation, per-image
//! placement offsets, grid cell sizing — plus per-pixel pastes through the
//! [`Raster`] contract. Every operation allocates exactly one output buffer
//! sized up front from the input dimensions, fills it with the background if
//! one is given, then populates it with one pass per source image. Inputs
//! are never mutated.
//!
//! Degenerate inputs (empty sequences, zero columns) are not errors; they
//! produce a well-defined zero-sized buffer, keeping the operations total.
//! The only failure mode is a [`BoundsError`] from a raster that violates
//! its own dimension contract.
//!
//! # Example
//!
//! ```
//! use zencompose::{Alignment, Color, MergeOptions, PixelBuffer, Raster, merge};
//!
//! let mut a = PixelBuffer::new(2, 2);
//! a.fill(Color::white());
//! let b = PixelBuffer::new(2, 4);
//!
//! let opts = MergeOptions::new().gap(1).alignment(Alignment::Start);
//! let out = merge(&[&a, &b], &opts).unwrap();
//!
//! // 2 + 1 + 2 wide, max(2, 4) tall
//! assert_eq!((out.width(), out.height()), (5, 4));
//! assert_eq!(out.color_at(0, 0).unwrap(), Color::white());
//! ```

use crate::raster::{BoundsError, Color, PixelBuffer, Raster, RasterMut};

/// Axis along which [`merge`] concatenates images.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Side by side, left to right.
    #[default]
    Horizontal,
    /// Stacked, top to bottom.
    Vertical,
}

/// Cross-axis placement policy for [`merge`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Top edge (horizontal merge) or left edge (vertical merge).
    Start,
    /// Centered. Odd leftover space floors, sitting half a pixel toward
    /// the start edge; consistent, never rounded.
    #[default]
    Center,
    /// Bottom edge or right edge.
    End,
}

/// Options for [`merge`].
///
/// # Example
///
/// ```
/// use zencompose::{Alignment, Color, Direction, MergeOptions};
///
/// let opts = MergeOptions::new()
///     .direction(Direction::Vertical)
///     .alignment(Alignment::End)
///     .gap(4)
///     .background(Color::white());
/// assert_eq!(opts.gap, 4);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Main axis of concatenation.
    pub direction: Direction,
    /// Cross-axis placement of images narrower than the output.
    pub alignment: Alignment,
    /// Pixels inserted between consecutive images along the main axis.
    pub gap: u32,
    /// Fill for gaps and alignment padding. `None` skips the fill pass,
    /// leaving unused pixels at the buffer's zero value (transparent black).
    pub background: Option<Color>,
}

impl MergeOptions {
    /// Defaults: horizontal, centered, no gap, no background fill.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the merge direction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the cross-axis alignment.
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the gap between consecutive images, in pixels.
    pub fn gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    /// Set the background fill color.
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

/// Concatenate images along one axis into a single new buffer.
///
/// The output's main-axis size is the sum of the inputs' main-axis sizes
/// plus `gap × (count − 1)`; its cross-axis size is the maximum input
/// cross-axis size. Images are pasted opaquely (source pixels replace
/// destination entirely, alpha included) in input order, each offset on the
/// cross axis per [`Alignment`].
///
/// An empty sequence yields a 0×0 buffer; a single image yields a fresh
/// pixel-identical copy, with gap and alignment not applying.
pub fn merge(images: &[&dyn Raster], opts: &MergeOptions) -> Result<PixelBuffer, BoundsError> {
    match images {
        [] => return Ok(PixelBuffer::new(0, 0)),
        [only] => return copy_of(*only),
        _ => {}
    }

    let mut main_total = 0u32;
    let mut cross_max = 0u32;
    for img in images {
        let (main, cross) = axis_sizes(*img, opts.direction);
        main_total += main;
        cross_max = cross_max.max(cross);
    }
    main_total += opts.gap * (images.len() as u32 - 1);

    let (out_w, out_h) = match opts.direction {
        Direction::Horizontal => (main_total, cross_max),
        Direction::Vertical => (cross_max, main_total),
    };
    let mut dst = PixelBuffer::new(out_w, out_h);
    if let Some(bg) = opts.background {
        dst.fill(bg);
    }

    let mut offset = 0u32;
    for img in images {
        let (main, cross) = axis_sizes(*img, opts.direction);
        let shift = cross_offset(cross_max, cross, opts.alignment);
        let (x, y) = match opts.direction {
            Direction::Horizontal => (offset, shift),
            Direction::Vertical => (shift, offset),
        };
        paste(&mut dst, *img, x, y)?;
        offset += main + opts.gap;
    }
    Ok(dst)
}

/// Arrange images in a row-major grid of uniform cells.
///
/// Cell size is the maximum width × maximum height over all images — one
/// shared cell for the whole grid, not per row or column. Each image is
/// floor-centered within its cell and pasted opaquely. Unused cells in a
/// partial last row stay background-filled (or transparent when
/// `background` is `None`), never cropped or reflowed.
///
/// An empty sequence or zero `columns` yields a 0×0 buffer.
pub fn grid(
    images: &[&dyn Raster],
    columns: u32,
    gap: u32,
    background: Option<Color>,
) -> Result<PixelBuffer, BoundsError> {
    if images.is_empty() || columns == 0 {
        return Ok(PixelBuffer::new(0, 0));
    }

    let rows = (images.len() as u32).div_ceil(columns);
    let mut cell_w = 0u32;
    let mut cell_h = 0u32;
    for img in images {
        cell_w = cell_w.max(img.width());
        cell_h = cell_h.max(img.height());
    }

    let mut dst = PixelBuffer::new(
        columns * cell_w + (columns - 1) * gap,
        rows * cell_h + (rows - 1) * gap,
    );
    if let Some(bg) = background {
        dst.fill(bg);
    }

    for (i, img) in images.iter().enumerate() {
        let row = i as u32 / columns;
        let col = i as u32 % columns;
        // Cell origin plus floor-centering within the shared cell.
        let x = col * (cell_w + gap) + (cell_w - img.width()) / 2;
        let y = row * (cell_h + gap) + (cell_h - img.height()) / 2;
        paste(&mut dst, *img, x, y)?;
    }
    Ok(dst)
}

/// Paste `overlay_img` onto a copy of `base` at `(x, y)` with alpha blending.
///
/// The output has `base`'s dimensions and starts as a full pixel copy of it.
/// Each overlay pixel maps to one destination pixel; destinations outside
/// the base extent are skipped silently, so partial overlap near edges (or
/// negative offsets) is valid and expected. In-bounds destinations are
/// blended per [`blend`], coupling each overlay pixel's own alpha with the
/// global `opacity`.
///
/// `opacity` is clamped to `[0, 1]` on entry.
pub fn overlay(
    base: &dyn Raster,
    overlay_img: &dyn Raster,
    x: i32,
    y: i32,
    opacity: f64,
) -> Result<PixelBuffer, BoundsError> {
    let mut dst = copy_of(base)?;
    let opacity = opacity.clamp(0.0, 1.0);

    let (base_w, base_h) = (i64::from(base.width()), i64::from(base.height()));
    for oy in 0..overlay_img.height() {
        for ox in 0..overlay_img.width() {
            let dx = i64::from(x) + i64::from(ox);
            let dy = i64::from(y) + i64::from(oy);
            if dx < 0 || dx >= base_w || dy < 0 || dy >= base_h {
                continue;
            }
            let (dx, dy) = (dx as u32, dy as u32);

            let under = dst.color_at(dx, dy)?;
            let over = overlay_img.color_at(ox, oy)?;
            dst.set_color(dx, dy, blend(under, over, opacity))?;
        }
    }
    Ok(dst)
}

/// Blend `over` onto `base` with a global opacity in `[0, 1]`.
///
/// A fully transparent `over` short-circuits to `base` unchanged. Otherwise
/// the blend weight is `over`'s alpha fraction × `opacity`, applied to the
/// 8-bit channel values in floating point and truncated toward zero (not
/// rounded). The result keeps `base`'s alpha: overlaying never changes
/// destination transparency, only color.
pub fn blend(base: Color, over: Color, opacity: f64) -> Color {
    if over.a == 0 {
        return base;
    }
    let alpha = f64::from(over.a) / f64::from(Color::MAX_CHANNEL) * opacity;

    let [br, bg, bb, _] = base.to_rgba8();
    let [or_, og, ob, _] = over.to_rgba8();
    let mix = |b: u8, o: u8| (f64::from(b) * (1.0 - alpha) + f64::from(o) * alpha) as u8;

    let rgb = Color::rgba8(mix(br, or_), mix(bg, og), mix(bb, ob), 0);
    Color::new(rgb.r, rgb.g, rgb.b, base.a)
}

// ============================================================================
// Internal placement helpers
// ============================================================================

/// Main- and cross-axis sizes of an image for a merge direction.
fn axis_sizes(img: &dyn Raster, direction: Direction) -> (u32, u32) {
    match direction {
        Direction::Horizontal => (img.width(), img.height()),
        Direction::Vertical => (img.height(), img.width()),
    }
}

/// Cross-axis placement offset within the available extent.
///
/// `available ≥ size` holds by construction: the caller takes `available`
/// as the maximum over the same image set.
fn cross_offset(available: u32, size: u32, alignment: Alignment) -> u32 {
    match alignment {
        Alignment::Start => 0,
        Alignment::Center => (available - size) / 2,
        Alignment::End => available - size,
    }
}

/// Opaque paste: source pixels replace destination entirely, alpha included.
fn paste(dst: &mut PixelBuffer, src: &dyn Raster, x0: u32, y0: u32) -> Result<(), BoundsError> {
    for y in 0..src.height() {
        for x in 0..src.width() {
            dst.set_color(x0 + x, y0 + y, src.color_at(x, y)?)?;
        }
    }
    Ok(())
}

/// Full pixel copy of a raster into a fresh buffer.
fn copy_of(src: &dyn Raster) -> Result<PixelBuffer, BoundsError> {
    let mut dst = PixelBuffer::new(src.width(), src.height());
    paste(&mut dst, src, 0, 0)?;
    Ok(dst)
}
