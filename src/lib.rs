//! Raster image composition: linear merge, grid arrangement, and
//! alpha-blended overlay.
//!
//! The core is layout arithmetic plus per-pixel pastes over a small raster
//! abstraction — callers hand in decoded in-memory images and get one
//! combined image back. Decoding and encoding are thin boundaries behind
//! the `codec` feature; no filesystem access happens outside it.
//!
//! # Modules
//!
//! - [`raster`] — the [`Raster`]/[`RasterMut`] contracts, [`Color`], and the
//!   memory-backed [`PixelBuffer`]
//! - [`compose`] — [`merge`], [`grid`], [`overlay`], and the [`blend`]
//!   formula they share
//! - [`codec`] — file loading and JPEG/PNG encoding (feature `codec`,
//!   default-on)
//!
//! # Example
//!
//! ```
//! use zencompose::{Color, MergeOptions, PixelBuffer, Raster, merge};
//!
//! let mut left = PixelBuffer::new(2, 2);
//! left.fill(Color::white());
//! let right = PixelBuffer::new(2, 4);
//!
//! let out = merge(&[&left, &right], &MergeOptions::new().gap(1)).unwrap();
//! assert_eq!((out.width(), out.height()), (5, 4));
//! ```

#![forbid(unsafe_code)]

#[cfg(feature = "codec")]
pub mod codec;
pub mod compose;
pub mod raster;

#[cfg(feature = "codec")]
pub use codec::{CodecError, merge_paths, save_jpeg, save_png};
pub use compose::{Alignment, Direction, MergeOptions, blend, grid, merge, overlay};
pub use raster::{BoundsError, Color, PixelBuffer, Raster, RasterMut};
