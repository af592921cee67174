//! gifcanvas composes animated GIFs: decode a sequence, queue drawing and raster edits
//! against frame ranges, embed other sequences, and encode the result.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: GIF bytes -> dense RGBA frames, optionally coalesced
//!    (transparent holes filled from the previous frame).
//! 2. **Edit**: drawing calls pre-render overlays into an ordered queue; raster edits are
//!    recorded on the frames they select. Nothing is composited yet.
//! 3. **Apply**: [`Sequence::apply_edits`] replays the queue in painter's order and runs
//!    pending raster edits, optionally across a rayon pool.
//! 4. **Encode**: [`Sequence::render`] quantizes each frame and writes the GIF stream.
//!
//! Frames are addressed by stable 1-based [`FrameNumber`]s. Pixels are straight-alpha RGBA8.
//!
//! ```no_run
//! use gifcanvas::{FrameSelector, Options, Sequence, SvgStyle};
//!
//! # fn main() -> gifcanvas::GifCanvasResult<()> {
//! let bytes = std::fs::read("in.gif").map_err(anyhow::Error::from)?;
//! let mut seq = Sequence::from_bytes(&bytes, Options::default())?;
//! seq.draw_rect(4.0, 4.0, 32.0, 16.0, &SvgStyle::new(), Some(FrameSelector::span(1, 5)))?;
//! let out = seq.render()?;
//! # let _ = out;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

pub mod config;
pub mod decode;
pub mod embed;
pub mod encode;
pub mod foundation;
pub mod frames;
pub mod overlay;
pub mod raster;
pub mod render;
pub mod sequence;

pub use config::{Options, PaletteMode};
pub use embed::EmbedOptions;
pub use foundation::core::{Canvas, Fps, FrameNumber, Repeat};
pub use foundation::error::{GifCanvasError, GifCanvasResult};
pub use frames::frame::Frame;
pub use frames::range::{FrameRangeSet, FrameSelector, FrameSpan};
pub use overlay::queue::{Overlay, OverlayQueue};
pub use raster::ops::{Axis, RasterOp, Rgb};
pub use raster::svg::{Border, BrushStyle, SvgStyle};
pub use render::threading::RenderThreading;
pub use sequence::{ImageOptions, Sequence};
