//! Frames and frame-range addressing.

/// A single frame with lazily applied raster operations.
pub mod frame;
/// Frame selectors and their canonical resolved sets.
pub mod range;
