//! Frame decoding and coalescing.

/// GIF container decoding into raw frame blocks.
pub mod gif;
/// Raw frame blocks and the coalescing pass.
pub mod raw;
