//! Output encoding.

/// Encode parameter translation and GIF encoding.
pub mod gif;
