//! Per-frame raster work: edits, blur, vector primitives and still-image input.

pub mod blur;
/// Caller-supplied still images.
pub mod image;
/// Deferred per-frame operations.
pub mod ops;
/// Drawing-primitive markup and rasterization.
pub mod svg;
