//! Per-frame worker pool used at the join points.

pub mod threading;
