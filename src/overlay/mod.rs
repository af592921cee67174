//! Overlay compositing and the pending-edit queue.

/// Straight-alpha source-over and dest-in pixel operations.
pub mod composite;
/// Overlays queued against frame sets and replayed in order.
pub mod queue;
