use std::sync::Arc;

use image::RgbaImage;

use crate::{
    foundation::core::FrameNumber,
    foundation::error::GifCanvasResult,
    frames::frame::Frame,
    frames::range::FrameRangeSet,
    raster::ops::RasterOp,
    render::threading::{RenderThreading, map_ordered},
};

/// Pre-rendered pixel payload plus the position of its top-left corner on the frame.
///
/// The pixels are produced once by the issuing draw call and shared by every frame the
/// overlay targets.
#[derive(Clone, Debug)]
pub struct Overlay {
    pub image: Arc<RgbaImage>,
    pub left: i64,
    pub top: i64,
}

impl Overlay {
    /// An overlay drawn from the frame origin, typically rasterized at canvas size.
    pub fn full_frame(image: RgbaImage) -> Self {
        Self::at(image, 0, 0)
    }

    pub fn at(image: RgbaImage, left: i64, top: i64) -> Self {
        Self::shared(Arc::new(image), left, top)
    }

    /// Reuse pixels already shared with other overlays.
    pub fn shared(image: Arc<RgbaImage>, left: i64, top: i64) -> Self {
        Self { image, left, top }
    }
}

/// One pending edit: an overlay and the frames it was resolved against when queued.
#[derive(Clone, Debug)]
pub struct QueuedOverlay {
    overlay: Overlay,
    frames: FrameRangeSet,
}

impl QueuedOverlay {
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn frames(&self) -> &FrameRangeSet {
        &self.frames
    }
}

/// Append-only log of pending overlays, replayed onto frames by [`OverlayQueue::apply_all`].
///
/// Queue order is paint order: an overlay queued later is drawn over earlier ones on every
/// frame they share.
#[derive(Clone, Debug, Default)]
pub struct OverlayQueue {
    entries: Vec<QueuedOverlay>,
}

impl OverlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, overlay: Overlay, frames: FrameRangeSet) {
        self.entries.push(QueuedOverlay { overlay, frames });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedOverlay> {
        self.entries.iter()
    }

    /// Overlays targeting `frame`, in queue order.
    pub fn overlays_for(&self, frame: FrameNumber) -> Vec<Overlay> {
        self.entries
            .iter()
            .filter(|e| e.frames.contains(frame))
            .map(|e| e.overlay.clone())
            .collect()
    }

    /// Composite every pending overlay onto its frames, then empty the queue.
    ///
    /// Each frame receives its overlays as one ordered batch. Calling this on an empty
    /// queue is a no-op.
    #[tracing::instrument(skip_all, fields(pending = self.entries.len(), frames = frames.len()))]
    pub fn apply_all(
        &mut self,
        frames: &mut [Frame],
        threading: &RenderThreading,
    ) -> GifCanvasResult<()> {
        if self.entries.is_empty() {
            return Ok(());
        }

        for frame in frames.iter_mut() {
            let overlays = self.overlays_for(frame.number());
            if !overlays.is_empty() {
                frame.push_op(RasterOp::Composite(overlays));
            }
        }
        self.entries.clear();

        map_ordered(frames, threading, |frame| frame.materialize().map(|_| ()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/queue.rs"]
mod tests;
