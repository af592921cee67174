use image::RgbaImage;

use crate::{
    foundation::core::FrameNumber, foundation::error::GifCanvasResult, raster::ops::RasterOp,
};

/// One frame of a sequence: its pixel plane plus raster operations not yet applied.
///
/// Operations are recorded with [`Frame::push_op`] and run in order the next time the frame
/// is materialized, so edits issued back to back cost nothing until a join point.
#[derive(Clone, Debug)]
pub struct Frame {
    number: FrameNumber,
    pixels: RgbaImage,
    pending: Vec<RasterOp>,
}

impl Frame {
    pub(crate) fn new(number: FrameNumber, pixels: RgbaImage) -> Self {
        Self {
            number,
            pixels,
            pending: Vec::new(),
        }
    }

    pub fn number(&self) -> FrameNumber {
        self.number
    }

    /// Pixels as of the last materialization.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub(crate) fn push_op(&mut self, op: RasterOp) {
        self.pending.push(op);
    }

    /// Run every pending operation in order and return the resulting pixels.
    ///
    /// A failing operation aborts the frame; its pixels are not usable afterwards.
    pub fn materialize(&mut self) -> GifCanvasResult<&RgbaImage> {
        if !self.pending.is_empty() {
            let ops = std::mem::take(&mut self.pending);
            let mut pixels = std::mem::replace(&mut self.pixels, RgbaImage::new(0, 0));
            for op in &ops {
                pixels = op.apply(pixels)?;
            }
            self.pixels = pixels;
        }
        Ok(&self.pixels)
    }

    /// Materialize and copy out the RGBA bytes.
    pub fn render(&mut self) -> GifCanvasResult<Vec<u8>> {
        Ok(self.materialize()?.as_raw().clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/frame.rs"]
mod tests;
