use crate::{
    foundation::core::{Canvas, Fps},
    foundation::error::{GifCanvasError, GifCanvasResult},
};

/// Raw codec output laid out as `[frame][row][column][channel]`.
///
/// Frames may be sparse: a differential frame leaves unchanged pixels fully transparent
/// (alpha = 0) and relies on [`RawFrameBlock::coalesce`] to fill them in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrameBlock {
    pub frame_count: usize,
    pub canvas: Canvas,
    pub channels: u8,
    pub data: Vec<u8>,
}

impl RawFrameBlock {
    pub fn new(
        frame_count: usize,
        canvas: Canvas,
        channels: u8,
        data: Vec<u8>,
    ) -> GifCanvasResult<Self> {
        let block = Self {
            frame_count,
            canvas,
            channels,
            data,
        };
        let expected = block.expected_len()?;
        if block.data.len() != expected {
            return Err(GifCanvasError::decode(format!(
                "raw frame block holds {} bytes, expected {expected} ({frame_count} frames of {}x{}x{})",
                block.data.len(),
                canvas.width,
                canvas.height,
                channels
            )));
        }
        Ok(block)
    }

    /// Byte length of a single frame plane.
    pub fn frame_len(&self) -> GifCanvasResult<usize> {
        self.canvas.plane_len(self.channels)
    }

    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        let len = self.frame_len().ok()?;
        let start = index.checked_mul(len)?;
        self.data.get(start..start.checked_add(len)?)
    }

    fn expected_len(&self) -> GifCanvasResult<usize> {
        self.frame_len()?
            .checked_mul(self.frame_count)
            .ok_or_else(|| GifCanvasError::decode("raw frame block size overflow"))
    }

    /// Fill every transparent pixel of frames 2..n from the already-coalesced previous frame.
    ///
    /// This is a running accumulation: a pixel that stays transparent across several frames
    /// keeps inheriting the last opaque value. The block is left untouched on error.
    pub fn coalesce(&mut self) -> GifCanvasResult<()> {
        if self.channels < 2 {
            return Err(GifCanvasError::coalesce(format!(
                "{}-channel frames carry no alpha channel",
                self.channels
            )));
        }
        if self.channels == 3 {
            return Err(GifCanvasError::coalesce(
                "3-channel frames are treated as RGB and carry no alpha channel",
            ));
        }
        let frame_len = self
            .frame_len()
            .map_err(|e| GifCanvasError::coalesce(e.to_string()))?;
        let expected = self
            .expected_len()
            .map_err(|e| GifCanvasError::coalesce(e.to_string()))?;
        if self.data.len() != expected {
            return Err(GifCanvasError::coalesce(format!(
                "raw frame block holds {} bytes, expected {expected}",
                self.data.len()
            )));
        }
        if self.frame_count < 2 || frame_len == 0 {
            return Ok(());
        }

        let ch = usize::from(self.channels);
        for i in 1..self.frame_count {
            let (done, rest) = self.data.split_at_mut(i * frame_len);
            let prev = &done[(i - 1) * frame_len..];
            let curr = &mut rest[..frame_len];
            for (c, p) in curr.chunks_exact_mut(ch).zip(prev.chunks_exact(ch)) {
                if c[ch - 1] == 0 {
                    c.copy_from_slice(p);
                }
            }
        }
        Ok(())
    }

    /// Split the block into one owned buffer per frame.
    pub fn into_frames(self) -> GifCanvasResult<Vec<Vec<u8>>> {
        let len = self.frame_len()?;
        if len == 0 {
            return Ok(vec![Vec::new(); self.frame_count]);
        }
        Ok(self.data.chunks_exact(len).map(<[u8]>::to_vec).collect())
    }
}

/// Dense per-frame buffers plus the metadata needed to build a sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedSequence {
    pub canvas: Canvas,
    pub channels: u8,
    pub fps: Fps,
    pub frames: Vec<Vec<u8>>,
    /// Whether transparent holes were filled from preceding frames.
    pub coalesced: bool,
}

impl DecodedSequence {
    /// Turn a raw block into dense frames, coalescing when requested.
    ///
    /// Coalescing failures are recovered by keeping the uncoalesced frames. Single-frame
    /// blocks skip coalescing entirely.
    pub fn from_raw(
        mut block: RawFrameBlock,
        fps: Fps,
        coalesce: bool,
        verbose: bool,
    ) -> GifCanvasResult<Self> {
        if block.frame_count == 0 {
            return Err(GifCanvasError::decode("input contains no frames"));
        }

        let mut coalesced = false;
        if coalesce && block.frame_count > 1 {
            match block.coalesce() {
                Ok(()) => coalesced = true,
                Err(err) => {
                    if verbose {
                        tracing::warn!(%err, "coalescing failed, keeping uncoalesced frames");
                    } else {
                        tracing::debug!(%err, "coalescing failed, keeping uncoalesced frames");
                    }
                }
            }
        }

        let canvas = block.canvas;
        let channels = block.channels;
        Ok(Self {
            canvas,
            channels,
            fps,
            frames: block.into_frames()?,
            coalesced,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/raw.rs"]
mod tests;
