use std::{io::Cursor, num::NonZeroU64};

use crate::{
    decode::raw::{DecodedSequence, RawFrameBlock},
    foundation::core::{Canvas, Fps},
    foundation::error::{GifCanvasError, GifCanvasResult},
};

const RGBA: u8 = 4;

/// Upper bound on the decoded RGBA block, across all frames.
///
/// Every frame expands to a full logical-screen plane, so a tiny file can declare a huge
/// screen; decoding past this cap is a [`GifCanvasError::Decode`].
pub const MAX_DECODED_BYTES: usize = 1 << 30;

/// Decode GIF bytes into dense RGBA frames.
///
/// Each GIF frame is blitted at its offset onto a fully transparent canvas-sized plane, so
/// pixels the frame does not cover (or marks transparent) decode with alpha 0. With
/// `coalesce` set those holes are filled from the preceding frame.
///
/// The source fps is derived from the first frame delay.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_gif(bytes: &[u8], coalesce: bool, verbose: bool) -> GifCanvasResult<DecodedSequence> {
    let (block, first_delay) = read_raw_frames(bytes)?;
    let fps = Fps::from_delay_centis(first_delay);
    tracing::debug!(
        frames = block.frame_count,
        width = block.canvas.width,
        height = block.canvas.height,
        fps = fps.as_f64(),
        "decoded gif"
    );
    DecodedSequence::from_raw(block, fps, coalesce, verbose)
}

/// Read every frame into an uncoalesced [`RawFrameBlock`], plus the first frame delay.
pub fn read_raw_frames(bytes: &[u8]) -> GifCanvasResult<(RawFrameBlock, u16)> {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::RGBA);
    if let Some(limit) = NonZeroU64::new(MAX_DECODED_BYTES as u64) {
        opts.set_memory_limit(gif::MemoryLimit::Bytes(limit));
    }
    let mut decoder = opts
        .read_info(Cursor::new(bytes))
        .map_err(|e| GifCanvasError::decode(format!("read gif header: {e}")))?;

    let canvas = Canvas {
        width: u32::from(decoder.width()),
        height: u32::from(decoder.height()),
    };
    if canvas.is_empty() {
        return Err(GifCanvasError::decode("gif has an empty logical screen"));
    }
    let plane_len = canvas
        .plane_len(RGBA)
        .map_err(|e| GifCanvasError::decode(e.to_string()))?;
    check_decoded_size(plane_len, 1)?;

    let mut data = Vec::<u8>::new();
    let mut frame_count = 0usize;
    let mut first_delay = None;

    while let Some(frame) = decoder
        .read_next_frame()
        .map_err(|e| GifCanvasError::decode(format!("read gif frame {}: {e}", frame_count + 1)))?
    {
        first_delay.get_or_insert(frame.delay);
        check_decoded_size(plane_len, frame_count + 1)?;
        let start = data.len();
        data.resize(start + plane_len, 0);
        blit_frame(&mut data[start..], canvas, frame)?;
        frame_count += 1;
    }

    if frame_count == 0 {
        return Err(GifCanvasError::decode("gif contains no frames"));
    }

    let block = RawFrameBlock::new(frame_count, canvas, RGBA, data)?;
    Ok((block, first_delay.unwrap_or(0)))
}

fn check_decoded_size(plane_len: usize, frames: usize) -> GifCanvasResult<()> {
    match plane_len.checked_mul(frames) {
        Some(total) if total <= MAX_DECODED_BYTES => Ok(()),
        _ => Err(GifCanvasError::decode(format!(
            "{frames} frame(s) of {plane_len} bytes exceed the {MAX_DECODED_BYTES} byte decode limit"
        ))),
    }
}

fn blit_frame(plane: &mut [u8], canvas: Canvas, frame: &gif::Frame<'_>) -> GifCanvasResult<()> {
    let fw = usize::from(frame.width);
    let fh = usize::from(frame.height);
    let left = usize::from(frame.left);
    let top = usize::from(frame.top);
    let cw = canvas.width as usize;
    let ch = canvas.height as usize;
    let px = usize::from(RGBA);

    if frame.buffer.len() < fw * fh * px {
        return Err(GifCanvasError::decode(format!(
            "gif frame buffer holds {} bytes, expected {}",
            frame.buffer.len(),
            fw * fh * px
        )));
    }
    if left >= cw || top >= ch {
        return Ok(());
    }

    let visible_w = fw.min(cw - left);
    let visible_h = fh.min(ch - top);
    for row in 0..visible_h {
        let src = row * fw * px;
        let dst = ((top + row) * cw + left) * px;
        plane[dst..dst + visible_w * px].copy_from_slice(&frame.buffer[src..src + visible_w * px]);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/decode/gif.rs"]
mod tests;
