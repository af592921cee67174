use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::{Canvas, Fps, FrameNumber},
    foundation::error::GifCanvasResult,
    frames::frame::Frame,
    overlay::queue::Overlay,
    raster::{image::round_mask, svg::Border},
};

/// Placement options for drawing one sequence inside another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedOptions {
    /// Defaults to the embedded sequence's width.
    pub width: Option<u32>,
    /// Defaults to the embedded sequence's height.
    pub height: Option<u32>,
    /// Restart the embedded sequence when it runs out of frames.
    pub looping: bool,
    /// Cut the embedded frames to the inscribed ellipse.
    pub round: bool,
    pub border: Option<Border>,
    /// Playback rate of the embedded sequence, overriding its own.
    pub fps: Option<u32>,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            looping: true,
            round: false,
            border: None,
            fps: None,
        }
    }
}

/// Which source frame (0-based) backs each destination frame, in destination order.
///
/// A source frame is held for `round(dst_fps / src_fps)` destination frames (at least one).
/// Looping plays over every destination frame and wraps the source; otherwise playback
/// stops once the source has been shown in full or the destination runs out.
pub fn source_frame_plan(
    dst_count: usize,
    dst_fps: Fps,
    src_count: usize,
    src_fps: Fps,
    looping: bool,
) -> Vec<usize> {
    if dst_count == 0 || src_count == 0 {
        return Vec::new();
    }
    let step = usize::try_from(dst_fps.hold_step(src_fps)).unwrap_or(usize::MAX);
    let count = if looping || src_count >= dst_count {
        dst_count
    } else {
        dst_count.min(src_count.saturating_mul(step))
    };

    let mut cursor = 0usize;
    (0..count)
        .map(|i| {
            if i > 0 && i % step == 0 {
                cursor += 1;
            }
            if looping {
                cursor % src_count
            } else {
                cursor.min(src_count - 1)
            }
        })
        .collect()
}

/// Clamp a requested size so the box at `(x, y)` stays within the canvas.
///
/// Returns `None` when nothing of the box would be visible.
pub fn effective_size(
    canvas: Canvas,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
) -> Option<(u32, u32)> {
    let room = |extent: u32, at: i64| -> u32 {
        let left = i64::from(extent) - at.max(0);
        u32::try_from(left.max(0)).unwrap_or(0)
    };
    let w = width.min(room(canvas.width, x));
    let h = height.min(room(canvas.height, y));
    (w > 0 && h > 0).then_some((w, h))
}

/// One singleton overlay per destination frame, following `plan`.
///
/// Each distinct source frame is prepared (and masked when `round`) once and shared between
/// the destination frames that hold it. Sources must already be materialized.
pub fn plan_overlays(
    sources: &[Frame],
    plan: &[usize],
    x: i64,
    y: i64,
    round: bool,
) -> GifCanvasResult<Vec<(FrameNumber, Overlay)>> {
    let mut prepared: Vec<Option<Arc<RgbaImage>>> = vec![None; sources.len()];
    let mut out = Vec::with_capacity(plan.len());
    for (i, &src) in plan.iter().enumerate() {
        let Some(pixels) = sources.get(src).map(Frame::pixels) else {
            continue;
        };
        let image = match &prepared[src] {
            Some(image) => Arc::clone(image),
            None => {
                let mut image = pixels.clone();
                if round {
                    round_mask(&mut image)?;
                }
                let image = Arc::new(image);
                prepared[src] = Some(Arc::clone(&image));
                image
            }
        };
        out.push((FrameNumber::from_index(i), Overlay::shared(image, x, y)));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/embed/embed.rs"]
mod tests;
