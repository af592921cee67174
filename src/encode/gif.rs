use crate::{
    config::PaletteMode,
    foundation::core::{Canvas, Fps, Repeat},
    foundation::error::{GifCanvasError, GifCanvasResult},
    render::threading::{RenderThreading, map_ordered},
};

const RGBA: u8 = 4;

/// Loop instruction written into the output container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    /// Loop without end.
    Infinite,
    /// Play once: no loop extension is written.
    Once,
    /// Replay this many extra times after the first playback.
    Extra(u16),
}

impl LoopControl {
    /// `Times(n)` counts total playbacks, the container counts replays.
    pub fn from_repeat(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Forever => Self::Infinite,
            Repeat::Times(n) if n.get() == 1 => Self::Once,
            Repeat::Times(n) => Self::Extra(n.get() - 1),
        }
    }

    fn to_gif(self) -> Option<gif::Repeat> {
        match self {
            Self::Infinite => Some(gif::Repeat::Infinite),
            Self::Once => None,
            Self::Extra(n) => Some(gif::Repeat::Finite(n)),
        }
    }
}

/// Final codec parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeSettings {
    pub canvas: Canvas,
    pub fps: Fps,
    pub repeat: Repeat,
    pub palette: PaletteMode,
    pub threading: RenderThreading,
    /// Log per-frame progress at `info` instead of `debug`.
    pub verbose: bool,
}

impl EncodeSettings {
    /// Per-frame delay in hundredths of a second, at least 1.
    pub fn delay_centis(&self) -> u16 {
        self.fps.frame_delay_centis().max(1)
    }

    pub fn loop_control(&self) -> LoopControl {
        LoopControl::from_repeat(self.repeat)
    }

    fn dimensions(&self) -> GifCanvasResult<(u16, u16)> {
        let w = u16::try_from(self.canvas.width);
        let h = u16::try_from(self.canvas.height);
        match (w, h) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
            _ => Err(GifCanvasError::encode(format!(
                "canvas {}x{} is outside the encodable range 1..=65535",
                self.canvas.width, self.canvas.height
            ))),
        }
    }
}

/// Encode straight-alpha RGBA planes, one per frame, into a GIF.
///
/// Palette quantization runs per frame on the configured worker pool; frames are written
/// in order afterwards. Every frame is a full canvas disposed to background, so a transparent
/// pixel shows through to nothing rather than to the previous frame.
///
/// GIF has one-bit transparency: alpha 0 maps to the transparent index and any other alpha
/// is written fully opaque, so soft edges over transparent areas come out hard.
#[tracing::instrument(
    skip_all,
    fields(frames = planes.len(), width = settings.canvas.width, height = settings.canvas.height)
)]
pub fn encode_gif(
    mut planes: Vec<Vec<u8>>,
    settings: &EncodeSettings,
) -> GifCanvasResult<Vec<u8>> {
    if planes.is_empty() {
        return Err(GifCanvasError::encode("cannot encode a sequence with no frames"));
    }
    let (width, height) = settings.dimensions()?;
    let plane_len = settings
        .canvas
        .plane_len(RGBA)
        .map_err(|e| GifCanvasError::encode(e.to_string()))?;
    if let Some((i, p)) = planes.iter().enumerate().find(|(_, p)| p.len() != plane_len) {
        return Err(GifCanvasError::encode(format!(
            "frame {} holds {} bytes, expected {plane_len}",
            i + 1,
            p.len()
        )));
    }

    let speed = settings.palette.speed();
    let delay = settings.delay_centis();
    let frames = map_ordered(&mut planes, &settings.threading, |rgba| {
        let mut frame = gif::Frame::from_rgba_speed(width, height, rgba, speed);
        frame.delay = delay;
        frame.dispose = gif::DisposalMethod::Background;
        Ok(frame)
    })?;

    let mut encoder = gif::Encoder::new(Vec::new(), width, height, &[])
        .map_err(|e| GifCanvasError::encode(format!("start gif stream: {e}")))?;
    if let Some(repeat) = settings.loop_control().to_gif() {
        encoder
            .set_repeat(repeat)
            .map_err(|e| GifCanvasError::encode(format!("write loop extension: {e}")))?;
    }

    let total = frames.len();
    for (i, frame) in frames.iter().enumerate() {
        let done = i + 1;
        let pct = done * 100 / total;
        if settings.verbose {
            tracing::info!("rendering frame {done}/{total} ({pct}%)");
        } else {
            tracing::debug!("rendering frame {done}/{total} ({pct}%)");
        }
        encoder
            .write_frame(frame)
            .map_err(|e| GifCanvasError::encode(format!("write frame {done}: {e}")))?;
    }

    encoder
        .into_inner()
        .map_err(|e| GifCanvasError::encode(format!("finish gif stream: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
