use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::{
    config::Options,
    decode::{gif::decode_gif, raw::DecodedSequence},
    embed::{EmbedOptions, effective_size, plan_overlays, source_frame_plan},
    encode::gif::{EncodeSettings, encode_gif},
    foundation::core::{Canvas, Fps, FrameNumber, Repeat},
    foundation::error::{GifCanvasError, GifCanvasResult},
    frames::frame::Frame,
    frames::range::{FrameRangeSet, FrameSelector},
    overlay::queue::{Overlay, OverlayQueue},
    raster::{
        blur::sigma_for_radius,
        image::{fit, load_image, round_mask},
        ops::{Axis, RasterOp, Rgb, check_crop},
        svg::{Border, BrushStyle, SvgStyle, circle_markup, rasterize, rect_markup, text_markup},
    },
    render::threading::map_ordered,
};

const RGBA: u8 = 4;

/// How a still image is placed by [`Sequence::draw_image`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Defaults to the image's own width, clamped to the canvas.
    pub width: Option<u32>,
    /// Defaults to the image's own height, clamped to the canvas.
    pub height: Option<u32>,
    /// Frames to draw on; all frames when unset.
    pub frames: Option<FrameSelector>,
    pub round: bool,
    pub border: Option<Border>,
}

/// An animated sequence of same-sized RGBA frames plus playback metadata.
///
/// Drawing calls (`draw_*`) pre-render their pixels and queue them; raster edits (`tint`,
/// `rotate`, ...) are recorded on the frames they select. Nothing touches frame pixels
/// until [`Sequence::apply_edits`] or [`Sequence::render`].
#[derive(Clone, Debug)]
pub struct Sequence {
    canvas: Canvas,
    fps: Fps,
    repeat: Repeat,
    frames: Vec<Frame>,
    queue: OverlayQueue,
    style: BrushStyle,
    options: Options,
}

impl Sequence {
    /// Decode an animated GIF.
    pub fn from_bytes(bytes: &[u8], options: Options) -> GifCanvasResult<Self> {
        let decoded = decode_gif(bytes, options.coalesce, options.verbose)?;
        Self::from_decoded(decoded, options)
    }

    /// Build from already decoded frames. `options.fps` overrides the decoded rate.
    pub fn from_decoded(decoded: DecodedSequence, options: Options) -> GifCanvasResult<Self> {
        if decoded.channels != RGBA {
            return Err(GifCanvasError::decode(format!(
                "expected RGBA frames, got {} channels",
                decoded.channels
            )));
        }
        let canvas = decoded.canvas;
        let frames = decoded
            .frames
            .into_iter()
            .enumerate()
            .map(|(i, plane)| {
                RgbaImage::from_raw(canvas.width, canvas.height, plane)
                    .map(|px| Frame::new(FrameNumber::from_index(i), px))
                    .ok_or_else(|| {
                        GifCanvasError::decode(format!("frame {} does not match the canvas", i + 1))
                    })
            })
            .collect::<GifCanvasResult<Vec<_>>>()?;
        if frames.is_empty() {
            return Err(GifCanvasError::decode("input contains no frames"));
        }

        let fps = options.fps_override()?.unwrap_or(decoded.fps);
        Ok(Self {
            canvas,
            fps,
            repeat: options.repeat,
            frames,
            queue: OverlayQueue::new(),
            style: BrushStyle::default(),
            options,
        })
    }

    /// A sequence of fully transparent frames.
    pub fn blank(
        width: u32,
        height: u32,
        frame_count: u32,
        options: Options,
    ) -> GifCanvasResult<Self> {
        let canvas = Canvas { width, height };
        if canvas.is_empty() || frame_count == 0 {
            return Err(GifCanvasError::validation(format!(
                "blank sequence needs a non-empty canvas and frames, \
                 got {width}x{height} x {frame_count}"
            )));
        }
        let frames = (1..=frame_count)
            .map(|n| Frame::new(FrameNumber(n), RgbaImage::new(width, height)))
            .collect();
        Ok(Self {
            canvas,
            fps: options.fps_override()?.unwrap_or(Fps::DEFAULT),
            repeat: options.repeat,
            frames,
            queue: OverlayQueue::new(),
            style: BrushStyle::default(),
            options,
        })
    }

    pub fn frame_count(&self) -> u32 {
        u32::try_from(self.frames.len()).unwrap_or(u32::MAX)
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Frames are always held as interleaved RGBA.
    pub fn channels(&self) -> u8 {
        RGBA
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn set_fps(&mut self, fps: u32) -> GifCanvasResult<&mut Self> {
        self.fps = Fps::from_int(fps)?;
        Ok(self)
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: Repeat) -> &mut Self {
        self.repeat = repeat;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn style(&self) -> &BrushStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut BrushStyle {
        &mut self.style
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Overlays waiting for the next [`Sequence::apply_edits`].
    pub fn queue(&self) -> &OverlayQueue {
        &self.queue
    }

    /// RGBA bytes of frame `number` with its raster edits applied.
    ///
    /// Queued overlays are not included until [`Sequence::apply_edits`] runs.
    pub fn frame_pixels(&mut self, number: FrameNumber) -> GifCanvasResult<Vec<u8>> {
        let count = self.frame_count();
        let frame = number
            .index()
            .and_then(|i| self.frames.get_mut(i))
            .ok_or_else(|| {
                GifCanvasError::validation(format!("frame {number} is outside 1..={count}"))
            })?;
        frame.render()
    }

    /// Resize every frame. Already queued overlays keep their pixels and offsets.
    pub fn resize(&mut self, width: u32, height: u32) -> GifCanvasResult<&mut Self> {
        if width == 0 || height == 0 {
            return Err(GifCanvasError::validation(format!(
                "resize target {width}x{height} must be non-empty"
            )));
        }
        self.canvas = Canvas { width, height };
        self.push_all(RasterOp::Resize { width, height });
        Ok(self)
    }

    /// Cut every frame to the `width` x `height` box at `(x, y)`.
    pub fn crop(&mut self, x: u32, y: u32, width: u32, height: u32) -> GifCanvasResult<&mut Self> {
        check_crop(self.canvas, x, y, width, height)?;
        self.canvas = Canvas { width, height };
        self.push_all(RasterOp::Crop {
            x,
            y,
            width,
            height,
        });
        Ok(self)
    }

    pub fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: &SvgStyle,
        frames: Option<FrameSelector>,
    ) -> GifCanvasResult<&mut Self> {
        let style = self.style.text_defaults().merged(style);
        let markup = text_markup(self.canvas, text, x, y, &style);
        self.queue_markup(&markup, frames.as_ref())
    }

    pub fn draw_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        style: &SvgStyle,
        frames: Option<FrameSelector>,
    ) -> GifCanvasResult<&mut Self> {
        let style = self.style.shape_defaults().merged(style);
        let markup = rect_markup(self.canvas, x, y, width, height, &style);
        self.queue_markup(&markup, frames.as_ref())
    }

    pub fn draw_circle(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        style: &SvgStyle,
        frames: Option<FrameSelector>,
    ) -> GifCanvasResult<&mut Self> {
        let style = self.style.shape_defaults().merged(style);
        let markup = circle_markup(self.canvas, cx, cy, radius, &style);
        self.queue_markup(&markup, frames.as_ref())
    }

    /// Draw a still image with its top-left corner at `(x, y)`.
    pub fn draw_image(
        &mut self,
        bytes: &[u8],
        x: i64,
        y: i64,
        opts: &ImageOptions,
    ) -> GifCanvasResult<&mut Self> {
        let img = load_image(bytes)?;
        let width = opts.width.unwrap_or(img.width()).min(self.canvas.width);
        let height = opts.height.unwrap_or(img.height()).min(self.canvas.height);
        let mut img = fit(img, width, height)?;
        if opts.round {
            round_mask(&mut img)?;
        }

        let frames = self.resolve_frames(opts.frames.as_ref());
        if let Some(border) = &opts.border {
            self.queue_border(border, x, y, width, height, opts.round, frames.clone())?;
        }
        self.queue.enqueue(Overlay::at(img, x, y), frames);
        Ok(self)
    }

    /// Draw another sequence into this one, one overlay per destination frame.
    ///
    /// `src` is resized in place when the effective size differs from its own, and its
    /// pending edits are applied. On failure, overlays already queued here stay queued.
    #[tracing::instrument(
        skip_all,
        fields(x = x, y = y, src_frames = src.frames.len(), dst_frames = self.frames.len())
    )]
    pub fn draw_sequence(
        &mut self,
        src: &mut Sequence,
        x: i64,
        y: i64,
        opts: &EmbedOptions,
    ) -> GifCanvasResult<&mut Self> {
        let want_w = opts.width.unwrap_or(src.width());
        let want_h = opts.height.unwrap_or(src.height());
        let Some((width, height)) = effective_size(self.canvas, x, y, want_w, want_h) else {
            tracing::debug!(want_w, want_h, "embedded sequence falls outside the canvas");
            return Ok(self);
        };
        if (width, height) != (src.width(), src.height()) {
            src.resize(width, height)?;
        }
        src.apply_edits()?;

        let src_fps = match opts.fps {
            Some(fps) => Fps::from_int(fps)?,
            None => src.fps,
        };

        if let Some(border) = &opts.border {
            let all = FrameRangeSet::all(self.frame_count());
            self.queue_border(border, x, y, width, height, opts.round, all)?;
        }

        let plan = source_frame_plan(
            self.frames.len(),
            self.fps,
            src.frames.len(),
            src_fps,
            opts.looping,
        );
        tracing::debug!(
            planned = plan.len(),
            step = self.fps.hold_step(src_fps),
            "embedding frames"
        );
        for (number, overlay) in plan_overlays(&src.frames, &plan, x, y, opts.round)? {
            self.queue.enqueue(overlay, FrameRangeSet::single(number));
        }
        Ok(self)
    }

    /// Decode `bytes` with this sequence's coalesce setting and draw it in.
    pub fn draw_sequence_bytes(
        &mut self,
        bytes: &[u8],
        x: i64,
        y: i64,
        opts: &EmbedOptions,
    ) -> GifCanvasResult<&mut Self> {
        let src_options = Options {
            coalesce: self.options.coalesce,
            verbose: self.options.verbose,
            threading: self.options.threading.clone(),
            ..Options::default()
        };
        let mut src = Sequence::from_bytes(bytes, src_options)?;
        self.draw_sequence(&mut src, x, y, opts)
    }

    pub fn tint(&mut self, rgb: Rgb, frames: Option<FrameSelector>) -> &mut Self {
        self.edit_frames(frames.as_ref(), RasterOp::Tint(rgb))
    }

    pub fn grayscale(&mut self, frames: Option<FrameSelector>) -> &mut Self {
        self.edit_frames(frames.as_ref(), RasterOp::Grayscale)
    }

    /// Turn clockwise about the frame centre, keeping the canvas size.
    pub fn rotate(
        &mut self,
        degrees: f64,
        frames: Option<FrameSelector>,
    ) -> GifCanvasResult<&mut Self> {
        if !degrees.is_finite() {
            return Err(GifCanvasError::validation("rotation angle must be finite"));
        }
        Ok(self.edit_frames(frames.as_ref(), RasterOp::Rotate { degrees }))
    }

    pub fn flip(&mut self, axis: Axis, frames: Option<FrameSelector>) -> &mut Self {
        self.edit_frames(frames.as_ref(), RasterOp::Flip(axis))
    }

    /// Gaussian blur with `sigma = 1 + radius / 2`; a mild blur without a radius.
    pub fn blur(
        &mut self,
        radius: Option<f32>,
        frames: Option<FrameSelector>,
    ) -> GifCanvasResult<&mut Self> {
        if let Some(r) = radius {
            sigma_for_radius(r)?;
        }
        Ok(self.edit_frames(frames.as_ref(), RasterOp::Blur { radius }))
    }

    pub fn negate(&mut self, frames: Option<FrameSelector>) -> &mut Self {
        self.edit_frames(frames.as_ref(), RasterOp::Negate)
    }

    pub fn normalise(&mut self, frames: Option<FrameSelector>) -> &mut Self {
        self.edit_frames(frames.as_ref(), RasterOp::Normalise)
    }

    /// Composite every queued overlay, run pending raster edits, and empty the queue.
    #[tracing::instrument(skip_all, fields(pending = self.queue.len(), frames = self.frames.len()))]
    pub fn apply_edits(&mut self) -> GifCanvasResult<&mut Self> {
        let threading = &self.options.threading;
        self.queue.apply_all(&mut self.frames, threading)?;
        map_ordered(&mut self.frames, threading, |frame| frame.materialize().map(|_| ()))?;
        Ok(self)
    }

    /// Apply pending edits and encode the sequence as an animated GIF.
    #[tracing::instrument(
        skip_all,
        fields(frames = self.frames.len(), width = self.canvas.width, height = self.canvas.height)
    )]
    pub fn render(&mut self) -> GifCanvasResult<Vec<u8>> {
        self.apply_edits()?;
        let planes = self
            .frames
            .iter()
            .map(|f| f.pixels().as_raw().clone())
            .collect();
        let settings = EncodeSettings {
            canvas: self.canvas,
            fps: self.fps,
            repeat: self.repeat,
            palette: self.options.palette_mode(),
            threading: self.options.threading.clone(),
            verbose: self.options.verbose,
        };
        encode_gif(planes, &settings)
    }

    fn resolve_frames(&self, selector: Option<&FrameSelector>) -> FrameRangeSet {
        let count = self.frame_count();
        if let Some(selector) = selector
            && let Err(err) = selector.diagnose(count)
        {
            if self.options.verbose {
                tracing::warn!(%err, "frame selector matches nothing");
            } else {
                tracing::debug!(%err, "frame selector matches nothing");
            }
        }
        FrameRangeSet::resolve(selector, count)
    }

    fn push_all(&mut self, op: RasterOp) {
        for frame in &mut self.frames {
            frame.push_op(op.clone());
        }
    }

    fn edit_frames(&mut self, selector: Option<&FrameSelector>, op: RasterOp) -> &mut Self {
        let targets = self.resolve_frames(selector);
        for frame in &mut self.frames {
            if targets.contains(frame.number()) {
                frame.push_op(op.clone());
            }
        }
        self
    }

    fn queue_markup(
        &mut self,
        markup: &str,
        selector: Option<&FrameSelector>,
    ) -> GifCanvasResult<&mut Self> {
        let pixels = rasterize(markup, self.canvas.width, self.canvas.height)?;
        let frames = self.resolve_frames(selector);
        self.queue.enqueue(Overlay::full_frame(pixels), frames);
        Ok(self)
    }

    #[allow(clippy::too_many_arguments)]
    fn queue_border(
        &mut self,
        border: &Border,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        round: bool,
        frames: FrameRangeSet,
    ) -> GifCanvasResult<()> {
        let markup = border.markup(
            self.canvas,
            &self.style,
            x as f32,
            y as f32,
            width as f32,
            height as f32,
            round,
        );
        let pixels = rasterize(&markup, self.canvas.width, self.canvas.height)?;
        self.queue.enqueue(Overlay::full_frame(pixels), frames);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/sequence/sequence.rs"]
mod tests;
