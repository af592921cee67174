use std::num::NonZeroU16;

use crate::foundation::error::{GifCanvasError, GifCanvasResult};

/// Stable 1-based frame number. Assigned at creation and never reused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameNumber(pub u32);

impl FrameNumber {
    /// Frame number for a 0-based position in a sequence.
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1)))
    }

    /// 0-based position of this frame, or `None` for the invalid frame number 0.
    pub fn index(self) -> Option<usize> {
        self.0.checked_sub(1).map(|i| i as usize)
    }
}

impl std::fmt::Display for FrameNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Playback rate as an exact ratio (`num / den` frames per second).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    /// Fallback rate used when a source does not carry usable timing.
    pub const DEFAULT: Fps = Fps { num: 30, den: 1 };

    pub fn new(num: u32, den: u32) -> GifCanvasResult<Self> {
        if den == 0 {
            return Err(GifCanvasError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(GifCanvasError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole frames per second.
    pub fn from_int(fps: u32) -> GifCanvasResult<Self> {
        Self::new(fps, 1)
    }

    /// Rate implied by a GIF frame delay in hundredths of a second.
    ///
    /// A zero delay carries no timing information and maps to [`Fps::DEFAULT`].
    pub fn from_delay_centis(delay: u16) -> Self {
        if delay == 0 {
            return Self::DEFAULT;
        }
        Self {
            num: 100,
            den: u32::from(delay),
        }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Per-frame delay in milliseconds (`1000 / fps`).
    pub fn frame_delay_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Per-frame delay rounded to the GIF delay unit (hundredths of a second).
    pub fn frame_delay_centis(self) -> u16 {
        let cs = (self.frame_delay_ms() / 10.0).round();
        cs.clamp(0.0, f64::from(u16::MAX)) as u16
    }

    /// How many frames at `self` correspond to one frame at `source`.
    ///
    /// Never returns zero: a source faster than `self` is held for one frame each.
    pub fn hold_step(self, source: Fps) -> u64 {
        let ratio = (f64::from(self.num) * f64::from(source.den))
            / (f64::from(self.den) * f64::from(source.num));
        (ratio.round() as u64).max(1)
    }
}

/// Pixel dimensions shared by every frame of a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Byte length of one frame plane with `channels` interleaved channels.
    pub fn plane_len(self, channels: u8) -> GifCanvasResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(usize::from(channels)))
            .ok_or_else(|| GifCanvasError::validation("frame plane size overflow"))
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// How many times a rendered animation plays.
///
/// `Times(n)` counts total playbacks: `Times(1)` plays once and stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    #[default]
    Forever,
    Times(NonZeroU16),
}

impl Repeat {
    pub fn times(n: u16) -> GifCanvasResult<Self> {
        NonZeroU16::new(n)
            .map(Self::Times)
            .ok_or_else(|| GifCanvasError::validation("repeat count must be positive"))
    }
}

impl serde::Serialize for Repeat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Forever => serializer.serialize_str("forever"),
            Self::Times(n) => serializer.serialize_u16(n.get()),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Repeat {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error as _;

        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Word(String),
            Count(i64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Word(w) if w == "forever" => Ok(Self::Forever),
            Repr::Word(w) => Err(D::Error::custom(format!(
                "repeat must be \"forever\" or a positive integer, got \"{w}\""
            ))),
            Repr::Count(n) => u16::try_from(n)
                .ok()
                .and_then(NonZeroU16::new)
                .map(Self::Times)
                .ok_or_else(|| {
                    D::Error::custom(format!("repeat count must be in 1..=65535, got {n}"))
                }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
