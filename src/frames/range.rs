use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::{
    foundation::core::FrameNumber,
    foundation::error::{GifCanvasError, GifCanvasResult},
};

/// Inclusive span of 1-based frame numbers. Bounds are clamped at resolve time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameSpan {
    pub from: i64,
    pub to: i64,
}

impl FrameSpan {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// Clamp to `[1, frame_count]`. `None` when nothing is left.
    pub fn clamp(self, frame_count: u32) -> Option<RangeInclusive<u32>> {
        let from = self.from.max(1);
        let to = self.to.min(i64::from(frame_count));
        if from > to {
            return None;
        }
        // both bounds now lie in 1..=frame_count
        Some(from as u32..=to as u32)
    }
}

impl From<RangeInclusive<i64>> for FrameSpan {
    fn from(r: RangeInclusive<i64>) -> Self {
        Self::new(*r.start(), *r.end())
    }
}

/// Caller-facing description of which frames an operation targets.
///
/// Deserializes from the shapes a JSON caller would write: `3`, `[1, 4]`,
/// `{"from": 2, "to": 5}` or `[{"from": 1, "to": 2}, {"from": 8, "to": 9}]`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FrameSelector {
    /// A single frame number.
    Index(u32),
    /// Literal frame numbers, taken as-is without range semantics.
    Indices(Vec<u32>),
    /// One clamped inclusive span.
    Span(FrameSpan),
    /// Union of clamped inclusive spans.
    Spans(Vec<FrameSpan>),
}

impl FrameSelector {
    pub fn span(from: i64, to: i64) -> Self {
        Self::Span(FrameSpan::new(from, to))
    }

    /// Report requests that can never select anything, e.g. `{from: 5, to: 2}`.
    ///
    /// Resolution never fails; this exists so callers can surface a diagnostic.
    pub fn diagnose(&self, frame_count: u32) -> GifCanvasResult<()> {
        let spans: &[FrameSpan] = match self {
            Self::Span(s) => std::slice::from_ref(s),
            Self::Spans(s) => s,
            Self::Index(_) | Self::Indices(_) => return Ok(()),
        };
        for s in spans {
            if s.from > s.to {
                return Err(GifCanvasError::invalid_selector(format!(
                    "span from {} to {} is inverted",
                    s.from, s.to
                )));
            }
            if s.clamp(frame_count).is_none() {
                return Err(GifCanvasError::invalid_selector(format!(
                    "span from {} to {} lies outside frames 1..={frame_count}",
                    s.from, s.to
                )));
            }
        }
        Ok(())
    }
}

impl From<u32> for FrameSelector {
    fn from(n: u32) -> Self {
        Self::Index(n)
    }
}

impl From<Vec<u32>> for FrameSelector {
    fn from(v: Vec<u32>) -> Self {
        Self::Indices(v)
    }
}

impl From<FrameSpan> for FrameSelector {
    fn from(s: FrameSpan) -> Self {
        Self::Span(s)
    }
}

impl From<RangeInclusive<i64>> for FrameSelector {
    fn from(r: RangeInclusive<i64>) -> Self {
        Self::Span(r.into())
    }
}

impl From<Vec<FrameSpan>> for FrameSelector {
    fn from(v: Vec<FrameSpan>) -> Self {
        Self::Spans(v)
    }
}

/// Canonical, de-duplicated set of frame numbers an operation targets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameRangeSet {
    frames: BTreeSet<u32>,
}

impl FrameRangeSet {
    /// Every frame `1..=frame_count`.
    pub fn all(frame_count: u32) -> Self {
        Self {
            frames: (1..=frame_count).collect(),
        }
    }

    pub fn single(frame: FrameNumber) -> Self {
        Self {
            frames: BTreeSet::from([frame.0]),
        }
    }

    /// Normalize a selector against a sequence of `frame_count` frames.
    ///
    /// `None` selects every frame. Literal indices are kept as given; frames that do not
    /// exist simply never match. Spans are clamped to `[1, frame_count]` and an empty
    /// clamped span contributes nothing.
    pub fn resolve(selector: Option<&FrameSelector>, frame_count: u32) -> Self {
        let Some(selector) = selector else {
            return Self::all(frame_count);
        };

        let mut frames = BTreeSet::new();
        match selector {
            FrameSelector::Index(n) => {
                frames.insert(*n);
            }
            FrameSelector::Indices(ns) => frames.extend(ns.iter().copied()),
            FrameSelector::Span(s) => frames.extend(s.clamp(frame_count).into_iter().flatten()),
            FrameSelector::Spans(spans) => {
                for s in spans {
                    frames.extend(s.clamp(frame_count).into_iter().flatten());
                }
            }
        }
        Self { frames }
    }

    pub fn contains(&self, frame: FrameNumber) -> bool {
        self.frames.contains(&frame.0)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame numbers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = FrameNumber> + '_ {
        self.frames.iter().map(|&n| FrameNumber(n))
    }
}

impl FromIterator<FrameNumber> for FrameRangeSet {
    fn from_iter<I: IntoIterator<Item = FrameNumber>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().map(|f| f.0).collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/range.rs"]
mod tests;
