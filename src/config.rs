use std::str::FromStr;

use crate::{
    foundation::core::{Fps, Repeat},
    foundation::error::{GifCanvasError, GifCanvasResult},
    render::threading::RenderThreading,
};

/// Public configuration surface consumed by decoding, embedding and rendering.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```
/// let opts = gifcanvas::Options::from_json(r#"{ "repeat": 2, "fps": 12 }"#).unwrap();
/// assert!(opts.coalesce);
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Options {
    /// Fill transparent pixels from the previous frame while decoding.
    pub coalesce: bool,
    /// Output frames per second. `None` keeps the source rate.
    pub fps: Option<u32>,
    /// How many times the rendered animation plays.
    pub repeat: Repeat,
    /// Raise progress and fallback diagnostics to `info`/`warn`. No behavioral effect.
    pub verbose: bool,
    /// Palette reduction mode name, see [`PaletteMode`].
    pub palette: String,
    /// Per-frame worker pool configuration.
    pub threading: RenderThreading,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            coalesce: true,
            fps: None,
            repeat: Repeat::Forever,
            verbose: false,
            palette: PaletteMode::Balanced.as_str().to_string(),
            threading: RenderThreading::default(),
        }
    }
}

impl Options {
    pub fn from_json(json: &str) -> GifCanvasResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| GifCanvasError::validation(format!("invalid options: {e}")))
    }

    /// The configured fps override, validated.
    pub fn fps_override(&self) -> GifCanvasResult<Option<Fps>> {
        self.fps.map(Fps::from_int).transpose()
    }

    /// The configured palette mode, falling back to [`PaletteMode::Balanced`] for unknown names.
    pub fn palette_mode(&self) -> PaletteMode {
        PaletteMode::resolve(&self.palette, self.verbose)
    }
}

/// Palette reduction strategy handed to the GIF quantizer.
///
/// Quantization keeps one transparent index, so partial alpha is written opaque.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteMode {
    /// Slowest, highest quality sampling.
    Best,
    #[default]
    Balanced,
    /// Coarse sampling for large sequences.
    Fast,
}

impl PaletteMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Balanced => "balanced",
            Self::Fast => "fast",
        }
    }

    /// NeuQuant sampling factor (1 = every pixel, 30 = coarsest).
    pub fn speed(self) -> i32 {
        match self {
            Self::Best => 1,
            Self::Balanced => 10,
            Self::Fast => 30,
        }
    }

    /// Parse `name`, substituting the default mode when it is not recognized.
    pub fn resolve(name: &str, verbose: bool) -> Self {
        match name.parse() {
            Ok(mode) => mode,
            Err(err) => {
                let fallback = Self::default();
                if verbose {
                    tracing::warn!(%err, fallback = fallback.as_str(), "palette mode fallback");
                } else {
                    tracing::debug!(%err, fallback = fallback.as_str(), "palette mode fallback");
                }
                fallback
            }
        }
    }
}

impl FromStr for PaletteMode {
    type Err = GifCanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best" => Ok(Self::Best),
            "balanced" => Ok(Self::Balanced),
            "fast" => Ok(Self::Fast),
            other => Err(GifCanvasError::unsupported_algorithm(format!(
                "unknown palette mode '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/options.rs"]
mod tests;
