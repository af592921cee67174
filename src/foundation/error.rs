/// Convenience result type used across gifcanvas.
pub type GifCanvasResult<T> = Result<T, GifCanvasError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GifCanvasError {
    /// Malformed or unsupported input bytes. No sequence is produced.
    #[error("decode error: {0}")]
    Decode(String),

    /// Frame coalescing could not run. Callers recover by keeping the uncoalesced frames.
    #[error("coalesce error: {0}")]
    Coalesce(String),

    /// A frame selector describes a contradictory request. Resolves to an empty set.
    #[error("invalid frame selector: {0}")]
    InvalidSelector(String),

    /// The pixel codec rejected the final encode parameters.
    #[error("encode error: {0}")]
    Encode(String),

    /// An unrecognized processing mode was requested. Callers substitute a default.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Invalid caller-provided geometry or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// The raster/vector collaborator failed to produce pixels.
    #[error("raster error: {0}")]
    Raster(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifCanvasError {
    /// Build a [`GifCanvasError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`GifCanvasError::Coalesce`] value.
    pub fn coalesce(msg: impl Into<String>) -> Self {
        Self::Coalesce(msg.into())
    }

    /// Build a [`GifCanvasError::InvalidSelector`] value.
    pub fn invalid_selector(msg: impl Into<String>) -> Self {
        Self::InvalidSelector(msg.into())
    }

    /// Build a [`GifCanvasError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`GifCanvasError::UnsupportedAlgorithm`] value.
    pub fn unsupported_algorithm(msg: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm(msg.into())
    }

    /// Build a [`GifCanvasError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GifCanvasError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Whether the engine recovers from this error locally instead of failing the operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Coalesce(_) | Self::InvalidSelector(_) | Self::UnsupportedAlgorithm(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
