use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GifCanvasError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        GifCanvasError::coalesce("x")
            .to_string()
            .contains("coalesce error:")
    );
    assert!(
        GifCanvasError::invalid_selector("x")
            .to_string()
            .contains("invalid frame selector:")
    );
    assert!(
        GifCanvasError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        GifCanvasError::unsupported_algorithm("x")
            .to_string()
            .contains("unsupported algorithm:")
    );
    assert!(
        GifCanvasError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        GifCanvasError::raster("x")
            .to_string()
            .contains("raster error:")
    );
}

#[test]
fn only_fallback_kinds_are_recoverable() {
    assert!(GifCanvasError::coalesce("x").is_recoverable());
    assert!(GifCanvasError::invalid_selector("x").is_recoverable());
    assert!(GifCanvasError::unsupported_algorithm("x").is_recoverable());
    assert!(!GifCanvasError::decode("x").is_recoverable());
    assert!(!GifCanvasError::encode("x").is_recoverable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GifCanvasError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
