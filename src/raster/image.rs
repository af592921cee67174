use image::{RgbaImage, imageops};

use crate::{
    foundation::error::{GifCanvasError, GifCanvasResult},
    overlay::composite::dest_in,
    raster::svg::{ellipse_mask_markup, rasterize},
};

/// Decode a caller-supplied still image (PNG, JPEG, GIF first frame, ...) into straight RGBA.
pub fn load_image(bytes: &[u8]) -> GifCanvasResult<RgbaImage> {
    let format = image::guess_format(bytes)
        .map_err(|e| GifCanvasError::decode(format!("unrecognized image format: {e}")))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| GifCanvasError::decode(format!("decode {format:?} image: {e}")))?;
    Ok(img.to_rgba8())
}

/// Resize to `width` x `height`, skipping the resample when the size already matches.
pub fn fit(img: RgbaImage, width: u32, height: u32) -> GifCanvasResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(GifCanvasError::validation(format!(
            "image target {width}x{height} must be non-empty"
        )));
    }
    if img.dimensions() == (width, height) {
        return Ok(img);
    }
    Ok(imageops::resize(
        &img,
        width,
        height,
        imageops::FilterType::Lanczos3,
    ))
}

/// Cut the image to the ellipse inscribed in its bounds.
pub fn round_mask(img: &mut RgbaImage) -> GifCanvasResult<()> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Ok(());
    }
    let mask = rasterize(&ellipse_mask_markup(w, h), w, h)?;
    dest_in(img, &mask)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/image.rs"]
mod tests;
