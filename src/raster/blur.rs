use image::RgbaImage;

use crate::foundation::error::{GifCanvasError, GifCanvasResult};

const MILD_RADIUS: u32 = 1;
const MILD_SIGMA: f32 = 1.0;

/// Sigma for a caller-facing blur radius (`1 + radius / 2`).
pub fn sigma_for_radius(radius: f32) -> GifCanvasResult<f32> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(GifCanvasError::validation("blur radius must be >= 0"));
    }
    Ok(1.0 + radius / 2.0)
}

/// Gaussian blur of a straight-alpha frame with a `3 * sigma` kernel.
///
/// Runs on premultiplied floats so transparent pixels do not bleed their colour.
pub fn gaussian_blur(img: &RgbaImage, sigma: f32) -> GifCanvasResult<RgbaImage> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(GifCanvasError::validation("blur sigma must be > 0"));
    }
    let radius = (sigma * 3.0).ceil().max(1.0) as u32;
    blur_straight(img, radius, sigma)
}

/// Cheap 3x3 blur used when no radius is given.
pub fn mild_blur(img: &RgbaImage) -> GifCanvasResult<RgbaImage> {
    blur_straight(img, MILD_RADIUS, MILD_SIGMA)
}

fn blur_straight(img: &RgbaImage, radius: u32, sigma: f32) -> GifCanvasResult<RgbaImage> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 || radius == 0 {
        return Ok(img.clone());
    }

    let kernel = gaussian_kernel(radius, sigma)?;
    let plane: Vec<[f32; 4]> = img.pixels().map(|px| premultiplied(px.0)).collect();
    let rows = convolve(&plane, width, height, &kernel, Pass::Rows);
    let blurred = convolve(&rows, width, height, &kernel, Pass::Columns);

    let mut out = RgbaImage::new(width, height);
    for (px, acc) in out.pixels_mut().zip(&blurred) {
        px.0 = straight(*acc);
    }
    Ok(out)
}

/// Normalized Gaussian weights for taps `-radius..=radius`.
pub fn gaussian_kernel(radius: u32, sigma: f32) -> GifCanvasResult<Vec<f32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(GifCanvasError::validation("blur sigma must be > 0"));
    }
    let reach = i64::from(radius);
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-reach..=reach)
        .map(|i| {
            let x = i as f32;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();

    let total: f32 = weights.iter().sum();
    if !total.is_normal() {
        return Err(GifCanvasError::raster("gaussian kernel sums to zero"));
    }
    weights.iter_mut().for_each(|w| *w /= total);
    Ok(weights)
}

#[derive(Clone, Copy)]
enum Pass {
    Rows,
    Columns,
}

/// One separable pass; samples past the edge repeat the edge pixel.
fn convolve(
    src: &[[f32; 4]],
    width: u32,
    height: u32,
    kernel: &[f32],
    pass: Pass,
) -> Vec<[f32; 4]> {
    let (w, h) = (width as usize, height as usize);
    let reach = kernel.len() / 2;
    let mut dst = vec![[0.0; 4]; src.len()];

    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (tap, weight) in kernel.iter().enumerate() {
                let (sx, sy) = match pass {
                    Pass::Rows => ((x + tap).saturating_sub(reach).min(w - 1), y),
                    Pass::Columns => (x, (y + tap).saturating_sub(reach).min(h - 1)),
                };
                for (a, v) in acc.iter_mut().zip(src[sy * w + sx]) {
                    *a += weight * v;
                }
            }
            dst[y * w + x] = acc;
        }
    }
    dst
}

fn premultiplied([r, g, b, a]: [u8; 4]) -> [f32; 4] {
    let k = f32::from(a) / 255.0;
    [f32::from(r) * k, f32::from(g) * k, f32::from(b) * k, f32::from(a)]
}

fn straight([r, g, b, a]: [f32; 4]) -> [u8; 4] {
    if a < 0.5 {
        return [0; 4];
    }
    let k = 255.0 / a;
    let channel = |v: f32| (v * k).round().clamp(0.0, 255.0) as u8;
    [channel(r), channel(g), channel(b), a.round().clamp(0.0, 255.0) as u8]
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blur.rs"]
mod tests;
