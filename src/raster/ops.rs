use image::{Rgba, RgbaImage, imageops};
use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::Canvas,
    foundation::error::{GifCanvasError, GifCanvasResult},
    overlay::{composite::overlay_at, queue::Overlay},
    raster::blur::{gaussian_blur, mild_blur, sigma_for_radius},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Mirror left to right.
    X,
    /// Mirror top to bottom.
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn luma(self) -> f32 {
        luma(self.r, self.g, self.b)
    }
}

/// A deferred per-frame pixel operation.
///
/// Frames record these and run them in order when materialized.
#[derive(Clone, Debug)]
pub enum RasterOp {
    Resize {
        width: u32,
        height: u32,
    },
    Crop {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// Clockwise turn about the frame centre; the canvas size is kept.
    Rotate {
        degrees: f64,
    },
    Flip(Axis),
    /// Recolour towards the tint chroma, keeping each pixel's luma.
    Tint(Rgb),
    Grayscale,
    /// Gaussian blur with `sigma = 1 + radius / 2`, or a mild 3x3 blur without a radius.
    Blur {
        radius: Option<f32>,
    },
    Negate,
    /// Stretch luma so the darkest pixel maps to 0 and the brightest to 255.
    Normalise,
    /// Paint overlays in order, later ones on top.
    Composite(Vec<Overlay>),
}

impl RasterOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resize { .. } => "resize",
            Self::Crop { .. } => "crop",
            Self::Rotate { .. } => "rotate",
            Self::Flip(_) => "flip",
            Self::Tint(_) => "tint",
            Self::Grayscale => "grayscale",
            Self::Blur { .. } => "blur",
            Self::Negate => "negate",
            Self::Normalise => "normalise",
            Self::Composite(_) => "composite",
        }
    }

    pub fn apply(&self, mut img: RgbaImage) -> GifCanvasResult<RgbaImage> {
        match self {
            Self::Resize { width, height } => {
                if *width == 0 || *height == 0 {
                    return Err(GifCanvasError::validation(format!(
                        "resize target {width}x{height} must be non-empty"
                    )));
                }
                if img.dimensions() == (*width, *height) {
                    return Ok(img);
                }
                Ok(imageops::resize(
                    &img,
                    *width,
                    *height,
                    imageops::FilterType::Lanczos3,
                ))
            }
            Self::Crop {
                x,
                y,
                width,
                height,
            } => {
                let (w, h) = img.dimensions();
                let bounds = Canvas {
                    width: w,
                    height: h,
                };
                check_crop(bounds, *x, *y, *width, *height)?;
                Ok(imageops::crop_imm(&img, *x, *y, *width, *height).to_image())
            }
            Self::Rotate { degrees } => rotate(&img, *degrees),
            Self::Flip(Axis::X) => {
                imageops::flip_horizontal_in_place(&mut img);
                Ok(img)
            }
            Self::Flip(Axis::Y) => {
                imageops::flip_vertical_in_place(&mut img);
                Ok(img)
            }
            Self::Tint(rgb) => {
                tint(&mut img, *rgb);
                Ok(img)
            }
            Self::Grayscale => {
                let gray = imageops::grayscale_alpha(&img);
                Ok(image::DynamicImage::ImageLumaA8(gray).to_rgba8())
            }
            Self::Blur { radius: None } => mild_blur(&img),
            Self::Blur {
                radius: Some(radius),
            } => gaussian_blur(&img, sigma_for_radius(*radius)?),
            Self::Negate => {
                imageops::invert(&mut img);
                Ok(img)
            }
            Self::Normalise => {
                normalise(&mut img);
                Ok(img)
            }
            Self::Composite(overlays) => {
                for overlay in overlays {
                    overlay_at(&mut img, &overlay.image, overlay.left, overlay.top);
                }
                Ok(img)
            }
        }
    }
}

pub(crate) fn check_crop(
    bounds: Canvas,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> GifCanvasResult<()> {
    let fits_x = x.checked_add(width).is_some_and(|r| r <= bounds.width);
    let fits_y = y.checked_add(height).is_some_and(|b| b <= bounds.height);
    if width == 0 || height == 0 || !fits_x || !fits_y {
        return Err(GifCanvasError::validation(format!(
            "crop {width}x{height}+{x}+{y} does not fit a {}x{} frame",
            bounds.width, bounds.height
        )));
    }
    Ok(())
}

fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.2126 * f32::from(r) + 0.7152 * f32::from(g) + 0.0722 * f32::from(b)
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn rotate(img: &RgbaImage, degrees: f64) -> GifCanvasResult<RgbaImage> {
    if !degrees.is_finite() {
        return Err(GifCanvasError::validation("rotation angle must be finite"));
    }
    let turn = degrees.rem_euclid(360.0);
    let square = img.width() == img.height();
    match turn {
        t if t == 0.0 => return Ok(img.clone()),
        t if t == 180.0 => return Ok(imageops::rotate180(img)),
        t if t == 90.0 && square => return Ok(imageops::rotate90(img)),
        t if t == 270.0 && square => return Ok(imageops::rotate270(img)),
        _ => {}
    }

    let (w, h) = img.dimensions();
    let centre = Point::new(f64::from(w) / 2.0, f64::from(h) / 2.0);
    // y points down, so a positive angle turns clockwise on screen
    let inverse = Affine::rotate_about(turn.to_radians(), centre).inverse();

    let mut out = RgbaImage::new(w, h);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let src = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let (sx, sy) = (src.x.floor(), src.y.floor());
        if sx >= 0.0 && sy >= 0.0 && sx < f64::from(w) && sy < f64::from(h) {
            *px = *img.get_pixel(sx as u32, sy as u32);
        }
    }
    Ok(out)
}

fn tint(img: &mut RgbaImage, rgb: Rgb) {
    let tint_luma = rgb.luma();
    for Rgba([r, g, b, _]) in img.pixels_mut() {
        let y = luma(*r, *g, *b);
        if tint_luma <= f32::EPSILON {
            let v = to_u8(y);
            (*r, *g, *b) = (v, v, v);
            continue;
        }
        let k = y / tint_luma;
        *r = to_u8(f32::from(rgb.r) * k);
        *g = to_u8(f32::from(rgb.g) * k);
        *b = to_u8(f32::from(rgb.b) * k);
    }
}

fn normalise(img: &mut RgbaImage) {
    let mut lo = f32::MAX;
    let mut hi = f32::MIN;
    for Rgba([r, g, b, a]) in img.pixels() {
        if *a == 0 {
            continue;
        }
        let y = luma(*r, *g, *b);
        lo = lo.min(y);
        hi = hi.max(y);
    }
    if hi - lo < 1.0 {
        return;
    }

    let scale = 255.0 / (hi - lo);
    for Rgba([r, g, b, a]) in img.pixels_mut() {
        if *a == 0 {
            continue;
        }
        for c in [r, g, b] {
            *c = to_u8((f32::from(*c) - lo) * scale);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/ops.rs"]
mod tests;
