use image::RgbaImage;

use crate::foundation::error::{GifCanvasError, GifCanvasResult};

pub type PremulRgba8 = [u8; 4];

/// Straight (non-premultiplied) RGBA8, the layout frames are stored in.
pub type StraightRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Source-over for straight-alpha pixels.
pub fn over_straight(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        _ => unpremultiply(over(premultiply(dst), premultiply(src), 1.0)),
    }
}

pub fn premultiply(px: StraightRgba8) -> PremulRgba8 {
    let a = u16::from(px[3]);
    [
        mul_div255(u16::from(px[0]), a),
        mul_div255(u16::from(px[1]), a),
        mul_div255(u16::from(px[2]), a),
        px[3],
    ]
}

pub fn unpremultiply(px: PremulRgba8) -> StraightRgba8 {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

/// Composite `src` onto `dst` with its top-left corner at `(left, top)`.
///
/// Parts of `src` that fall outside `dst` are clipped.
pub fn overlay_at(dst: &mut RgbaImage, src: &RgbaImage, left: i64, top: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = (left + sw).min(dw);
    let y1 = (top + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for y in y0..y1 {
        for x in x0..x1 {
            // in-bounds for both images by construction of the clip rect
            let s = src.get_pixel((x - left) as u32, (y - top) as u32).0;
            let d = dst.get_pixel_mut(x as u32, y as u32);
            d.0 = over_straight(d.0, s);
        }
    }
}

/// Keep `dst` only where `mask` is opaque (multiply alpha by mask alpha).
pub fn dest_in(dst: &mut RgbaImage, mask: &RgbaImage) -> GifCanvasResult<()> {
    if dst.dimensions() != mask.dimensions() {
        return Err(GifCanvasError::raster(format!(
            "dest-in mask is {}x{}, expected {}x{}",
            mask.width(),
            mask.height(),
            dst.width(),
            dst.height()
        )));
    }
    for (d, m) in dst.pixels_mut().zip(mask.pixels()) {
        d.0[3] = mul_div255(u16::from(d.0[3]), u16::from(m.0[3]));
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/composite.rs"]
mod tests;
