use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn straight_over_half_alpha_blends() {
    let out = over_straight([0, 0, 255, 255], [255, 0, 0, 128]);
    assert_eq!(out[3], 255);
    assert!(out[0] > 120 && out[0] < 136);
    assert!(out[2] > 120 && out[2] < 136);
}

#[test]
fn straight_over_keeps_dst_for_clear_src() {
    let dst = [9, 8, 7, 6];
    assert_eq!(over_straight(dst, [1, 2, 3, 0]), dst);
}

#[test]
fn premultiply_roundtrip_is_exact_when_opaque() {
    let px = [12, 34, 56, 255];
    assert_eq!(unpremultiply(premultiply(px)), px);
    assert_eq!(unpremultiply([0, 0, 0, 0]), [0, 0, 0, 0]);
}

#[test]
fn overlay_at_clips_to_destination() {
    let mut dst = RgbaImage::from_pixel(3, 3, image::Rgba([0, 0, 0, 255]));
    let src = RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 255]));

    overlay_at(&mut dst, &src, 2, -1);
    assert_eq!(dst.get_pixel(2, 0).0, [255, 255, 255, 255]);
    assert_eq!(dst.get_pixel(1, 0).0, [0, 0, 0, 255]);
    assert_eq!(dst.get_pixel(2, 1).0, [0, 0, 0, 255]);

    overlay_at(&mut dst, &src, 10, 10);
    overlay_at(&mut dst, &src, -5, 0);
    assert_eq!(dst.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn dest_in_multiplies_alpha() {
    let mut dst = RgbaImage::from_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
    let mut mask = RgbaImage::new(2, 1);
    mask.put_pixel(0, 0, image::Rgba([0, 0, 0, 255]));

    dest_in(&mut dst, &mask).unwrap();
    assert_eq!(dst.get_pixel(0, 0).0[3], 255);
    assert_eq!(dst.get_pixel(1, 0).0[3], 0);

    assert!(dest_in(&mut dst, &RgbaImage::new(1, 1)).is_err());
}
