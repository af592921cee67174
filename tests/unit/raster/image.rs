use super::*;

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn png_decodes_to_rgba() {
    let src = RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 200]));
    let img = load_image(&png_bytes(&src)).unwrap();
    assert_eq!(img, src);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = load_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, GifCanvasError::Decode(_)));
}

#[test]
fn fit_only_resamples_on_size_change() {
    let src = RgbaImage::from_pixel(4, 4, image::Rgba([9, 9, 9, 255]));
    assert_eq!(fit(src.clone(), 4, 4).unwrap(), src);
    assert_eq!(fit(src.clone(), 2, 3).unwrap().dimensions(), (2, 3));
    assert!(fit(src, 0, 3).is_err());
}

#[test]
fn round_mask_clears_corners_keeps_centre() {
    let mut img = RgbaImage::from_pixel(12, 12, image::Rgba([0, 255, 0, 255]));
    round_mask(&mut img).unwrap();
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(11, 11).0[3], 0);
    assert_eq!(img.get_pixel(6, 6).0, [0, 255, 0, 255]);
}
