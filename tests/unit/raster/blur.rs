use super::*;

#[test]
fn kernel_is_normalized_and_symmetric() {
    let k = gaussian_kernel(3, 1.5).unwrap();
    assert_eq!(k.len(), 7);
    assert!((k.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    assert_eq!(k[0], k[6]);
    assert!(k[3] > k[2] && k[2] > k[1]);

    assert_eq!(gaussian_kernel(0, 1.0).unwrap(), vec![1.0]);
    assert!(gaussian_kernel(2, f32::NAN).is_err());
}

#[test]
fn single_row_and_column_frames_blur_without_panicking() {
    let row = RgbaImage::from_fn(6, 1, |x, _| image::Rgba([(x * 40) as u8, 0, 0, 255]));
    let col = RgbaImage::from_fn(1, 6, |_, y| image::Rgba([0, (y * 40) as u8, 0, 255]));
    assert_eq!(gaussian_blur(&row, 3.0).unwrap().dimensions(), (6, 1));
    assert_eq!(gaussian_blur(&col, 3.0).unwrap().dimensions(), (1, 6));
}

#[test]
fn constant_frame_is_unchanged() {
    let img = RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]));
    let out = gaussian_blur(&img, 2.0).unwrap();
    assert_eq!(out, img);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let mut img = RgbaImage::new(5, 5);
    img.put_pixel(2, 2, image::Rgba([255, 255, 255, 255]));

    let out = gaussian_blur(&img, 1.2).unwrap();

    let nonzero = out.pixels().filter(|px| px.0[3] != 0).count();
    assert!(nonzero > 1);
    assert!(out.get_pixel(2, 2).0[3] < 255);
}

#[test]
fn transparent_neighbours_do_not_darken_colour() {
    let mut img = RgbaImage::new(3, 1);
    img.put_pixel(1, 0, image::Rgba([200, 100, 50, 255]));
    let out = gaussian_blur(&img, 1.0).unwrap();
    let px = out.get_pixel(1, 0).0;
    assert!(px[3] < 255);
    assert!((i32::from(px[0]) - 200).abs() <= 2);
}

#[test]
fn radius_maps_to_sigma() {
    assert_eq!(sigma_for_radius(2.0).unwrap(), 2.0);
    assert!(sigma_for_radius(-1.0).is_err());
    assert!(gaussian_blur(&RgbaImage::new(1, 1), 0.0).is_err());
}

#[test]
fn mild_blur_only_reaches_direct_neighbours() {
    let mut img = RgbaImage::new(5, 1);
    img.put_pixel(2, 0, image::Rgba([0, 0, 0, 255]));
    let out = mild_blur(&img).unwrap();
    assert_eq!(out.get_pixel(0, 0).0[3], 0);
    assert!(out.get_pixel(1, 0).0[3] > 0);
    assert!(out.get_pixel(3, 0).0[3] > 0);
    assert_eq!(out.get_pixel(4, 0).0[3], 0);
}
