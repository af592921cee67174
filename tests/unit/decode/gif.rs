use std::borrow::Cow;

use super::*;

// palette: 0 = red, 1 = blue, 2 = transparent slot
const PALETTE: [u8; 9] = [255, 0, 0, 0, 0, 255, 0, 0, 0];

fn indexed_frame(w: u16, h: u16, left: u16, top: u16, indices: Vec<u8>, delay: u16) -> gif::Frame<'static> {
    gif::Frame {
        width: w,
        height: h,
        left,
        top,
        delay,
        transparent: Some(2),
        buffer: Cow::Owned(indices),
        ..gif::Frame::default()
    }
}

fn encode(w: u16, h: u16, frames: Vec<gif::Frame<'static>>) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut enc = gif::Encoder::new(&mut out, w, h, &PALETTE).unwrap();
        for f in &frames {
            enc.write_frame(f).unwrap();
        }
    }
    out
}

#[test]
fn second_transparent_frame_coalesces_to_first() {
    let bytes = encode(
        2,
        2,
        vec![
            indexed_frame(2, 2, 0, 0, vec![0, 1, 1, 0], 10),
            indexed_frame(2, 2, 0, 0, vec![2, 2, 2, 2], 10),
        ],
    );

    let seq = decode_gif(&bytes, true, false).unwrap();
    assert_eq!(seq.frame_count(), 2);
    assert_eq!(seq.canvas.width, 2);
    assert_eq!(seq.channels, 4);
    assert!(seq.coalesced);
    assert_eq!(seq.frames[1], seq.frames[0]);
    assert_eq!(&seq.frames[0][0..4], &[255, 0, 0, 255]);
}

#[test]
fn without_coalescing_holes_stay_transparent() {
    let bytes = encode(
        2,
        1,
        vec![
            indexed_frame(2, 1, 0, 0, vec![0, 1], 10),
            indexed_frame(2, 1, 0, 0, vec![2, 2], 10),
        ],
    );

    let seq = decode_gif(&bytes, false, false).unwrap();
    assert!(!seq.coalesced);
    assert_eq!(seq.frames[1][3], 0);
    assert_eq!(seq.frames[1][7], 0);
}

#[test]
fn sub_rectangle_frames_are_blitted_at_offset() {
    let bytes = encode(
        2,
        2,
        vec![
            indexed_frame(2, 2, 0, 0, vec![0, 0, 0, 0], 5),
            indexed_frame(1, 1, 1, 1, vec![1], 5),
        ],
    );

    let raw = read_raw_frames(&bytes).unwrap().0;
    let second = raw.frame(1).unwrap();
    assert_eq!(&second[0..4], &[0, 0, 0, 0]);
    assert_eq!(&second[12..16], &[0, 0, 255, 255]);

    let seq = decode_gif(&bytes, true, false).unwrap();
    assert_eq!(&seq.frames[1][0..4], &[255, 0, 0, 255]);
    assert_eq!(&seq.frames[1][12..16], &[0, 0, 255, 255]);
}

#[test]
fn fps_comes_from_first_delay() {
    let bytes = encode(1, 1, vec![indexed_frame(1, 1, 0, 0, vec![0], 5)]);
    let seq = decode_gif(&bytes, true, false).unwrap();
    assert_eq!(seq.fps.as_f64(), 20.0);

    let bytes = encode(1, 1, vec![indexed_frame(1, 1, 0, 0, vec![0], 0)]);
    let seq = decode_gif(&bytes, true, false).unwrap();
    assert_eq!(seq.fps, Fps::DEFAULT);
}

#[test]
fn static_gif_is_single_frame_sequence() {
    let bytes = encode(1, 1, vec![indexed_frame(1, 1, 0, 0, vec![2], 0)]);
    let seq = decode_gif(&bytes, true, false).unwrap();
    assert_eq!(seq.frame_count(), 1);
    assert!(!seq.coalesced);
}

#[test]
fn garbage_input_is_decode_error() {
    let err = decode_gif(b"definitely not a gif", true, false).unwrap_err();
    assert!(matches!(err, GifCanvasError::Decode(_)));
}

#[test]
fn header_without_frames_is_decode_error() {
    let bytes = encode(1, 1, Vec::new());
    let err = decode_gif(&bytes, true, false).unwrap_err();
    assert!(matches!(err, GifCanvasError::Decode(_)));
}

#[test]
fn oversized_logical_screen_is_decode_error() {
    // a handful of bytes declaring a 65535x65535 screen around one 1x1 frame
    let bytes = encode(u16::MAX, u16::MAX, vec![indexed_frame(1, 1, 0, 0, vec![0], 10)]);
    assert!(bytes.len() < 200);

    let err = decode_gif(&bytes, true, false).unwrap_err();
    assert!(matches!(err, GifCanvasError::Decode(_)));
    assert!(err.to_string().contains("decode limit"));
}

#[test]
fn decode_limit_counts_every_frame() {
    let plane = MAX_DECODED_BYTES / 2;
    assert!(check_decoded_size(plane, 2).is_ok());
    assert!(check_decoded_size(plane + 1, 2).is_err());
    assert!(check_decoded_size(usize::MAX, 2).is_err());
}
