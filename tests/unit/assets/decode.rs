use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let raw: Vec<u8> = px.iter().copied().cycle().take((w * h * 4) as usize).collect();
    let img = image::RgbaImage::from_raw(w, h, raw).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions() {
    let img = decode_image(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!(img.width, 3);
    assert_eq!(img.height, 2);
    assert!((img.aspect() - 1.5).abs() < 1e-9);
}

#[test]
fn premultiply_matches_rounding() {
    let mut px = vec![100u8, 50, 200, 128, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        px,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128,
            0,
            0,
            0,
            0
        ]
    );
}

#[test]
fn decode_svg_rasterizes_at_double_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#c0392b"/></svg>"##;
    let img = decode_image(svg).unwrap();
    assert_eq!((img.width, img.height), (80, 40));
}

#[test]
fn decode_garbage_fails() {
    assert!(decode_image(b"definitely not an image").is_err());
    assert!(decode_image(b"<svg").is_err());
}

#[test]
fn pixmap_rejects_wrong_length() {
    assert!(pixmap_from_premul_bytes(&[0u8; 12], 2, 2).is_err());
    assert!(pixmap_from_premul_bytes(&[0u8; 16], 2, 2).is_ok());
}
