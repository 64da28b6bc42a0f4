use super::*;

fn sample() -> StraightRgba {
    let bytes: Vec<u8> = (0..12u8)
        .flat_map(|i| match i % 3 {
            0 => [200, 100, 50, 255],
            1 => [64, 32, 0, 128],
            _ => [0, 0, 0, 0],
        })
        .collect();
    let pm = crate::assets::decode::pixmap_from_premul_bytes(&bytes, 4, 3).unwrap();
    StraightRgba::from_pixmap(&pm)
}

#[test]
fn unpremultiply_restores_straight_channels() {
    let mut px = vec![64, 32, 0, 128, 10, 20, 30, 0, 9, 8, 7, 255];
    unpremultiply_in_place(&mut px);
    assert_eq!(&px[..4], &[128, 64, 0, 128]);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(&px[8..], &[9, 8, 7, 255]);
}

#[test]
fn fast_png_decodes_back() {
    let img = sample();
    let png = encode_fast(&img).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    let back = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (4, 3));
    assert_eq!(back.get_pixel(0, 0).0, [200, 100, 50, 255]);
    assert_eq!(back.get_pixel(1, 0).0, [128, 64, 0, 128]);
}

#[tokio::test]
async fn primary_and_fallback_agree_on_pixels() {
    let img = sample();
    let best = encode_png(&img, &EncodeConfig::default()).await.unwrap();
    let disabled = EncodeConfig {
        primary: false,
        ..EncodeConfig::default()
    };
    let fast = encode_png(&img, &disabled).await.unwrap();
    let a = image::load_from_memory(&best).unwrap().to_rgba8();
    let b = image::load_from_memory(&fast).unwrap().to_rgba8();
    assert_eq!(a.as_raw(), b.as_raw());
    assert_eq!(a.as_raw().as_slice(), img.as_bytes());
}

#[tokio::test]
async fn zero_timeout_falls_back_to_baseline() {
    let img = sample();
    let hurried = EncodeConfig {
        primary: true,
        timeout_ms: 0,
    };
    let png = encode_png(&img, &hurried).await.unwrap();
    let back = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(back.as_raw().as_slice(), img.as_bytes());
}
