use super::*;

#[test]
fn options_default_when_absent() {
    let o = RenderOptions::default();
    assert_eq!(o.normalized_scale(), 1.0);
    assert_eq!(o.normalized_pixel_ratio(), 1.0);
}

#[test]
fn options_clamp_into_safe_ranges() {
    let o = RenderOptions::new(0.01, 9.0);
    assert_eq!(o.normalized_scale(), 0.25);
    assert_eq!(o.normalized_pixel_ratio(), 4.0);

    let o = RenderOptions::new(3.0, 0.1);
    assert_eq!(o.normalized_scale(), 1.0);
    assert_eq!(o.normalized_pixel_ratio(), 0.5);
}

#[test]
fn options_ignore_non_finite_values() {
    let o = RenderOptions::new(f32::NAN, f32::INFINITY);
    assert_eq!(o.normalized_scale(), 1.0);
    assert_eq!(o.normalized_pixel_ratio(), 1.0);
}

#[test]
fn options_deserialize_camel_case() {
    let o: RenderOptions = serde_json::from_str(r#"{"scale":0.5,"pixelRatio":2}"#).unwrap();
    assert_eq!(o.normalized_scale(), 0.5);
    assert_eq!(o.normalized_pixel_ratio(), 2.0);
}

#[test]
fn color_premul_and_alpha() {
    assert_eq!(Rgba8::rgba(255, 0, 0, 128).premul_bytes(), [128, 0, 0, 128]);
    assert_eq!(Rgba8::rgb(10, 20, 30).with_alpha(0.0).a, 0);
    assert_eq!(
        Rgba8::rgb(0, 0, 0).lerp(Rgba8::rgb(200, 100, 50), 0.5),
        Rgba8::rgb(100, 50, 25)
    );
}

#[test]
fn canvas_presets() {
    assert_eq!(CanvasSize::POSTER.rect().width(), 1080.0);
    assert_eq!(CanvasSize::POSTER.rect().height(), 1920.0);
    assert_eq!(CanvasSize::SQUARE.h(), 1080.0);
}
