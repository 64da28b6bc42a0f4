use super::*;

fn px(pixmap: &vello_cpu::Pixmap, x: u32, y: u32) -> [u8; 4] {
    let w = u32::from(pixmap.width());
    let idx = ((y * w + x) * 4) as usize;
    let b = pixmap.data_as_u8_slice();
    [b[idx], b[idx + 1], b[idx + 2], b[idx + 3]]
}

#[test]
fn device_size_follows_scale() {
    assert_eq!(device_size(CanvasSize::POSTER, 1.0), (1080, 1920));
    assert_eq!(device_size(CanvasSize::POSTER, 0.5), (540, 960));
    assert_eq!(device_size(CanvasSize::SQUARE, 2.0), (2160, 2160));
    assert_eq!(device_size(CanvasSize::POSTER, 0.3 * 1.5), (486, 864));
    let odd = CanvasSize {
        width: 3,
        height: 5,
    };
    assert_eq!(device_size(odd, 0.5), (2, 3));
}

#[test]
fn allocation_respects_pixel_limit() {
    assert!(Surface::new(CanvasSize::SQUARE, 1.0, 1080 * 1080).is_ok());
    let err = Surface::new(CanvasSize::SQUARE, 1.0, 1080 * 1080 - 1).unwrap_err();
    assert!(matches!(err, PosterError::Surface(_)));
    assert!(Surface::new(CanvasSize::SQUARE, 0.0, u64::MAX).is_err());
    // 1080 * 64 overflows u16 width
    assert!(Surface::new(CanvasSize::SQUARE, 64.0, u64::MAX).is_err());
}

#[test]
fn fill_rect_maps_logical_to_device_pixels() {
    let canvas = CanvasSize {
        width: 10,
        height: 10,
    };
    let mut s = Surface::new(canvas, 2.0, u64::MAX).unwrap();
    assert_eq!(s.size_px(), (20, 20));
    s.fill_rect(Rect::new(0.0, 0.0, 5.0, 10.0), Rgba8::rgb(255, 0, 0));
    let (pm, _) = s.finish();
    assert_eq!(px(&pm, 2, 10), [255, 0, 0, 255]);
    assert_eq!(px(&pm, 15, 10)[3], 0);
}

#[test]
fn opacity_group_scales_alpha() {
    let canvas = CanvasSize {
        width: 4,
        height: 4,
    };
    let mut s = Surface::new(canvas, 1.0, u64::MAX).unwrap();
    s.with_opacity(0.5, |s| s.fill_rect(canvas.rect(), Rgba8::rgb(0, 0, 255)));
    let (pm, _) = s.finish();
    let a = px(&pm, 1, 1)[3];
    assert!((120..=135).contains(&a), "alpha {a}");
}

#[test]
fn clip_limits_fill() {
    let canvas = CanvasSize {
        width: 8,
        height: 8,
    };
    let mut s = Surface::new(canvas, 1.0, u64::MAX).unwrap();
    let clip = vello_cpu::kurbo::Shape::to_path(&Rect::new(0.0, 0.0, 4.0, 8.0), 0.1);
    s.with_clip(&clip, |s| s.fill_rect(canvas.rect(), Rgba8::rgb(0, 255, 0)));
    let (pm, _) = s.finish();
    assert_eq!(px(&pm, 1, 4)[3], 255);
    assert_eq!(px(&pm, 6, 4)[3], 0);
}

#[test]
fn transform_is_restored_after_scope() {
    let canvas = CanvasSize {
        width: 8,
        height: 8,
    };
    let mut s = Surface::new(canvas, 1.0, u64::MAX).unwrap();
    s.with_transform(Affine::translate((4.0, 0.0)), |s| {
        s.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Rgba8::rgb(255, 255, 255));
    });
    s.fill_rect(Rect::new(0.0, 4.0, 4.0, 8.0), Rgba8::rgb(255, 255, 255));
    let (pm, _) = s.finish();
    assert_eq!(px(&pm, 6, 1)[3], 255);
    assert_eq!(px(&pm, 1, 1)[3], 0);
    assert_eq!(px(&pm, 1, 6)[3], 255);
}

#[test]
fn image_is_stretched_to_destination() {
    let canvas = CanvasSize {
        width: 8,
        height: 8,
    };
    let img = std::sync::Arc::new(
        PreparedImage::from_premul_rgba8(&[255, 0, 0, 255].repeat(4), 2, 2).unwrap(),
    );
    let mut s = Surface::new(canvas, 1.0, u64::MAX).unwrap();
    s.draw_image(&img, Rect::new(0.0, 0.0, 8.0, 4.0), 1.0);
    let (pm, _) = s.finish();
    assert_eq!(px(&pm, 6, 2), [255, 0, 0, 255]);
    assert_eq!(px(&pm, 6, 6)[3], 0);
}

#[test]
fn trace_records_layers_and_texts() {
    let mut s = Surface::new(CanvasSize::SQUARE, 0.25, u64::MAX).unwrap();
    let mut engine = TextEngine::estimate_only();
    s.layer("background");
    s.layer("title");
    let w = s.draw_text(
        &mut engine,
        "鼎",
        10.0,
        10.0,
        &TextStyle::new(40.0, Rgba8::rgb(0, 0, 0)),
    );
    assert!(w > 0.0);
    let style = TextStyle::new(40.0, Rgba8::rgb(0, 0, 0));
    assert_eq!(s.draw_text(&mut engine, "", 0.0, 0.0, &style), 0.0);
    let (_, trace) = s.finish();
    assert_eq!(trace.layers, vec!["background", "title"]);
    assert_eq!(trace.layer_index("title"), Some(1));
    assert!(trace.has_text("鼎"));
    assert_eq!(trace.texts.len(), 1);
}

fn dark_pixels(pixmap: &vello_cpu::Pixmap, rows: std::ops::Range<u32>) -> usize {
    let w = u32::from(pixmap.width());
    rows.flat_map(|y| (0..w).map(move |x| (x, y)))
        .filter(|&(x, y)| px(pixmap, x, y)[0] < 128)
        .count()
}

fn paint_sample(engine: &mut TextEngine) -> vello_cpu::Pixmap {
    let canvas = CanvasSize {
        width: 240,
        height: 100,
    };
    let mut s = Surface::new(canvas, 1.0, u64::MAX).unwrap();
    s.fill_rect(canvas.rect(), Rgba8::rgb(255, 255, 255));
    let style = TextStyle::new(48.0, Rgba8::rgb(0, 0, 0));
    s.draw_text(engine, "鼎 dǐng", 10.0, 70.0, &style);
    s.finish().0
}

#[test]
fn text_with_a_cjk_font_paints_glyph_pixels() {
    let root = std::path::PathBuf::from("target")
        .join("inkgrid_fixtures")
        .join("glyph_pixels");
    let db = crate::assets::fonts::font_database(&root);
    let Some(font) = crate::assets::fonts::find_cjk_face(&db) else {
        eprintln!("no CJK-capable font installed on this host; skipping");
        return;
    };
    let mut engine = TextEngine::new(Some(&font)).unwrap();
    let pm = paint_sample(&mut engine);
    assert!(dark_pixels(&pm, 10..80) > 100);
    // below the descenders the background is untouched
    assert_eq!(dark_pixels(&pm, 92..100), 0);
}

#[test]
fn text_without_a_font_leaves_background() {
    let pm = paint_sample(&mut TextEngine::estimate_only());
    assert_eq!(dark_pixels(&pm, 0..100), 0);
}
