use super::*;
use crate::foundation::core::CanvasSize;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn contain_letterboxes_wide_image() {
    let target = Rect::new(0.0, 0.0, 100.0, 100.0);
    let r = contain_rect(200.0, 100.0, target, FitAdjust::default());
    assert!(approx(r.width(), 100.0));
    assert!(approx(r.height(), 50.0));
    assert!(approx(r.y0, 25.0));
}

#[test]
fn cover_fills_and_overflows() {
    let target = Rect::new(0.0, 0.0, 100.0, 100.0);
    let r = cover_rect(200.0, 100.0, target, FitAdjust::default());
    assert!(approx(r.height(), 100.0));
    assert!(approx(r.width(), 200.0));
    assert!(approx(r.x0, -50.0));
}

#[test]
fn fit_adjust_scales_about_center_then_offsets() {
    let target = Rect::new(0.0, 0.0, 100.0, 100.0);
    let r = contain_rect(10.0, 10.0, target, FitAdjust::scaled(0.5).offset(10.0, -5.0));
    assert!(approx(r.width(), 50.0));
    assert!(approx(r.center().x, 60.0));
    assert!(approx(r.center().y, 45.0));
}

#[test]
fn degenerate_image_fits_to_nothing() {
    let r = contain_rect(0.0, 10.0, Rect::new(0.0, 0.0, 10.0, 10.0), FitAdjust::default());
    assert!(approx(r.area(), 0.0));
}

#[test]
fn round_rect_radius_is_clamped() {
    let rect = Rect::new(0.0, 0.0, 40.0, 10.0);
    let path = round_rect_path(rect, 100.0);
    let bb = vello_cpu::kurbo::Shape::bounding_box(&path);
    assert!((bb.width() - 40.0).abs() < 0.5);
    assert!((bb.height() - 10.0).abs() < 0.5);
}

#[test]
fn vertical_positions_step_down() {
    let p = vertical_positions("上 善若", 100.0, 0.0, 40.0);
    assert_eq!(p.len(), 3);
    assert_eq!(p[0].0, '上');
    assert!(approx(p[0].1.y, 20.0));
    assert!(approx(p[2].1.y, 100.0));
    assert!(p.iter().all(|(_, pt)| approx(pt.x, 100.0)));
}

#[test]
fn columns_jump_left_and_reset_to_top() {
    let flow = ColumnFlow {
        x: 500.0,
        top: 100.0,
        bottom: 220.0,
        step: 40.0,
        column_gap: 60.0,
        min_x: 0.0,
    };
    let (chars, columns) = layout_vertical_columns("一二三四五六七", &flow);
    assert_eq!(columns, 3);
    assert_eq!(chars.len(), 7);
    // three rows per column
    assert!(approx(chars[2].1.x, 500.0));
    assert!(approx(chars[3].1.x, 440.0));
    assert!(approx(chars[3].1.y, 120.0));
    assert!(approx(chars[6].1.x, 380.0));
    for (_, p) in &chars {
        assert!(p.y + 20.0 <= flow.bottom + 1e-9);
    }
}

#[test]
fn columns_stop_at_min_x() {
    let flow = ColumnFlow {
        x: 100.0,
        top: 0.0,
        bottom: 80.0,
        step: 40.0,
        column_gap: 60.0,
        min_x: 30.0,
    };
    let (chars, columns) = layout_vertical_columns("一二三四五六", &flow);
    assert_eq!(columns, 2);
    assert_eq!(chars.len(), 4);
    assert_eq!(layout_vertical_columns("", &flow), (Vec::new(), 0));
}

#[test]
fn seal_slots_read_right_column_first() {
    let rect = Rect::new(-50.0, -50.0, 50.0, 50.0);
    assert!(seal_slots(0, rect).is_empty());
    assert_eq!(seal_slots(1, rect), vec![Point::ORIGIN]);
    let four = seal_slots(4, rect);
    assert!(four[0].x > 0.0 && four[0].y < 0.0);
    assert!(four[3].x < 0.0 && four[3].y > 0.0);
    assert_eq!(seal_slots(9, rect).len(), 4);
}

#[test]
fn scatter_is_deterministic_and_bounded() {
    let area = Rect::new(10.0, 20.0, 300.0, 400.0);
    let a = scatter(&mut SeededRng::from_parts(&["ny_01", "福"]), area, 50, 3.0);
    let b = scatter(&mut SeededRng::from_parts(&["ny_01", "福"]), area, 50, 3.0);
    let c = scatter(&mut SeededRng::from_parts(&["ny_02", "福"]), area, 50, 3.0);
    assert_eq!(a, b);
    assert_ne!(a, c);
    for sp in &a {
        assert!(area.contains(sp.at));
        assert!(sp.radius <= 3.0 && sp.radius >= 0.75);
        assert!((0.25..=0.95).contains(&sp.alpha));
    }
}

#[test]
fn gradient_stops_interpolate() {
    let stops = [
        (0.0, Rgba8::rgb(0, 0, 0)),
        (0.5, Rgba8::rgb(200, 0, 0)),
        (1.0, Rgba8::rgb(200, 200, 0)),
    ];
    assert_eq!(sample_stops(&stops, -1.0), Rgba8::rgb(0, 0, 0));
    assert_eq!(sample_stops(&stops, 0.25), Rgba8::rgb(100, 0, 0));
    assert_eq!(sample_stops(&stops, 0.75), Rgba8::rgb(200, 100, 0));
    assert_eq!(sample_stops(&stops, 2.0), Rgba8::rgb(200, 200, 0));
    assert_eq!(sample_stops(&[], 0.5).a, 0);
}

#[test]
fn gradient_paints_top_and_bottom_colors() {
    let canvas = CanvasSize {
        width: 16,
        height: 64,
    };
    let mut s = Surface::new(canvas, 1.0, u64::MAX).unwrap();
    fill_vertical_gradient(
        &mut s,
        canvas.rect(),
        &[(0.0, Rgba8::rgb(255, 0, 0)), (1.0, Rgba8::rgb(0, 0, 255))],
    )
    .unwrap();
    let (pm, _) = s.finish();
    let b = pm.data_as_u8_slice();
    let top = &b[(16 + 8) * 4..(16 + 8) * 4 + 4];
    let bottom_idx = (62 * 16 + 8) * 4;
    let bottom = &b[bottom_idx..bottom_idx + 4];
    assert!(top[0] > 200 && top[2] < 50, "{top:?}");
    assert!(bottom[2] > 200 && bottom[0] < 50, "{bottom:?}");
}

#[test]
fn decorations_record_their_text() {
    let mut s = Surface::new(CanvasSize::SQUARE, 0.25, u64::MAX).unwrap();
    let mut te = TextEngine::estimate_only();
    draw_red_seal(&mut s, &mut te, "墨阵", Point::new(500.0, 500.0), 120.0, -6.0);
    let missing: Result<ImageHandle, LoadError> = Err(LoadError::Unsupported {
        url: "".to_string(),
    });
    draw_brand_header(&mut s, &mut te, &missing, 60.0, 60.0, INK);
    draw_footer(
        &mut s,
        &mut te,
        Rect::new(60.0, 1000.0, 1020.0, 1040.0),
        "左",
        "右",
        INK,
    );
    let (_, trace) = s.finish();
    assert!(trace.has_text("墨"));
    assert!(trace.has_text("阵"));
    assert!(trace.has_text(BRAND_NAME));
    assert!(trace.has_text("左") && trace.has_text("右"));
}

#[test]
fn cover_image_is_clipped_to_its_target() {
    let canvas = CanvasSize {
        width: 16,
        height: 16,
    };
    let red = std::sync::Arc::new(
        PreparedImage::from_premul_rgba8(&[255, 0, 0, 255].repeat(2), 2, 1).unwrap(),
    );
    let mut s = Surface::new(canvas, 1.0, u64::MAX).unwrap();
    // 2:1 image covering an 8x8 square overflows by 4px on each side before clipping
    draw_cover_image(
        &mut s,
        &red,
        Rect::new(4.0, 4.0, 12.0, 12.0),
        FitAdjust::default(),
        1.0,
    );
    let (pm, _) = s.finish();
    let b = pm.data_as_u8_slice();
    let at = |x: usize, y: usize| &b[(y * 16 + x) * 4..(y * 16 + x) * 4 + 4];
    assert_eq!(at(5, 8), &[255, 0, 0, 255]);
    assert_eq!(at(10, 5), &[255, 0, 0, 255]);
    assert_eq!(at(1, 8)[3], 0);
    assert_eq!(at(14, 8)[3], 0);
    assert_eq!(at(8, 1)[3], 0);
}

#[test]
fn tiny_textures_tile_at_a_minimum_size() {
    assert_eq!(texture_tile_size(64, 64), (64.0, 64.0));
    assert_eq!(texture_tile_size(1, 1), (32.0, 32.0));
    assert_eq!(texture_tile_size(4, 8), (32.0, 64.0));
    assert_eq!(texture_tile_size(0, 0), (32.0, 32.0));
}
