use qrcode::{Color, EcLevel, QrCode};

use crate::foundation::core::{BezPath, Rect, Rgba8, SHARE_LABEL, SHARE_URL};
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::paint::{INK, fill_round_rect};
use crate::render::surface::Surface;
use crate::render::text::{TextAlign, TextBaseline, TextEngine, TextStyle};

/// Quiet zone around the module matrix, in modules.
const QUIET_MODULES: usize = 2;

/// Module matrix for the share URL: `(modules per side, dark flags row-major)`.
pub fn share_matrix() -> PosterResult<(usize, Vec<bool>)> {
    let code = QrCode::with_error_correction_level(SHARE_URL.as_bytes(), EcLevel::M)
        .map_err(|e| PosterError::validation(format!("qr encode: {e}")))?;
    let dark = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
    Ok((code.width(), dark))
}

/// White rounded tile of side `size` at `(x, y)` carrying the share-URL QR code.
pub fn draw_qr(s: &mut Surface, x: f64, y: f64, size: f64) -> PosterResult<()> {
    let (n, dark) = share_matrix()?;
    let tile = Rect::new(x, y, x + size, y + size);
    fill_round_rect(s, tile, size * 0.08, Rgba8::rgb(255, 255, 255));

    let module = size / (n + QUIET_MODULES * 2) as f64;
    let origin = (
        x + module * QUIET_MODULES as f64,
        y + module * QUIET_MODULES as f64,
    );
    let mut path = BezPath::new();
    for (i, _) in dark.iter().enumerate().filter(|(_, d)| **d) {
        let col = (i % n) as f64;
        let row = (i / n) as f64;
        let x0 = origin.0 + col * module;
        let y0 = origin.1 + row * module;
        // Slight overlap hides seams between neighbouring modules.
        let r = Rect::new(x0, y0, x0 + module + 0.02, y0 + module + 0.02);
        path.move_to((r.x0, r.y0));
        path.line_to((r.x1, r.y0));
        path.line_to((r.x1, r.y1));
        path.line_to((r.x0, r.y1));
        path.close_path();
    }
    s.fill_path(&path, INK);
    Ok(())
}

/// QR tile with the share label under it, centered on `center_x`.
pub fn draw_qr_block(
    s: &mut Surface,
    te: &mut TextEngine,
    center_x: f64,
    y: f64,
    size: f64,
    label_color: Rgba8,
) -> PosterResult<()> {
    draw_qr(s, center_x - size / 2.0, y, size)?;
    let style = TextStyle::new(22.0, label_color)
        .align(TextAlign::Center)
        .baseline(TextBaseline::Top)
        .spacing(1.0);
    s.draw_text(te, SHARE_LABEL, center_x, y + size + 14.0, &style);
    Ok(())
}
