//! Drawing helpers shared by every scene.
//!
//! Everything here draws in logical canvas coordinates and mutates nothing but the surface.
//! The geometry behind the helpers (fit rectangles, vertical flow, seal slots, scatter) is
//! exposed as pure functions so it can be checked without rasterizing.

use std::sync::Arc;

use vello_cpu::kurbo::{Circle, RoundedRect, Shape};

use crate::assets::decode::{ImageHandle, PreparedImage};
use crate::foundation::core::{Affine, BRAND_NAME, BezPath, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{LoadError, PosterResult};
use crate::foundation::math::{SeededRng, hash_u32};
use crate::render::surface::Surface;
use crate::render::text::{TextAlign, TextBaseline, TextEngine, TextStyle};

const PATH_TOLERANCE: f64 = 0.1;

/// Seal red.
pub const SEAL_RED: Rgba8 = Rgba8::rgb(178, 34, 34);
/// Base gold used for foil text and dust.
pub const GOLD: Rgba8 = Rgba8::rgb(212, 175, 55);
/// Ink black with a warm cast.
pub const INK: Rgba8 = Rgba8::rgb(28, 25, 23);
/// Rice-paper background.
pub const PAPER: Rgba8 = Rgba8::rgb(246, 241, 231);

/// Manual tweak applied after an aspect-preserving fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitAdjust {
    /// Extra multiplier around the fitted rect's center.
    pub scale: f64,
    /// Offset in logical pixels.
    pub offset: Vec2,
}

impl Default for FitAdjust {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl FitAdjust {
    pub fn scaled(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    pub fn offset(mut self, dx: f64, dy: f64) -> Self {
        self.offset = Vec2::new(dx, dy);
        self
    }
}

fn fit_rect(img_w: f64, img_h: f64, target: Rect, cover: bool, adjust: FitAdjust) -> Rect {
    if img_w <= 0.0 || img_h <= 0.0 {
        return Rect::from_center_size(target.center(), (0.0, 0.0));
    }
    let sx = target.width() / img_w;
    let sy = target.height() / img_h;
    let s = if cover { sx.max(sy) } else { sx.min(sy) } * adjust.scale.max(0.0);
    let center = target.center() + adjust.offset;
    Rect::from_center_size(center, (img_w * s, img_h * s))
}

/// Largest rect with the image's aspect that fits inside `target` ("contain").
pub fn contain_rect(img_w: f64, img_h: f64, target: Rect, adjust: FitAdjust) -> Rect {
    fit_rect(img_w, img_h, target, false, adjust)
}

/// Smallest rect with the image's aspect that covers `target` ("cover").
pub fn cover_rect(img_w: f64, img_h: f64, target: Rect, adjust: FitAdjust) -> Rect {
    fit_rect(img_w, img_h, target, true, adjust)
}

/// Rounded rectangle outline; the radius is clamped to half the shorter side.
pub fn round_rect_path(rect: Rect, radius: f64) -> BezPath {
    let r = radius.max(0.0).min(rect.width().abs() / 2.0).min(rect.height().abs() / 2.0);
    RoundedRect::from_rect(rect, r).to_path(PATH_TOLERANCE)
}

pub fn fill_round_rect(s: &mut Surface, rect: Rect, radius: f64, color: Rgba8) {
    s.fill_path(&round_rect_path(rect, radius), color);
}

pub fn stroke_round_rect(s: &mut Surface, rect: Rect, radius: f64, width: f64, color: Rgba8) {
    s.stroke_path(&round_rect_path(rect, radius), width, color);
}

pub fn fill_circle(s: &mut Surface, center: Point, radius: f64, color: Rgba8) {
    s.fill_path(&Circle::new(center, radius).to_path(PATH_TOLERANCE), color);
}

/// Letterbox `img` inside `target`.
pub fn draw_contain_image(
    s: &mut Surface,
    img: &ImageHandle,
    target: Rect,
    adjust: FitAdjust,
    alpha: f32,
) {
    let dest = contain_rect(f64::from(img.width), f64::from(img.height), target, adjust);
    s.draw_image(img, dest, alpha);
}

/// Fill `target` with `img`, cropping whatever falls outside it.
pub fn draw_cover_image(
    s: &mut Surface,
    img: &ImageHandle,
    target: Rect,
    adjust: FitAdjust,
    alpha: f32,
) {
    let dest = cover_rect(f64::from(img.width), f64::from(img.height), target, adjust);
    let clip = target.to_path(PATH_TOLERANCE);
    s.with_clip(&clip, |s| s.draw_image(img, dest, alpha));
}

/// Centers of each character drawn top to bottom from `(x, top)` at a fixed `step`.
pub fn vertical_positions(text: &str, x: f64, top: f64, step: f64) -> Vec<(char, Point)> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(i, c)| (c, Point::new(x, top + step * (i as f64) + step / 2.0)))
        .collect()
}

/// One character per row, top to bottom; returns the y just below the last row.
pub fn draw_vertical_text(
    s: &mut Surface,
    te: &mut TextEngine,
    text: &str,
    x: f64,
    top: f64,
    step: f64,
    style: &TextStyle,
) -> f64 {
    let style = style.align(TextAlign::Center).baseline(TextBaseline::Middle);
    let mut bottom = top;
    for (c, p) in vertical_positions(text, x, top, step) {
        let mut buf = [0u8; 4];
        s.draw_text(te, c.encode_utf8(&mut buf), p.x, p.y, &style);
        bottom = p.y + step / 2.0;
    }
    bottom
}

/// Bounds of a right-to-left vertical text block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnFlow {
    /// Center x of the first (rightmost) column.
    pub x: f64,
    pub top: f64,
    /// The cursor may not pass this y.
    pub bottom: f64,
    /// Row advance.
    pub step: f64,
    /// Distance the cursor jumps left when a column fills.
    pub column_gap: f64,
    /// Columns left of this x are not drawn.
    pub min_x: f64,
}

/// Character positions for vertical columns, plus the number of columns used.
///
/// When the next row would cross `bottom` the cursor moves left by `column_gap` and returns to
/// `top`. Characters that would start a column left of `min_x` are dropped.
pub fn layout_vertical_columns(text: &str, flow: &ColumnFlow) -> (Vec<(char, Point)>, usize) {
    let mut out = Vec::new();
    if flow.x < flow.min_x {
        return (out, 0);
    }
    let step = flow.step.max(1.0);
    let mut x = flow.x;
    let mut y = flow.top;
    let mut columns = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        if columns == 0 {
            columns = 1;
        } else if y + step > flow.bottom {
            x -= flow.column_gap;
            y = flow.top;
            if x < flow.min_x {
                break;
            }
            columns += 1;
        }
        out.push((c, Point::new(x, y + step / 2.0)));
        y += step;
    }
    (out, columns)
}

/// Vertical text that wraps into further columns to the left; returns the columns used.
pub fn draw_vertical_columns(
    s: &mut Surface,
    te: &mut TextEngine,
    text: &str,
    flow: &ColumnFlow,
    style: &TextStyle,
) -> usize {
    let style = style.align(TextAlign::Center).baseline(TextBaseline::Middle);
    let (chars, columns) = layout_vertical_columns(text, flow);
    for (c, p) in chars {
        let mut buf = [0u8; 4];
        s.draw_text(te, c.encode_utf8(&mut buf), p.x, p.y, &style);
    }
    columns
}

/// Draw wrapped lines starting at `y`; returns the y below the last line.
#[allow(clippy::too_many_arguments)]
pub fn draw_wrapped(
    s: &mut Surface,
    te: &mut TextEngine,
    text: &str,
    x: f64,
    y: f64,
    max_width: f32,
    line_height: f64,
    max_lines: usize,
    style: &TextStyle,
) -> f64 {
    let style = style.baseline(TextBaseline::Top);
    let lines = crate::render::text::wrap_text(&mut *te, text, max_width, &style);
    let mut cursor = y;
    for line in lines.iter().take(max_lines) {
        s.draw_text(te, line, x, cursor, &style);
        cursor += line_height;
    }
    cursor
}

/// Cell centers of up to four seal characters, read right-to-left in columns.
pub fn seal_slots(count: usize, rect: Rect) -> Vec<Point> {
    let c = rect.center();
    let qx = rect.width() / 4.0;
    let qy = rect.height() / 4.0;
    match count {
        0 => Vec::new(),
        1 => vec![c],
        2 => vec![Point::new(c.x, c.y - qy), Point::new(c.x, c.y + qy)],
        3 => vec![
            Point::new(c.x + qx, c.y - qy),
            Point::new(c.x + qx, c.y + qy),
            Point::new(c.x - qx, c.y),
        ],
        _ => vec![
            Point::new(c.x + qx, c.y - qy),
            Point::new(c.x + qx, c.y + qy),
            Point::new(c.x - qx, c.y - qy),
            Point::new(c.x - qx, c.y + qy),
        ],
    }
}

/// Square vermilion seal with up to four white characters, rotated by `rotation_deg`.
pub fn draw_red_seal(
    s: &mut Surface,
    te: &mut TextEngine,
    text: &str,
    center: Point,
    size: f64,
    rotation_deg: f64,
) {
    let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).take(4).collect();
    let half = size / 2.0;
    let local = Rect::new(-half, -half, half, half);
    let t = Affine::translate(center.to_vec2())
        * Affine::rotate(rotation_deg.to_radians());
    s.with_transform(t, |s| {
        s.with_opacity(0.92, |s| {
            fill_round_rect(s, local, size * 0.08, SEAL_RED);
            stroke_round_rect(
                s,
                local.inset(-size * 0.07),
                size * 0.05,
                size * 0.03,
                Rgba8::rgba(255, 240, 230, 210),
            );
        });
        let glyph = if chars.len() <= 1 { size * 0.62 } else { size * 0.36 };
        let style = TextStyle::new(glyph as f32, Rgba8::rgb(255, 246, 238))
            .align(TextAlign::Center)
            .baseline(TextBaseline::Middle);
        for (c, p) in chars.iter().zip(seal_slots(chars.len(), local)) {
            let mut buf = [0u8; 4];
            s.draw_text(te, c.encode_utf8(&mut buf), p.x, p.y, &style);
        }
    });
}

/// Gold lettering: soft drop shadow, gold body, faint top highlight.
pub fn draw_gold_foil_text(
    s: &mut Surface,
    te: &mut TextEngine,
    text: &str,
    x: f64,
    y: f64,
    style: &TextStyle,
) -> f32 {
    let d = f64::from(style.size) * 0.04;
    let shadow = style.color(Rgba8::rgba(60, 30, 10, 150));
    s.draw_text(te, text, x + d, y + d, &shadow);
    let w = s.draw_text(te, text, x, y, &style.color(GOLD));
    s.with_opacity(0.45, |s| {
        s.draw_text(
            te,
            text,
            x,
            y - d * 0.6,
            &style.color(Rgba8::rgb(255, 236, 170)),
        );
    });
    w
}

/// Logo (or a one-character seal when it failed to load) followed by the brand name.
pub fn draw_brand_header(
    s: &mut Surface,
    te: &mut TextEngine,
    logo: &Result<ImageHandle, LoadError>,
    x: f64,
    y: f64,
    color: Rgba8,
) {
    let mark = 56.0;
    let slot = Rect::new(x, y, x + mark, y + mark);
    match logo {
        Ok(img) => draw_contain_image(s, img, slot, FitAdjust::default(), 1.0),
        Err(_) => draw_red_seal(s, te, "墨", slot.center(), mark * 0.9, 0.0),
    }
    let style = TextStyle::new(30.0, color)
        .baseline(TextBaseline::Middle)
        .spacing(4.0);
    s.draw_text(te, BRAND_NAME, x + mark + 18.0, y + mark / 2.0, &style);
}

/// Hairline rule with a caption on the left and one on the right.
pub fn draw_footer(
    s: &mut Surface,
    te: &mut TextEngine,
    area: Rect,
    left: &str,
    right: &str,
    color: Rgba8,
) {
    let mut rule = BezPath::new();
    rule.move_to((area.x0, area.y0));
    rule.line_to((area.x1, area.y0));
    s.stroke_path(&rule, 1.5, color.with_alpha(0.35));

    let y = area.y0 + area.height() / 2.0;
    let style = TextStyle::new(24.0, color).baseline(TextBaseline::Middle);
    s.draw_text(te, left, area.x0, y, &style);
    s.draw_text(te, right, area.x1, y, &style.align(TextAlign::Right));
}

/// One decorative fleck.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Speck {
    pub at: Point,
    pub radius: f64,
    pub alpha: f32,
}

/// `count` flecks inside `area`, fully determined by `rng`.
pub fn scatter(rng: &mut SeededRng, area: Rect, count: usize, max_radius: f64) -> Vec<Speck> {
    (0..count)
        .map(|_| Speck {
            at: Point::new(rng.range(area.x0, area.x1), rng.range(area.y0, area.y1)),
            radius: rng.range(max_radius * 0.25, max_radius),
            alpha: rng.range(0.25, 0.95) as f32,
        })
        .collect()
}

/// Four-point twinkles; the brightest get a cross flare.
pub fn sprinkle_stars(
    s: &mut Surface,
    rng: &mut SeededRng,
    area: Rect,
    count: usize,
    color: Rgba8,
) {
    for sp in scatter(rng, area, count, 3.2) {
        fill_circle(s, sp.at, sp.radius, color.with_alpha(sp.alpha));
        if sp.alpha > 0.8 {
            let arm = sp.radius * 3.5;
            let mut flare = BezPath::new();
            flare.move_to((sp.at.x - arm, sp.at.y));
            flare.line_to((sp.at.x + arm, sp.at.y));
            flare.move_to((sp.at.x, sp.at.y - arm));
            flare.line_to((sp.at.x, sp.at.y + arm));
            s.stroke_path(&flare, 1.0, color.with_alpha(sp.alpha * 0.5));
        }
    }
}

/// Irregular gold leaf flecks.
pub fn sprinkle_gold_dust(
    s: &mut Surface,
    rng: &mut SeededRng,
    area: Rect,
    count: usize,
    max_radius: f64,
) {
    for sp in scatter(rng, area, count, max_radius) {
        let squash = rng.range(0.45, 1.0);
        let angle = rng.range(0.0, std::f64::consts::PI);
        let t = Affine::translate(sp.at.to_vec2())
            * Affine::rotate(angle)
            * Affine::scale_non_uniform(1.0, squash);
        let tint = GOLD.lerp(Rgba8::rgb(255, 228, 150), rng.next_f64() as f32);
        s.with_transform(t, |s| {
            fill_circle(s, Point::ORIGIN, sp.radius, tint.with_alpha(sp.alpha));
        });
    }
}

/// Smallest logical edge of one texture tile.
const MIN_TILE: f64 = 32.0;

/// Logical size of one texture tile: the native size, scaled up so the shorter edge is at
/// least [`MIN_TILE`].
pub fn texture_tile_size(width: u32, height: u32) -> (f64, f64) {
    let w = f64::from(width.max(1));
    let h = f64::from(height.max(1));
    let k = (MIN_TILE / w.min(h)).max(1.0);
    (w * k, h * k)
}

/// Tile `texture` over `area`.
pub fn texture_overlay(s: &mut Surface, texture: &ImageHandle, area: Rect, alpha: f32) {
    let (tw, th) = texture_tile_size(texture.width, texture.height);
    let clip = area.to_path(PATH_TOLERANCE);
    s.with_clip(&clip, |s| {
        s.with_opacity(alpha, |s| {
            let mut y = area.y0;
            while y < area.y1 {
                let mut x = area.x0;
                while x < area.x1 {
                    s.draw_image(texture, Rect::new(x, y, x + tw, y + th), 1.0);
                    x += tw;
                }
                y += th;
            }
        });
    });
}

/// Color at `t` along sorted `(offset, color)` stops.
pub fn sample_stops(stops: &[(f32, Rgba8)], t: f32) -> Rgba8 {
    let Some(first) = stops.first() else {
        return Rgba8::rgba(0, 0, 0, 0);
    };
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.0 {
            let span = (b.0 - a.0).max(f32::EPSILON);
            return a.1.lerp(b.1, (t - a.0) / span);
        }
    }
    stops[stops.len() - 1].1
}

const GRADIENT_STEPS: u32 = 256;

/// Top-to-bottom multi-stop gradient over `rect`.
pub fn fill_vertical_gradient(
    s: &mut Surface,
    rect: Rect,
    stops: &[(f32, Rgba8)],
) -> PosterResult<()> {
    let h1 = (GRADIENT_STEPS - 1) as f32;
    let mut bytes = Vec::with_capacity(GRADIENT_STEPS as usize * 4);
    for y in 0..GRADIENT_STEPS {
        let c = sample_stops(stops, y as f32 / h1);
        bytes.extend_from_slice(&c.premul_bytes());
    }
    let img = PreparedImage::from_premul_rgba8(&bytes, 1, GRADIENT_STEPS)?;
    s.draw_image(&Arc::new(img), rect, 1.0);
    Ok(())
}

const GLOW_SIZE: u32 = 128;

fn radial_image(color: Rgba8, falloff: impl Fn(f32) -> f32) -> PosterResult<ImageHandle> {
    let n = GLOW_SIZE;
    let mut bytes = vec![0u8; (n * n * 4) as usize];
    let half = n as f32 / 2.0;
    for y in 0..n {
        for x in 0..n {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let d = (dx * dx + dy * dy).sqrt();
            let c = color.with_alpha(falloff(d).clamp(0.0, 1.0));
            let idx = ((y * n + x) * 4) as usize;
            bytes[idx..idx + 4].copy_from_slice(&c.premul_bytes());
        }
    }
    Ok(Arc::new(PreparedImage::from_premul_rgba8(&bytes, n, n)?))
}

/// Soft circular light centered at `center`.
pub fn radial_glow(
    s: &mut Surface,
    center: Point,
    radius: f64,
    color: Rgba8,
    intensity: f32,
) -> PosterResult<()> {
    let img = radial_image(color, |d| {
        let k = (1.0 - d).max(0.0);
        k * k * intensity
    })?;
    let dest = Rect::from_center_size(center, (radius * 2.0, radius * 2.0));
    s.draw_image(&img, dest, 1.0);
    Ok(())
}

/// Darkened edges over `rect`; `strength` is the corner opacity.
pub fn vignette(s: &mut Surface, rect: Rect, color: Rgba8, strength: f32) -> PosterResult<()> {
    let img = radial_image(color, |d| {
        let t = ((d - 0.55) / 0.9).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t) * strength
    })?;
    s.draw_image(&img, rect, 1.0);
    Ok(())
}

/// Diamond lattice with dotted centers; cell brightness varies by a per-cell hash.
pub fn brocade_pattern(s: &mut Surface, rect: Rect, cell: f64, color: Rgba8, seed: u64) {
    let cell = cell.max(8.0);
    let clip = rect.to_path(PATH_TOLERANCE);
    s.with_clip(&clip, |s| {
        let cols = (rect.width() / cell).ceil() as u32 + 1;
        let rows = (rect.height() / cell).ceil() as u32 + 1;
        let mut lattice = BezPath::new();
        for row in 0..rows {
            for col in 0..cols {
                let cx = rect.x0 + f64::from(col) * cell;
                let cy = rect.y0 + f64::from(row) * cell;
                let h = cell / 2.0;
                lattice.move_to((cx, cy - h));
                lattice.line_to((cx + h, cy));
                lattice.line_to((cx, cy + h));
                lattice.line_to((cx - h, cy));
                lattice.close_path();

                let v = hash_u32(seed, col, row);
                let alpha = 0.35 + f32::from((v & 0xFF) as u8) / 255.0 * 0.65;
                fill_circle(s, Point::new(cx, cy), cell * 0.07, color.with_alpha(alpha));
            }
        }
        s.stroke_path(&lattice, 1.0, color.with_alpha(0.6));
    });
}

#[cfg(test)]
#[path = "../../tests/unit/render/paint.rs"]
mod tests;
