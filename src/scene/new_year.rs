//! New-Year day posters, one composition per day.

use vello_cpu::kurbo::Shape;

use crate::assets::loader::LanternKind;
use crate::foundation::core::{Affine, BRAND_NAME, BezPath, Point, Rect, Rgba8};
use crate::foundation::error::PosterResult;
use crate::model::NewYearPosterInput;
use crate::render::paint::{self, FitAdjust, GOLD, SEAL_RED};
use crate::render::text::{TextAlign, TextBaseline, TextStyle};
use crate::scene::days::{DAYS, DayInfo};
use crate::scene::{Scene, SceneEnv, SceneRegistry};

type Env<'a, 'b> = &'a mut SceneEnv<'b, NewYearPosterInput>;

const KEYS: [&str; 9] = [
    "ny_01", "ny_02", "ny_03", "ny_04", "ny_05", "ny_06", "ny_07", "ny_08", "ny_09",
];

/// Registry of the nine day scenes; unknown ids get `ny_01`.
pub fn registry() -> PosterResult<SceneRegistry<NewYearPosterInput>> {
    let compositions = [
        Composition::NightWatch,
        Composition::RedBrocade,
        Composition::HomeLetter,
        Composition::QuietCourtyard,
        Composition::Hearth,
        Composition::GoldenGate,
        Composition::SweepingWind,
        Composition::PeopleDay,
        Composition::LanternFestival,
    ];
    let scenes = compositions
        .into_iter()
        .enumerate()
        .map(|(i, composition)| {
            Box::new(DayScene {
                key: KEYS[i],
                day: &DAYS[i],
                composition,
            }) as Box<dyn Scene<NewYearPosterInput>>
        })
        .collect();
    SceneRegistry::new(scenes, KEYS[0])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Composition {
    NightWatch,
    RedBrocade,
    HomeLetter,
    QuietCourtyard,
    Hearth,
    GoldenGate,
    SweepingWind,
    PeopleDay,
    LanternFestival,
}

struct DayScene {
    key: &'static str,
    day: &'static DayInfo,
    composition: Composition,
}

impl Scene<NewYearPosterInput> for DayScene {
    fn key(&self) -> &'static str {
        self.key
    }

    fn layers(&self) -> &'static [&'static str] {
        match self.composition {
            Composition::NightWatch => &[
                "background", "stars", "moon", "lanterns", "glyph", "title", "caption", "story",
                "seal", "footer", "qr",
            ],
            Composition::RedBrocade => &[
                "background", "brocade", "frame", "glyph", "title", "caption", "gold_dust",
                "seal", "footer", "qr",
            ],
            Composition::HomeLetter => &[
                "background", "texture", "envelope", "glyph", "title", "caption", "story",
                "seal", "footer", "qr",
            ],
            Composition::QuietCourtyard => &[
                "background", "texture", "window", "glyph", "title", "caption", "seal", "footer",
                "qr",
            ],
            Composition::Hearth => &[
                "background", "glow", "glyph", "title", "caption", "story", "seal", "footer",
                "qr",
            ],
            Composition::GoldenGate => &[
                "background", "brocade", "coins", "glyph", "title", "caption", "gold_dust",
                "seal", "footer", "qr",
            ],
            Composition::SweepingWind => &[
                "background", "texture", "wind", "glyph", "title", "caption", "seal", "footer",
                "qr",
            ],
            Composition::PeopleDay => &[
                "background", "texture", "paper_cut", "glyph", "title", "caption", "story",
                "seal", "footer", "qr",
            ],
            Composition::LanternFestival => &[
                "background", "moon", "stars", "lanterns", "glyph", "title", "caption", "story",
                "seal", "footer", "qr",
            ],
        }
    }

    fn lanterns(&self) -> &'static [LanternKind] {
        match self.composition {
            Composition::NightWatch => &[LanternKind::Palace, LanternKind::Round],
            Composition::LanternFestival => &LanternKind::ALL,
            _ => &[],
        }
    }

    fn paint(&self, env: &mut SceneEnv<'_, NewYearPosterInput>) -> PosterResult<()> {
        let day = self.day;
        let p = day.palette;
        let full = env.full();
        let c = env.canvas();

        env.layer("background");
        paint::fill_vertical_gradient(env.surface, full, &[(0.0, p.top), (1.0, p.bottom)])?;

        match self.composition {
            Composition::NightWatch => {
                env.layer("stars");
                let sky = Rect::new(0.0, 0.0, c.w(), 900.0);
                paint::sprinkle_stars(env.surface, &mut env.rng, sky, 90, p.ink);
                env.layer("moon");
                moon(env, Point::new(820.0, 300.0), 96.0)?;
                env.layer("lanterns");
                lantern(env, LanternKind::Palace, Rect::new(60.0, 160.0, 240.0, 480.0), -4.0);
                lantern(env, LanternKind::Round, Rect::new(260.0, 120.0, 400.0, 360.0), 3.0);
                glyph_plate(env, Point::new(c.w() / 2.0, 760.0), 400.0, p.accent)?;
                titles(env, day, 980.0)?;
                story(env, day, 1360.0, 3);
            }
            Composition::RedBrocade => {
                env.layer("brocade");
                let seed = env.rng.next_u64();
                paint::brocade_pattern(env.surface, full, 72.0, p.accent.with_alpha(0.22), seed);
                env.layer("frame");
                let frame = full.inset(-40.0);
                paint::stroke_round_rect(env.surface, frame, 24.0, 6.0, p.accent);
                paint::stroke_round_rect(env.surface, frame.inset(-16.0), 16.0, 1.5, p.accent);
                glyph_plate(env, Point::new(c.w() / 2.0, 620.0), 460.0, p.accent)?;
                titles(env, day, 930.0)?;
                env.layer("gold_dust");
                paint::sprinkle_gold_dust(env.surface, &mut env.rng, full.inset(-60.0), 120, 4.0);
            }
            Composition::HomeLetter => {
                env.texture(full, 0.4);
                env.layer("envelope");
                envelope(env, Point::new(820.0, 330.0), p.accent);
                glyph_plate(env, Point::new(420.0, 640.0), 460.0, p.accent)?;
                titles(env, day, 950.0)?;
                story(env, day, 1300.0, 4);
            }
            Composition::QuietCourtyard => {
                env.texture(full, 0.4);
                env.layer("window");
                let center = Point::new(c.w() / 2.0, 640.0);
                moon_gate(env, center, 360.0, p.ink);
                glyph_plate(env, center, 380.0, p.accent)?;
                titles(env, day, 1060.0)?;
            }
            Composition::Hearth => {
                env.layer("glow");
                paint::radial_glow(
                    env.surface,
                    Point::new(c.w() / 2.0, 1500.0),
                    900.0,
                    p.accent,
                    0.55,
                )?;
                let hearth = Rect::new(200.0, 900.0, 880.0, 1600.0);
                for sp in paint::scatter(&mut env.rng, hearth, 40, 5.0) {
                    let color = p.accent.with_alpha(sp.alpha);
                    paint::fill_circle(env.surface, sp.at, sp.radius, color);
                }
                glyph_plate(env, Point::new(c.w() / 2.0, 620.0), 440.0, p.accent)?;
                titles(env, day, 920.0)?;
                story(env, day, 1260.0, 4);
            }
            Composition::GoldenGate => {
                env.layer("brocade");
                let seed = env.rng.next_u64();
                paint::brocade_pattern(env.surface, full, 56.0, p.accent.with_alpha(0.3), seed);
                env.layer("coins");
                for _ in 0..7 {
                    let at = Point::new(env.rng.range(80.0, 1000.0), env.rng.range(200.0, 1500.0));
                    let r = env.rng.range(26.0, 48.0);
                    coin(env, at, r, p.accent);
                }
                glyph_plate(env, Point::new(c.w() / 2.0, 660.0), 460.0, p.accent)?;
                titles(env, day, 970.0)?;
                env.layer("gold_dust");
                paint::sprinkle_gold_dust(env.surface, &mut env.rng, full, 180, 5.0);
            }
            Composition::SweepingWind => {
                env.texture(full, 0.4);
                env.layer("wind");
                for i in 0..9 {
                    let y = 240.0 + f64::from(i) * 140.0 + env.rng.range(-30.0, 30.0);
                    let amp = env.rng.range(20.0, 60.0);
                    let mut path = BezPath::new();
                    path.move_to((-20.0, y));
                    path.curve_to(
                        (300.0, y - amp),
                        (700.0, y + amp),
                        (c.w() + 20.0, y - amp * 0.5),
                    );
                    let alpha = env.rng.range(0.12, 0.3) as f32;
                    env.surface.stroke_path(&path, 3.0, p.ink.with_alpha(alpha));
                }
                glyph_plate(env, Point::new(c.w() / 2.0, 640.0), 440.0, p.accent)?;
                titles(env, day, 960.0)?;
            }
            Composition::PeopleDay => {
                env.texture(full, 0.4);
                env.layer("paper_cut");
                for i in 0..7 {
                    let x = 150.0 + f64::from(i) * 130.0;
                    paper_figure(env, Point::new(x, 260.0), 44.0, p.accent);
                }
                glyph_plate(env, Point::new(c.w() / 2.0, 680.0), 440.0, p.accent)?;
                titles(env, day, 980.0)?;
                story(env, day, 1330.0, 3);
            }
            Composition::LanternFestival => {
                env.layer("moon");
                moon(env, Point::new(c.w() / 2.0, 330.0), 150.0)?;
                env.layer("stars");
                let sky = Rect::new(0.0, 0.0, c.w(), 800.0);
                paint::sprinkle_stars(env.surface, &mut env.rng, sky, 70, p.ink);
                env.layer("lanterns");
                lantern(env, LanternKind::Palace, Rect::new(40.0, 120.0, 220.0, 440.0), -5.0);
                lantern(env, LanternKind::Round, Rect::new(860.0, 140.0, 1020.0, 400.0), 4.0);
                lantern(env, LanternKind::Rabbit, Rect::new(70.0, 560.0, 250.0, 760.0), 0.0);
                glyph_plate(env, Point::new(c.w() / 2.0, 720.0), 380.0, p.accent)?;
                titles(env, day, 960.0)?;
                story(env, day, 1350.0, 3);
            }
        }

        env.layer("seal");
        let seal_text: String = day.custom.chars().take(4).collect();
        let rotation = env.rng.range(-10.0, 10.0);
        paint::draw_red_seal(
            env.surface,
            env.text,
            &seal_text,
            Point::new(c.w() - 150.0, 120.0),
            110.0,
            rotation,
        );

        let right = format!("{} · {}", day.name, day.custom);
        env.footer_and_qr(BRAND_NAME, &right, p.ink)
    }
}

/// Rounded plate holding the day's glyph image, or the character when it failed to load.
fn glyph_plate(env: Env<'_, '_>, center: Point, size: f64, accent: Rgba8) -> PosterResult<()> {
    env.layer("glyph");
    let plate = Rect::from_center_size(center, (size, size));
    paint::fill_round_rect(env.surface, plate, size * 0.06, Rgba8::rgba(255, 250, 240, 235));
    paint::stroke_round_rect(env.surface, plate.inset(-10.0), size * 0.05, 2.0, accent);
    let input = env.input;
    match &env.assets.glyph {
        Ok(img) => paint::draw_contain_image(
            env.surface,
            img,
            plate.inset(-28.0),
            FitAdjust::default(),
            1.0,
        ),
        Err(err) => {
            tracing::debug!(error = %err, "day glyph unavailable; drawing character");
            let style = TextStyle::new((size * 0.62) as f32, Rgba8::rgb(30, 24, 22))
                .align(TextAlign::Center)
                .baseline(TextBaseline::Middle);
            env.draw_text(&input.glyph.simplified, center.x, center.y, &style);
        }
    }
    if !input.glyph.source_title.is_empty() {
        let label = if input.glyph.index > 0 {
            format!("{} · 第{}字", input.glyph.source_title, input.glyph.index)
        } else {
            input.glyph.source_title.clone()
        };
        let style = TextStyle::new(22.0, accent)
            .align(TextAlign::Center)
            .baseline(TextBaseline::Top);
        env.draw_text(&label, center.x, plate.y1 + 14.0, &style);
    }
    Ok(())
}

/// Day label in gold foil with the blessing, then the caption and lunar date.
fn titles(env: Env<'_, '_>, day: &DayInfo, y: f64) -> PosterResult<()> {
    let input = env.input;
    let c = env.canvas();
    let ink = day.palette.ink;

    env.layer("title");
    let label = if input.day_label.trim().is_empty() {
        day.name
    } else {
        input.day_label.as_str()
    };
    let big = TextStyle::new(96.0, GOLD)
        .align(TextAlign::Center)
        .baseline(TextBaseline::Top)
        .spacing(8.0);
    paint::draw_gold_foil_text(env.surface, env.text, label, c.w() / 2.0, y, &big);
    let blessing = TextStyle::new(40.0, ink)
        .align(TextAlign::Center)
        .baseline(TextBaseline::Top)
        .spacing(12.0);
    env.draw_text(day.blessing, c.w() / 2.0, y + 120.0, &blessing);

    env.layer("caption");
    let caption = TextStyle::new(34.0, ink.with_alpha(0.9))
        .align(TextAlign::Center)
        .baseline(TextBaseline::Top);
    let lines = crate::render::text::wrap_text(&mut *env.text, &input.caption, 820.0, &caption);
    let mut cursor = y + 188.0;
    for line in lines.iter().take(2) {
        env.draw_text(line, c.w() / 2.0, cursor, &caption);
        cursor += 48.0;
    }
    if let Some(lunar) = input.lunar.as_deref().filter(|l| !l.is_empty()) {
        let style = caption.size(26.0).color(ink.with_alpha(0.7));
        env.draw_text(lunar, c.w() / 2.0, cursor + 6.0, &style);
    }
    Ok(())
}

/// Folk story paragraph; falls back to the day's stock story.
fn story(env: Env<'_, '_>, day: &DayInfo, y: f64, max_lines: usize) {
    env.layer("story");
    let input = env.input;
    let text = input
        .story
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(day.story);
    let style = TextStyle::new(30.0, day.palette.ink.with_alpha(0.8));
    paint::draw_wrapped(
        env.surface,
        env.text,
        text,
        120.0,
        y,
        840.0,
        46.0,
        max_lines,
        &style,
    );
}

fn moon(env: Env<'_, '_>, center: Point, radius: f64) -> PosterResult<()> {
    paint::radial_glow(env.surface, center, radius * 2.6, Rgba8::rgb(255, 236, 180), 0.5)?;
    paint::fill_circle(env.surface, center, radius, Rgba8::rgb(255, 246, 214));
    Ok(())
}

/// Lantern illustration; a drawn lantern stands in when the image failed to load.
fn lantern(env: Env<'_, '_>, kind: LanternKind, slot: Rect, sway_deg: f64) {
    let pivot = Point::new(slot.center().x, slot.y0);
    let t = Affine::translate(pivot.to_vec2())
        * Affine::rotate(sway_deg.to_radians())
        * Affine::translate(-pivot.to_vec2());
    let art = env.assets.lantern(kind);
    env.surface.with_transform(t, |s| {
        let mut cord = BezPath::new();
        cord.move_to((pivot.x, 0.0));
        cord.line_to((pivot.x, slot.y0));
        s.stroke_path(&cord, 2.0, GOLD.with_alpha(0.8));
        match art {
            Ok(img) => paint::draw_contain_image(s, img, slot, FitAdjust::default(), 1.0),
            Err(_) => {
                let body = Rect::new(
                    slot.x0 + slot.width() * 0.1,
                    slot.y0 + slot.height() * 0.15,
                    slot.x1 - slot.width() * 0.1,
                    slot.y1 - slot.height() * 0.2,
                );
                let shape = vello_cpu::kurbo::Ellipse::from_rect(body).to_path(0.1);
                s.fill_path(&shape, SEAL_RED);
                let cap = slot.height() * 0.08;
                let top = Rect::from_center_size(
                    Point::new(body.center().x, body.y0),
                    (body.width() * 0.5, cap),
                );
                let bottom = Rect::from_center_size(
                    Point::new(body.center().x, body.y1),
                    (body.width() * 0.5, cap),
                );
                s.fill_rect(top, GOLD);
                s.fill_rect(bottom, GOLD);
                let mut tassel = BezPath::new();
                tassel.move_to((body.center().x, body.y1));
                tassel.line_to((body.center().x, slot.y1));
                s.stroke_path(&tassel, 4.0, SEAL_RED);
            }
        }
    });
}

/// Red envelope, tilted, with a gold clasp.
fn envelope(env: Env<'_, '_>, center: Point, accent: Rgba8) {
    let t = Affine::translate(center.to_vec2()) * Affine::rotate(0.12);
    let input = env.input;
    env.surface.with_transform(t, |s| {
        let body = Rect::new(-130.0, -180.0, 130.0, 180.0);
        paint::fill_round_rect(s, body, 16.0, SEAL_RED);
        let mut flap = BezPath::new();
        flap.move_to((-130.0, -180.0));
        flap.line_to((130.0, -180.0));
        flap.line_to((130.0, -90.0));
        flap.quad_to((0.0, -20.0), (-130.0, -90.0));
        flap.close_path();
        s.fill_path(&flap, Rgba8::rgb(150, 20, 26));
        paint::fill_circle(s, Point::new(0.0, -50.0), 34.0, accent);
    });
    let glyph: String = input.glyph.simplified.chars().take(1).collect();
    let style = TextStyle::new(40.0, SEAL_RED)
        .align(TextAlign::Center)
        .baseline(TextBaseline::Middle);
    let clasp = t * Point::new(0.0, -50.0);
    env.draw_text(&glyph, clasp.x, clasp.y, &style);
}

/// Round moon gate with a lattice screen.
fn moon_gate(env: Env<'_, '_>, center: Point, radius: f64, ink: Rgba8) {
    let circle = vello_cpu::kurbo::Circle::new(center, radius).to_path(0.1);
    let seed = env.rng.next_u64();
    env.surface.with_clip(&circle, |s| {
        s.fill_rect(
            Rect::from_center_size(center, (radius * 2.0, radius * 2.0)),
            Rgba8::rgba(255, 255, 255, 90),
        );
        paint::brocade_pattern(
            s,
            Rect::from_center_size(center, (radius * 2.0, radius * 2.0)),
            64.0,
            ink.with_alpha(0.25),
            seed,
        );
    });
    env.surface.stroke_path(&circle, 14.0, ink.with_alpha(0.7));
}

/// Copper cash coin with a square hole.
fn coin(env: Env<'_, '_>, at: Point, r: f64, gold: Rgba8) {
    let mut path = vello_cpu::kurbo::Circle::new(at, r).to_path(0.1);
    let hole = Rect::from_center_size(at, (r * 0.6, r * 0.6));
    // Reverse winding so the hole is cut out under the non-zero rule.
    path.move_to((hole.x0, hole.y0));
    path.line_to((hole.x0, hole.y1));
    path.line_to((hole.x1, hole.y1));
    path.line_to((hole.x1, hole.y0));
    path.close_path();
    env.surface.fill_path(&path, gold);
    let rim = vello_cpu::kurbo::Circle::new(at, r * 0.85).to_path(0.1);
    let rim_color = gold.lerp(Rgba8::rgb(120, 70, 10), 0.5);
    env.surface.stroke_path(&rim, 1.5, rim_color);
}

/// Paper-cut person: round head, flared robe.
fn paper_figure(env: Env<'_, '_>, at: Point, h: f64, color: Rgba8) {
    paint::fill_circle(env.surface, Point::new(at.x, at.y - h * 0.55), h * 0.22, color);
    let mut robe = BezPath::new();
    robe.move_to((at.x - h * 0.18, at.y - h * 0.3));
    robe.line_to((at.x + h * 0.18, at.y - h * 0.3));
    robe.line_to((at.x + h * 0.42, at.y + h * 0.6));
    robe.line_to((at.x - h * 0.42, at.y + h * 0.6));
    robe.close_path();
    env.surface.fill_path(&robe, color);
}
