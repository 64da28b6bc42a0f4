//! Character and inscription card templates.
//!
//! Each template handles both record kinds: a character shows its glyph image (or the character
//! itself in large type when the image is missing); an inscription shows its text excerpt in
//! vertical columns.

use crate::foundation::core::{BRAND_NAME, Point, Rect, Rgba8};
use crate::foundation::error::PosterResult;
use crate::model::{CharRecord, PosterInput, PosterTemplate, SteleRecord};
use crate::render::paint::{
    self, ColumnFlow, FitAdjust, GOLD, INK, PAPER, SEAL_RED, draw_contain_image,
};
use crate::render::text::{TextAlign, TextBaseline, TextStyle};
use crate::scene::{Scene, SceneEnv, SceneRegistry};

type Env<'a, 'b> = &'a mut SceneEnv<'b, PosterInput>;

/// Registry of card templates keyed by [`PosterTemplate::key`].
pub fn registry() -> PosterResult<SceneRegistry<PosterInput>> {
    SceneRegistry::new(
        vec![Box::new(Folio), Box::new(Wash), Box::new(Minimal)],
        PosterTemplate::Folio.key(),
    )
}

fn source_line(rec: &CharRecord) -> String {
    [&rec.source_title, &rec.dynasty, &rec.author]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" · ")
}

fn stele_meta(rec: &SteleRecord) -> String {
    let mut parts = vec![rec.script_type.clone()];
    if let Some(kind) = rec.kind.as_ref().filter(|k| !k.is_empty()) {
        parts.push(kind.clone());
    }
    if !rec.location.is_empty() {
        parts.push(rec.location.clone());
    }
    if rec.total_chars > 0 {
        parts.push(format!("{}字", rec.total_chars));
    }
    parts.retain(|p| !p.is_empty());
    parts.join(" · ")
}

fn stele_credit(rec: &SteleRecord) -> String {
    let mut credit = format!("{} {}", rec.dynasty, rec.author);
    if let Some(year) = rec.year.as_ref().filter(|y| !y.is_empty()) {
        credit.push_str(&format!(" · {year}"));
    }
    credit.trim().to_string()
}

/// Glyph image contained in `area`, or the character set large when it failed to load.
fn char_subject(env: Env<'_, '_>, rec: &CharRecord, area: Rect, ink: Rgba8, alpha: f32) {
    match &env.assets.glyph {
        Ok(img) => draw_contain_image(env.surface, img, area, FitAdjust::scaled(0.92), alpha),
        Err(err) => {
            tracing::debug!(error = %err, "glyph image unavailable; drawing character");
            let size = (area.width().min(area.height()) * 0.72) as f32;
            let c = area.center();
            let style = TextStyle::new(size, ink)
                .align(TextAlign::Center)
                .baseline(TextBaseline::Middle);
            env.draw_text(&rec.simplified, c.x, c.y, &style);
        }
    }
}

/// Text excerpt in right-to-left columns inside `area`, or the name when there is none.
fn stele_subject(env: Env<'_, '_>, rec: &SteleRecord, area: Rect, ink: Rgba8) {
    let step = 64.0;
    let excerpt = rec
        .content
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(&rec.name);
    let flow = ColumnFlow {
        x: area.x1 - step / 2.0 - 20.0,
        top: area.y0 + 20.0,
        bottom: area.y1 - 20.0,
        step,
        column_gap: step * 1.25,
        min_x: area.x0 + step / 2.0,
    };
    let style = TextStyle::new(52.0, ink);
    let columns = paint::draw_vertical_columns(env.surface, env.text, excerpt, &flow, &style);
    tracing::trace!(columns, "stele excerpt laid out");
}

fn seal(env: Env<'_, '_>, center: Point, size: f64) {
    env.layer("seal");
    let rotation = env.rng.range(-8.0, 8.0);
    paint::draw_red_seal(env.surface, env.text, "墨阵", center, size, rotation);
}

/// Museum folio: paper, double frame, caption block.
struct Folio;

impl Scene<PosterInput> for Folio {
    fn key(&self) -> &'static str {
        "folio"
    }

    fn layers(&self) -> &'static [&'static str] {
        &[
            "background",
            "texture",
            "header",
            "frame",
            "subject",
            "title",
            "details",
            "seal",
            "footer",
            "qr",
        ]
    }

    fn paint(&self, env: &mut SceneEnv<'_, PosterInput>) -> PosterResult<()> {
        let full = env.full();
        let input = env.input;

        env.layer("background");
        env.surface.fill_rect(full, PAPER);
        paint::vignette(env.surface, full, Rgba8::rgb(120, 96, 60), 0.28)?;

        env.texture(full, 0.35);
        env.brand_header(72.0, 72.0, INK);

        env.layer("frame");
        let frame = Rect::new(96.0, 196.0, 984.0, 1084.0);
        paint::fill_round_rect(env.surface, frame, 12.0, Rgba8::rgb(252, 249, 242));
        paint::stroke_round_rect(env.surface, frame, 12.0, 3.0, INK.with_alpha(0.75));
        paint::stroke_round_rect(env.surface, frame.inset(-14.0), 6.0, 1.2, INK.with_alpha(0.4));

        env.layer("subject");
        let inner = frame.inset(-48.0);
        match input {
            PosterInput::Char { data, .. } => char_subject(env, data, inner, INK, 1.0),
            PosterInput::Stele { data, .. } => stele_subject(env, data, inner, INK),
        }

        env.layer("title");
        let title = TextStyle::new(88.0, INK).baseline(TextBaseline::Top);
        let sub = TextStyle::new(40.0, SEAL_RED).baseline(TextBaseline::Top);
        match input {
            PosterInput::Char { data, .. } => {
                let w = env.draw_text(&data.simplified, 96.0, 1130.0, &title);
                env.draw_text(&data.pinyin, 96.0 + f64::from(w) + 28.0, 1168.0, &sub);
            }
            PosterInput::Stele { data, .. } => {
                env.draw_text(&data.name, 96.0, 1130.0, &title);
                env.draw_text(&stele_credit(data), 96.0, 1236.0, &sub);
            }
        }

        env.layer("details");
        let body = TextStyle::new(34.0, INK.with_alpha(0.85));
        let muted = TextStyle::new(26.0, INK.with_alpha(0.6)).baseline(TextBaseline::Top);
        match input {
            PosterInput::Char { data, .. } => {
                let mut y = paint::draw_wrapped(
                    env.surface,
                    env.text,
                    &data.meaning,
                    96.0,
                    1260.0,
                    760.0,
                    50.0,
                    3,
                    &body,
                );
                let english = [data.en_word.as_deref(), data.en_meaning.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" · ");
                if !english.is_empty() {
                    y = paint::draw_wrapped(
                        env.surface,
                        env.text,
                        &english,
                        96.0,
                        y + 8.0,
                        760.0,
                        40.0,
                        2,
                        &muted,
                    );
                }
                let source = source_line(data);
                if !source.is_empty() {
                    env.draw_text(&source, 96.0, y + 12.0, &muted);
                }
            }
            PosterInput::Stele { data, .. } => {
                env.draw_text(&stele_meta(data), 96.0, 1296.0, &muted);
                if let Some(desc) = data.description.as_deref() {
                    paint::draw_wrapped(
                        env.surface,
                        env.text,
                        desc,
                        96.0,
                        1346.0,
                        860.0,
                        48.0,
                        3,
                        &body,
                    );
                }
            }
        }

        seal(env, Point::new(920.0, 1050.0), 96.0);
        env.footer_and_qr(BRAND_NAME, "一字一世界", INK)
    }
}

/// Ink wash: gradient ground, ink blooms, vertical credits.
struct Wash;

impl Scene<PosterInput> for Wash {
    fn key(&self) -> &'static str {
        "wash"
    }

    fn layers(&self) -> &'static [&'static str] {
        &[
            "background",
            "wash",
            "texture",
            "header",
            "subject",
            "title",
            "details",
            "seal",
            "footer",
            "qr",
        ]
    }

    fn paint(&self, env: &mut SceneEnv<'_, PosterInput>) -> PosterResult<()> {
        let full = env.full();
        let input = env.input;
        let ink = Rgba8::rgb(24, 24, 28);

        env.layer("background");
        paint::fill_vertical_gradient(
            env.surface,
            full,
            &[
                (0.0, Rgba8::rgb(232, 230, 224)),
                (0.55, Rgba8::rgb(246, 243, 236)),
                (1.0, Rgba8::rgb(214, 210, 202)),
            ],
        )?;

        env.layer("wash");
        for _ in 0..4 {
            let center = Point::new(env.rng.range(80.0, 1000.0), env.rng.range(260.0, 1500.0));
            let radius = env.rng.range(220.0, 420.0);
            let intensity = env.rng.range(0.10, 0.22) as f32;
            paint::radial_glow(env.surface, center, radius, ink, intensity)?;
        }

        env.texture(full, 0.25);
        env.brand_header(72.0, 72.0, ink);

        env.layer("subject");
        let stage = Rect::new(140.0, 260.0, 860.0, 1120.0);
        match input {
            PosterInput::Char { data, .. } => char_subject(env, data, stage, ink, 0.95),
            PosterInput::Stele { data, .. } => stele_subject(env, data, stage, ink),
        }

        env.layer("title");
        let column_style = TextStyle::new(64.0, SEAL_RED);
        match input {
            PosterInput::Char { data, .. } => {
                paint::draw_vertical_text(
                    env.surface,
                    env.text,
                    &data.simplified,
                    950.0,
                    280.0,
                    76.0,
                    &column_style,
                );
                let style = TextStyle::new(44.0, ink).baseline(TextBaseline::Top).spacing(2.0);
                env.draw_text(&data.pinyin, 140.0, 1160.0, &style);
            }
            PosterInput::Stele { data, .. } => {
                paint::draw_vertical_text(
                    env.surface,
                    env.text,
                    &data.name,
                    950.0,
                    280.0,
                    76.0,
                    &column_style,
                );
            }
        }

        env.layer("details");
        let credit_style = TextStyle::new(30.0, ink.with_alpha(0.7));
        let body = TextStyle::new(34.0, ink.with_alpha(0.85));
        match input {
            PosterInput::Char { data, .. } => {
                let credit = source_line(data);
                if !credit.is_empty() {
                    paint::draw_vertical_text(
                        env.surface,
                        env.text,
                        &credit,
                        88.0,
                        300.0,
                        38.0,
                        &credit_style,
                    );
                }
                let y = paint::draw_wrapped(
                    env.surface,
                    env.text,
                    &data.meaning,
                    140.0,
                    1230.0,
                    800.0,
                    50.0,
                    3,
                    &body,
                );
                if let Some(en) = data.en_meaning.as_deref() {
                    let muted = TextStyle::new(28.0, ink.with_alpha(0.6));
                    paint::draw_wrapped(
                        env.surface,
                        env.text,
                        en,
                        140.0,
                        y + 6.0,
                        800.0,
                        38.0,
                        2,
                        &muted,
                    );
                }
            }
            PosterInput::Stele { data, .. } => {
                paint::draw_vertical_text(
                    env.surface,
                    env.text,
                    &stele_credit(data),
                    88.0,
                    300.0,
                    38.0,
                    &credit_style,
                );
                let meta = TextStyle::new(30.0, ink.with_alpha(0.7)).baseline(TextBaseline::Top);
                env.draw_text(&stele_meta(data), 140.0, 1170.0, &meta);
                if let Some(desc) = data.description.as_deref() {
                    paint::draw_wrapped(
                        env.surface,
                        env.text,
                        desc,
                        140.0,
                        1230.0,
                        800.0,
                        48.0,
                        4,
                        &body,
                    );
                }
            }
        }

        seal(env, Point::new(950.0, 1000.0), 84.0);
        env.footer_and_qr(BRAND_NAME, "水墨 · 书艺", ink)
    }
}

/// Minimal: flat ground, centered glyph, pronunciation and gloss.
struct Minimal;

impl Scene<PosterInput> for Minimal {
    fn key(&self) -> &'static str {
        "minimal"
    }

    fn layers(&self) -> &'static [&'static str] {
        &[
            "background",
            "header",
            "subject",
            "title",
            "details",
            "footer",
            "qr",
        ]
    }

    fn paint(&self, env: &mut SceneEnv<'_, PosterInput>) -> PosterResult<()> {
        let full = env.full();
        let input = env.input;
        let c = env.canvas();

        env.layer("background");
        env.surface.fill_rect(full, Rgba8::rgb(251, 250, 247));

        env.brand_header(72.0, 72.0, INK);

        env.layer("subject");
        let square = Rect::from_center_size(Point::new(c.w() / 2.0, 640.0), (640.0, 640.0));
        paint::stroke_round_rect(env.surface, square, 4.0, 1.0, INK.with_alpha(0.15));
        match input {
            PosterInput::Char { data, .. } => char_subject(env, data, square, INK, 1.0),
            PosterInput::Stele { data, .. } => stele_subject(env, data, square, INK),
        }

        env.layer("title");
        let center = TextStyle::new(36.0, INK)
            .align(TextAlign::Center)
            .baseline(TextBaseline::Top);
        match input {
            PosterInput::Char { data, .. } => {
                env.draw_text(&data.simplified, c.w() / 2.0, 1010.0, &center.size(72.0));
                let pinyin = center.color(GOLD.lerp(INK, 0.45)).spacing(2.0);
                env.draw_text(&data.pinyin, c.w() / 2.0, 1106.0, &pinyin);
            }
            PosterInput::Stele { data, .. } => {
                env.draw_text(&data.name, c.w() / 2.0, 1010.0, &center.size(64.0));
                let credit = center.color(INK.with_alpha(0.7));
                env.draw_text(&stele_credit(data), c.w() / 2.0, 1100.0, &credit);
            }
        }

        env.layer("details");
        let body = TextStyle::new(32.0, INK.with_alpha(0.8))
            .align(TextAlign::Center)
            .baseline(TextBaseline::Top);
        let text = match input {
            PosterInput::Char { data, .. } => data.meaning.clone(),
            PosterInput::Stele { data, .. } => {
                data.description.clone().unwrap_or_else(|| stele_meta(data))
            }
        };
        let lines = crate::render::text::wrap_text(&mut *env.text, &text, 760.0, &body);
        let mut y = 1190.0;
        for line in lines.iter().take(3) {
            env.draw_text(line, c.w() / 2.0, y, &body);
            y += 48.0;
        }

        env.footer_and_qr(BRAND_NAME, "墨阵 · 每日一字", INK)
    }
}
