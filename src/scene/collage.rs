use crate::foundation::core::{Affine, BRAND_NAME, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::PosterResult;
use crate::model::{COLLAGE_MAX_CARDS, CollageCard, CuratedCollageInput};
use crate::render::paint::{self, FitAdjust, INK};
use crate::render::text::{TextAlign, TextBaseline, TextStyle};
use crate::scene::{AssetSlot, Scene, SceneEnv, SceneRegistry};

/// Card centers and tilt (degrees) on the desk, in card order.
pub const SLOTS: [(f64, f64, f64); COLLAGE_MAX_CARDS] = [
    (300.0, 500.0, -4.0),
    (780.0, 520.0, 3.0),
    (290.0, 790.0, 2.5),
    (790.0, 800.0, -3.0),
    (310.0, 1080.0, -2.0),
    (770.0, 1070.0, 4.5),
    (300.0, 1360.0, 3.5),
    (785.0, 1350.0, -5.0),
];

const CARD_W: f64 = 380.0;
const CARD_H: f64 = 250.0;

pub fn registry() -> PosterResult<SceneRegistry<CuratedCollageInput>> {
    SceneRegistry::new(vec![Box::new(Desk)], "collage")
}

/// Polaroid-like cards scattered over a wooden desk.
struct Desk;

impl Scene<CuratedCollageInput> for Desk {
    fn key(&self) -> &'static str {
        "collage"
    }

    fn layers(&self) -> &'static [&'static str] {
        &[
            "background",
            "texture",
            "header",
            "title",
            "cards",
            "seal",
            "footer",
            "qr",
        ]
    }

    fn paint(&self, env: &mut SceneEnv<'_, CuratedCollageInput>) -> PosterResult<()> {
        let full = env.full();
        let c = env.canvas();
        let input = env.input;
        let light = Rgba8::rgb(250, 242, 228);

        env.layer("background");
        paint::fill_vertical_gradient(
            env.surface,
            full,
            &[
                (0.0, Rgba8::rgb(92, 60, 38)),
                (0.6, Rgba8::rgb(120, 80, 50)),
                (1.0, Rgba8::rgb(70, 44, 28)),
            ],
        )?;
        for i in 0..24 {
            let y = f64::from(i) * 80.0 + env.rng.range(-10.0, 10.0);
            let alpha = env.rng.range(0.04, 0.1) as f32;
            env.surface.fill_rect(
                Rect::new(0.0, y, c.w(), y + env.rng.range(2.0, 6.0)),
                Rgba8::rgb(40, 24, 12).with_alpha(alpha),
            );
        }
        paint::vignette(env.surface, full, Rgba8::rgb(20, 10, 4), 0.45)?;

        env.texture(full, 0.2);
        env.brand_header(72.0, 72.0, light);

        env.layer("title");
        let title = input.title.as_deref().unwrap_or("墨阵 · 集字");
        let style = TextStyle::new(72.0, light)
            .align(TextAlign::Center)
            .baseline(TextBaseline::Top)
            .spacing(6.0);
        env.draw_text(title, c.w() / 2.0, 196.0, &style);
        if let Some(sub) = input.subtitle.as_deref() {
            let style = style.size(30.0).spacing(2.0).color(light.with_alpha(0.75));
            env.draw_text(sub, c.w() / 2.0, 290.0, &style);
        }

        env.layer("cards");
        for (i, card) in input.visible_cards().iter().enumerate() {
            let (x, y, tilt) = SLOTS[i];
            let slot = env.assets.cards.get(i).cloned().unwrap_or_else(super::not_requested);
            card_at(env, card, &slot, Point::new(x, y), tilt);
        }

        env.layer("seal");
        let rotation = env.rng.range(-8.0, 8.0);
        paint::draw_red_seal(
            env.surface,
            env.text,
            "集字",
            Point::new(c.w() - 110.0, 1530.0),
            96.0,
            rotation,
        );

        let count = format!("{} 字", input.visible_cards().len());
        env.footer_and_qr(BRAND_NAME, &count, light)
    }
}

fn card_at(
    env: &mut SceneEnv<'_, CuratedCollageInput>,
    card: &CollageCard,
    image: &AssetSlot,
    center: Point,
    tilt_deg: f64,
) {
    let t = Affine::translate(center.to_vec2()) * Affine::rotate(tilt_deg.to_radians());
    let body = Rect::new(-CARD_W / 2.0, -CARD_H / 2.0, CARD_W / 2.0, CARD_H / 2.0);
    let label = card.simplified.as_deref().filter(|s| !s.is_empty());
    let text = &mut *env.text;
    env.surface.with_transform(t, |s| {
        paint::fill_round_rect(s, body + Vec2::new(6.0, 10.0), 10.0, Rgba8::rgba(0, 0, 0, 60));
        paint::fill_round_rect(s, body, 10.0, Rgba8::rgb(252, 249, 243));
        let mat = Rect::new(body.x0 + 18.0, body.y0 + 18.0, body.x1 - 18.0, body.y1 - 54.0);
        s.fill_rect(mat, Rgba8::rgb(238, 232, 220));
        match image {
            Ok(img) => paint::draw_cover_image(s, img, mat, FitAdjust::default(), 1.0),
            Err(err) => {
                tracing::debug!(error = %err, "collage card image unavailable");
                let glyph = label.unwrap_or("墨");
                let style = TextStyle::new(110.0, INK.with_alpha(0.8))
                    .align(TextAlign::Center)
                    .baseline(TextBaseline::Middle);
                let mc = mat.center();
                s.draw_text(text, glyph, mc.x, mc.y, &style);
            }
        }
        if let Some(label) = label {
            let style = TextStyle::new(28.0, INK)
                .align(TextAlign::Center)
                .baseline(TextBaseline::Middle);
            s.draw_text(text, label, 0.0, body.y1 - 28.0, &style);
        }
    });
}
