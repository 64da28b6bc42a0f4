//! Square explanation and story cards for the New-Year days.

use crate::foundation::core::{CanvasSize, Point, Rect};
use crate::foundation::error::PosterResult;
use crate::model::{ConceptInput, NewYearStoryInput};
use crate::render::paint::{self, GOLD};
use crate::render::qr;
use crate::render::text::{TextAlign, TextBaseline, TextStyle};
use crate::scene::days::{DayInfo, day_info};
use crate::scene::{Scene, SceneEnv, SceneRegistry};

pub fn concept_registry() -> PosterResult<SceneRegistry<ConceptInput>> {
    SceneRegistry::new(vec![Box::new(ConceptCard)], "concept")
}

pub fn story_registry() -> PosterResult<SceneRegistry<NewYearStoryInput>> {
    SceneRegistry::new(vec![Box::new(StoryCard)], "story")
}

const QR_SIZE: f64 = 150.0;

/// Ground, grain, header, day badge. Shared opening of both square cards.
fn opening<I>(env: &mut SceneEnv<'_, I>, day: &DayInfo) -> PosterResult<()> {
    let full = env.full();
    let p = day.palette;

    env.layer("background");
    paint::fill_vertical_gradient(env.surface, full, &[(0.0, p.top), (1.0, p.bottom)])?;
    paint::vignette(env.surface, full, p.bottom, 0.35)?;

    env.texture(full, 0.25);
    env.brand_header(64.0, 56.0, p.ink);

    env.layer("day");
    let badge = Rect::new(64.0, 150.0, 300.0, 214.0);
    paint::fill_round_rect(env.surface, badge, 32.0, p.accent.with_alpha(0.9));
    let style = TextStyle::new(32.0, p.top)
        .align(TextAlign::Center)
        .baseline(TextBaseline::Middle)
        .spacing(4.0);
    let c = badge.center();
    env.draw_text(day.name, c.x, c.y, &style);
    Ok(())
}

/// Seal at the lower left and the QR tile at the lower right. Shared closing.
fn closing<I>(env: &mut SceneEnv<'_, I>, day: &DayInfo) -> PosterResult<()> {
    let c = env.canvas();
    env.layer("seal");
    let rotation = env.rng.range(-8.0, 8.0);
    let seal: String = day.custom.chars().take(4).collect();
    paint::draw_red_seal(
        env.surface,
        env.text,
        &seal,
        Point::new(130.0, c.h() - 130.0),
        110.0,
        rotation,
    );

    env.layer("qr");
    qr::draw_qr(
        env.surface,
        c.w() - 64.0 - QR_SIZE,
        c.h() - 64.0 - QR_SIZE,
        QR_SIZE,
    )
}

/// Body copy starting at `y`, wrapped to the card width above the seal/QR band.
fn body<I>(env: &mut SceneEnv<'_, I>, text: &str, y: f64, day: &DayInfo) {
    let c = env.canvas();
    let style = TextStyle::new(38.0, day.palette.ink.with_alpha(0.92));
    let max_lines = ((c.h() - 64.0 - QR_SIZE - 40.0 - y) / 60.0).floor().max(1.0) as usize;
    paint::draw_wrapped(
        env.surface,
        env.text,
        text,
        64.0,
        y,
        (c.w() - 128.0) as f32,
        60.0,
        max_lines,
        &style,
    );
}

struct ConceptCard;

impl Scene<ConceptInput> for ConceptCard {
    fn key(&self) -> &'static str {
        "concept"
    }

    fn canvas(&self) -> CanvasSize {
        CanvasSize::SQUARE
    }

    fn layers(&self) -> &'static [&'static str] {
        &[
            "background",
            "texture",
            "header",
            "day",
            "title",
            "body",
            "seal",
            "qr",
        ]
    }

    fn paint(&self, env: &mut SceneEnv<'_, ConceptInput>) -> PosterResult<()> {
        let day = day_info(&env.input.id);
        opening(env, day)?;

        env.layer("title");
        let title = TextStyle::new(88.0, GOLD)
            .baseline(TextBaseline::Top)
            .spacing(10.0);
        paint::draw_gold_foil_text(env.surface, env.text, day.custom, 64.0, 260.0, &title);
        let blessing = TextStyle::new(36.0, day.palette.ink.with_alpha(0.8))
            .baseline(TextBaseline::Top)
            .spacing(8.0);
        env.draw_text(day.blessing, 64.0, 372.0, &blessing);

        env.layer("body");
        body(env, day.concept, 460.0, day);

        closing(env, day)
    }
}

struct StoryCard;

impl Scene<NewYearStoryInput> for StoryCard {
    fn key(&self) -> &'static str {
        "story"
    }

    fn canvas(&self) -> CanvasSize {
        CanvasSize::SQUARE
    }

    fn layers(&self) -> &'static [&'static str] {
        &[
            "background",
            "texture",
            "header",
            "day",
            "title",
            "story",
            "seal",
            "qr",
        ]
    }

    fn paint(&self, env: &mut SceneEnv<'_, NewYearStoryInput>) -> PosterResult<()> {
        let input = env.input;
        let day = day_info(&input.id);
        opening(env, day)?;

        env.layer("title");
        let default_title = format!("{}的故事", day.custom);
        let title = input
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&default_title);
        let style = TextStyle::new(64.0, day.palette.ink)
            .baseline(TextBaseline::Top)
            .spacing(6.0);
        env.draw_text(title, 64.0, 260.0, &style);
        if let Some(lunar) = input.lunar.as_deref().filter(|l| !l.is_empty()) {
            let style = style.size(28.0).spacing(2.0).color(day.palette.accent);
            env.draw_text(lunar, 64.0, 350.0, &style);
        }

        env.layer("story");
        let story = if input.story.trim().is_empty() {
            day.story
        } else {
            input.story.as_str()
        };
        body(env, story, 420.0, day);

        closing(env, day)
    }
}
