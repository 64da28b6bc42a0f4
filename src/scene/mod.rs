//! Scene catalog.
//!
//! A scene is one hand-composed poster layout. Scenes paint straight onto the surface in a
//! fixed order; that order is declared by [`Scene::layers`] and each scene announces the layers
//! it paints through [`SceneEnv::layer`] so the recorded order can be compared with the
//! declared one.

use std::collections::HashMap;

use crate::assets::decode::ImageHandle;
use crate::assets::loader::LanternKind;
use crate::foundation::core::{CanvasSize, Rect, Rgba8};
use crate::foundation::error::{LoadError, PosterError, PosterResult};
use crate::foundation::math::SeededRng;
use crate::render::paint;
use crate::render::qr;
use crate::render::surface::Surface;
use crate::render::text::{TextEngine, TextStyle};

pub(crate) mod cards;
pub(crate) mod collage;
pub(crate) mod concept;
pub(crate) mod days;
pub(crate) mod new_year;

/// Outcome of one preloaded asset.
pub type AssetSlot = Result<ImageHandle, LoadError>;

/// Images resolved before painting starts.
#[derive(Clone, Debug)]
pub struct SceneAssets {
    pub texture: AssetSlot,
    pub logo: AssetSlot,
    /// The record's primary image (character glyph, day glyph).
    pub glyph: AssetSlot,
    /// Indexed by [`LanternKind::index`].
    pub lanterns: [AssetSlot; 3],
    /// Collage card images, in card order.
    pub cards: Vec<AssetSlot>,
}

impl Default for SceneAssets {
    fn default() -> Self {
        Self {
            texture: not_requested(),
            logo: not_requested(),
            glyph: not_requested(),
            lanterns: [not_requested(), not_requested(), not_requested()],
            cards: Vec::new(),
        }
    }
}

impl SceneAssets {
    pub fn lantern(&self, kind: LanternKind) -> &AssetSlot {
        &self.lanterns[kind.index()]
    }
}

/// Slot value for an asset the scene did not ask for.
pub fn not_requested() -> AssetSlot {
    Err(LoadError::NotRequested)
}

/// Everything a scene needs for one paint.
pub struct SceneEnv<'a, I> {
    pub surface: &'a mut Surface,
    pub text: &'a mut TextEngine,
    pub input: &'a I,
    pub assets: &'a SceneAssets,
    /// Seeded from the scene key and the record identity.
    pub rng: SeededRng,
}

impl<I> SceneEnv<'_, I> {
    /// Announce the next layer.
    pub fn layer(&mut self, name: &str) {
        self.surface.layer(name);
    }

    pub fn canvas(&self) -> CanvasSize {
        self.surface.canvas()
    }

    pub fn full(&self) -> Rect {
        self.canvas().rect()
    }

    /// One line of text; returns its advance width.
    pub(crate) fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> f32 {
        self.surface.draw_text(self.text, text, x, y, style)
    }

    /// Logo + brand name at the top left.
    pub(crate) fn brand_header(&mut self, x: f64, y: f64, color: Rgba8) {
        self.layer("header");
        paint::draw_brand_header(self.surface, self.text, &self.assets.logo, x, y, color);
    }

    /// Paper grain over `area`; skipped when the texture did not load.
    pub(crate) fn texture(&mut self, area: Rect, alpha: f32) {
        self.layer("texture");
        if let Ok(tex) = &self.assets.texture {
            paint::texture_overlay(self.surface, tex, area, alpha);
        }
    }

    /// Footer rule and captions followed by the QR block, both anchored to the bottom edge.
    pub(crate) fn footer_and_qr(
        &mut self,
        left: &str,
        right: &str,
        color: Rgba8,
    ) -> PosterResult<()> {
        let c = self.canvas();
        let qr_size = 150.0;
        let qr_top = c.h() - 64.0 - qr_size - 40.0;
        self.layer("footer");
        paint::draw_footer(
            self.surface,
            self.text,
            Rect::new(64.0, qr_top - 60.0, c.w() - 64.0, qr_top - 20.0),
            left,
            right,
            color,
        );
        self.layer("qr");
        qr::draw_qr_block(self.surface, self.text, c.w() / 2.0, qr_top, qr_size, color)
    }
}

/// A named paint routine for input records of type `I`.
pub trait Scene<I>: Send + Sync {
    /// Registry key.
    fn key(&self) -> &'static str;

    fn canvas(&self) -> CanvasSize {
        CanvasSize::POSTER
    }

    /// Layer names in the order [`Scene::paint`] announces them.
    fn layers(&self) -> &'static [&'static str];

    /// Lantern illustrations this scene draws.
    fn lanterns(&self) -> &'static [LanternKind] {
        &[]
    }

    fn paint(&self, env: &mut SceneEnv<'_, I>) -> PosterResult<()>;
}

/// Fixed table of scenes with an explicit fallback.
pub struct SceneRegistry<I> {
    scenes: Vec<Box<dyn Scene<I>>>,
    index: HashMap<&'static str, usize>,
    default: usize,
}

impl<I> std::fmt::Debug for SceneRegistry<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRegistry")
            .field("keys", &self.keys())
            .field("default", &self.scenes[self.default].key())
            .finish()
    }
}

impl<I> SceneRegistry<I> {
    /// Build from `scenes`; `default_key` must name one of them and keys must be unique.
    pub fn new(scenes: Vec<Box<dyn Scene<I>>>, default_key: &str) -> PosterResult<Self> {
        let mut index = HashMap::with_capacity(scenes.len());
        for (i, scene) in scenes.iter().enumerate() {
            if index.insert(scene.key(), i).is_some() {
                return Err(PosterError::config(format!(
                    "duplicate scene key '{}'",
                    scene.key()
                )));
            }
        }
        let default = *index.get(default_key).ok_or_else(|| {
            PosterError::config(format!("default scene '{default_key}' is not registered"))
        })?;
        Ok(Self {
            scenes,
            index,
            default,
        })
    }

    /// Scene for `key`, if registered.
    pub fn get(&self, key: &str) -> Option<&dyn Scene<I>> {
        self.index.get(key).map(|&i| self.scenes[i].as_ref())
    }

    /// Scene for `key`, or the default scene when the key is unknown.
    pub fn resolve(&self, key: &str) -> &dyn Scene<I> {
        match self.get(key) {
            Some(scene) => scene,
            None => {
                tracing::debug!(key, fallback = self.default_key(), "unknown scene key");
                self.scenes[self.default].as_ref()
            }
        }
    }

    pub fn default_key(&self) -> &'static str {
        self.scenes[self.default].key()
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.scenes.iter().map(|s| s.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/registry.rs"]
mod tests;
