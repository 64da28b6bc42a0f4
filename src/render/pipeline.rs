use std::sync::Arc;

use smallvec::SmallVec;

use crate::assets::cache::AssetCache;
use crate::assets::fonts;
use crate::assets::loader::{AssetLoader, LanternKind};
use crate::assets::source::FsAssetSource;
use crate::config::EngineConfig;
use crate::encode::png::{StraightRgba, encode_png};
use crate::foundation::core::RenderOptions;
use crate::foundation::error::{LoadError, PosterError, PosterResult};
use crate::foundation::math::SeededRng;
use crate::model::{
    ConceptInput, CuratedCollageInput, DayId, NewYearPosterInput, NewYearStoryInput, PosterInput,
    RenderRequest,
};
use crate::render::surface::{Surface, SurfaceTrace};
use crate::render::text::{FontAsset, TextEngine};
use crate::scene::{self, Scene, SceneAssets, SceneEnv, SceneRegistry};

/// Fallback ratios tried below the requested one, highest first.
const FALLBACK_RATIOS: [f32; 5] = [2.0, 1.5, 1.0, 0.75, 0.5];

/// Pixel ratios to attempt: `requested`, then every fallback strictly below it.
pub fn candidate_pixel_ratios(requested: f32) -> SmallVec<[f32; 6]> {
    let mut out = SmallVec::new();
    out.push(requested);
    out.extend(FALLBACK_RATIOS.into_iter().filter(|&r| r < requested));
    out
}

/// One finished render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    /// Encoded PNG.
    pub png: Vec<u8>,
    /// Logical output width (canvas width × scale).
    pub width: u32,
    /// Logical output height (canvas height × scale).
    pub height: u32,
    /// Pixel ratio of the attempt that succeeded.
    pub pixel_ratio: f32,
}

/// Images a record asks for beyond the fixed brand assets.
#[derive(Clone, Debug, Default)]
pub struct AssetWants<'a> {
    pub glyph: Option<&'a str>,
    pub cards: Vec<&'a str>,
}

/// A record type the engine can render.
pub trait SceneInput: Sync + Sized {
    /// Registry holding the scenes for this record type.
    fn registry(engine: &PosterEngine) -> &SceneRegistry<Self>;

    /// Scene to look up; unknown keys resolve to the registry default.
    fn scene_key(&self) -> &str;

    /// Identity used to seed decorative scatter.
    fn identity(&self) -> String;

    fn wants(&self) -> AssetWants<'_> {
        AssetWants::default()
    }

    fn validate(&self) -> PosterResult<()> {
        Ok(())
    }
}

impl SceneInput for PosterInput {
    fn registry(engine: &PosterEngine) -> &SceneRegistry<Self> {
        &engine.posters
    }

    fn scene_key(&self) -> &str {
        self.template().key()
    }

    fn identity(&self) -> String {
        PosterInput::identity(self)
    }

    fn wants(&self) -> AssetWants<'_> {
        AssetWants {
            glyph: self.primary_image(),
            cards: Vec::new(),
        }
    }

    fn validate(&self) -> PosterResult<()> {
        PosterInput::validate(self)
    }
}

impl SceneInput for NewYearPosterInput {
    fn registry(engine: &PosterEngine) -> &SceneRegistry<Self> {
        &engine.new_year
    }

    fn scene_key(&self) -> &str {
        self.id.as_str()
    }

    fn identity(&self) -> String {
        NewYearPosterInput::identity(self)
    }

    fn wants(&self) -> AssetWants<'_> {
        AssetWants {
            glyph: Some(self.glyph.image.as_str()).filter(|u| !u.trim().is_empty()),
            cards: Vec::new(),
        }
    }
}

impl SceneInput for CuratedCollageInput {
    fn registry(engine: &PosterEngine) -> &SceneRegistry<Self> {
        &engine.collage
    }

    fn scene_key(&self) -> &str {
        "collage"
    }

    fn identity(&self) -> String {
        CuratedCollageInput::identity(self)
    }

    fn wants(&self) -> AssetWants<'_> {
        AssetWants {
            glyph: None,
            cards: self.visible_cards().iter().map(|c| c.image.as_str()).collect(),
        }
    }
}

impl SceneInput for ConceptInput {
    fn registry(engine: &PosterEngine) -> &SceneRegistry<Self> {
        &engine.concept
    }

    fn scene_key(&self) -> &str {
        "concept"
    }

    fn identity(&self) -> String {
        format!("concept:{}", self.id)
    }
}

impl SceneInput for NewYearStoryInput {
    fn registry(engine: &PosterEngine) -> &SceneRegistry<Self> {
        &engine.story
    }

    fn scene_key(&self) -> &str {
        "story"
    }

    fn identity(&self) -> String {
        format!("story:{}:{}", self.id, self.story.chars().count())
    }
}

/// Renders poster records to PNG.
///
/// Owns the asset loader (and through it the memo cache), the font and one scene registry per
/// record type. Cheap to share behind an `Arc`; every render call is independent.
pub struct PosterEngine {
    config: EngineConfig,
    loader: AssetLoader,
    font: Option<FontAsset>,
    posters: SceneRegistry<PosterInput>,
    new_year: SceneRegistry<NewYearPosterInput>,
    collage: SceneRegistry<CuratedCollageInput>,
    concept: SceneRegistry<ConceptInput>,
    story: SceneRegistry<NewYearStoryInput>,
}

impl std::fmt::Debug for PosterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosterEngine")
            .field("config", &self.config)
            .field("loader", &self.loader)
            .field("font", &self.font)
            .finish()
    }
}

impl PosterEngine {
    /// Engine serving assets from `config.asset_root`.
    pub fn new(config: EngineConfig) -> PosterResult<Self> {
        let loader = AssetLoader::new(
            Arc::new(FsAssetSource::new(config.asset_root.clone())),
            Arc::new(AssetCache::new()),
            config.assets.clone(),
        )
        .with_timeout_ms(config.load_timeout_ms);
        Self::with_loader(config, loader)
    }

    /// Engine over an existing loader (custom source or shared cache).
    pub fn with_loader(config: EngineConfig, loader: AssetLoader) -> PosterResult<Self> {
        let font = load_font(&config)?;
        Ok(Self {
            config,
            loader,
            font,
            posters: scene::cards::registry()?,
            new_year: scene::new_year::registry()?,
            collage: scene::collage::registry()?,
            concept: scene::concept::concept_registry()?,
            story: scene::concept::story_registry()?,
        })
    }

    /// Replace the font. `None` renders without glyphs.
    pub fn with_font(mut self, font: Option<FontAsset>) -> PosterResult<Self> {
        if let Some(font) = &font {
            TextEngine::new(Some(font))?;
        }
        self.font = font;
        Ok(self)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Declared paint order of the scene `input` resolves to.
    pub fn scene_layers<I: SceneInput>(&self, input: &I) -> &'static [&'static str] {
        I::registry(self).resolve(input.scene_key()).layers()
    }

    /// Character or inscription card.
    #[tracing::instrument(skip_all, fields(template = input.template().key()))]
    pub async fn render_poster_png(
        &self,
        input: &PosterInput,
        options: RenderOptions,
    ) -> PosterResult<RenderResult> {
        self.render_png(input, options).await
    }

    /// New-Year day card; unknown ids render the first day.
    #[tracing::instrument(skip_all, fields(id = %input.id))]
    pub async fn render_new_year_poster_png(
        &self,
        input: &NewYearPosterInput,
        options: RenderOptions,
    ) -> PosterResult<RenderResult> {
        self.render_png(input, options).await
    }

    /// Desk collage of up to eight cards.
    #[tracing::instrument(skip_all, fields(cards = input.cards.len()))]
    pub async fn render_curated_collage_png(
        &self,
        input: &CuratedCollageInput,
        options: RenderOptions,
    ) -> PosterResult<RenderResult> {
        self.render_png(input, options).await
    }

    /// Square concept card for a day id (`ny_03`, `3`, ...).
    #[tracing::instrument(skip(self, options))]
    pub async fn render_new_year_concept_png(
        &self,
        id: &str,
        options: RenderOptions,
    ) -> PosterResult<RenderResult> {
        let input = ConceptInput { id: DayId::new(id) };
        self.render_png(&input, options).await
    }

    /// Square folklore story card.
    #[tracing::instrument(skip_all, fields(id = %input.id))]
    pub async fn render_new_year_story_png(
        &self,
        input: &NewYearStoryInput,
        options: RenderOptions,
    ) -> PosterResult<RenderResult> {
        self.render_png(input, options).await
    }

    /// Dispatch a tagged request to the matching entry point.
    pub async fn render_request(&self, request: &RenderRequest) -> PosterResult<RenderResult> {
        match request {
            RenderRequest::Poster { input, options } => {
                self.render_poster_png(input, *options).await
            }
            RenderRequest::NewYear { input, options } => {
                self.render_new_year_poster_png(input, *options).await
            }
            RenderRequest::Collage { input, options } => {
                self.render_curated_collage_png(input, *options).await
            }
            RenderRequest::Concept { id, options } => {
                self.render_new_year_concept_png(id.as_str(), *options).await
            }
            RenderRequest::Story { input, options } => {
                self.render_new_year_story_png(input, *options).await
            }
        }
    }

    /// Validate, preload, then try each candidate pixel ratio until one paints and encodes.
    pub async fn render_png<I: SceneInput>(
        &self,
        input: &I,
        options: RenderOptions,
    ) -> PosterResult<RenderResult> {
        input.validate()?;

        let scene = I::registry(self).resolve(input.scene_key());
        let scale = options.normalized_scale();
        let candidates = candidate_pixel_ratios(options.normalized_pixel_ratio());
        let assets = self.preload(&input.wants(), scene.lanterns()).await;
        let identity = input.identity();

        let canvas = scene.canvas();
        let width = (canvas.w() * f64::from(scale)).round() as u32;
        let height = (canvas.h() * f64::from(scale)).round() as u32;

        let mut last = None;
        for (attempt, &ratio) in candidates.iter().enumerate() {
            tracing::debug!(scene = scene.key(), attempt, ratio, scale, "render attempt");
            match self
                .attempt(scene, input, &identity, &assets, f64::from(scale) * f64::from(ratio))
                .await
            {
                Ok(png) => {
                    tracing::debug!(bytes = png.len(), ratio, "poster encoded");
                    return Ok(RenderResult {
                        png,
                        width,
                        height,
                        pixel_ratio: ratio,
                    });
                }
                Err(err) => {
                    tracing::warn!(attempt, ratio, error = %err, "render attempt failed");
                    last = Some(err);
                }
            }
        }

        Err(PosterError::PixelRatioExhausted {
            attempts: candidates.len(),
            last: Box::new(
                last.unwrap_or_else(|| PosterError::surface("no pixel ratio candidates")),
            ),
        })
    }

    /// Paint `input` at ratio 1 and return what was drawn, without encoding.
    pub async fn paint_trace<I: SceneInput>(&self, input: &I) -> PosterResult<SurfaceTrace> {
        input.validate()?;
        let scene = I::registry(self).resolve(input.scene_key());
        let assets = self.preload(&input.wants(), scene.lanterns()).await;
        let (_, trace) = self.paint(scene, input, &input.identity(), &assets, 1.0)?;
        Ok(trace)
    }

    async fn attempt<I: SceneInput>(
        &self,
        scene: &dyn Scene<I>,
        input: &I,
        identity: &str,
        assets: &SceneAssets,
        device_scale: f64,
    ) -> PosterResult<Vec<u8>> {
        let image = {
            let (pixmap, _) = self.paint(scene, input, identity, assets, device_scale)?;
            StraightRgba::from_pixmap(&pixmap)
        };
        encode_png(&image, &self.config.encode).await
    }

    fn paint<I>(
        &self,
        scene: &dyn Scene<I>,
        input: &I,
        identity: &str,
        assets: &SceneAssets,
        device_scale: f64,
    ) -> PosterResult<(vello_cpu::Pixmap, SurfaceTrace)> {
        let mut surface =
            Surface::new(scene.canvas(), device_scale, self.config.max_surface_pixels)?;
        let mut text = TextEngine::new(self.font.as_ref())?;
        let mut env = SceneEnv {
            surface: &mut surface,
            text: &mut text,
            input,
            assets,
            rng: SeededRng::from_parts(&[scene.key(), identity]),
        };
        scene.paint(&mut env)?;
        Ok(surface.finish())
    }

    /// Resolve every slot the scene can use. Failures stay in their slot.
    async fn preload(&self, wants: &AssetWants<'_>, lanterns: &[LanternKind]) -> SceneAssets {
        let loader = &self.loader;
        let glyph = async {
            match wants.glyph {
                Some(url) => loader.load(url).await,
                None => scene::not_requested(),
            }
        };
        let lantern = move |kind: LanternKind| async move {
            if lanterns.contains(&kind) {
                loader.lantern(kind).await
            } else {
                scene::not_requested()
            }
        };
        let cards = futures::future::join_all(wants.cards.iter().map(|url| loader.load(url)));

        let (texture, logo, glyph, palace, round, rabbit, cards) = futures::join!(
            loader.texture(),
            loader.brand_logo(),
            glyph,
            lantern(LanternKind::Palace),
            lantern(LanternKind::Round),
            lantern(LanternKind::Rabbit),
            cards,
        );

        let assets = SceneAssets {
            texture,
            logo,
            glyph,
            lanterns: [palace, round, rabbit],
            cards,
        };
        for err in failures(&assets) {
            tracing::warn!(url = err.url(), error = %err, "asset unavailable, drawing fallback");
        }
        assets
    }
}

fn failures(assets: &SceneAssets) -> impl Iterator<Item = &LoadError> {
    [&assets.texture, &assets.logo, &assets.glyph]
        .into_iter()
        .chain(assets.lanterns.iter())
        .chain(assets.cards.iter())
        .filter_map(|slot| slot.as_ref().err())
        .filter(|err| !matches!(err, LoadError::NotRequested))
}

fn load_font(config: &EngineConfig) -> PosterResult<Option<FontAsset>> {
    if let Some(path) = &config.font_path {
        let font = FontAsset::from_path(path)?;
        TextEngine::new(Some(&font))?;
        tracing::debug!(path = %path.display(), "font loaded");
        return Ok(Some(font));
    }

    let db = fonts::font_database(&config.asset_root);
    let Some(font) = fonts::find_cjk_face(&db) else {
        tracing::warn!(
            faces = db.len(),
            "no CJK-capable font found; text will be measured but not drawn"
        );
        return Ok(None);
    };
    match TextEngine::new(Some(&font)) {
        Ok(_) => Ok(Some(font)),
        Err(err) => {
            tracing::warn!(error = %err, "discovered font is unusable");
            Ok(None)
        }
    }
}
