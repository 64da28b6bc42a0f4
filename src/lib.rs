//! Procedural share posters for the InkGrid calligraphy app.
//!
//! A [`PosterEngine`] turns plain data records (a character, an inscription, a New-Year day,
//! a hand-picked collage) into PNG bytes:
//!
//! - preload the images a scene needs, keeping failures as per-slot errors
//! - paint the scene on a CPU surface in logical 1080-wide coordinates
//! - encode to PNG, retrying at lower pixel ratios when a surface cannot be allocated or encoded
#![forbid(unsafe_code)]

mod assets;
mod config;
mod encode;
mod foundation;
mod model;
mod render;
mod scene;

pub use crate::assets::cache::{AssetCache, LoadOutcome};
pub use crate::assets::decode::{ImageHandle, PreparedImage, decode_image};
pub use crate::assets::loader::{AssetLoader, DEFAULT_LOAD_TIMEOUT_MS, LanternKind};
pub use crate::assets::source::{AssetSource, FsAssetSource, normalize_asset_url};
pub use crate::config::{AssetUrls, EncodeConfig, EngineConfig};
pub use crate::encode::png::{StraightRgba, encode_fast, encode_png};
pub use crate::foundation::core::{
    BRAND_NAME, CanvasSize, RenderOptions, Rgba8, SHARE_LABEL, SHARE_URL,
};
pub use crate::foundation::error::{EncodeError, LoadError, PosterError, PosterResult};
pub use crate::foundation::math::SeededRng;
pub use crate::model::{
    COLLAGE_MAX_CARDS, CharRecord, CollageCard, ConceptInput, CuratedCollageInput, DayId,
    GlyphRef, NEW_YEAR_DAYS, NewYearPosterInput, NewYearStoryInput, PosterInput, PosterTemplate,
    RenderRequest, SteleRecord,
};
pub use crate::render::pipeline::{
    AssetWants, PosterEngine, RenderResult, SceneInput, candidate_pixel_ratios,
};
pub use crate::render::surface::SurfaceTrace;
pub use crate::render::surface::Surface;
pub use crate::render::text::{FontAsset, TextEngine, TextMeasure, TextStyle, wrap_text};
pub use crate::scene::{Scene, SceneAssets, SceneEnv, SceneRegistry};
