use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::loader::LanternKind;
use crate::foundation::error::{PosterError, PosterResult};

/// Engine-wide configuration.
///
/// Every field has a default so a config file only needs the values it changes. Environment
/// overrides are applied by [`EngineConfig::with_env_overrides`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Directory that static asset URLs are resolved against.
    pub asset_root: PathBuf,
    /// Font file used for all text. When unset, the system fonts and `<asset_root>/fonts` are
    /// searched for a face covering CJK.
    pub font_path: Option<PathBuf>,
    /// Fixed asset URLs.
    pub assets: AssetUrls,
    /// Per-asset load timeout.
    pub load_timeout_ms: u64,
    /// Upper bound on surface pixels for one attempt; larger ratios fail and are retried lower.
    pub max_surface_pixels: u64,
    /// PNG encode settings.
    pub encode: EncodeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("public"),
            font_path: None,
            assets: AssetUrls::default(),
            load_timeout_ms: 15_000,
            // Largest canvas most mobile webviews accept (4096 x 4096).
            max_surface_pixels: 16_777_216,
            encode: EncodeConfig::default(),
        }
    }
}

/// URLs of the assets shared by all scenes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetUrls {
    /// Paper grain tile.
    pub texture: String,
    /// Brand mark used in headers.
    pub brand_logo: String,
    /// Palace lantern illustration.
    pub lantern_palace: String,
    /// Round lantern illustration.
    pub lantern_round: String,
    /// Rabbit lantern illustration.
    pub lantern_rabbit: String,
}

impl Default for AssetUrls {
    fn default() -> Self {
        Self {
            texture: "/assets/noise.png".to_string(),
            brand_logo: "/assets/brand/logo.png".to_string(),
            lantern_palace: "/assets/newyear/lantern_palace.png".to_string(),
            lantern_round: "/assets/newyear/lantern_round.png".to_string(),
            lantern_rabbit: "/assets/newyear/lantern_rabbit.png".to_string(),
        }
    }
}

impl AssetUrls {
    /// URL for a lantern illustration.
    pub fn lantern(&self, kind: LanternKind) -> &str {
        match kind {
            LanternKind::Palace => &self.lantern_palace,
            LanternKind::Round => &self.lantern_round,
            LanternKind::Rabbit => &self.lantern_rabbit,
        }
    }
}

/// PNG encode settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeConfig {
    /// Whether the compressed off-thread encoder is available.
    pub primary: bool,
    /// Timeout for the primary encoder.
    pub timeout_ms: u64,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            primary: true,
            timeout_ms: 12_000,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> PosterResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read engine config '{}'", path.display()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| PosterError::config(format!("{}: {e}", path.display())))
    }

    /// Apply `INKGRID_ASSET_ROOT`, `INKGRID_FONT` and `INKGRID_LOAD_TIMEOUT_MS`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("INKGRID_ASSET_ROOT")
            && !v.is_empty()
        {
            self.asset_root = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("INKGRID_FONT")
            && !v.is_empty()
        {
            self.font_path = Some(PathBuf::from(v));
        }
        if let Some(ms) = std::env::var("INKGRID_LOAD_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&ms| ms > 0)
        {
            self.load_timeout_ms = ms;
        }
        self
    }
}
