use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assets::cache::{AssetCache, LoadOutcome};
use crate::assets::decode::decode_image;
use crate::assets::source::AssetSource;
use crate::config::AssetUrls;
use crate::foundation::error::LoadError;

/// Default per-asset timeout.
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 15_000;

/// The three lantern illustrations used by New-Year scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanternKind {
    /// Tall hexagonal palace lantern.
    Palace,
    /// Classic round red lantern.
    Round,
    /// Rabbit-shaped children's lantern.
    Rabbit,
}

impl LanternKind {
    /// All kinds, in slot order.
    pub const ALL: [LanternKind; 3] = [Self::Palace, Self::Round, Self::Rabbit];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Palace => 0,
            Self::Round => 1,
            Self::Rabbit => 2,
        }
    }
}

/// Loads images through an [`AssetSource`] with a timeout, decoding off the async executor.
///
/// Fixed brand assets go through the injected [`AssetCache`], so each of them is fetched at most
/// once for the cache's lifetime no matter how many scenes ask for it concurrently.
#[derive(Clone)]
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    cache: Arc<AssetCache>,
    urls: AssetUrls,
    timeout_ms: u64,
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("cache", &self.cache)
            .field("urls", &self.urls)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl AssetLoader {
    /// Loader over `source`, memoizing fixed assets in `cache`.
    pub fn new(source: Arc<dyn AssetSource>, cache: Arc<AssetCache>, urls: AssetUrls) -> Self {
        Self {
            source,
            cache,
            urls,
            timeout_ms: DEFAULT_LOAD_TIMEOUT_MS,
        }
    }

    /// Same loader with a different default timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms.max(1);
        self
    }

    /// Shared memo cache.
    pub fn cache(&self) -> &Arc<AssetCache> {
        &self.cache
    }

    /// Fixed asset URLs.
    pub fn urls(&self) -> &AssetUrls {
        &self.urls
    }

    /// Default timeout in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Fetch and decode `url`, failing with [`LoadError::Timeout`] if the fetch outlives
    /// `timeout_ms`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn load_image(&self, url: &str, timeout_ms: u64) -> LoadOutcome {
        let fetch = self.source.fetch(url);
        let bytes = match tokio::time::timeout(Duration::from_millis(timeout_ms), fetch).await {
            Ok(res) => res?,
            Err(_) => {
                return Err(LoadError::Timeout {
                    url: url.to_string(),
                    timeout_ms,
                });
            }
        };

        let owned_url = url.to_string();
        let decoded = tokio::task::spawn_blocking(move || decode_image(&bytes))
            .await
            .map_err(|e| LoadError::Decode {
                url: owned_url.clone(),
                reason: format!("decode task failed: {e}"),
            })?;
        match decoded {
            Ok(img) => {
                tracing::debug!(url, width = img.width, height = img.height, "image loaded");
                Ok(Arc::new(img))
            }
            Err(e) => Err(LoadError::Decode {
                url: owned_url,
                reason: format!("{e:#}"),
            }),
        }
    }

    /// [`AssetLoader::load_image`] with the loader's default timeout.
    pub async fn load(&self, url: &str) -> LoadOutcome {
        self.load_image(url, self.timeout_ms).await
    }

    /// Memoized load of `url` through the shared cache.
    pub async fn load_memoized(&self, url: &str) -> LoadOutcome {
        self.cache
            .get_or_load(url, || self.load_image(url, self.timeout_ms))
            .await
    }

    /// Brand logo (memoized).
    pub async fn brand_logo(&self) -> LoadOutcome {
        self.load_memoized(&self.urls.brand_logo).await
    }

    /// Paper grain texture (memoized).
    pub async fn texture(&self) -> LoadOutcome {
        self.load_memoized(&self.urls.texture).await
    }

    /// Lantern illustration (memoized).
    pub async fn lantern(&self, kind: LanternKind) -> LoadOutcome {
        self.load_memoized(self.urls.lantern(kind)).await
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
