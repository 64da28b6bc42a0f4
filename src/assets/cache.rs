use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use crate::assets::decode::ImageHandle;
use crate::foundation::error::LoadError;

/// Outcome of one image load, shared by every caller that asked for the same URL.
pub type LoadOutcome = Result<ImageHandle, LoadError>;

/// Process-lifetime memo of image loads keyed by URL.
///
/// The cache stores the in-flight load itself, not only its result: the first caller for a URL
/// runs the load and every concurrent or later caller awaits the same cell. Entries are never
/// evicted, and failed loads are remembered like successful ones.
#[derive(Default)]
pub struct AssetCache {
    cells: Mutex<HashMap<String, Arc<OnceCell<LoadOutcome>>>>,
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl AssetCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoized outcome for `url`, running `load` only if no caller has started it.
    pub async fn get_or_load<F, Fut>(&self, url: &str, load: F) -> LoadOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = LoadOutcome>,
    {
        let cell = self.cell_for(url);
        cell.get_or_init(load).await.clone()
    }

    /// Completed outcome for `url`, if any.
    pub fn peek(&self, url: &str) -> Option<LoadOutcome> {
        let cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.get(url).and_then(|c| c.get().cloned())
    }

    /// Number of URLs that have been requested.
    pub fn len(&self) -> usize {
        self.cells.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// `true` when nothing has been requested yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_for(&self, url: &str) -> Arc<OnceCell<LoadOutcome>> {
        let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(cells.entry(url.to_string()).or_default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
