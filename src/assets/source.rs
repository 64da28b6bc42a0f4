use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::foundation::error::LoadError;

/// Something that can produce the raw bytes behind an asset URL.
///
/// The engine only ever asks for static, same-origin asset URLs; a source decides how those map
/// onto storage.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the bytes for `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError>;
}

/// Serves asset URLs from a directory on disk.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory URLs are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path an asset URL maps to.
    pub fn path_for(&self, url: &str) -> Result<PathBuf, LoadError> {
        let rel = normalize_asset_url(url)?;
        Ok(self.root.join(Path::new(&rel)))
    }
}

#[async_trait]
impl AssetSource for FsAssetSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.path_for(url)?;
        tokio::fs::read(&path).await.map_err(|e| LoadError::Fetch {
            url: url.to_string(),
            reason: format!("read '{}': {e}", path.display()),
        })
    }
}

/// Normalize a static asset URL to a relative path.
///
/// Root-relative (`/assets/a.png`) and relative (`./assets/a.png`) forms are accepted; query and
/// fragment suffixes are dropped. Remote URLs, parent traversals and empty paths are rejected.
pub fn normalize_asset_url(url: &str) -> Result<String, LoadError> {
    let unsupported = || LoadError::Unsupported {
        url: url.to_string(),
    };

    let trimmed = url.trim();
    if trimmed.contains("://") || trimmed.starts_with("//") || trimmed.starts_with("data:") {
        return Err(unsupported());
    }
    let path = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .replace('\\', "/");

    let mut out = Vec::<&str>::new();
    for part in path.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(unsupported());
        }
        out.push(part);
    }
    if out.is_empty() {
        return Err(unsupported());
    }
    Ok(out.join("/"))
}
