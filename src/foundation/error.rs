/// Convenience result type used across the poster engine.
pub type PosterResult<T> = Result<T, PosterError>;

/// Why a single asset could not be turned into an image handle.
///
/// Load failures are recovered where they happen: the slot for the asset stays `Err` and the
/// scene paints a degraded layer instead. They are `Clone` because memoized loads hand the same
/// outcome to every caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The fetch did not complete within the timeout.
    #[error("asset load timed out after {timeout_ms}ms: {url}")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The source failed to produce bytes (missing file, IO error).
    #[error("asset fetch failed for {url}: {reason}")]
    Fetch {
        /// Requested URL.
        url: String,
        /// Underlying failure.
        reason: String,
    },

    /// Bytes were fetched but are not a decodable image.
    #[error("asset decode failed for {url}: {reason}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Underlying failure.
        reason: String,
    },

    /// The URL cannot be served by the configured source.
    #[error("unsupported asset url: {url}")]
    Unsupported {
        /// Requested URL.
        url: String,
    },

    /// The scene never asked for this slot.
    #[error("asset not requested")]
    NotRequested,
}

impl LoadError {
    /// URL the failure refers to; empty for [`LoadError::NotRequested`].
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url, .. }
            | Self::Fetch { url, .. }
            | Self::Decode { url, .. }
            | Self::Unsupported { url } => url,
            Self::NotRequested => "",
        }
    }
}

/// Failure of one PNG encode path.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The primary encoder is disabled in this configuration.
    #[error("primary encoder unavailable")]
    Unavailable,

    /// The primary encoder did not finish in time.
    #[error("encode timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The encoder ran and failed.
    #[error("encode failed: {0}")]
    Failed(String),
}

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Invalid caller-provided record or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset failure that a caller asked to see (loaders used directly).
    #[error("asset error: {0}")]
    AssetLoad(#[from] LoadError),

    /// Drawing surface could not be allocated or painted.
    #[error("surface error: {0}")]
    Surface(String),

    /// Both encode paths failed for one attempt.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Engine configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// Every pixel-ratio candidate failed; `last` is the final attempt's error.
    #[error("all {attempts} pixel ratio attempts failed; last error: {last}")]
    PixelRatioExhausted {
        /// Number of attempts made.
        attempts: usize,
        /// Error of the last attempt.
        last: Box<PosterError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PosterError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`PosterError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
