use std::sync::Arc;
use std::time::Duration;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use rayon::prelude::*;

use crate::config::EncodeConfig;
use crate::foundation::error::{EncodeError, PosterResult};

/// Straight-alpha RGBA8 pixels ready for PNG encoding.
#[derive(Clone)]
pub struct StraightRgba {
    pub width: u32,
    pub height: u32,
    data: Arc<Vec<u8>>,
}

impl std::fmt::Debug for StraightRgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StraightRgba")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl StraightRgba {
    /// Convert a flushed pixmap (premultiplied) to straight alpha.
    pub fn from_pixmap(pixmap: &vello_cpu::Pixmap) -> Self {
        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_in_place(&mut data);
        Self {
            width: u32::from(pixmap.width()),
            height: u32::from(pixmap.height()),
            data: Arc::new(data),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Undo alpha premultiplication, one row band per rayon task.
pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    rgba.par_chunks_mut(4 * 1024).for_each(|band| {
        for px in band.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            match a {
                0 => px[..3].fill(0),
                255 => {}
                _ => {
                    for c in &mut px[..3] {
                        *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
                    }
                }
            }
        }
    });
}

fn encode_with(
    img: &StraightRgba,
    compression: CompressionType,
    filter: FilterType,
) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(img.data.len() / 4);
    PngEncoder::new_with_quality(&mut out, compression, filter)
        .write_image(
            img.as_bytes(),
            img.width,
            img.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::Failed(e.to_string()))?;
    Ok(out)
}

/// Baseline PNG: fast compression, no filtering, on the calling thread.
pub fn encode_fast(img: &StraightRgba) -> Result<Vec<u8>, EncodeError> {
    encode_with(img, CompressionType::Fast, FilterType::NoFilter)
}

/// Best-compression PNG on the blocking pool, bounded by `timeout_ms`.
pub async fn encode_best(img: &StraightRgba, timeout_ms: u64) -> Result<Vec<u8>, EncodeError> {
    let owned = img.clone();
    let task = tokio::task::spawn_blocking(move || {
        encode_with(&owned, CompressionType::Best, FilterType::Adaptive)
    });
    match tokio::time::timeout(Duration::from_millis(timeout_ms), task).await {
        Ok(Ok(res)) => res,
        Ok(Err(join)) => Err(EncodeError::Failed(format!("encode task failed: {join}"))),
        Err(_) => Err(EncodeError::Timeout { timeout_ms }),
    }
}

/// Encode `img`, falling back to [`encode_fast`] when the primary encoder is disabled, times
/// out or fails.
pub async fn encode_png(img: &StraightRgba, cfg: &EncodeConfig) -> PosterResult<Vec<u8>> {
    let primary = if cfg.primary {
        encode_best(img, cfg.timeout_ms).await
    } else {
        Err(EncodeError::Unavailable)
    };
    match primary {
        Ok(bytes) => Ok(bytes),
        Err(err) => {
            if !matches!(err, EncodeError::Unavailable) {
                tracing::warn!(error = %err, "primary png encoder failed, using baseline");
            }
            Ok(encode_fast(img)?)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
