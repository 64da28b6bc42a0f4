use std::sync::Arc;

use anyhow::{Context, anyhow};

/// Decoded raster image ready to be painted by `vello_cpu`.
#[derive(Clone)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    pub(crate) paint: vello_cpu::Image,
}

impl std::fmt::Debug for PreparedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl PreparedImage {
    /// Build from premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(bytes: &[u8], width: u32, height: u32) -> anyhow::Result<Self> {
        let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
        Ok(Self {
            width,
            height,
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
        })
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

/// Shared handle to a decoded image. Cheap to clone.
pub type ImageHandle = Arc<PreparedImage>;

/// Largest edge an SVG asset is rasterized to.
const SVG_MAX_EDGE: u32 = 2048;

/// Decode encoded image bytes (PNG, JPEG, WebP, ... or SVG) into a paintable image.
pub fn decode_image(bytes: &[u8]) -> anyhow::Result<PreparedImage> {
    if looks_like_svg(bytes) {
        return decode_svg(bytes);
    }
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage::from_premul_rgba8(&rgba8_premul, width, height)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let Ok(s) = std::str::from_utf8(head) else {
        return false;
    };
    let s = s.trim_start_matches('\u{feff}').trim_start();
    s.starts_with("<svg") || (s.starts_with("<?xml") && s.contains("<svg"))
}

/// Rasterize an SVG at twice its intrinsic size so it stays crisp on dense outputs.
fn decode_svg(bytes: &[u8]) -> anyhow::Result<PreparedImage> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default()).context("parse svg tree")?;
    let size = tree.size();
    if !size.width().is_finite() || !size.height().is_finite() || size.width() <= 0.0 {
        return Err(anyhow!("svg has invalid width/height"));
    }

    let long_edge = size.width().max(size.height());
    let scale = (2.0f32).min(SVG_MAX_EDGE as f32 / long_edge);
    let width = ((size.width() * scale).ceil() as u32).max(1);
    let height = ((size.height() * scale).ceil() as u32).max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("failed to allocate svg pixmap {width}x{height}"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    PreparedImage::from_premul_rgba8(pixmap.data(), width, height)
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> anyhow::Result<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| anyhow!("pixmap width {width} exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| anyhow!("pixmap height {height} exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(anyhow!("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let opaque = bytes.chunks_exact(4).all(|px| px[3] == 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, !opaque,
    ))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
