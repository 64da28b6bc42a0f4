use serde::{Deserialize, Serialize};

pub use vello_cpu::kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Outbound link encoded in every QR block.
pub const SHARE_URL: &str = "https://inkgrid.app/";
/// Human readable label printed next to the QR block.
pub const SHARE_LABEL: &str = "扫码进入 墨阵 · inkgrid.app";
/// Brand name used in headers and footers.
pub const BRAND_NAME: &str = "墨阵 InkGrid";

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha multiplied by `alpha` (clamped to `0..=1`).
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (f32::from(self.a) * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Linear interpolation in straight-alpha space.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let af = f32::from(a);
            let bf = f32::from(b);
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Premultiplied byte quadruple.
    pub fn premul_bytes(self) -> [u8; 4] {
        let a16 = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a16) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }

    pub(crate) fn to_cpu(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Logical canvas size in CSS-like pixels, before scale and pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Portrait share card.
    pub const POSTER: Self = Self {
        width: 1080,
        height: 1920,
    };

    /// Square concept/story card.
    pub const SQUARE: Self = Self {
        width: 1080,
        height: 1080,
    };

    /// Full-canvas rectangle in logical coordinates.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    pub fn h(self) -> f64 {
        f64::from(self.height)
    }
}

/// Caller-facing render knobs. Both fields are clamped; absent or non-finite values fall back
/// to the defaults (`scale = 1`, `pixel_ratio = 1`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Output scale relative to the canonical canvas, clamped to `[0.25, 1]`.
    #[serde(default)]
    pub scale: Option<f32>,
    /// Output pixel density, clamped to `[0.5, 4]`.
    #[serde(default)]
    pub pixel_ratio: Option<f32>,
}

impl RenderOptions {
    pub const MIN_SCALE: f32 = 0.25;
    pub const MAX_SCALE: f32 = 1.0;
    pub const MIN_PIXEL_RATIO: f32 = 0.5;
    pub const MAX_PIXEL_RATIO: f32 = 4.0;

    /// Options with both fields set.
    pub fn new(scale: f32, pixel_ratio: f32) -> Self {
        Self {
            scale: Some(scale),
            pixel_ratio: Some(pixel_ratio),
        }
    }

    /// Effective scale after defaulting and clamping.
    pub fn normalized_scale(&self) -> f32 {
        match self.scale {
            Some(s) if s.is_finite() => s.clamp(Self::MIN_SCALE, Self::MAX_SCALE),
            _ => 1.0,
        }
    }

    /// Effective pixel ratio after defaulting and clamping.
    pub fn normalized_pixel_ratio(&self) -> f32 {
        match self.pixel_ratio {
            Some(r) if r.is_finite() => r.clamp(Self::MIN_PIXEL_RATIO, Self::MAX_PIXEL_RATIO),
            _ => 1.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
