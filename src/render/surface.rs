use vello_cpu::peniko::BlendMode;

use crate::assets::decode::{ImageHandle, PreparedImage};
use crate::foundation::core::{Affine, BezPath, CanvasSize, Rect, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::text::{TextEngine, TextStyle};

/// What a scene drew, in order. Recorded alongside the pixels so layer order and text content
/// can be checked without decoding the PNG.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurfaceTrace {
    /// Layer names in paint order.
    pub layers: Vec<String>,
    /// Every string passed to a text draw, in paint order.
    pub texts: Vec<String>,
}

impl SurfaceTrace {
    /// `true` if any drawn text contains `needle`.
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t.contains(needle))
    }

    /// Position of layer `name`, if it was painted.
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l == name)
    }
}

/// Raster target for one render attempt.
///
/// Scenes draw in logical canvas coordinates; the surface maps them to device pixels with a
/// uniform `device_scale` (scale x pixel ratio). Nested transforms, clips and opacity groups
/// are scoped through closures so pushes and pops always pair up.
pub struct Surface {
    ctx: vello_cpu::RenderContext,
    canvas: CanvasSize,
    device_scale: f64,
    width_px: u16,
    height_px: u16,
    current: Affine,
    trace: SurfaceTrace,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("canvas", &self.canvas)
            .field("device_scale", &self.device_scale)
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .finish()
    }
}

/// Device size for `canvas` drawn at `device_scale`.
pub fn device_size(canvas: CanvasSize, device_scale: f64) -> (u32, u32) {
    let w = (canvas.w() * device_scale - 1e-6).ceil().max(1.0);
    let h = (canvas.h() * device_scale - 1e-6).ceil().max(1.0);
    (w as u32, h as u32)
}

impl Surface {
    /// Allocate a surface, failing when the device size exceeds `max_pixels` or the
    /// rasterizer's 16-bit dimension limit.
    pub fn new(canvas: CanvasSize, device_scale: f64, max_pixels: u64) -> PosterResult<Self> {
        if !device_scale.is_finite() || device_scale <= 0.0 {
            return Err(PosterError::surface(format!(
                "invalid device scale {device_scale}"
            )));
        }
        let (w, h) = device_size(canvas, device_scale);
        let pixels = u64::from(w) * u64::from(h);
        if pixels > max_pixels {
            return Err(PosterError::surface(format!(
                "surface {w}x{h} ({pixels} px) exceeds limit of {max_pixels} px"
            )));
        }
        let width_px: u16 = w
            .try_into()
            .map_err(|_| PosterError::surface(format!("surface width {w} exceeds u16")))?;
        let height_px: u16 = h
            .try_into()
            .map_err(|_| PosterError::surface(format!("surface height {h} exceeds u16")))?;

        Ok(Self {
            ctx: vello_cpu::RenderContext::new(width_px, height_px),
            canvas,
            device_scale,
            width_px,
            height_px,
            current: Affine::IDENTITY,
            trace: SurfaceTrace::default(),
        })
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Device pixels per logical pixel.
    pub fn device_scale(&self) -> f64 {
        self.device_scale
    }

    /// Device size in pixels.
    pub fn size_px(&self) -> (u32, u32) {
        (u32::from(self.width_px), u32::from(self.height_px))
    }

    pub fn trace(&self) -> &SurfaceTrace {
        &self.trace
    }

    /// Mark the start of a named layer.
    pub fn layer(&mut self, name: &str) {
        tracing::trace!(layer = name, "paint layer");
        self.trace.layers.push(name.to_string());
    }

    fn device_transform(&self) -> Affine {
        Affine::scale(self.device_scale) * self.current
    }

    fn prepare(&mut self) {
        let t = self.device_transform();
        self.ctx.set_transform(t);
        self.ctx.set_paint_transform(Affine::IDENTITY);
        self.ctx.set_blend_mode(BlendMode::default());
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.prepare();
        self.ctx.set_paint(color.to_cpu());
        self.ctx.fill_rect(&rect);
    }

    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.prepare();
        self.ctx.set_paint(color.to_cpu());
        self.ctx.fill_path(path);
    }

    /// Stroke `path` with a line of `width` logical pixels.
    pub fn stroke_path(&mut self, path: &BezPath, width: f64, color: Rgba8) {
        if color.a == 0 || width <= 0.0 {
            return;
        }
        self.prepare();
        self.ctx.set_paint(color.to_cpu());
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(path);
    }

    /// Run `f` inside an opacity group. Fully opaque groups are drawn directly.
    pub fn with_opacity<R>(&mut self, alpha: f32, f: impl FnOnce(&mut Self) -> R) -> R {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha >= 1.0 {
            return f(self);
        }
        self.prepare();
        self.ctx.push_opacity_layer(alpha);
        let out = f(self);
        self.ctx.pop_layer();
        out
    }

    /// Run `f` with drawing clipped to `clip` (in the current logical coordinates).
    pub fn with_clip<R>(&mut self, clip: &BezPath, f: impl FnOnce(&mut Self) -> R) -> R {
        self.prepare();
        self.ctx.push_clip_layer(clip);
        let out = f(self);
        self.ctx.pop_layer();
        out
    }

    /// Run `f` with `t` appended to the current transform.
    pub fn with_transform<R>(&mut self, t: Affine, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.current;
        self.current = saved * t;
        let out = f(self);
        self.current = saved;
        out
    }

    /// Stretch `image` over `dest`.
    pub fn draw_image(&mut self, image: &ImageHandle, dest: Rect, alpha: f32) {
        self.draw_prepared(image, dest, alpha);
    }

    pub(crate) fn draw_prepared(&mut self, image: &PreparedImage, dest: Rect, alpha: f32) {
        if image.width == 0 || image.height == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let sx = dest.width() / f64::from(image.width);
        let sy = dest.height() / f64::from(image.height);
        let placement = Affine::translate((dest.x0, dest.y0)) * Affine::scale_non_uniform(sx, sy);
        self.with_opacity(alpha, |s| {
            s.with_transform(placement, |s| {
                s.prepare();
                s.ctx.set_paint(image.paint.clone());
                s.ctx.fill_rect(&Rect::new(
                    0.0,
                    0.0,
                    f64::from(image.width),
                    f64::from(image.height),
                ));
            });
        });
    }

    /// Draw one line of text; returns its advance width in logical pixels.
    pub fn draw_text(
        &mut self,
        engine: &mut TextEngine,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
    ) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.trace.texts.push(text.to_string());
        let base = self.device_transform();
        engine.paint(&mut self.ctx, base, text, x, y, style)
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> (vello_cpu::Pixmap, SurfaceTrace) {
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width_px, self.height_px);
        self.ctx.render_to_pixmap(&mut pixmap);
        (pixmap, self.trace)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
