use std::sync::Arc;

use crate::foundation::core::{Affine, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Horizontal anchor of a text draw relative to its `x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor of a text draw relative to its `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    #[default]
    Alphabetic,
}

/// Font size, color, anchoring and tracking of one text draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Rgba8,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    /// Extra advance after every character, in logical pixels.
    pub letter_spacing: f32,
}

impl TextStyle {
    pub fn new(size: f32, color: Rgba8) -> Self {
        Self {
            size,
            color,
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
            letter_spacing: 0.0,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn spacing(mut self, letter_spacing: f32) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    pub fn color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}

/// Measures the advance width of a string at a style.
///
/// `wrap_text` and the layout helpers only depend on this, so they can be exercised with a
/// fixed-advance stub.
pub trait TextMeasure {
    fn measure(&mut self, text: &str, style: &TextStyle) -> f32;
}

/// Width estimate used when no font is available: full-width for CJK, a little over half an em
/// for everything else.
pub fn estimate_width(text: &str, style: &TextStyle) -> f32 {
    text.chars()
        .map(|c| {
            let em = if is_wide(c) { 1.0 } else { 0.56 };
            em * style.size + style.letter_spacing
        })
        .sum()
}

/// East Asian wide characters (CJK ideographs, kana, hangul, full-width forms).
pub fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x3FFFD)
}

/// Greedy line breaking for mixed CJK/Latin text.
///
/// Strings containing a space are broken between whitespace-separated words; anything else is
/// broken between characters (whitespace dropped). `\n` always starts a new line. A word wider
/// than `max_width` is split by character; a single character wider than `max_width` gets a
/// line of its own. Blank input yields no lines.
pub fn wrap_text(
    measure: &mut dyn TextMeasure,
    text: &str,
    max_width: f32,
    style: &TextStyle,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            continue;
        }
        if paragraph.contains(' ') {
            wrap_words(measure, paragraph, max_width, style, &mut lines);
        } else {
            let chars: Vec<String> = paragraph
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(String::from)
                .collect();
            wrap_tokens(measure, &chars, "", max_width, style, &mut lines);
        }
    }
    lines
}

fn wrap_words(
    measure: &mut dyn TextMeasure,
    paragraph: &str,
    max_width: f32,
    style: &TextStyle,
    out: &mut Vec<String>,
) {
    let mut tokens = Vec::<String>::new();
    for word in paragraph.split_whitespace() {
        if measure.measure(word, style) <= max_width {
            tokens.push(word.to_string());
            continue;
        }
        // Too wide on its own: break the word into pieces that fit.
        let chars: Vec<String> = word.chars().map(String::from).collect();
        let mut pieces = Vec::new();
        wrap_tokens(measure, &chars, "", max_width, style, &mut pieces);
        tokens.extend(pieces);
    }
    wrap_tokens(measure, &tokens, " ", max_width, style, out);
}

fn wrap_tokens(
    measure: &mut dyn TextMeasure,
    tokens: &[String],
    joiner: &str,
    max_width: f32,
    style: &TextStyle,
    out: &mut Vec<String>,
) {
    let mut line = String::new();
    for token in tokens {
        if line.is_empty() {
            line.push_str(token);
            continue;
        }
        let candidate = format!("{line}{joiner}{token}");
        if measure.measure(&candidate, style) <= max_width {
            line = candidate;
        } else {
            out.push(std::mem::take(&mut line));
            line.push_str(token);
        }
    }
    if !line.is_empty() {
        out.push(line);
    }
}

/// Font bytes shared by every render of an engine.
#[derive(Clone)]
pub struct FontAsset {
    bytes: Arc<Vec<u8>>,
    index: u32,
    data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAsset")
            .field("len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontAsset {
    /// Wrap raw font file bytes (TTF/OTF/TTC; the first face is used).
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::from_face(bytes, 0)
    }

    /// Wrap font file bytes and select face `index` of a collection.
    pub fn from_face(bytes: Vec<u8>, index: u32) -> Self {
        let bytes = Arc::new(bytes);
        let shared: Arc<dyn AsRef<[u8]> + Send + Sync> = bytes.clone();
        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::new(shared), index);
        Self { bytes, index, data }
    }

    /// Face index within the font file.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Read a font file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> PosterResult<Self> {
        use anyhow::Context as _;

        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(Self::from_bytes(bytes))
    }
}

struct LoadedFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Parley-backed shaping, measurement and glyph painting for one font.
///
/// Built once per render attempt from the engine's [`FontAsset`]. Without a font the engine
/// still measures (by estimate) but paints nothing.
pub struct TextEngine {
    font: Option<LoadedFont>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    warned_missing_font: bool,
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("family", &self.family_name())
            .finish()
    }
}

impl TextEngine {
    /// Engine over `font`, or an estimate-only engine when `None`.
    pub fn new(font: Option<&FontAsset>) -> PosterResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let loaded = match font {
            None => None,
            Some(font) => {
                let shared: Arc<dyn AsRef<[u8]> + Send + Sync> = font.bytes.clone();
                let families = font_ctx
                    .collection
                    .register_fonts(parley::fontique::Blob::new(shared), None);
                let family_id = families
                    .iter()
                    .find(|(_, faces)| faces.iter().any(|f| f.index() == font.index))
                    .or_else(|| families.first())
                    .map(|(id, _)| *id)
                    .ok_or_else(|| {
                        PosterError::validation("no font families registered from font bytes")
                    })?;
                let family = font_ctx
                    .collection
                    .family_name(family_id)
                    .ok_or_else(|| PosterError::validation("registered font family has no name"))?
                    .to_string();
                Some(LoadedFont {
                    family,
                    data: font.data.clone(),
                })
            }
        };
        Ok(Self {
            font: loaded,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            warned_missing_font: false,
        })
    }

    /// Engine without a font.
    pub fn estimate_only() -> Self {
        Self {
            font: None,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            warned_missing_font: false,
        }
    }

    /// Family name of the loaded font.
    pub fn family_name(&self) -> Option<&str> {
        self.font.as_ref().map(|f| f.family.as_str())
    }

    fn layout(
        &mut self,
        family: &str,
        text: &str,
        style: &TextStyle,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            style.color,
        )));
        if style.letter_spacing != 0.0 {
            builder.push_default(parley::style::StyleProperty::LetterSpacing(
                style.letter_spacing,
            ));
        }
        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Paint `text` anchored at `(x, y)` in logical coordinates; returns the advance width.
    pub(crate) fn paint(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        base: Affine,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
    ) -> f32 {
        let Some(family) = self.font.as_ref().map(|f| f.family.clone()) else {
            if !self.warned_missing_font {
                tracing::warn!("no font available; text layers are measured but not painted");
                self.warned_missing_font = true;
            }
            return estimate_width(text, style);
        };
        if text.is_empty() || !style.size.is_finite() || style.size <= 0.0 {
            return 0.0;
        }

        let layout = self.layout(&family, text, style);
        let width = layout.width();
        let first_baseline = layout
            .lines()
            .next()
            .map(|l| l.metrics().baseline)
            .unwrap_or(style.size * 0.88);

        let ox = match style.align {
            TextAlign::Left => x as f32,
            TextAlign::Center => x as f32 - width / 2.0,
            TextAlign::Right => x as f32 - width,
        };
        let oy = match style.baseline {
            TextBaseline::Top => y as f32,
            TextBaseline::Middle => y as f32 - layout.height() / 2.0,
            TextBaseline::Alphabetic => y as f32 - first_baseline,
        };

        let Some(font) = self.font.as_ref() else {
            return width;
        };
        ctx.set_transform(base);
        ctx.set_paint_transform(Affine::IDENTITY);
        ctx.set_paint(style.color.to_cpu());
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let glyphs: Vec<vello_cpu::Glyph> = glyph_run
                    .positioned_glyphs()
                    .map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: ox + g.x,
                        y: oy + g.y,
                    })
                    .collect();
                ctx.glyph_run(&font.data)
                    .font_size(glyph_run.run().font_size())
                    .fill_glyphs(glyphs.into_iter());
            }
        }
        width
    }
}

impl TextMeasure for TextEngine {
    fn measure(&mut self, text: &str, style: &TextStyle) -> f32 {
        let Some(family) = self.font.as_ref().map(|f| f.family.clone()) else {
            return estimate_width(text, style);
        };
        if text.is_empty() {
            return 0.0;
        }
        self.layout(&family, text, style).width()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
