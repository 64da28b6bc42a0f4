use serde::{Deserialize, Deserializer, Serialize};

use crate::foundation::core::RenderOptions;
use crate::foundation::error::{PosterError, PosterResult};

/// Card template for character and inscription posters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosterTemplate {
    /// Museum folio: framed glyph on paper with a side caption column.
    #[default]
    Folio,
    /// Ink wash: glyph floating over a soft gradient with vertical credits.
    Wash,
    /// Minimal: glyph, pronunciation and gloss on a flat ground.
    Minimal,
}

impl PosterTemplate {
    pub fn key(self) -> &'static str {
        match self {
            Self::Folio => "folio",
            Self::Wash => "wash",
            Self::Minimal => "minimal",
        }
    }
}

/// A single character with its source rubbing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharRecord {
    pub simplified: String,
    pub pinyin: String,
    pub meaning: String,
    #[serde(default)]
    pub en_meaning: Option<String>,
    #[serde(default)]
    pub en_word: Option<String>,
    /// Glyph image URL. Required.
    pub image: String,
    #[serde(default)]
    pub source_title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub dynasty: Option<String>,
}

impl CharRecord {
    pub fn validate(&self) -> PosterResult<()> {
        if self.image.trim().is_empty() {
            return Err(PosterError::validation("char record image must be non-empty"));
        }
        Ok(())
    }
}

/// An inscription (stele, rubbing or manuscript).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SteleRecord {
    pub name: String,
    pub author: String,
    pub dynasty: String,
    pub script_type: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub total_chars: u32,
    #[serde(default)]
    pub description: Option<String>,
    /// Excerpt of the text, drawn in vertical columns.
    #[serde(default)]
    pub content: Option<String>,
}

/// What a card poster shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PosterInput {
    Char {
        #[serde(default)]
        template: PosterTemplate,
        data: CharRecord,
    },
    Stele {
        #[serde(default)]
        template: PosterTemplate,
        data: SteleRecord,
    },
}

impl PosterInput {
    pub fn template(&self) -> PosterTemplate {
        match self {
            Self::Char { template, .. } | Self::Stele { template, .. } => *template,
        }
    }

    /// Stable identity used to seed decorative scatter.
    pub fn identity(&self) -> String {
        match self {
            Self::Char { data, .. } => format!("char:{}:{}", data.simplified, data.image),
            Self::Stele { data, .. } => format!("stele:{}:{}", data.name, data.author),
        }
    }

    /// Only character records carry a required field (`image`).
    pub fn validate(&self) -> PosterResult<()> {
        match self {
            Self::Char { data, .. } => data.validate(),
            Self::Stele { .. } => Ok(()),
        }
    }

    /// URL of the record's primary image, if it has one.
    pub fn primary_image(&self) -> Option<&str> {
        match self {
            Self::Char { data, .. } => Some(data.image.as_str()),
            Self::Stele { .. } => None,
        }
    }
}

/// Number of New-Year days.
pub const NEW_YEAR_DAYS: u8 = 9;

/// New-Year day key (`ny_01`..`ny_09`).
///
/// Deserializes from `"ny_03"`, `"3"` or `3`. Anything else is kept verbatim and resolves to
/// the default scene.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DayId(String);

impl DayId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        let digits = raw
            .strip_prefix("ny_")
            .or_else(|| raw.strip_prefix("NY_"))
            .unwrap_or(raw);
        match digits.parse::<u32>() {
            Ok(n) => Self::from_number(n),
            Err(_) => Self(raw.to_string()),
        }
    }

    pub fn from_number(n: u32) -> Self {
        Self(format!("ny_{n:02}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Day number when the key is in range.
    pub fn number(&self) -> Option<u8> {
        let n: u8 = self.0.strip_prefix("ny_")?.parse().ok()?;
        (1..=NEW_YEAR_DAYS).contains(&n).then_some(n)
    }
}

impl Default for DayId {
    fn default() -> Self {
        Self::from_number(1)
    }
}

impl std::fmt::Display for DayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DayId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u32),
            Text(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Self::from_number(n),
            Raw::Text(s) => Self::new(s),
        })
    }
}

/// Glyph featured on a New-Year day card.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphRef {
    pub image: String,
    pub simplified: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub source_title: String,
}

/// A New-Year calendar day card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewYearPosterInput {
    pub id: DayId,
    pub day_label: String,
    pub caption: String,
    #[serde(default)]
    pub lunar: Option<String>,
    #[serde(default)]
    pub story: Option<String>,
    pub glyph: GlyphRef,
}

impl NewYearPosterInput {
    pub fn identity(&self) -> String {
        format!("ny:{}:{}:{}", self.id, self.glyph.simplified, self.glyph.index)
    }
}

/// Maximum number of cards a collage shows.
pub const COLLAGE_MAX_CARDS: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollageCard {
    #[serde(default)]
    pub simplified: Option<String>,
    pub image: String,
}

/// Hand-picked glyphs laid out on a desk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CuratedCollageInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub cards: Vec<CollageCard>,
}

impl CuratedCollageInput {
    /// The cards that are drawn.
    pub fn visible_cards(&self) -> &[CollageCard] {
        &self.cards[..self.cards.len().min(COLLAGE_MAX_CARDS)]
    }

    pub fn identity(&self) -> String {
        let mut id = String::from("collage");
        for c in self.visible_cards() {
            id.push(':');
            id.push_str(&c.image);
        }
        id
    }
}

/// Square explanation card for one day.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptInput {
    pub id: DayId,
}

/// Square folklore story card for one day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewYearStoryInput {
    pub id: DayId,
    #[serde(default)]
    pub title: Option<String>,
    pub story: String,
    #[serde(default)]
    pub lunar: Option<String>,
}

/// One render job as read by the command line tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "render", rename_all = "snake_case")]
pub enum RenderRequest {
    Poster {
        input: PosterInput,
        #[serde(default)]
        options: RenderOptions,
    },
    NewYear {
        input: NewYearPosterInput,
        #[serde(default)]
        options: RenderOptions,
    },
    Collage {
        input: CuratedCollageInput,
        #[serde(default)]
        options: RenderOptions,
    },
    Concept {
        id: DayId,
        #[serde(default)]
        options: RenderOptions,
    },
    Story {
        input: NewYearStoryInput,
        #[serde(default)]
        options: RenderOptions,
    },
}

impl RenderRequest {
    pub fn options(&self) -> RenderOptions {
        match self {
            Self::Poster { options, .. }
            | Self::NewYear { options, .. }
            | Self::Collage { options, .. }
            | Self::Concept { options, .. }
            | Self::Story { options, .. } => *options,
        }
    }

    pub fn with_options(mut self, opts: RenderOptions) -> Self {
        match &mut self {
            Self::Poster { options, .. }
            | Self::NewYear { options, .. }
            | Self::Collage { options, .. }
            | Self::Concept { options, .. }
            | Self::Story { options, .. } => *options = opts,
        }
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
