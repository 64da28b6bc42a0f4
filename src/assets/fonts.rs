use std::path::Path;

use usvg::fontdb;

use crate::render::text::FontAsset;

/// Preferred families, serif first. Queried in order before falling back to a coverage scan.
const CJK_FAMILIES: &[&str] = &[
    "Noto Serif CJK SC",
    "Source Han Serif SC",
    "Songti SC",
    "SimSun",
    "Noto Sans CJK SC",
    "Source Han Sans SC",
    "PingFang SC",
    "Microsoft YaHei",
    "Noto Serif SC",
    "Noto Sans SC",
    "WenQuanYi Zen Hei",
    "WenQuanYi Micro Hei",
    "AR PL UMing CN",
];

/// A face must map all of these to count as CJK-capable.
const COVERAGE_PROBE: &[char] = &['鼎', '永', '福', 'a'];

/// System fonts plus any font files shipped under the asset root.
pub(crate) fn font_database(asset_root: &Path) -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    load_asset_fonts(&mut db, asset_root);
    db
}

pub(crate) fn load_asset_fonts(db: &mut fontdb::Database, asset_root: &Path) {
    load_fonts_from_dir(db, &asset_root.join("fonts"));
    load_fonts_from_dir(db, &asset_root.join("assets").join("fonts"));
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::debug!(path = %path.display(), error = %err, "skipping font file");
        }
    }
}

/// Pick a face that covers CJK text: a preferred family when one is installed, otherwise the
/// first upright regular face (then any face) whose cmap covers the probe characters.
pub(crate) fn find_cjk_face(db: &fontdb::Database) -> Option<FontAsset> {
    let families: Vec<fontdb::Family<'_>> =
        CJK_FAMILIES.iter().map(|name| fontdb::Family::Name(name)).collect();
    let query = fontdb::Query {
        families: &families,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };

    let id = db
        .query(&query)
        .filter(|&id| covers_cjk(db, id))
        .or_else(|| {
            db.faces()
                .filter(|f| f.style == fontdb::Style::Normal && f.weight == fontdb::Weight::NORMAL)
                .map(|f| f.id)
                .find(|&id| covers_cjk(db, id))
        })
        .or_else(|| db.faces().map(|f| f.id).find(|&id| covers_cjk(db, id)))?;

    if let Some(face) = db.face(id) {
        let family = face.families.first().map(|(name, _)| name.as_str());
        tracing::debug!(family, index = face.index, "selected CJK face");
    }
    db.with_face_data(id, |data, index| FontAsset::from_face(data.to_vec(), index))
}

pub(crate) fn covers_cjk(db: &fontdb::Database, id: fontdb::ID) -> bool {
    db.with_face_data(id, |data, index| {
        ttf_parser::Face::parse(data, index)
            .map(|face| COVERAGE_PROBE.iter().all(|&c| face.glyph_index(c).is_some()))
            .unwrap_or(false)
    })
    .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
