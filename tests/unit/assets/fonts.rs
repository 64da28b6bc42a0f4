use std::path::PathBuf;

use super::*;
use crate::render::text::TextEngine;

fn fixture_root(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("inkgrid_fixtures").join(name);
    std::fs::create_dir_all(dir.join("fonts")).unwrap();
    dir
}

#[test]
fn asset_font_dirs_skip_junk_and_missing_dirs() {
    let root = fixture_root("fonts_junk");
    std::fs::write(root.join("fonts").join("README.txt"), b"not a font").unwrap();
    std::fs::write(root.join("fonts").join("broken.ttf"), [0u8; 64]).unwrap();

    let mut db = fontdb::Database::new();
    load_asset_fonts(&mut db, &root);
    load_asset_fonts(&mut db, &root.join("does-not-exist"));
    assert_eq!(db.len(), 0);
    assert!(find_cjk_face(&db).is_none());
}

#[test]
fn cjk_face_shipped_with_assets_is_found() {
    let system = font_database(&fixture_root("fonts_system"));
    let Some(font) = find_cjk_face(&system) else {
        eprintln!("no CJK-capable font installed on this host; skipping");
        return;
    };

    let root = fixture_root("fonts_shipped");
    std::fs::write(root.join("fonts").join("cjk.ttf"), font.bytes()).unwrap();

    let mut db = fontdb::Database::new();
    load_asset_fonts(&mut db, &root);
    let ids: Vec<fontdb::ID> = db.faces().map(|f| f.id).collect();
    assert!(!ids.is_empty());
    assert!(ids.iter().any(|&id| covers_cjk(&db, id)));

    let found = find_cjk_face(&db).unwrap();
    let engine = TextEngine::new(Some(&found)).unwrap();
    assert!(engine.family_name().is_some());
}
