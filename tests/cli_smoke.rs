use std::path::PathBuf;

use inkgrid_poster::{
    CharRecord, EngineConfig, PosterInput, PosterTemplate, RenderOptions, RenderRequest,
};

fn exe() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_inkgrid-poster"))
}

fn png_size(path: &PathBuf) -> (u32, u32) {
    let img = image::open(path).unwrap();
    (img.width(), img.height())
}

#[test]
fn cli_render_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke").join("render");
    std::fs::create_dir_all(&dir).unwrap();

    let request = RenderRequest::Poster {
        input: PosterInput::Char {
            template: PosterTemplate::Minimal,
            data: CharRecord {
                simplified: "山".to_string(),
                pinyin: "shān".to_string(),
                meaning: "地面上由土石构成的隆起部分".to_string(),
                image: "/glyphs/shan.png".to_string(),
                ..CharRecord::default()
            },
        },
        options: RenderOptions::new(0.25, 2.0),
    };
    let request_path = dir.join("request.json");
    let f = std::fs::File::create(&request_path).unwrap();
    serde_json::to_writer_pretty(f, &request).unwrap();

    let config = EngineConfig {
        asset_root: dir.clone(),
        ..EngineConfig::default()
    };
    let config_path = dir.join("engine.json");
    std::fs::write(&config_path, serde_json::to_vec(&config).unwrap()).unwrap();

    let out_path = dir.join("out").join("poster.png");
    let _ = std::fs::remove_file(&out_path);

    let status = std::process::Command::new(exe())
        .args(["render", "--in"])
        .arg(&request_path)
        .arg("--config")
        .arg(&config_path)
        .arg("--out")
        .arg(&out_path)
        .args(["--pixel-ratio", "1"])
        .status()
        .unwrap();

    assert!(status.success());
    // scale from the request, pixel ratio from the flag
    assert_eq!(png_size(&out_path), (270, 480));
}

#[test]
fn cli_concept_writes_square_png() {
    let dir = PathBuf::from("target").join("cli_smoke").join("concept");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("concept.png");
    let _ = std::fs::remove_file(&out_path);

    let status = std::process::Command::new(exe())
        .args(["concept", "--id", "ny_03", "--scale", "0.25", "--out"])
        .arg(&out_path)
        .env("INKGRID_ASSET_ROOT", &dir)
        .status()
        .unwrap();

    assert!(status.success());
    assert_eq!(png_size(&out_path), (270, 270));
}

#[test]
fn cli_rejects_unknown_request_tag() {
    let dir = PathBuf::from("target").join("cli_smoke").join("bad");
    std::fs::create_dir_all(&dir).unwrap();
    let request_path = dir.join("request.json");
    std::fs::write(&request_path, br#"{"render":"banner","input":{}}"#).unwrap();

    let output = std::process::Command::new(exe())
        .args(["render", "--in"])
        .arg(&request_path)
        .arg("--out")
        .arg(dir.join("never.png"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!dir.join("never.png").exists());
}
