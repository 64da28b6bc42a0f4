use super::*;

#[test]
fn char_poster_deserializes_from_app_json() {
    let json = r#"{
        "kind": "char",
        "template": "minimal",
        "data": {
            "simplified": "鼎",
            "pinyin": "dǐng",
            "meaning": "三足两耳的器物",
            "enMeaning": "tripod cauldron",
            "image": "/x.png",
            "sourceTitle": "毛公鼎"
        }
    }"#;
    let input: PosterInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.template(), PosterTemplate::Minimal);
    let PosterInput::Char { data, .. } = &input else {
        panic!("expected char input");
    };
    assert_eq!(data.en_meaning.as_deref(), Some("tripod cauldron"));
    assert_eq!(data.source_title.as_deref(), Some("毛公鼎"));
    assert_eq!(input.primary_image(), Some("/x.png"));
    input.validate().unwrap();
}

#[test]
fn template_defaults_to_folio() {
    let json = r#"{"kind":"stele","data":{"name":"兰亭序","author":"王羲之","dynasty":"东晋","scriptType":"行书","type":"墨迹","totalChars":324}}"#;
    let input: PosterInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.template(), PosterTemplate::Folio);
    let PosterInput::Stele { data, .. } = &input else {
        panic!("expected stele input");
    };
    assert_eq!(data.kind.as_deref(), Some("墨迹"));
    assert_eq!(data.total_chars, 324);
    assert!(input.primary_image().is_none());
}

#[test]
fn empty_image_fails_validation() {
    let rec = CharRecord {
        simplified: "鼎".to_string(),
        image: "  ".to_string(),
        ..CharRecord::default()
    };
    let err = rec.validate().unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}

#[test]
fn stele_records_need_no_name() {
    let input = PosterInput::Stele {
        template: PosterTemplate::Minimal,
        data: SteleRecord::default(),
    };
    input.validate().unwrap();
}

#[test]
fn day_id_accepts_all_spellings() {
    for raw in [r#""ny_03""#, r#""3""#, "3", r#""NY_3""#] {
        let id: DayId = serde_json::from_str(raw).unwrap();
        assert_eq!(id.as_str(), "ny_03", "{raw}");
        assert_eq!(id.number(), Some(3));
    }
    let odd: DayId = serde_json::from_str(r#""lantern""#).unwrap();
    assert_eq!(odd.as_str(), "lantern");
    assert_eq!(odd.number(), None);
    assert_eq!(DayId::from_number(12).number(), None);
    assert_eq!(DayId::default().as_str(), "ny_01");
}

#[test]
fn collage_shows_at_most_eight_cards() {
    let input = CuratedCollageInput {
        cards: (0..11)
            .map(|i| CollageCard {
                simplified: None,
                image: format!("/c{i}.png"),
            })
            .collect(),
        ..CuratedCollageInput::default()
    };
    assert_eq!(input.visible_cards().len(), COLLAGE_MAX_CARDS);
    assert!(!input.identity().contains("/c8.png"));
}

#[test]
fn render_request_is_tagged_by_render() {
    let json = r#"{"render":"concept","id":5,"options":{"scale":0.5}}"#;
    let req: RenderRequest = serde_json::from_str(json).unwrap();
    let RenderRequest::Concept { id, options } = &req else {
        panic!("expected concept request");
    };
    assert_eq!(id.as_str(), "ny_05");
    assert_eq!(options.scale, Some(0.5));

    let req = req.with_options(RenderOptions::new(1.0, 2.0));
    assert_eq!(req.options().pixel_ratio, Some(2.0));
}
