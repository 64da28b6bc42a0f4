use super::*;

/// Wide characters advance one em, everything else half an em.
struct FixedAdvance;

impl TextMeasure for FixedAdvance {
    fn measure(&mut self, text: &str, style: &TextStyle) -> f32 {
        text.chars()
            .map(|c| if is_wide(c) { style.size } else { style.size * 0.5 })
            .sum()
    }
}

fn style() -> TextStyle {
    TextStyle::new(10.0, Rgba8::rgb(0, 0, 0))
}

fn non_ws(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn cjk_lines_fit_and_preserve_characters() {
    let text = "永字八法是书法用笔的基本法则点横竖撇捺";
    for max in [10.0, 35.0, 50.0, 95.0, 1000.0] {
        let lines = wrap_text(&mut FixedAdvance, text, max, &style());
        for line in &lines {
            assert!(
                FixedAdvance.measure(line, &style()) <= max,
                "{line:?} exceeds {max}"
            );
        }
        assert_eq!(lines.concat(), non_ws(text));
    }
}

#[test]
fn blank_input_yields_no_lines() {
    assert!(wrap_text(&mut FixedAdvance, "", 100.0, &style()).is_empty());
    assert!(wrap_text(&mut FixedAdvance, "  \n \n", 100.0, &style()).is_empty());
}

#[test]
fn latin_breaks_between_words() {
    // "ink grid" = 8 chars * 5 = 40
    let lines = wrap_text(&mut FixedAdvance, "ink grid poster card", 45.0, &style());
    assert_eq!(lines, vec!["ink grid", "poster", "card"]);
}

#[test]
fn overlong_word_is_split_by_character() {
    let lines = wrap_text(&mut FixedAdvance, "a calligraphy b", 30.0, &style());
    for line in &lines {
        assert!(FixedAdvance.measure(line, &style()) <= 30.0, "{line:?}");
    }
    assert_eq!(non_ws(&lines.concat()), "acalligraphyb");
    assert!(lines.contains(&"callig".to_string()));
}

#[test]
fn newline_forces_break() {
    let lines = wrap_text(&mut FixedAdvance, "墨阵\n书法", 1000.0, &style());
    assert_eq!(lines, vec!["墨阵", "书法"]);
}

#[test]
fn single_char_wider_than_limit_gets_its_own_line() {
    let lines = wrap_text(&mut FixedAdvance, "鼎鼐", 4.0, &style());
    assert_eq!(lines, vec!["鼎", "鼐"]);
}

#[test]
fn wide_detection_and_estimate() {
    assert!(is_wide('鼎'));
    assert!(is_wide('，'));
    assert!(!is_wide('d'));
    assert!(!is_wide('ǐ'));

    let s = TextStyle::new(20.0, Rgba8::rgb(0, 0, 0)).spacing(2.0);
    let w = estimate_width("鼎a", &s);
    assert!((w - (20.0 + 2.0 + 0.56 * 20.0 + 2.0)).abs() < 1e-4);
}

#[test]
fn estimate_only_engine_measures_without_font() {
    let mut engine = TextEngine::estimate_only();
    assert!(engine.family_name().is_none());
    let s = style();
    assert_eq!(engine.measure("鼎", &s), estimate_width("鼎", &s));
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let font = FontAsset::from_bytes(vec![0u8; 64]);
    assert!(TextEngine::new(Some(&font)).is_err());
}
