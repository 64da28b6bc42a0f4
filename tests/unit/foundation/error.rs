use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PosterError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PosterError::surface("x")
            .to_string()
            .contains("surface error:")
    );
    assert!(
        PosterError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        PosterError::from(EncodeError::Unavailable)
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn exhausted_reports_last_error() {
    let err = PosterError::PixelRatioExhausted {
        attempts: 6,
        last: Box::new(PosterError::surface("too large")),
    };
    let msg = err.to_string();
    assert!(msg.contains("all 6 pixel ratio attempts failed"));
    assert!(msg.contains("too large"));
}

#[test]
fn load_error_exposes_url() {
    let e = LoadError::Timeout {
        url: "/assets/noise.png".to_string(),
        timeout_ms: 15_000,
    };
    assert_eq!(e.url(), "/assets/noise.png");
    assert!(e.to_string().contains("15000ms"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PosterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
