use super::*;

struct Named(&'static str);

impl Scene<()> for Named {
    fn key(&self) -> &'static str {
        self.0
    }

    fn layers(&self) -> &'static [&'static str] {
        &["background"]
    }

    fn paint(&self, env: &mut SceneEnv<'_, ()>) -> PosterResult<()> {
        env.layer("background");
        Ok(())
    }
}

fn registry() -> SceneRegistry<()> {
    SceneRegistry::new(
        vec![Box::new(Named("a")), Box::new(Named("b"))],
        "a",
    )
    .unwrap()
}

#[test]
fn resolves_known_keys() {
    let r = registry();
    assert_eq!(r.resolve("b").key(), "b");
    assert_eq!(r.keys(), vec!["a", "b"]);
    assert_eq!(r.len(), 2);
}

#[test]
fn unknown_key_falls_back_to_default() {
    let r = registry();
    assert!(r.get("zzz").is_none());
    assert_eq!(r.resolve("zzz").key(), "a");
    assert_eq!(r.default_key(), "a");
}

#[test]
fn construction_rejects_bad_tables() {
    let missing = SceneRegistry::<()>::new(vec![Box::new(Named("a"))], "x");
    assert!(matches!(missing, Err(PosterError::Config(_))));
    let dup = SceneRegistry::<()>::new(vec![Box::new(Named("a")), Box::new(Named("a"))], "a");
    assert!(matches!(dup, Err(PosterError::Config(_))));
}

#[test]
fn env_layer_goes_to_surface_trace() {
    let mut surface = Surface::new(CanvasSize::SQUARE, 0.25, u64::MAX).unwrap();
    let mut text = TextEngine::estimate_only();
    let assets = SceneAssets::default();
    let mut env = SceneEnv {
        surface: &mut surface,
        text: &mut text,
        input: &(),
        assets: &assets,
        rng: SeededRng::new(1),
    };
    registry().resolve("b").paint(&mut env).unwrap();
    assert_eq!(env.canvas(), CanvasSize::SQUARE);
    assert_eq!(surface.trace().layers, vec!["background"]);
    assert!(assets.lantern(LanternKind::Round).is_err());
}
