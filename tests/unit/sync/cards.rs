use super::*;

#[test]
fn deserializes_with_defaults() {
    let card: NarrativeCard =
        serde_json::from_str(r#"{"id": "intro", "top": 100, "height": 400}"#).unwrap();
    assert_eq!(card.scene, SceneId::Noop);
    assert_eq!(card.center(), 300.0);
    assert_eq!(card.bottom(), 500.0);
    assert!(!card.is_active());
    assert!(card.header_override().title.is_none());
}

#[test]
fn unknown_scene_attribute_becomes_noop() {
    let card: NarrativeCard = serde_json::from_str(
        r#"{"id": "x", "top": 0, "height": 10, "scene": "finale", "effect": "shake"}"#,
    )
    .unwrap();
    assert_eq!(card.scene, SceneId::Noop);
    assert_eq!(card.effect.as_deref(), Some("shake"));
}

#[test]
fn validation_rejects_empty_cards() {
    assert!(NarrativeCard::new("a", 0.0, 0.0, SceneId::Baseline).validate().is_err());
    assert!(NarrativeCard::new(" ", 0.0, 10.0, SceneId::Baseline).validate().is_err());
    NarrativeCard::new("a", 0.0, 10.0, SceneId::Baseline)
        .validate()
        .unwrap();
}
