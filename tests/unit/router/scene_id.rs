use super::*;

#[test]
fn every_scene_round_trips_through_its_identifier() {
    for scene in SceneId::all() {
        assert_eq!(SceneId::parse(&scene.to_string()), Some(scene));
    }
    assert_eq!(SceneId::all().len(), 12);
}

#[test]
fn group_focus_ids_use_slugs() {
    assert_eq!(
        SceneId::parse("bars_psychological"),
        Some(SceneId::BarsFocus(Supergroup::Psychological))
    );
    assert_eq!(SceneId::parse("bars_nothing"), None);
    assert_eq!(SceneId::parse("bars_grouped"), Some(SceneId::BarsGrouped));
}

#[test]
fn unknown_and_missing_attributes_are_noops() {
    assert_eq!(SceneId::from_attr(Some("finale")), SceneId::Noop);
    assert_eq!(SceneId::from_attr(None), SceneId::Noop);
    let ids: Vec<SceneId> =
        serde_json::from_str(r#"["horror", "finale", null, "bars_cosmic"]"#).unwrap();
    assert_eq!(
        ids,
        [
            SceneId::Horror,
            SceneId::Noop,
            SceneId::Noop,
            SceneId::BarsFocus(Supergroup::Cosmic)
        ]
    );
}

#[test]
fn kinds_partition_scenes() {
    assert!(SceneId::BarsFocus(Supergroup::Body).is_bars());
    assert_eq!(SceneId::HorrorZoom.kind(), SceneKind::Scatter);
    assert_eq!(SceneId::Noop.kind(), SceneKind::Noop);
}
