use super::*;
use crate::{
    chart::node::{Emphasis, NodeKind},
    chart::recording::{RecordingSurface, SurfaceCall},
    chart::surface::Chart,
    data::source::InMemorySource,
    fixtures::{fear_rows, genre_rows},
    router::state::VisualState,
};

fn source() -> InMemorySource {
    InMemorySource::new(genre_rows(), fear_rows(), fear_rows())
}

fn router() -> (SceneRouter<InMemorySource>, RecordingSurface) {
    let opts = EngineOpts::default();
    let surface = RecordingSurface::new(opts.geometry);
    (SceneRouter::new(source(), opts).unwrap(), surface)
}

fn clears(calls: &[SurfaceCall]) -> usize {
    calls
        .iter()
        .filter(|c| matches!(c, SurfaceCall::Clear(_)))
        .count()
}

fn dimmed_marks(chart: &Chart) -> usize {
    chart
        .nodes(Layer::Marks)
        .filter(|(_, n)| n.emphasis == Emphasis::Dimmed)
        .count()
}

#[test]
fn cold_baseline_renders_without_crossfade() {
    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::Baseline);
    assert_eq!(r.state().mode(), SceneMode::Scatter);
    assert_eq!(r.state().visual_state(), VisualState::ScatterQuadrants);
    assert_eq!(clears(s.calls()), 3);
    assert_eq!(s.header().title, "The Hit Matrix");
    assert!(!s.methodology_visible());
}

#[test]
fn chart_kind_swap_waits_for_the_fade() {
    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::Baseline);
    r.settle(&mut s);
    s.take_calls();

    r.go(&mut s, SceneId::Bars);
    assert!(s.methodology_visible());
    assert_eq!(r.state().pending(), Some(SceneMode::Bars));
    assert_eq!(r.state().mode(), SceneMode::Scatter);
    assert_eq!(clears(s.calls()), 0);

    r.tick(&mut s, r.opts().durations.crossfade);
    assert_eq!(clears(s.calls()), 3);
    assert_eq!(r.state().visual_state(), VisualState::Bars(BarsDataset::Flat));
    assert_eq!(s.header().title, "What Scares Us");

    r.settle(&mut s);
    assert_eq!(s.layer_opacity(Layer::Marks), 1.0);
}

#[test]
fn newer_request_replaces_an_in_flight_crossfade() {
    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::Baseline);
    r.settle(&mut s);
    r.go(&mut s, SceneId::Bars);
    r.tick(&mut s, Millis(100));
    r.go(&mut s, SceneId::Horror);
    r.settle(&mut s);

    assert!(
        !s.inner()
            .nodes(Layer::Marks)
            .any(|(_, n)| n.kind == NodeKind::Bar)
    );
    assert_eq!(
        r.state().visual_state(),
        VisualState::ScatterFocused(ScatterFocus::Horror)
    );
    assert!(r.bars_model().is_none());
}

#[test]
fn group_focus_is_applied_after_the_bars_render() {
    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::Baseline);
    r.go(&mut s, SceneId::BarsFocus(Supergroup::Body));
    r.tick(&mut s, r.opts().durations.crossfade);
    assert_eq!(r.state().visual_state(), VisualState::Bars(BarsDataset::Flat));

    r.settle(&mut s);
    assert_eq!(
        r.state().visual_state(),
        VisualState::BarsFocused(BarsDataset::Flat, Supergroup::Body)
    );
    let kept: Vec<_> = s
        .inner()
        .nodes(Layer::Marks)
        .filter(|(_, n)| n.kind == NodeKind::Bar && n.emphasis == Emphasis::Normal)
        .map(|(_, n)| n.key.clone())
        .collect();
    assert_eq!(kept, ["Death", "Disease"]);
}

#[test]
fn deferred_group_focus_is_dropped_once_bars_are_gone() {
    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::Baseline);
    r.go(&mut s, SceneId::BarsFocus(Supergroup::Cosmic));
    r.tick(&mut s, r.opts().durations.crossfade);
    r.go(&mut s, SceneId::Baseline);
    r.settle(&mut s);

    assert_eq!(r.state().visual_state(), VisualState::ScatterQuadrants);
    assert_eq!(r.state().bar_focus(), None);
    assert_eq!(dimmed_marks(s.inner()), 0);
}

#[test]
fn newer_bars_request_supersedes_a_waiting_group_focus() {
    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::Baseline);
    r.settle(&mut s);
    r.go(&mut s, SceneId::BarsFocus(Supergroup::Body));
    r.tick(&mut s, r.opts().durations.crossfade);
    r.go(&mut s, SceneId::BarsFocus(Supergroup::Cosmic));
    r.settle(&mut s);
    assert_eq!(
        r.state().visual_state(),
        VisualState::BarsFocused(BarsDataset::Flat, Supergroup::Cosmic)
    );

    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::Baseline);
    r.settle(&mut s);
    r.go(&mut s, SceneId::BarsFocus(Supergroup::Body));
    r.tick(&mut s, r.opts().durations.crossfade);
    r.go(&mut s, SceneId::Bars);
    r.settle(&mut s);
    assert_eq!(r.state().visual_state(), VisualState::Bars(BarsDataset::Flat));
    assert_eq!(dimmed_marks(s.inner()), 0);
}

#[test]
fn focus_switches_in_place_while_bars_are_shown() {
    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::BarsGrouped);
    r.settle(&mut s);
    s.take_calls();

    r.go(&mut s, SceneId::BarsFocus(Supergroup::Cosmic));
    assert_eq!(clears(s.calls()), 0);
    assert_eq!(
        r.state().visual_state(),
        VisualState::BarsFocused(BarsDataset::Grouped, Supergroup::Cosmic)
    );

    r.go(&mut s, SceneId::BarsGrouped);
    assert_eq!(r.state().bar_focus(), None);
    assert_eq!(dimmed_marks(s.inner()), 0);
}

#[test]
fn failed_load_keeps_the_chart_and_retries() {
    let opts = EngineOpts::default();
    let mut s = Chart::new(opts.geometry);
    let mut r = SceneRouter::new(source().fail_next_genre_loads(1), opts).unwrap();

    let err = r.try_go(&mut s, SceneId::Baseline).unwrap_err();
    assert!(err.to_string().starts_with("data error:"));
    assert_eq!(r.state().mode(), SceneMode::None);
    assert_eq!(s.nodes(Layer::Marks).count(), 0);

    r.go(&mut s, SceneId::Baseline);
    assert_eq!(r.state().mode(), SceneMode::Scatter);
    assert_eq!(r.load_attempts(), (2, 0, 0));
}

#[test]
fn each_dataset_loads_once() {
    let (mut r, mut s) = router();
    for scene in [
        SceneId::Baseline,
        SceneId::Horror,
        SceneId::Bars,
        SceneId::BarsGrouped,
        SceneId::Baseline,
        SceneId::Bars,
    ] {
        r.go(&mut s, scene);
        r.settle(&mut s);
    }
    assert_eq!(r.source().genre_loads(), 1);
    assert_eq!(r.source().fear_loads(), 2);
}

#[test]
fn hover_is_suppressed_once_the_scene_moves_on() {
    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::Baseline);
    r.settle(&mut s);
    let drama = s
        .inner()
        .nodes(Layer::Marks)
        .find(|(_, n)| n.kind == NodeKind::Dot && n.key == "Drama")
        .map(|(id, _)| id)
        .unwrap();
    let tip = r.hover(&mut s, drama).unwrap();
    assert_eq!(tip.title, "Drama");
    assert_eq!(s.tooltip(), Some(&tip));

    r.go(&mut s, SceneId::Bars);
    assert!(s.tooltip().is_none());
    assert!(r.hover(&mut s, drama).is_none());
    r.settle(&mut s);
    assert!(r.hover(&mut s, drama).is_none());
}

#[test]
fn leaving_the_zoom_restores_the_scatter() {
    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::Horror);
    r.go(&mut s, SceneId::HorrorZoom);
    r.settle(&mut s);
    assert_eq!(r.state().visual_state(), VisualState::ScatterZoomed);
    assert_eq!(s.layer_opacity(Layer::Legend), 0.0);

    r.go(&mut s, SceneId::Baseline);
    r.settle(&mut s);
    assert_eq!(r.state().visual_state(), VisualState::ScatterQuadrants);
    assert_eq!(s.layer_opacity(Layer::Legend), 1.0);
    assert!(s.inner().nodes(Layer::Marks).all(|(_, n)| n.displayed));
    assert!(
        !s.inner()
            .nodes(Layer::Axes)
            .any(|(_, n)| n.kind == NodeKind::Note)
    );
}

#[test]
fn noop_changes_nothing() {
    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::Noop);
    assert!(s.calls().is_empty());
    assert_eq!(r.state().mode(), SceneMode::None);
}

#[test]
fn card_headers_are_ignored_while_bars_own_the_title() {
    let (mut r, mut s) = router();
    r.go(&mut s, SceneId::Bars);
    r.set_card_header(
        &mut s,
        HeaderOverride {
            title: Some("Card".into()),
            subtitle: None,
        },
    );
    assert_eq!(s.header().title, "What Scares Us");

    r.go(&mut s, SceneId::HighViews);
    r.settle(&mut s);
    assert_eq!(s.header().title, "Card");
}
